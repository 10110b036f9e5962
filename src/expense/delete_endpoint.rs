use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    Error,
    expense::{core::parse_expense_id, service::SQLiteExpenseService},
    user::UserID,
};

/// A route handler for deleting one of the user's expenses.
pub async fn delete_expense_endpoint(
    State(service): State<SQLiteExpenseService>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<String>,
) -> Result<Json<Value>, Error> {
    let expense_id = parse_expense_id(&expense_id)?;

    service.delete(user_id, expense_id)?;

    tracing::debug!("Deleted expense {expense_id} for user {user_id}");

    Ok(Json(json!({ "message": "Expense deleted" })))
}

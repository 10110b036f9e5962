use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    Error,
    expense::{
        core::{Expense, parse_expense_id},
        service::SQLiteExpenseService,
    },
    user::UserID,
};

/// A route handler for getting one of the user's expenses.
pub async fn get_expense_endpoint(
    State(service): State<SQLiteExpenseService>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<String>,
) -> Result<Json<Expense>, Error> {
    let expense_id = parse_expense_id(&expense_id)?;

    service.get(user_id, expense_id).map(Json)
}

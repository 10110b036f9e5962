use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;

use crate::{
    Error,
    expense::{core::Expense, service::SQLiteExpenseService, validation::ExpensePayload},
    user::UserID,
};

/// A route handler for recording a new expense for the user.
///
/// Responds with 201 Created and the stored expense. Any `owner` in the body
/// is ignored. A body that is not a JSON object is a 400 with a JSON message.
pub async fn create_expense_endpoint(
    State(service): State<SQLiteExpenseService>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Json(payload), _): WithRejection<Json<ExpensePayload>, Error>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let expense = service.create(user_id, &payload)?;

    tracing::debug!("Created expense {} for user {user_id}", expense.id);

    Ok((StatusCode::CREATED, Json(expense)))
}

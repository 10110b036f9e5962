use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{
    Error,
    expense::{core::Expense, query::ListQuery, service::SQLiteExpenseService},
    user::UserID,
};

/// A route handler for listing the user's expenses, newest first.
///
/// Accepts the optional `category`, `startDate` and `endDate` query parameters.
pub async fn list_expenses_endpoint(
    State(service): State<SQLiteExpenseService>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Expense>>, Error> {
    service.list(user_id, &query).map(Json)
}

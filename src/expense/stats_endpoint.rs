use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    expense::{service::SQLiteExpenseService, stats::CategoryStat},
    user::UserID,
};

/// A route handler for the user's spending per category.
///
/// Categories the user has no expenses in are left out.
pub async fn get_expense_stats_endpoint(
    State(service): State<SQLiteExpenseService>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<CategoryStat>>, Error> {
    service.stats(user_id).map(Json)
}

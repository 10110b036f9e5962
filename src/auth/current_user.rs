use axum::{Extension, Json, extract::State};
use serde_json::{Value, json};

use crate::{
    Error,
    auth::middleware::AuthState,
    user::{UserID, get_user_by_id},
};

/// Get the logged in user as `{"user": ...}`.
///
/// # Errors
///
/// Returns [Error::NotAuthenticated] if the user in the auth cookie no longer exists.
pub async fn current_user_endpoint(
    State(state): State<AuthState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    match get_user_by_id(user_id, &connection) {
        Ok(user) => Ok(Json(json!({ "user": user }))),
        Err(Error::NotFound) => Err(Error::NotAuthenticated),
        Err(error) => Err(error),
    }
}

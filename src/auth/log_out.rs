use axum::Json;
use axum_extra::extract::PrivateCookieJar;
use serde_json::{Value, json};

use crate::auth::cookie::invalidate_auth_cookie;

/// Invalidate the auth cookie, logging out the user.
///
/// Always succeeds, even if the client was not logged in.
pub async fn log_out_endpoint(jar: PrivateCookieJar) -> (PrivateCookieJar, Json<Value>) {
    (
        invalidate_auth_cookie(jar),
        Json(json!({ "message": "Logged out" })),
    )
}

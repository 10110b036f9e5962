//! Handles requests to register a new user.

use std::str::FromStr;

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::PrivateCookieJar;
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    Error, PasswordHash,
    auth::{cookie::set_auth_cookie, middleware::AuthState},
    user::create_user,
};

/// The details sent in a registration request.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterData {
    /// The user's display name.
    pub name: String,
    /// The email address the user will log in with.
    pub email: String,
    /// The user's chosen password in plain text.
    pub password: String,
}

/// Handler for registering a new user.
///
/// On success the user is logged in straight away: the auth cookie is set
/// and the response is 201 Created with `{"user": ...}`.
///
/// # Errors
///
/// Returns one of [Error::EmptyName], [Error::InvalidEmail],
/// [Error::TooWeak] or [Error::DuplicateEmail] for bad input.
pub async fn register_endpoint(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
    Json(user_data): Json<RegisterData>,
) -> Result<(StatusCode, PrivateCookieJar, Json<Value>), Error> {
    if user_data.name.trim().is_empty() {
        return Err(Error::EmptyName);
    }

    let email = EmailAddress::from_str(user_data.email.trim())
        .map_err(|_| Error::InvalidEmail(user_data.email.clone()))?;
    let password_hash =
        PasswordHash::from_raw_password(&user_data.password, PasswordHash::DEFAULT_COST)?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        create_user(&user_data.name, &email, password_hash, &connection)?
    };

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, jar, Json(json!({ "user": user }))))
}

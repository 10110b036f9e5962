//! Defines the app level error type and its conversion to JSON responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::expense::ValidationError;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more fields of an expense payload or list filter broke a rule.
    ///
    /// Holds every violated rule, not just the first.
    #[error("{} field(s) failed validation", .0.len())]
    Validation(Vec<ValidationError>),

    /// The request body was not a JSON object, e.g. it was malformed or sent
    /// without a JSON content type.
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    /// The requested resource was not found.
    ///
    /// Expense lookups are scoped to the requesting user, so this is also
    /// returned when the resource exists but belongs to someone else.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The request did not carry a valid auth cookie.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The email and password do not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A user with the email address is already registered.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// The string is not a valid email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// An empty or whitespace-only string was used as a user's name.
    #[error("name cannot be empty")]
    EmptyName,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The auth token could not be written to or read from its cookie.
    #[error("could not encode the auth token: {0}")]
    TokenEncodingError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref desc),
            ) if desc.ends_with("user.email") => Error::DuplicateEmail,
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidJson(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ValidationErrorBody<'a> {
    errors: &'a [ValidationError],
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::Validation(errors) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ValidationErrorBody { errors }),
                )
                    .into_response();
            }
            Error::InvalidJson(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            Error::NotFound => (StatusCode::NOT_FOUND, "Expense not found".to_owned()),
            Error::NotAuthenticated => (StatusCode::UNAUTHORIZED, "Not authenticated".to_owned()),
            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_owned(),
            ),
            Error::DuplicateEmail => (
                StatusCode::CONFLICT,
                "The email address is already registered".to_owned(),
            ),
            Error::InvalidEmail(_) => (
                StatusCode::BAD_REQUEST,
                "Please enter a valid email address".to_owned(),
            ),
            Error::EmptyName => (StatusCode::BAD_REQUEST, "Name cannot be empty".to_owned()),
            Error::TooWeak(feedback) => (
                StatusCode::BAD_REQUEST,
                format!("Password is too weak: {feedback}"),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_owned(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

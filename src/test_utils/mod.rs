#![allow(missing_docs)]

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Extension, Router,
    routing::{get, put},
};
use axum_test::TestServer;
use email_address::EmailAddress;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use crate::{
    PasswordHash, endpoints,
    expense::{
        SQLiteExpenseService, SQLiteExpenseStore, create_expense_endpoint,
        delete_expense_endpoint, edit_expense_endpoint, get_expense_endpoint,
        get_expense_stats_endpoint, list_expenses_endpoint,
    },
    initialize_db,
    user::{UserID, create_user},
};

/// A freshly initialized in-memory database.
pub(crate) fn get_test_connection() -> Arc<Mutex<Connection>> {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    initialize_db(&connection).expect("Could not initialize database");

    Arc::new(Mutex::new(connection))
}

pub(crate) fn get_test_store() -> (SQLiteExpenseStore, Arc<Mutex<Connection>>) {
    let connection = get_test_connection();

    (SQLiteExpenseStore::new(connection.clone()), connection)
}

pub(crate) fn get_test_service() -> (SQLiteExpenseService, Arc<Mutex<Connection>>) {
    let (store, connection) = get_test_store();

    (SQLiteExpenseService::new(store), connection)
}

/// Insert a user with a dummy password hash, so expenses can reference them.
#[track_caller]
pub(crate) fn insert_test_user(email: &str, connection: &Mutex<Connection>) -> UserID {
    let email = EmailAddress::from_str(email).expect("Invalid test email");
    let connection = connection.lock().expect("Could not lock database");

    create_user(
        "Test User",
        &email,
        PasswordHash::new_unchecked("hunter2"),
        &connection,
    )
    .expect("Could not create test user")
    .id
}

/// A server with the expense routes that treats every request as coming
/// from `principal`.
pub(crate) fn get_expense_test_server(
    service: SQLiteExpenseService,
    principal: UserID,
) -> TestServer {
    let app = Router::new()
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(endpoints::EXPENSE_STATS, get(get_expense_stats_endpoint))
        .route(
            endpoints::EXPENSE,
            put(edit_expense_endpoint)
                .get(get_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .layer(Extension(principal))
        .with_state(service);

    TestServer::new(app)
}

#[track_caller]
pub(crate) fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
    assert!(
        (left - right).abs() < Duration::seconds(1),
        "got date time {left:?}, want {right:?}"
    );
}

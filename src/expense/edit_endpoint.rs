use axum::{
    Extension, Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;

use crate::{
    Error,
    expense::{
        core::{Expense, parse_expense_id},
        service::SQLiteExpenseService,
        validation::ExpensePayload,
    },
    user::UserID,
};

/// A route handler for changing some or all fields of one of the user's
/// expenses, responds with the updated expense.
pub async fn edit_expense_endpoint(
    State(service): State<SQLiteExpenseService>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<ExpensePayload>, Error>,
) -> Result<Json<Expense>, Error> {
    let expense_id = parse_expense_id(&expense_id)?;

    service.update(user_id, expense_id, &payload).map(Json)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        endpoints::{self, format_endpoint},
        expense::{
            core::Expense,
            validation::{Field, ValidationError, ValidationErrorKind},
        },
        test_utils::{get_expense_test_server, get_test_service, insert_test_user},
    };

    fn coffee() -> serde_json::Value {
        json!({
            "title": "Coffee",
            "amount": 4.5,
            "category": "Food",
            "date": "2024-01-05",
        })
    }

    #[tokio::test]
    async fn updates_supplied_fields() {
        let (service, connection) = get_test_service();
        let alice = insert_test_user("alice@example.com", &connection);
        let server = get_expense_test_server(service, alice);
        let created: Expense = server.post(endpoints::EXPENSES).json(&coffee()).await.json();

        let response = server
            .put(&format_endpoint(endpoints::EXPENSE, created.id))
            .json(&json!({ "amount": 5.25, "description": "large" }))
            .await;

        response.assert_status_ok();
        let updated: Expense = response.json();
        assert_eq!(updated.amount, 5.25);
        assert_eq!(updated.description, "large");
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.date, created.date);
    }

    #[tokio::test]
    async fn negative_amount_is_rejected_and_expense_unchanged() {
        let (service, connection) = get_test_service();
        let alice = insert_test_user("alice@example.com", &connection);
        let server = get_expense_test_server(service, alice);
        let created: Expense = server.post(endpoints::EXPENSES).json(&coffee()).await.json();
        let path = format_endpoint(endpoints::EXPENSE, created.id);

        let response = server.put(&path).json(&json!({ "amount": -1 })).await;

        response.assert_status_bad_request();
        server.get(&path).await.assert_json(&created);
    }

    #[tokio::test]
    async fn other_users_expense_is_not_found() {
        let (service, connection) = get_test_service();
        let alice = insert_test_user("alice@example.com", &connection);
        let bob = insert_test_user("bob@example.com", &connection);
        let alice_server = get_expense_test_server(service.clone(), alice);
        let created: Expense = alice_server
            .post(endpoints::EXPENSES)
            .json(&coffee())
            .await
            .json();
        let path = format_endpoint(endpoints::EXPENSE, created.id);

        get_expense_test_server(service, bob)
            .put(&path)
            .json(&json!({ "title": "Stolen" }))
            .await
            .assert_status_not_found();

        alice_server.get(&path).await.assert_json(&created);
    }

    #[tokio::test]
    async fn wrong_type_is_reported_with_other_invalid_fields() {
        let (service, connection) = get_test_service();
        let alice = insert_test_user("alice@example.com", &connection);
        let server = get_expense_test_server(service, alice);
        let created: Expense = server.post(endpoints::EXPENSES).json(&coffee()).await.json();
        let path = format_endpoint(endpoints::EXPENSE, created.id);

        let response = server
            .put(&path)
            .json(&json!({ "title": 5, "date": "tomorrow" }))
            .await;

        response.assert_status_bad_request();
        let errors: Vec<ValidationError> =
            serde_json::from_value(response.json::<serde_json::Value>()["errors"].clone())
                .unwrap();
        let got: Vec<_> = errors.iter().map(|error| (error.field, error.kind)).collect();
        assert_eq!(
            got,
            [
                (Field::Title, ValidationErrorKind::NotText),
                (Field::Date, ValidationErrorKind::InvalidDate),
            ]
        );
        server.get(&path).await.assert_json(&created);
    }
}

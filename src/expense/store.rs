//! Defines the expense store trait and its SQLite implementation.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, params, params_from_iter, types::Value};

use crate::{
    Error,
    expense::{
        core::{EXPENSE_COLUMNS, Expense, map_expense_row},
        scope::{OwnerScope, ScopedFilter, ScopedId},
        validation::{ExpensePatch, ValidatedExpense},
    },
};

/// Handles the creation, retrieval, modification and removal of expenses.
///
/// Every method takes one of the scoped types from
/// [scope](crate::expense::scope), so implementers always know which user an
/// operation is restricted to and must never touch another user's records.
pub trait ExpenseStore {
    /// Store a new expense owned by `scope.owner()`.
    fn insert(&self, scope: OwnerScope, expense: ValidatedExpense) -> Result<Expense, Error>;

    /// Retrieve the expense `id.id()` if it belongs to `id.owner()`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no such expense exists for the owner.
    fn get(&self, id: ScopedId) -> Result<Expense, Error>;

    /// Retrieve the owner's expenses that match `filter`, most recent first.
    ///
    /// Expenses on the same date are returned in the order they were created.
    fn query(&self, filter: &ScopedFilter) -> Result<Vec<Expense>, Error>;

    /// Apply the fields set in `patch` to the expense and return the result.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no such expense exists for the owner.
    fn update(&self, id: ScopedId, patch: ExpensePatch) -> Result<Expense, Error>;

    /// Permanently remove the expense.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no such expense exists for the owner.
    fn delete(&self, id: ScopedId) -> Result<(), Error>;
}

/// Stores expenses in a SQLite database.
///
/// The expense table references the user table, so both must have been
/// created, e.g. with [initialize](crate::initialize_db).
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    fn insert(&self, scope: OwnerScope, expense: ValidatedExpense) -> Result<Expense, Error> {
        let connection = self.lock()?;

        let expense = connection
            .prepare(&format!(
                "INSERT INTO expense (owner_id, title, amount, category, description, date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING {EXPENSE_COLUMNS}"
            ))?
            .query_row(
                params![
                    scope.owner().as_i64(),
                    expense.title,
                    expense.amount,
                    expense.category,
                    expense.description,
                    expense.date,
                ],
                map_expense_row,
            )?;

        Ok(expense)
    }

    fn get(&self, id: ScopedId) -> Result<Expense, Error> {
        let connection = self.lock()?;

        let expense = connection
            .prepare(&format!(
                "SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = ?1 AND owner_id = ?2"
            ))?
            .query_row(params![id.id(), id.owner().as_i64()], map_expense_row)?;

        Ok(expense)
    }

    fn query(&self, filter: &ScopedFilter) -> Result<Vec<Expense>, Error> {
        let mut where_clause_parts = vec!["owner_id = ?1".to_owned()];
        let mut query_parameters = vec![Value::Integer(filter.owner().as_i64())];

        if let Some(category) = filter.filter().category {
            query_parameters.push(Value::Text(category.to_string()));
            where_clause_parts.push(format!("category = ?{}", query_parameters.len()));
        }

        if let Some(date_range) = &filter.filter().date_range {
            where_clause_parts.push(format!(
                "date BETWEEN ?{} AND ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2,
            ));
            query_parameters.push(Value::Text(date_range.start().to_string()));
            query_parameters.push(Value::Text(date_range.end().to_string()));
        }

        let query_string = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE {} ORDER BY date DESC, id ASC",
            where_clause_parts.join(" AND ")
        );

        let connection = self.lock()?;
        let mut statement = connection.prepare(&query_string)?;

        let expenses: Result<Vec<Expense>, Error> = statement
            .query_map(params_from_iter(query_parameters.iter()), map_expense_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::from))
            .collect();

        expenses
    }

    fn update(&self, id: ScopedId, patch: ExpensePatch) -> Result<Expense, Error> {
        let connection = self.lock()?;

        let expense = connection
            .prepare(&format!(
                "UPDATE expense
                 SET
                    title = COALESCE(?1, title),
                    amount = COALESCE(?2, amount),
                    category = COALESCE(?3, category),
                    description = COALESCE(?4, description),
                    date = COALESCE(?5, date)
                 WHERE id = ?6 AND owner_id = ?7
                 RETURNING {EXPENSE_COLUMNS}"
            ))?
            .query_row(
                params![
                    patch.title,
                    patch.amount,
                    patch.category,
                    patch.description,
                    patch.date,
                    id.id(),
                    id.owner().as_i64(),
                ],
                map_expense_row,
            )?;

        Ok(expense)
    }

    fn delete(&self, id: ScopedId) -> Result<(), Error> {
        let rows_affected = self.lock()?.execute(
            "DELETE FROM expense WHERE id = ?1 AND owner_id = ?2",
            params![id.id(), id.owner().as_i64()],
        )?;

        match rows_affected {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        category::Category,
        expense::{
            query::ExpenseFilter,
            scope::{scope_filter, scope_id, scope_owner},
            validation::{ExpensePatch, ValidatedExpense},
        },
        test_utils::{get_test_store, insert_test_user},
        user::UserID,
    };

    use super::ExpenseStore;

    fn expense(title: &str, amount: f64, category: Category, date: time::Date) -> ValidatedExpense {
        ValidatedExpense {
            title: title.to_owned(),
            amount,
            category,
            description: String::new(),
            date,
        }
    }

    #[test]
    fn insert_assigns_id_and_owner() {
        let (store, connection) = get_test_store();
        let owner = insert_test_user("a@example.com", &connection);

        let got = store
            .insert(
                scope_owner(owner),
                expense("Coffee", 4.5, Category::Food, date!(2024 - 01 - 05)),
            )
            .unwrap();

        assert!(got.id > 0);
        assert_eq!(got.owner, owner);
        assert_eq!(got.title, "Coffee");
        assert_eq!(got.amount, 4.5);
        assert_eq!(got.category, Category::Food);
        assert_eq!(got.date, date!(2024 - 01 - 05));
    }

    #[test]
    fn insert_fails_for_unknown_owner() {
        let (store, _connection) = get_test_store();

        let result = store.insert(
            scope_owner(UserID::new(999)),
            expense("Coffee", 4.5, Category::Food, date!(2024 - 01 - 05)),
        );

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn get_only_matches_owner() {
        let (store, connection) = get_test_store();
        let owner = insert_test_user("a@example.com", &connection);
        let other = insert_test_user("b@example.com", &connection);
        let inserted = store
            .insert(
                scope_owner(owner),
                expense("Coffee", 4.5, Category::Food, date!(2024 - 01 - 05)),
            )
            .unwrap();

        assert_eq!(store.get(scope_id(owner, inserted.id)), Ok(inserted.clone()));
        assert_eq!(
            store.get(scope_id(other, inserted.id)),
            Err(Error::NotFound)
        );
        assert_eq!(
            store.get(scope_id(owner, inserted.id + 1)),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn query_sorts_by_date_descending_then_creation_order() {
        let (store, connection) = get_test_store();
        let owner = insert_test_user("a@example.com", &connection);
        let scope = scope_owner(owner);
        let first = store
            .insert(scope, expense("A", 1.0, Category::Food, date!(2024 - 01 - 02)))
            .unwrap();
        let second = store
            .insert(scope, expense("B", 2.0, Category::Food, date!(2024 - 01 - 03)))
            .unwrap();
        let third = store
            .insert(scope, expense("C", 3.0, Category::Food, date!(2024 - 01 - 02)))
            .unwrap();

        let got = store
            .query(&scope_filter(owner, ExpenseFilter::default()))
            .unwrap();

        assert_eq!(got, [second, first, third]);
    }

    #[test]
    fn query_filters_by_category() {
        let (store, connection) = get_test_store();
        let owner = insert_test_user("a@example.com", &connection);
        let scope = scope_owner(owner);
        let food = store
            .insert(scope, expense("Lunch", 12.0, Category::Food, date!(2024 - 01 - 02)))
            .unwrap();
        store
            .insert(scope, expense("Power", 80.0, Category::Bills, date!(2024 - 01 - 03)))
            .unwrap();

        let got = store
            .query(&scope_filter(
                owner,
                ExpenseFilter {
                    category: Some(Category::Food),
                    ..Default::default()
                },
            ))
            .unwrap();

        assert_eq!(got, [food]);
    }

    #[test]
    fn query_date_range_is_inclusive() {
        let (store, connection) = get_test_store();
        let owner = insert_test_user("a@example.com", &connection);
        let scope = scope_owner(owner);
        let start = date!(2024 - 01 - 10);
        let end = date!(2024 - 01 - 20);

        let mut want = vec![
            store
                .insert(scope, expense("Start", 1.0, Category::Other, start))
                .unwrap(),
            store
                .insert(scope, expense("Middle", 1.0, Category::Other, date!(2024 - 01 - 15)))
                .unwrap(),
            store
                .insert(scope, expense("End", 1.0, Category::Other, end))
                .unwrap(),
        ];
        want.reverse();

        // These should NOT be returned by the query.
        for date in [date!(2024 - 01 - 09), date!(2024 - 01 - 21)] {
            store
                .insert(scope, expense("Outside", 1.0, Category::Other, date))
                .unwrap();
        }

        let got = store
            .query(&scope_filter(
                owner,
                ExpenseFilter {
                    date_range: Some(start..=end),
                    ..Default::default()
                },
            ))
            .unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn query_never_returns_other_owners_expenses() {
        let (store, connection) = get_test_store();
        let owner = insert_test_user("a@example.com", &connection);
        let other = insert_test_user("b@example.com", &connection);
        store
            .insert(
                scope_owner(other),
                expense("Theirs", 5.0, Category::Food, date!(2024 - 01 - 05)),
            )
            .unwrap();

        let got = store
            .query(&scope_filter(owner, ExpenseFilter::default()))
            .unwrap();

        assert!(got.is_empty(), "got another user's expenses: {got:?}");
    }

    #[test]
    fn update_changes_only_patched_fields() {
        let (store, connection) = get_test_store();
        let owner = insert_test_user("a@example.com", &connection);
        let inserted = store
            .insert(
                scope_owner(owner),
                expense("Coffee", 4.5, Category::Food, date!(2024 - 01 - 05)),
            )
            .unwrap();

        let got = store
            .update(
                scope_id(owner, inserted.id),
                ExpensePatch {
                    amount: Some(5.0),
                    description: Some("with oat milk".to_owned()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(got.amount, 5.0);
        assert_eq!(got.description, "with oat milk");
        assert_eq!(got.title, inserted.title);
        assert_eq!(got.category, inserted.category);
        assert_eq!(got.date, inserted.date);
        assert_eq!(store.get(scope_id(owner, inserted.id)), Ok(got));
    }

    #[test]
    fn update_fails_for_other_owner_and_leaves_record() {
        let (store, connection) = get_test_store();
        let owner = insert_test_user("a@example.com", &connection);
        let other = insert_test_user("b@example.com", &connection);
        let inserted = store
            .insert(
                scope_owner(owner),
                expense("Coffee", 4.5, Category::Food, date!(2024 - 01 - 05)),
            )
            .unwrap();

        let result = store.update(
            scope_id(other, inserted.id),
            ExpensePatch {
                amount: Some(100.0),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(store.get(scope_id(owner, inserted.id)), Ok(inserted));
    }

    #[test]
    fn delete_removes_expense_once() {
        let (store, connection) = get_test_store();
        let owner = insert_test_user("a@example.com", &connection);
        let inserted = store
            .insert(
                scope_owner(owner),
                expense("Coffee", 4.5, Category::Food, date!(2024 - 01 - 05)),
            )
            .unwrap();

        assert_eq!(store.delete(scope_id(owner, inserted.id)), Ok(()));
        assert_eq!(
            store.delete(scope_id(owner, inserted.id)),
            Err(Error::NotFound)
        );
        assert_eq!(
            store.get(scope_id(owner, inserted.id)),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_fails_for_other_owner() {
        let (store, connection) = get_test_store();
        let owner = insert_test_user("a@example.com", &connection);
        let other = insert_test_user("b@example.com", &connection);
        let inserted = store
            .insert(
                scope_owner(owner),
                expense("Coffee", 4.5, Category::Food, date!(2024 - 01 - 05)),
            )
            .unwrap();

        assert_eq!(
            store.delete(scope_id(other, inserted.id)),
            Err(Error::NotFound)
        );
        assert_eq!(store.get(scope_id(owner, inserted.id)), Ok(inserted));
    }

    #[test]
    fn poisoned_connection_is_lock_error() {
        let (store, connection) = get_test_store();
        let alice = insert_test_user("alice@example.com", &connection);

        let _ = std::thread::spawn(move || {
            let _guard = connection.lock().unwrap();
            panic!("poison the connection lock");
        })
        .join();

        assert_eq!(
            store.query(&scope_filter(alice, ExpenseFilter::default())),
            Err(Error::DatabaseLockError)
        );
    }
}

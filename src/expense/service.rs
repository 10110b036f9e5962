//! The operations an authenticated user can perform on their expenses.

use crate::{
    Error,
    database_id::ExpenseId,
    expense::{
        core::Expense,
        query::{ListQuery, parse_filter},
        scope::{scope_filter, scope_id, scope_owner},
        stats::{CategoryStat, aggregate},
        store::{ExpenseStore, SQLiteExpenseStore},
        validation::{ExpensePayload, validate_create, validate_update},
    },
    user::UserID,
};

/// Validates input, restricts every call to the principal's own expenses,
/// and forwards to the store.
///
/// The service holds no state of its own beyond the store.
#[derive(Debug, Clone)]
pub struct ExpenseService<S> {
    store: S,
}

/// The expense service backed by SQLite.
pub type SQLiteExpenseService = ExpenseService<SQLiteExpenseStore>;

impl<S> ExpenseService<S>
where
    S: ExpenseStore,
{
    /// Create a service that keeps expenses in `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get the principal's expenses that match `query`, most recent first.
    ///
    /// # Errors
    /// Returns [Error::Validation] if a filter cannot be parsed, or a store
    /// error.
    pub fn list(&self, principal: UserID, query: &ListQuery) -> Result<Vec<Expense>, Error> {
        let filter = parse_filter(query).map_err(Error::Validation)?;

        self.store.query(&scope_filter(principal, filter))
    }

    /// Get one of the principal's expenses.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the expense does not exist or belongs to
    /// another user.
    pub fn get(&self, principal: UserID, id: ExpenseId) -> Result<Expense, Error> {
        self.store.get(scope_id(principal, id))
    }

    /// Record a new expense owned by the principal.
    ///
    /// Nothing is stored if the payload is invalid.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every broken rule, or a store error.
    pub fn create(&self, principal: UserID, payload: &ExpensePayload) -> Result<Expense, Error> {
        let expense = validate_create(payload).map_err(Error::Validation)?;

        self.store.insert(scope_owner(principal), expense)
    }

    /// Change the fields present in `payload` on one of the principal's expenses.
    ///
    /// The payload is checked before the store is touched, so an invalid
    /// payload is reported even if the expense does not exist.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the payload is invalid, or
    /// [Error::NotFound] if the expense does not exist or belongs to another
    /// user.
    pub fn update(
        &self,
        principal: UserID,
        id: ExpenseId,
        payload: &ExpensePayload,
    ) -> Result<Expense, Error> {
        let patch = validate_update(payload).map_err(Error::Validation)?;

        self.store.update(scope_id(principal, id), patch)
    }

    /// Remove one of the principal's expenses.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the expense does not exist, was already
    /// deleted, or belongs to another user.
    pub fn delete(&self, principal: UserID, id: ExpenseId) -> Result<(), Error> {
        self.store.delete(scope_id(principal, id))
    }

    /// Total and count the principal's expenses per category.
    ///
    /// # Errors
    /// Returns a store error if the expenses cannot be read.
    pub fn stats(&self, principal: UserID) -> Result<Vec<CategoryStat>, Error> {
        let expenses = self
            .store
            .query(&scope_filter(principal, Default::default()))?;

        Ok(aggregate(&expenses))
    }
}

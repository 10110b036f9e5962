//! Recording, querying, and summarizing a user's expenses.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod list_endpoint;
mod query;
mod scope;
mod service;
mod stats;
mod stats_endpoint;
mod store;
mod validation;

pub use core::{Expense, create_expense_table};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use get_endpoint::get_expense_endpoint;
pub use list_endpoint::list_expenses_endpoint;
pub use query::{ExpenseFilter, ListQuery, parse_filter};
pub use scope::{OwnerScope, ScopedFilter, ScopedId, scope_filter, scope_id, scope_owner};
pub use service::{ExpenseService, SQLiteExpenseService};
pub use stats::{CategoryStat, aggregate};
pub use stats_endpoint::get_expense_stats_endpoint;
pub use store::{ExpenseStore, SQLiteExpenseStore};
pub use validation::{
    ExpensePatch, ExpensePayload, Field, MAX_AMOUNT, ValidatedExpense, ValidationError,
    ValidationErrorKind, validate_create, validate_update,
};

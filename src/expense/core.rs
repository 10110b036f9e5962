//! Defines the expense record and its database table.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, category::Category, database_id::ExpenseId, user::UserID};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Money spent by a user on one thing, at one time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the store.
    pub id: ExpenseId,
    /// The user who created the expense. Only they can see or change it.
    pub owner: UserID,
    /// A short name for the expense, never empty.
    pub title: String,
    /// How much was spent, never negative.
    pub amount: f64,
    /// What kind of spending this was.
    pub category: Category,
    /// Free text notes, may be empty.
    pub description: String,
    /// When the expense happened.
    #[serde(with = "iso_date")]
    pub date: Date,
}

/// The columns of the expense table in the order [map_expense_row] expects.
pub(super) const EXPENSE_COLUMNS: &str = "id, owner_id, title, amount, category, description, date";

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id INTEGER NOT NULL,
                title TEXT NOT NULL CHECK (length(trim(title)) > 0),
                amount REAL NOT NULL CHECK (amount >= 0),
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                FOREIGN KEY(owner_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Every query filters by owner and sorts by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_owner_date ON expense(owner_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row selected with [EXPENSE_COLUMNS] to an [Expense].
pub(super) fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        owner: UserID::new(row.get(1)?),
        title: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        date: row.get(6)?,
    })
}

/// Parse the expense ID taken from a request path.
///
/// # Errors
/// Returns [Error::NotFound] if `raw` is not an integer, since no expense
/// could have that ID.
pub(crate) fn parse_expense_id(raw: &str) -> Result<ExpenseId, Error> {
    raw.parse().map_err(|_| Error::NotFound)
}

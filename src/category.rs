//! The closed set of labels an expense can be filed under.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// What kind of spending an expense was.
///
/// Categories are fixed; users cannot add their own. The variant names are
/// also the wire and database representation, e.g. `"Food"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Groceries, eating out, coffee.
    Food,
    /// Fuel, fares, parking.
    Transportation,
    /// Movies, games, events.
    Entertainment,
    /// Clothes, gadgets, household goods.
    Shopping,
    /// Rent, utilities, subscriptions.
    Bills,
    /// Doctor visits, medicine, insurance.
    Healthcare,
    /// Anything that does not fit elsewhere.
    Other,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transportation,
        Category::Entertainment,
        Category::Shopping,
        Category::Bills,
        Category::Healthcare,
        Category::Other,
    ];

    /// The label used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Healthcare => "Healthcare",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The string did not name one of the [Category] variants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("\"{0}\" is not a valid category")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Parse a category label. Matching is exact and case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod tests {
    use crate::category::{Category, UnknownCategory};

    #[test]
    fn parses_every_label() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn rejects_unknown_label() {
        assert_eq!(
            "Rent".parse::<Category>(),
            Err(UnknownCategory("Rent".to_owned()))
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!("food".parse::<Category>().is_err());
        assert!(" Food".parse::<Category>().is_err());
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Category::Healthcare).unwrap();

        assert_eq!(json, r#""Healthcare""#);
    }

    #[test]
    fn deserializing_unknown_label_fails() {
        let result = serde_json::from_str::<Category>(r#""Rent""#);

        assert!(result.is_err());
    }
}

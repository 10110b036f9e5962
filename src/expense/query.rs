//! Turns the optional list filters sent by a client into an [ExpenseFilter].

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    category::Category,
    expense::validation::{
        Field, Presence, ValidationError, ValidationErrorKind, Violations, parse_category,
        parse_date,
    },
};

/// The query string parameters accepted when listing expenses.
///
/// Parameters not named here, such as `owner`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Only include expenses with this category label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Only include expenses on or after this date. Requires `end_date`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Only include expenses on or before this date. Requires `start_date`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Which expenses to select, before it is tied to an owner.
///
/// `None` means no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    /// Include expenses with this category.
    pub category: Option<Category>,
    /// Include expenses dated within `date_range` (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,
}

/// Parse the list filters in `query`.
///
/// Empty parameters count as absent. A date range needs both bounds.
///
/// # Errors
/// Returns every [ValidationError] found in `query`.
pub fn parse_filter(query: &ListQuery) -> Result<ExpenseFilter, Vec<ValidationError>> {
    let mut violations = Violations::default();

    let raw_category = non_empty(&query.category);
    let raw_start = non_empty(&query.start_date);
    let raw_end = non_empty(&query.end_date);

    let category = violations.check(
        Field::Category,
        raw_category,
        Presence::Optional,
        parse_category,
    );
    let start = violations.check(Field::StartDate, raw_start, Presence::Optional, parse_date);
    let end = violations.check(Field::EndDate, raw_end, Presence::Optional, parse_date);

    match (raw_start, raw_end) {
        (Some(_), None) => violations.push(Field::EndDate, ValidationErrorKind::Missing),
        (None, Some(_)) => violations.push(Field::StartDate, ValidationErrorKind::Missing),
        _ => {}
    }

    let date_range = match (start, end) {
        (Some(start), Some(end)) => Some(start..=end),
        _ => None,
    };

    violations.into_result(Some(ExpenseFilter {
        category,
        date_range,
    }))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

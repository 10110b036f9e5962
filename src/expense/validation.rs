//! Checks the shape and ranges of expense payloads before they reach the store.
//!
//! Every rule is evaluated, so a rejected payload reports all of its problems
//! at once instead of only the first one.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{
    Date, OffsetDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::category::Category;

/// The expense fields a client may send when creating or editing an expense.
///
/// Fields are kept as raw JSON values so that a value of the wrong type is
/// reported as a broken rule alongside every other problem with the payload,
/// instead of failing deserialization on the first one. A JSON `null` counts
/// as absent. [validate_create] decides which fields are required.
/// Fields the client is not allowed to set, such as the owner or ID, are not
/// part of the payload and are dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpensePayload {
    /// A short name for the expense.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    /// How much was spent, either a JSON number or a numeric string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    /// One of the [Category] labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    /// Free text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    /// When the expense happened, e.g. "2024-01-05".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
}

/// The largest amount a single expense may have.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// A complete expense that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedExpense {
    /// Trimmed, non-empty title.
    pub title: String,
    /// Between zero and [MAX_AMOUNT].
    pub amount: f64,
    /// The expense category.
    pub category: Category,
    /// Free text, empty when the client sent none.
    pub description: String,
    /// When the expense happened.
    pub date: Date,
}

/// The validated subset of fields to change on an existing expense.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    /// Trimmed, non-empty title.
    pub title: Option<String>,
    /// Between zero and [MAX_AMOUNT].
    pub amount: Option<f64>,
    /// The expense category.
    pub category: Option<Category>,
    /// Free text.
    pub description: Option<String>,
    /// When the expense happened.
    pub date: Option<Date>,
}

/// The input field a [ValidationError] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// [ExpensePayload::title].
    Title,
    /// [ExpensePayload::amount].
    Amount,
    /// [ExpensePayload::category], or the category list filter.
    Category,
    /// [ExpensePayload::description].
    Description,
    /// [ExpensePayload::date].
    Date,
    /// The start of the list date range filter.
    StartDate,
    /// The end of the list date range filter.
    EndDate,
}

impl Field {
    fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Amount => "Amount",
            Field::Category => "Category",
            Field::Description => "Description",
            Field::Date => "Date",
            Field::StartDate => "Start date",
            Field::EndDate => "End date",
        }
    }
}

/// Which rule a field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// A required field was not sent.
    Missing,
    /// The field was empty or only whitespace.
    EmptyField,
    /// The field should hold text but held another kind of value.
    NotText,
    /// The field could not be read as a finite number.
    NotANumber,
    /// The number was negative or larger than [MAX_AMOUNT].
    OutOfRange,
    /// The value is not one of the allowed labels.
    InvalidEnum,
    /// The value is not a date in an accepted format.
    InvalidDate,
}

/// A single broken rule, with a message that can be shown to users as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// The offending field.
    pub field: Field,
    /// The rule it broke.
    pub kind: ValidationErrorKind,
    /// A human readable description of the problem.
    pub message: String,
}

impl ValidationError {
    /// Create an error for `field` breaking the rule `kind`.
    pub fn new(field: Field, kind: ValidationErrorKind) -> Self {
        let label = field.label();
        let message = match kind {
            ValidationErrorKind::Missing => format!("{label} is required"),
            ValidationErrorKind::EmptyField => format!("{label} cannot be empty"),
            ValidationErrorKind::NotText => format!("{label} must be text"),
            ValidationErrorKind::NotANumber => format!("{label} must be a number"),
            ValidationErrorKind::OutOfRange => {
                format!("{label} must be between 0 and {MAX_AMOUNT}")
            }
            ValidationErrorKind::InvalidEnum => format!(
                "{label} must be one of {}",
                Category::ALL.map(|category| category.as_str()).join(", ")
            ),
            ValidationErrorKind::InvalidDate => {
                format!("{label} must be a date in the format YYYY-MM-DD")
            }
        };

        Self {
            field,
            kind,
            message,
        }
    }
}

/// Whether a rule should complain about an absent field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Presence {
    Required,
    Optional,
}

/// Collects rule violations while a payload is being checked.
#[derive(Debug, Default)]
pub(super) struct Violations(Vec<ValidationError>);

impl Violations {
    pub(super) fn push(&mut self, field: Field, kind: ValidationErrorKind) {
        self.0.push(ValidationError::new(field, kind));
    }

    /// Apply `rule` to `value`, recording a violation on failure.
    ///
    /// Returns the parsed value, or `None` if the field was absent or broke
    /// the rule.
    pub(super) fn check<R, T>(
        &mut self,
        field: Field,
        value: Option<&R>,
        presence: Presence,
        rule: fn(&R) -> Result<T, ValidationErrorKind>,
    ) -> Option<T>
    where
        R: ?Sized,
    {
        let Some(raw) = value else {
            if presence == Presence::Required {
                self.push(field, ValidationErrorKind::Missing);
            }

            return None;
        };

        match rule(raw) {
            Ok(parsed) => Some(parsed),
            Err(kind) => {
                self.push(field, kind);
                None
            }
        }
    }

    pub(super) fn into_result<T>(self, value: Option<T>) -> Result<T, Vec<ValidationError>> {
        match value {
            Some(value) if self.0.is_empty() => Ok(value),
            _ => Err(self.0),
        }
    }
}

/// Check a payload for a new expense. Title, amount, category and date are required.
///
/// # Errors
/// Returns every [ValidationError] found in `payload`.
pub fn validate_create(payload: &ExpensePayload) -> Result<ValidatedExpense, Vec<ValidationError>> {
    let mut violations = Violations::default();

    let title = violations.check(
        Field::Title,
        payload.title.as_ref(),
        Presence::Required,
        parse_title,
    );
    let amount = violations.check(
        Field::Amount,
        payload.amount.as_ref(),
        Presence::Required,
        parse_amount,
    );
    let category = violations.check(
        Field::Category,
        payload.category.as_ref(),
        Presence::Required,
        category_value,
    );
    let description = violations.check(
        Field::Description,
        payload.description.as_ref(),
        Presence::Optional,
        parse_description,
    );
    let date = violations.check(
        Field::Date,
        payload.date.as_ref(),
        Presence::Required,
        date_value,
    );

    let expense = match (title, amount, category, date) {
        (Some(title), Some(amount), Some(category), Some(date)) => Some(ValidatedExpense {
            title,
            amount,
            category,
            description: description.unwrap_or_default(),
            date,
        }),
        _ => None,
    };

    violations.into_result(expense)
}

/// Check a payload for editing an expense. Every field is optional, but the
/// fields that are present must follow the same rules as [validate_create].
///
/// # Errors
/// Returns every [ValidationError] found in `payload`.
pub fn validate_update(payload: &ExpensePayload) -> Result<ExpensePatch, Vec<ValidationError>> {
    let mut violations = Violations::default();

    let patch = ExpensePatch {
        title: violations.check(
            Field::Title,
            payload.title.as_ref(),
            Presence::Optional,
            parse_title,
        ),
        amount: violations.check(
            Field::Amount,
            payload.amount.as_ref(),
            Presence::Optional,
            parse_amount,
        ),
        category: violations.check(
            Field::Category,
            payload.category.as_ref(),
            Presence::Optional,
            category_value,
        ),
        description: violations.check(
            Field::Description,
            payload.description.as_ref(),
            Presence::Optional,
            parse_description,
        ),
        date: violations.check(
            Field::Date,
            payload.date.as_ref(),
            Presence::Optional,
            date_value,
        ),
    };

    violations.into_result(Some(patch))
}

fn parse_title(raw: &Value) -> Result<String, ValidationErrorKind> {
    let title = raw.as_str().ok_or(ValidationErrorKind::NotText)?.trim();

    if title.is_empty() {
        Err(ValidationErrorKind::EmptyField)
    } else {
        Ok(title.to_owned())
    }
}

fn parse_amount(raw: &Value) -> Result<f64, ValidationErrorKind> {
    let amount = match raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|amount| amount.is_finite())
    .ok_or(ValidationErrorKind::NotANumber)?;

    if (0.0..=MAX_AMOUNT).contains(&amount) {
        Ok(amount)
    } else {
        Err(ValidationErrorKind::OutOfRange)
    }
}

fn parse_description(raw: &Value) -> Result<String, ValidationErrorKind> {
    raw.as_str()
        .map(str::to_owned)
        .ok_or(ValidationErrorKind::NotText)
}

fn category_value(raw: &Value) -> Result<Category, ValidationErrorKind> {
    raw.as_str()
        .ok_or(ValidationErrorKind::InvalidEnum)
        .and_then(parse_category)
}

fn date_value(raw: &Value) -> Result<Date, ValidationErrorKind> {
    raw.as_str()
        .ok_or(ValidationErrorKind::InvalidDate)
        .and_then(parse_date)
}

pub(super) fn parse_category(raw: &str) -> Result<Category, ValidationErrorKind> {
    raw.parse().map_err(|_| ValidationErrorKind::InvalidEnum)
}

/// Calendar date format, e.g. "2024-01-05".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a calendar date, or an RFC 3339 date-time of which only the date is kept.
pub(super) fn parse_date(raw: &str) -> Result<Date, ValidationErrorKind> {
    let raw = raw.trim();

    Date::parse(raw, DATE_FORMAT)
        .or_else(|_| OffsetDateTime::parse(raw, &Rfc3339).map(|date_time| date_time.date()))
        .map_err(|_| ValidationErrorKind::InvalidDate)
}

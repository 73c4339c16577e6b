//! Validation of caller input before it reaches the store.

use std::fmt::Display;

use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    category::{Category, UnknownCategory},
    database_id::TransactionId,
    stores::{CategoryFilter, TransactionFilter, round_to_cents},
    transaction::{NewTransaction, TransactionType, UnknownTransactionType},
};

const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The fields of a transaction a caller can supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The transaction ID.
    Id,
    /// Income or expense.
    Type,
    /// The amount of money.
    Amount,
    /// The category name.
    Category,
    /// The description text.
    Description,
    /// The transaction date.
    Date,
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::Id => "id",
            Field::Type => "type",
            Field::Amount => "amount",
            Field::Category => "category",
            Field::Description => "description",
            Field::Date => "date",
        };

        write!(f, "{name}")
    }
}

/// Caller input that cannot be turned into a transaction.
///
/// These errors can be fixed by the caller, see [ValidationError::field] for
/// which field needs fixing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was not given, or was blank.
    #[error("the field \"{0}\" is required")]
    MissingField(Field),

    /// A field was given that is not allowed for this operation, e.g. an ID
    /// when creating a transaction.
    #[error("the field \"{0}\" is not allowed here")]
    UnexpectedField(Field),

    /// The amount was zero, negative or not a finite number once rounded to cents.
    #[error("the amount must be greater than zero, got {0}")]
    InvalidAmount(f64),

    /// The type was not "income" or "expense".
    #[error(transparent)]
    UnknownType(#[from] UnknownTransactionType),

    /// The category is not one of the known categories.
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),

    /// An expense was filed under the income category.
    #[error("expenses must use an expense category, not \"Income\"")]
    IncomeCategoryForExpense,

    /// The date is not a real date in the format `YYYY-MM-DD`.
    #[error("\"{0}\" is not a date in the format YYYY-MM-DD")]
    InvalidDate(String),
}

impl ValidationError {
    /// The field that caused the error.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::MissingField(field) | ValidationError::UnexpectedField(field) => {
                *field
            }
            ValidationError::InvalidAmount(_) => Field::Amount,
            ValidationError::UnknownType(_) => Field::Type,
            ValidationError::UnknownCategory(_) | ValidationError::IncomeCategoryForExpense => {
                Field::Category
            }
            ValidationError::InvalidDate(_) => Field::Date,
        }
    }
}

/// A transaction as supplied by a caller, before validation.
///
/// Every field is optional so that missing fields are reported as a
/// [ValidationError] naming the field. Unknown fields are rejected when
/// deserializing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionInput {
    /// Required when amending a transaction, not allowed when recording one.
    pub id: Option<TransactionId>,
    /// "income" or "expense", case-insensitive.
    #[serde(rename = "type")]
    pub type_: Option<String>,
    /// Rounded to cents, must then be greater than zero.
    pub amount: Option<f64>,
    /// Ignored for income. Required for expenses.
    pub category: Option<String>,
    /// Must not be blank.
    pub description: Option<String>,
    /// Blank tags are dropped.
    #[serde(default)]
    pub tags: Vec<String>,
    /// A date in the format `YYYY-MM-DD`.
    pub date: Option<String>,
}

impl TransactionInput {
    /// Check the input and normalize it into a [NewTransaction].
    ///
    /// The category of income is always [Category::Income], whatever the
    /// caller supplied. The `id` field is not checked here.
    ///
    /// # Errors
    /// Returns the first [ValidationError] found.
    pub fn validate(&self) -> Result<NewTransaction, ValidationError> {
        let type_: TransactionType = required(&self.type_, Field::Type)?.parse()?;

        let raw_amount = self.amount.ok_or(ValidationError::MissingField(Field::Amount))?;
        let amount = round_to_cents(raw_amount);
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ValidationError::InvalidAmount(raw_amount));
        }

        let description = required(&self.description, Field::Description)?;
        let date = parse_iso_date(required(&self.date, Field::Date)?)?;

        let category = match type_ {
            TransactionType::Income => Category::Income,
            TransactionType::Expense => {
                match required(&self.category, Field::Category)?.trim().parse()? {
                    Category::Income => return Err(ValidationError::IncomeCategoryForExpense),
                    category => category,
                }
            }
        };

        let tags = self
            .tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(NewTransaction {
            type_,
            amount,
            category,
            description: description.to_owned(),
            tags,
            date,
        })
    }
}

fn required(value: &Option<String>, field: Field) -> Result<&str, ValidationError> {
    match value.as_deref() {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Parse a date that must be exactly in the format `YYYY-MM-DD`.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
/// Returns [ValidationError::InvalidDate] if `text` is in another format or is not a real date.
pub fn parse_iso_date(text: &str) -> Result<Date, ValidationError> {
    let trimmed = text.trim();
    let has_iso_shape = trimmed.len() == 10
        && trimmed.bytes().enumerate().all(|(i, byte)| match i {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        });

    if !has_iso_shape {
        return Err(ValidationError::InvalidDate(text.to_owned()));
    }

    Date::parse(trimmed, &ISO_DATE_FORMAT).map_err(|_| ValidationError::InvalidDate(text.to_owned()))
}

/// The query parameters accepted when listing transactions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionFilterParams {
    /// "income", "all", or an expense category name.
    pub category: Option<String>,
    /// Text to look for in tags and descriptions.
    pub search: Option<String>,
    /// Earliest date, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Latest date, `YYYY-MM-DD`.
    pub to: Option<String>,
}

impl TransactionFilterParams {
    /// Convert the parameters into a [TransactionFilter]. Blank parameters are ignored.
    ///
    /// # Errors
    /// Returns a [ValidationError] if the category or a date is invalid.
    pub fn into_filter(self) -> Result<TransactionFilter, ValidationError> {
        let category = match non_blank(self.category) {
            None => None,
            Some(name) if name.eq_ignore_ascii_case("all") => None,
            Some(name) if name.eq_ignore_ascii_case("income") => Some(CategoryFilter::Income),
            Some(name) => Some(CategoryFilter::Category(name.parse()?)),
        };

        let date_from = non_blank(self.from).map(|from| parse_iso_date(&from)).transpose()?;
        let date_to = non_blank(self.to).map(|to| parse_iso_date(&to)).transpose()?;

        Ok(TransactionFilter {
            category,
            search: non_blank(self.search),
            date_from,
            date_to,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

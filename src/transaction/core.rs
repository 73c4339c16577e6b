//! Defines the core data models for transactions.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{category::Category, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The lowercase name used for storage and export.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// The amount with the sign implied by the type: positive for income,
    /// negative for expenses.
    pub fn signed_amount(&self, amount: f64) -> f64 {
        match self {
            TransactionType::Income => amount,
            TransactionType::Expense => -amount,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The error returned when a string is neither "income" nor "expense".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a transaction type, expected \"income\" or \"expense\"")]
pub struct UnknownTransactionType(pub String);

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    /// Parses "income" or "expense", ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.eq_ignore_ascii_case("income") {
            Ok(TransactionType::Income)
        } else if trimmed.eq_ignore_ascii_case("expense") {
            Ok(TransactionType::Expense)
        } else {
            Err(UnknownTransactionType(s.to_owned()))
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are created by the store from a [NewTransaction], which
/// assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// The amount of money spent or earned, always greater than zero.
    pub amount: f64,
    /// The category the transaction is filed under.
    pub category: Category,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Free-form labels, in the order they were entered.
    pub tags: Vec<String>,
    /// When the transaction happened.
    pub date: Date,
    /// When the transaction was stored. Only used to order transactions on the same date.
    #[serde(skip)]
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// The fields of the transaction that the caller controls.
    pub fn to_new(&self) -> NewTransaction {
        NewTransaction {
            type_: self.type_,
            amount: self.amount,
            category: self.category,
            description: self.description.clone(),
            tags: self.tags.clone(),
            date: self.date,
        }
    }
}

/// A validated transaction that has not been stored yet.
///
/// Use [crate::ledger::Ledger::record_transaction] to validate caller input
/// and store it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the money was earned or spent.
    pub type_: TransactionType,
    /// The amount of money, must be greater than zero.
    pub amount: f64,
    /// [Category::Income] for income, otherwise an expense category.
    pub category: Category,
    /// Must not be blank.
    pub description: String,
    /// Non-empty labels.
    pub tags: Vec<String>,
    /// When the transaction happened.
    pub date: Date,
}

#[cfg(test)]
mod tests {
    use crate::transaction::TransactionType;

    #[test]
    fn parses_type_ignoring_case() {
        assert_eq!("income".parse(), Ok(TransactionType::Income));
        assert_eq!("EXPENSE".parse(), Ok(TransactionType::Expense));
        assert_eq!(" Income ".parse(), Ok(TransactionType::Income));
        assert!("transfer".parse::<TransactionType>().is_err());
        assert!("".parse::<TransactionType>().is_err());
    }

    #[test]
    fn sign_comes_from_type() {
        assert_eq!(TransactionType::Income.signed_amount(12.5), 12.5);
        assert_eq!(TransactionType::Expense.signed_amount(12.5), -12.5);
    }
}

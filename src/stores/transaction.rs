//! Defines the transaction store trait and the aggregate types it produces.

use std::collections::BTreeMap;

use serde::Serialize;
use time::Date;

use crate::{
    Error,
    category::{Category, EXPENSE_CATEGORIES},
    database_id::TransactionId,
    transaction::{NewTransaction, Transaction},
};

/// Owns the persisted set of transactions.
///
/// Implementers are the only place transactions are stored. Callers receive
/// copies and must go back to the store for fresh data.
pub trait TransactionStore {
    /// Ensure the storage for transactions exists. Safe to call more than once.
    ///
    /// # Errors
    /// Returns a storage fault if the storage medium cannot be written to.
    fn initialize(&self) -> Result<(), Error>;

    /// Retrieve all transactions, most recent date first.
    ///
    /// Transactions on the same date are ordered by when they were stored,
    /// most recent first.
    fn list_all(&self) -> Result<Vec<Transaction>, Error>;

    /// Retrieve the transactions matching `filter`, in the same order as [TransactionStore::list_all].
    fn query(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, Error>;

    /// Store a new transaction and return it with its assigned ID.
    ///
    /// # Errors
    /// Returns [Error::ConstraintViolation] if the transaction breaks a schema constraint.
    fn insert(&self, transaction: &NewTransaction) -> Result<Transaction, Error>;

    /// Overwrite every mutable field of the transaction `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a stored transaction.
    fn update(
        &self,
        id: TransactionId,
        transaction: &NewTransaction,
    ) -> Result<Transaction, Error>;

    /// Delete the transaction `id`, returning whether a transaction was removed.
    fn delete(&self, id: TransactionId) -> Result<bool, Error>;

    /// Sum income and expenses over all transactions.
    fn compute_totals(&self) -> Result<Totals, Error>;

    /// Sum expenses per expense category.
    fn compute_category_summary(&self) -> Result<CategorySummary, Error>;
}

/// Round `amount` to the nearest cent, rounding halves away from zero.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Income and expense totals, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expenses: f64,
    /// `total_income - total_expenses`.
    pub balance: f64,
}

impl Totals {
    /// Create totals from unrounded sums.
    pub fn from_sums(income: f64, expenses: f64) -> Self {
        let total_income = round_to_cents(income);
        let total_expenses = round_to_cents(expenses);

        Self {
            total_income,
            total_expenses,
            balance: round_to_cents(total_income - total_expenses),
        }
    }
}

/// The amount spent in each expense category, rounded to cents.
///
/// Always contains exactly one entry per expense category. Income is never included.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategorySummary(BTreeMap<Category, f64>);

impl CategorySummary {
    /// Create a summary from per-category sums.
    ///
    /// Categories missing from `sums` report zero, and non-expense categories are ignored.
    pub fn from_sums(sums: impl IntoIterator<Item = (Category, f64)>) -> Self {
        let mut totals: BTreeMap<Category, f64> = EXPENSE_CATEGORIES
            .into_iter()
            .map(|category| (category, 0.0))
            .collect();

        for (category, sum) in sums {
            if let Some(total) = totals.get_mut(&category) {
                *total += sum;
            }
        }

        for total in totals.values_mut() {
            *total = round_to_cents(*total);
        }

        Self(totals)
    }

    /// The amount spent in `category`, zero for income.
    pub fn get(&self, category: Category) -> f64 {
        self.0.get(&category).copied().unwrap_or(0.0)
    }

    /// Iterate over the categories in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, &f64)> {
        self.0.iter()
    }

    /// The number of categories in the summary.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the summary has no categories. Never true for summaries built with [CategorySummary::from_sums].
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Selects which transactions [TransactionStore::query] returns.
///
/// Conditions that are `None` match every transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only include income, or only expenses in one category.
    pub category: Option<CategoryFilter>,
    /// Case-insensitive text that must appear in a tag or in the description.
    pub search: Option<String>,
    /// Earliest date to include.
    pub date_from: Option<Date>,
    /// Latest date to include.
    pub date_to: Option<Date>,
}

/// The category condition of a [TransactionFilter].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    /// All income transactions.
    Income,
    /// Transactions filed under this category.
    Category(Category),
}

//! The ledger validates caller input and delegates to a [TransactionStore].

use crate::{
    Error,
    category::{Category, EXPENSE_CATEGORIES},
    database_id::TransactionId,
    ledger::{Field, TransactionInput, ValidationError},
    stores::{CategorySummary, Totals, TransactionFilter, TransactionStore},
    transaction::Transaction,
};

/// The entry point for reading and changing transactions.
///
/// The ledger holds no copy of the data: every call goes to the store.
#[derive(Debug, Clone)]
pub struct Ledger<S> {
    store: S,
}

impl<S> Ledger<S>
where
    S: TransactionStore,
{
    /// Create a ledger backed by `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Ensure the store is ready for use.
    ///
    /// # Errors
    /// Returns a storage fault if the store cannot be written to.
    pub fn initialize(&self) -> Result<(), Error> {
        self.store.initialize()
    }

    /// All transactions, most recent first.
    pub fn list_transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.store.list_all()
    }

    /// The transactions matching `filter`, most recent first.
    pub fn search_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, Error> {
        if *filter == TransactionFilter::default() {
            return self.store.list_all();
        }

        self.store.query(filter)
    }

    /// Validate `input` and store it as a new transaction.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if `input` is incomplete or invalid, or
    /// if it already has an ID.
    pub fn record_transaction(&self, input: TransactionInput) -> Result<Transaction, Error> {
        if input.id.is_some() {
            return Err(ValidationError::UnexpectedField(Field::Id).into());
        }

        let transaction = input.validate()?;

        self.store.insert(&transaction)
    }

    /// Validate `input` and overwrite the stored transaction with the same ID.
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::Validation] if `input` has no ID or is otherwise invalid,
    /// - or [Error::NotFound] if there is no transaction with the ID.
    pub fn amend_transaction(&self, input: TransactionInput) -> Result<Transaction, Error> {
        let id = input.id.ok_or(ValidationError::MissingField(Field::Id))?;
        let transaction = input.validate()?;

        self.store.update(id, &transaction)
    }

    /// Delete the transaction `id`.
    ///
    /// Returns `false` if there was no such transaction, which usually means
    /// the caller's copy of the data is out of date.
    pub fn remove_transaction(&self, id: TransactionId) -> Result<bool, Error> {
        let removed = self.store.delete(id)?;

        if !removed {
            tracing::debug!("Tried to delete transaction {id}, but it does not exist");
        }

        Ok(removed)
    }

    /// Income, expense and balance totals.
    pub fn totals(&self) -> Result<Totals, Error> {
        self.store.compute_totals()
    }

    /// The amount spent in each expense category.
    pub fn category_summary(&self) -> Result<CategorySummary, Error> {
        self.store.compute_category_summary()
    }

    /// The expense categories, in display order.
    pub fn categories(&self) -> &'static [Category] {
        &EXPENSE_CATEGORIES
    }
}

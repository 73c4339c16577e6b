//! Imports transactions from CSV text through the ledger.

use std::time::Instant;

use csv::StringRecord;
use serde::Serialize;

use crate::{
    Error,
    category::Category,
    csv_io::CSV_HEADER,
    ledger::{Ledger, TransactionInput, ValidationError},
    stores::TransactionStore,
    transaction::TransactionType,
};

/// How many rows of an import were stored and how many were skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// The number of rows stored as transactions.
    pub imported_count: usize,
    /// The number of rows skipped because they were incomplete or invalid.
    pub error_count: usize,
}

/// Record each row of the CSV `text` as a transaction in `ledger`.
///
/// The header row must name every column in [CSV_HEADER], in any order.
/// A row is skipped and counted in [ImportSummary::error_count] if it is
/// incomplete or fails validation. Expense rows with an unknown category are
/// filed under [FALLBACK_EXPENSE_CATEGORY](crate::category::FALLBACK_EXPENSE_CATEGORY)
/// and the sign of `Amount` is ignored.
///
/// # Errors
/// Returns an:
/// - [Error::InvalidCSV] if the header is missing a column,
/// - or a storage fault if a row could not be written. Rows stored before
///   the fault are kept.
pub fn import_csv<S>(text: &str, ledger: &Ledger<S>) -> Result<ImportSummary, Error>
where
    S: TransactionStore,
{
    let start_time = Instant::now();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader
        .headers()
        .map_err(|error| Error::InvalidCSV(error.to_string()))?;
    let columns = Columns::locate(header)?;

    let mut summary = ImportSummary::default();

    for (index, record) in reader.records().enumerate() {
        let row = index + 1;

        let input = match record
            .map_err(RowError::from)
            .and_then(|record| columns.parse_row(&record))
        {
            Ok(input) => input,
            Err(error) => {
                tracing::debug!("Skipping row {row}: {error}");
                summary.error_count += 1;
                continue;
            }
        };

        match ledger.record_transaction(input) {
            Ok(_) => summary.imported_count += 1,
            Err(error) if error.is_storage_fault() => {
                tracing::error!(
                    "Import stopped at row {row} after storing {} transactions: {error}",
                    summary.imported_count
                );
                return Err(error);
            }
            Err(error) => {
                tracing::debug!("Skipping row {row}: {error}");
                summary.error_count += 1;
            }
        }
    }

    tracing::info!(
        "Imported {} transactions and skipped {} rows in {}ms",
        summary.imported_count,
        summary.error_count,
        start_time.elapsed().as_millis()
    );

    Ok(summary)
}

/// Why a single row could not be imported.
#[derive(Debug, thiserror::Error)]
enum RowError {
    #[error("expected at least {expected} fields, got {got}")]
    Incomplete { expected: usize, got: usize },

    #[error("could not read row: {0}")]
    Unreadable(#[from] csv::Error),

    #[error("\"{0}\" is not a number")]
    InvalidAmount(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// The position of each column in the header.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    type_: usize,
    category: usize,
    description: usize,
    amount: usize,
    tags: usize,
}

impl Columns {
    fn locate(header: &StringRecord) -> Result<Self, Error> {
        let find = |name: &str| {
            header
                .iter()
                .position(|column| column.trim_start_matches('\u{feff}').trim() == name)
                .ok_or_else(|| Error::InvalidCSV(format!("the header has no \"{name}\" column")))
        };

        let [date, type_, category, description, amount, tags] = CSV_HEADER;

        Ok(Self {
            date: find(date)?,
            type_: find(type_)?,
            category: find(category)?,
            description: find(description)?,
            amount: find(amount)?,
            tags: find(tags)?,
        })
    }

    /// The number of fields a row needs to have a value for every column.
    fn min_fields(&self) -> usize {
        let last = [
            self.date,
            self.type_,
            self.category,
            self.description,
            self.amount,
            self.tags,
        ]
        .into_iter()
        .max()
        .unwrap_or_default();

        (last + 1).max(CSV_HEADER.len())
    }

    fn parse_row(&self, record: &StringRecord) -> Result<TransactionInput, RowError> {
        let expected = self.min_fields();
        if record.len() < expected {
            return Err(RowError::Incomplete {
                expected,
                got: record.len(),
            });
        }

        let field = |index: usize| record.get(index).unwrap_or_default();

        let type_ = field(self.type_)
            .parse::<TransactionType>()
            .map_err(ValidationError::from)?;

        let amount_text = field(self.amount).trim();
        let amount = amount_text
            .parse::<f64>()
            .map_err(|_| RowError::InvalidAmount(amount_text.to_owned()))?
            .abs();

        let category = match type_ {
            TransactionType::Income => Category::Income,
            TransactionType::Expense => Category::expense_or_fallback(field(self.category)),
        };

        let tags = field(self.tags)
            .split(';')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(TransactionInput {
            id: None,
            type_: Some(type_.as_str().to_owned()),
            amount: Some(amount),
            category: Some(category.as_str().to_owned()),
            description: Some(field(self.description).to_owned()),
            tags,
            date: Some(field(self.date).to_owned()),
        })
    }
}

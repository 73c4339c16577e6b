//! Converts transactions to and from CSV text.
//!
//! Both directions use the columns in [CSV_HEADER]. Export writes every
//! transaction, import records each row through the [Ledger](crate::ledger::Ledger)
//! and skips rows that fail validation.

mod endpoints;
mod export;
mod import;

pub use endpoints::{export_endpoint, import_endpoint};
pub use export::export_csv;
pub use import::{ImportSummary, import_csv};

/// The column names, in the order they are exported.
pub const CSV_HEADER: [&str; 6] = ["Date", "Type", "Category", "Description", "Amount", "Tags"];

/// The separator placed between tags inside the `Tags` column.
const TAG_SEPARATOR: &str = "; ";

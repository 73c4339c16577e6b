//! The validation boundary between caller input and the transaction store.
//!
//! - [TransactionInput] is what callers send, [ValidationError] is what they
//!   get back when it is incomplete or invalid.
//! - [Ledger] validates input and delegates to a
//!   [TransactionStore](crate::stores::TransactionStore).

mod input;
mod service;

pub use input::{
    Field, TransactionFilterParams, TransactionInput, ValidationError, parse_iso_date,
};
pub use service::Ledger;

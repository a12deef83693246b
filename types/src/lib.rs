//! Fundamental types for the Volt tangle.
//!
//! This crate defines the transaction model shared across every other crate in
//! the workspace: transaction ids, timestamps, proof-of-work stamps, and the
//! energy-trade `Transaction` itself.

pub mod error;
pub mod id;
pub mod time;
pub mod transaction;
pub mod work;

pub use error::TypesError;
pub use id::TxId;
pub use time::Timestamp;
pub use transaction::Transaction;
pub use work::WorkStamp;

//! The tangle: an in-memory DAG of energy-trade transactions.
//!
//! Transactions are keyed by id and linked through their `parent_ids`. The
//! store never validates that parents exist; a dangling reference is an
//! unresolved edge, not an error. Ledger state is shared between the producer
//! and the receiver loops through [`SharedTangle`].

pub mod approvers;
pub mod codec;
pub mod error;
pub mod genesis;
pub mod shared;
pub mod tangle;

pub use approvers::Approvers;
pub use codec::{decode_line, encode_line, MergeReport, RejectedLine, FIELD_COUNT};
pub use error::LedgerError;
pub use genesis::{create_genesis, genesis_id};
pub use shared::SharedTangle;
pub use tangle::{MissingWeightPolicy, Tangle};

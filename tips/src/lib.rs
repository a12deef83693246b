//! Tip selection.
//!
//! A selector reads one ledger snapshot and returns the ids a new transaction
//! should endorse. Five strategies share one entry point, [`TipSelector::select`],
//! and are chosen by configuration through [`TipStrategy`].

pub mod selector;
pub mod walk;
pub mod weakest;

pub use selector::{TipSelector, TipStrategy, DEFAULT_MCMC_ALPHA};
pub use walk::{walk_to_tip, StepPolicy, WALKS_PER_SELECTION};
pub use weakest::select_weakest;

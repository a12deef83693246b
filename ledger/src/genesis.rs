//! Genesis transaction creation.
//!
//! A node that starts producing on an empty ledger commits its own genesis:
//! a parentless, zero-amount self-trade. Every walk selector starts from it.

use volt_types::{Timestamp, Transaction, TxId};

/// Unit carried by the genesis transaction.
pub const GENESIS_UNIT: &str = "kWh";
/// Currency carried by the genesis transaction.
pub const GENESIS_CURRENCY: &str = "USD";

/// The id a node gives its genesis.
pub fn genesis_id(node_id: &str) -> TxId {
    TxId::new(format!("{node_id}-genesis"))
}

/// Build the genesis transaction for `node_id`, stamped at `now`.
///
/// Weight starts at 1 and work is pending; the producer attaches the proof of
/// work before committing it.
pub fn create_genesis(node_id: &str, now: Timestamp) -> Transaction {
    Transaction::new(
        genesis_id(node_id),
        now,
        node_id,
        node_id,
        0.0,
        GENESIS_UNIT,
        0.0,
        GENESIS_CURRENCY,
        Vec::new(),
    )
}

//! Volt tangle node.
//!
//! Wires one shared ledger to its collaborators:
//! - a producer that selects tips, solves proof of work and commits trades
//! - a TCP gossip listener and a packet-radio receiver feeding a merge loop
//! - a broadcaster that pushes a checksummed snapshot after every commit

pub mod config;
pub mod error;
pub mod inbound;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod producer;
pub mod shutdown;

pub use config::{NodeConfig, RadioConfig, TradeConfig};
pub use error::NodeError;
pub use inbound::handle_inbound;
pub use logging::{init_logging, LogFormat};
pub use metrics::NodeMetrics;
pub use node::VoltNode;
pub use producer::{ProduceOutcome, Producer};
pub use shutdown::{ShutdownController, ShutdownSignal};

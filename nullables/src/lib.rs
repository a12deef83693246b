//! Nullable infrastructure for deterministic testing.
//!
//! Every external capability the node touches (packet radio, outbound peer
//! connections, randomness) sits behind a trait. The types here implement
//! those traits in memory:
//! - values are deterministic and scriptable
//! - traffic is recorded for assertions
//! - nothing touches real hardware or the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod connector;
pub mod radio;
pub mod random;

pub use connector::{NullConnector, NullStream};
pub use radio::NullRadio;
pub use random::NullRandom;

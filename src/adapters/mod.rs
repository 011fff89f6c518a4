//! Contracts for the collaborators the engine depends on but does not own.
//!
//! - [`BalanceStore`]: versioned per-user balance snapshots
//! - [`PriceOracle`]: live price per symbol
//! - [`ExecutionGateway`]: one conversion leg against a trading venue
//!
//! Each trait ships with an in-memory implementation used by the tests and
//! the demo binary.

pub mod balance_store;
pub mod gateway;
pub mod price_oracle;

pub use balance_store::{BalanceStore, InMemoryBalanceStore};
pub use gateway::{ExecutionGateway, HopAck, RecordingGateway};
pub use price_oracle::{InMemoryPriceOracle, PriceOracle, PriceQuote};

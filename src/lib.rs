//! Asset Conversion Engine
//!
//! The conversion core of a multi-asset wallet backend. Given a user who
//! wants to turn one asset into another, the engine finds a route across
//! the listed trading pairs, settles the user's balances across two custody
//! pools, and hands each leg of the route to an external trading venue.
//!
//! # Architecture Overview
//!
//! - **`graph`**: Undirected conversion graph over asset symbols, built from tickers
//! - **`path`**: Conversion paths and breadth-first shortest-path search
//! - **`settlement`**: Pool-prioritized debit, credit and versioned persistence
//! - **`dispatch`**: Concurrent, best-effort submission of route hops
//! - **`orchestrator`**: The `convert` entry point tying everything together
//! - **`adapters`**: Balance store, price oracle and execution gateway contracts
//! - **`config`**: Environment-driven configuration and validation
//! - **`builders`**: Builder patterns for the graph and the orchestrator
//! - **`errors`**: Error taxonomy and typed conversion failures
//! - **`utils`**: Decimal parsing and formatting helpers
//!
//! # Core Concepts
//!
//! - **Symbol**: an asset ticker such as `USD` or `XBT`
//! - **Ticker**: a tradable pair formed by concatenating two symbols, e.g. `XBTUSD`
//! - **Hop**: one edge of a conversion route, traded as one venue order
//! - **Pool**: one of the two custody locations holding a user's balance;
//!   `PrimaryExchange` is always drained before `SelfCustody`
//!
//! # Consistency
//!
//! Settlement is all-or-nothing per user and guarded by optimistic
//! concurrency on the balance store. Hop execution is not: hops are
//! dispatched independently after settlement and a failed hop is logged,
//! not compensated.

pub mod adapters;
pub mod builders;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod graph;
pub mod orchestrator;
pub mod path;
pub mod settlement;
pub mod utils;

// Re-export the main Result type and error enums for convenience
pub use errors::{ConversionError, ConverterError, FailureKind, Result};

// Re-export builder patterns for convenience
pub use builders::{ConversionGraphBuilder, ConversionOrchestratorBuilder};

pub use config::ConversionConfig;
pub use graph::{ConversionGraph, TickerPolicy};
pub use orchestrator::{ConversionEnvelope, ConversionOrchestrator, ConversionReceipt, ConversionResult};
pub use path::{ConversionPath, PathFinder};
pub use settlement::{BalancePool, BalanceSettlement, BalanceSnapshot, ConversionRequest, SettlementResult};
pub use dispatch::DispatchResult;

//! Builder patterns for complex object construction.
//!
//! # Available Builders
//!
//! - **`ConversionGraphBuilder`**: Builds a conversion graph from symbols and tickers
//! - **`ConversionOrchestratorBuilder`**: Wires configuration, graph and adapters together
//!
//! Builders consume themselves on `build()` and return `Result<T>`, so
//! missing collaborators and invalid configuration surface as errors
//! rather than panics.

pub mod graph;
pub mod orchestrator;

// Re-export builders for convenience
pub use graph::ConversionGraphBuilder;
pub use orchestrator::ConversionOrchestratorBuilder;

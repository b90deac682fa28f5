//! Lotbook Core - tax-lot accounting and tax exposure analysis.
//!
//! This crate holds the domain models, the pure lot/tax/recommendation
//! computations, and thin services over repository traits. It is
//! storage-agnostic: callers implement the `*RepositoryTrait` traits.

pub mod assets;
pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod recommendations;
pub mod settings;
pub mod tax;
pub mod transactions;
pub mod utils;

// Re-export common types from asset and portfolio modules
pub use assets::*;
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

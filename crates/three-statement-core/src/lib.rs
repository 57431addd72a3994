//! Assumption-driven three-statement projection engine.
//!
//! The [`three_statement`] module carries balance-sheet state forward one
//! annual period at a time (income statement, then cash flow, then the
//! balance sheet with its revolver sweep). The [`ratios`] module derives
//! per-period profitability, liquidity, leverage and cash-flow ratios from
//! the projected statements.

pub mod error;
pub mod types;

#[cfg(feature = "three_statement")]
pub mod three_statement;

#[cfg(feature = "ratios")]
pub mod ratios;

pub use error::ModelError;
pub use types::*;

/// Standard result type for all projection operations
pub type ModelResult<T> = Result<T, ModelError>;

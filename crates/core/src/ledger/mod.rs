//! Balance mutation and movement query logic.
//!
//! This module implements the core ledger functionality:
//! - Movement kinds (deposit/withdrawal) and their wire tokens
//! - The balance mutation rules (pure, shared by every store adapter)
//! - Error types for ledger operations
//! - Date parsing and range filters for movement queries
//! - Read-only projections (movement listings, client statements)

pub mod dates;
pub mod engine;
pub mod error;
pub mod movement;
pub mod projection;

#[cfg(test)]
mod engine_props;

pub use engine::{AccountSnapshot, apply};
pub use error::LedgerError;
pub use movement::MovementKind;
pub use projection::{MovementProjection, StatementLine, StatementReport};

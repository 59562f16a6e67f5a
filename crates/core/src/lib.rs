//! Core ledger logic for Cajero.
//!
//! This crate contains the transaction/ledger engine: balance mutation
//! rules, movement queries, the ledger store contract, and an in-memory
//! store used as the reference implementation and test double.
//!
//! Nothing in this crate talks to a database or the network.

pub mod ledger;
pub mod memory;
pub mod service;
pub mod store;

pub use ledger::{AccountSnapshot, LedgerError, MovementKind};
pub use memory::MemoryLedgerStore;
pub use service::MovementService;
pub use store::{LedgerStore, MovementReceipt};

//! Database layer with `SeaORM` entities and the SQL ledger store.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for clients, accounts, and movements
//! - The `SqlLedgerStore` adapter backed by Postgres
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod store;

pub use store::SqlLedgerStore;

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

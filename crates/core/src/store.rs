//! The ledger store contract.
//!
//! This trait is the boundary between the engine and durable storage. Every
//! write method is a single atomic unit: either the account balance and the
//! movement record both land, or neither does. Implementations must
//! serialize mutations per account (row lock or per-account mutex) so that
//! two concurrent mutations never read the same balance; mutations on
//! distinct accounts proceed independently. Read methods do not participate
//! in mutation serialization and observe a consistent snapshot.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use cajero_shared::types::{AccountId, ClientId, MovementId};

use crate::ledger::{LedgerError, MovementKind};

/// A client as the ledger sees it: an opaque id plus a display name.
#[derive(Debug, Clone)]
pub struct ClientRecord {
    /// Client id.
    pub id: ClientId,
    /// Display name, unique, used for statement lookup.
    pub name: String,
    /// Whether the client is active.
    pub is_active: bool,
}

/// An account record.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    /// Account id.
    pub id: AccountId,
    /// Externally visible, unique account number.
    pub account_number: String,
    /// Account type label ("Ahorro", "Corriente", "Credito").
    pub account_type: String,
    /// Current balance, scale 2.
    pub balance: Decimal,
    /// Whether mutations are permitted.
    pub is_active: bool,
    /// The owning client.
    pub client_id: ClientId,
}

/// An immutable movement record.
#[derive(Debug, Clone)]
pub struct MovementRecord {
    /// Store-assigned monotonically increasing id.
    pub id: MovementId,
    /// The owning account.
    pub account_id: AccountId,
    /// Deposit or withdrawal.
    pub kind: MovementKind,
    /// The (positive) amount.
    pub amount: Decimal,
    /// The account balance after this movement was applied.
    pub balance: Decimal,
    /// When the movement was applied.
    pub movement_at: DateTime<Utc>,
}

/// A movement joined with its owning account's number, for listings.
#[derive(Debug, Clone)]
pub struct MovementWithAccount {
    /// The movement.
    pub movement: MovementRecord,
    /// The owning account's number.
    pub account_number: String,
}

/// The result of a successful balance mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementReceipt {
    /// The mutated account's number.
    pub account_number: String,
    /// The applied movement kind.
    pub kind: MovementKind,
    /// The applied amount.
    pub amount: Decimal,
    /// The account balance after the mutation.
    pub balance: Decimal,
}

/// Durable keyed storage for accounts, clients, and the movement log.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    // ========== Mutations (atomic, per-account serialized) ==========

    /// Applies a movement to the account identified by `account_number`:
    /// validates, updates the balance, and appends a movement record, all
    /// in one atomic unit.
    async fn apply_movement(
        &self,
        account_number: &str,
        kind: MovementKind,
        amount: Decimal,
    ) -> Result<MovementReceipt, LedgerError>;

    /// Revises an existing movement in place.
    ///
    /// Validation matches `apply_movement`, run against the owning account.
    /// The new balance is computed from the account's *current* balance, not
    /// by reversing the original movement first; the stored movement's kind,
    /// amount, and balance are overwritten and the account balance updated.
    /// Revising is therefore an additional delta, preserved as-is from the
    /// source system for data compatibility.
    async fn revise_movement(
        &self,
        movement_id: MovementId,
        kind: MovementKind,
        amount: Decimal,
    ) -> Result<MovementReceipt, LedgerError>;

    /// Removes a movement record. The account balance is deliberately left
    /// untouched (source-system behavior, preserved for compatibility).
    async fn remove_movement(&self, movement_id: MovementId) -> Result<(), LedgerError>;

    // ========== Reads (lock-free, snapshot) ==========

    /// Looks up an account by its externally visible number.
    async fn find_account_by_number(
        &self,
        account_number: &str,
    ) -> Result<Option<AccountRecord>, LedgerError>;

    /// Looks up an account by id.
    async fn find_account_by_id(
        &self,
        account_id: AccountId,
    ) -> Result<Option<AccountRecord>, LedgerError>;

    /// Looks up a movement by id.
    async fn find_movement(
        &self,
        movement_id: MovementId,
    ) -> Result<Option<MovementRecord>, LedgerError>;

    /// All movements across all accounts, joined with the owning account's
    /// number, in insertion (id) order.
    async fn all_movements(&self) -> Result<Vec<MovementWithAccount>, LedgerError>;

    /// Movements whose timestamp's date component equals `date`.
    async fn movements_on_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<MovementWithAccount>, LedgerError>;

    /// Movements for one account whose date component falls inside the
    /// inclusive `[start, end]` range, ascending by timestamp.
    async fn movements_for_account_in_range(
        &self,
        account_id: AccountId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MovementRecord>, LedgerError>;

    /// Resolves a client by exact display-name match.
    async fn find_client_by_name(&self, name: &str) -> Result<Option<ClientRecord>, LedgerError>;

    /// All accounts owned by a client.
    async fn accounts_for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<AccountRecord>, LedgerError>;
}

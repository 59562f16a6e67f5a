//! Movement service: the engine's inbound operation surface.
//!
//! Mutations parse the wire kind token and delegate to the store, which owns
//! atomicity and per-account serialization. Queries are read-only
//! projections; the "zero rows" outcomes of the date and statement queries
//! are deliberate user-facing errors, not empty successes.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use cajero_shared::types::{AccountId, MovementId};

use crate::ledger::{
    LedgerError, MovementKind, MovementProjection, StatementLine, StatementReport, dates,
};
use crate::store::{LedgerStore, MovementReceipt, MovementWithAccount};

/// The transaction/ledger service.
#[derive(Clone)]
pub struct MovementService {
    store: Arc<dyn LedgerStore>,
}

impl MovementService {
    /// Creates a service over a ledger store.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    // ========== Mutations ==========

    /// Applies a deposit or withdrawal to an account.
    ///
    /// The kind token is matched case-insensitively against `"Deposito"` and
    /// `"Retiro"`; anything else fails before the store is touched.
    pub async fn apply_movement(
        &self,
        account_number: &str,
        kind_token: &str,
        amount: Decimal,
    ) -> Result<MovementReceipt, LedgerError> {
        let kind = MovementKind::parse(kind_token)?;
        self.store.apply_movement(account_number, kind, amount).await
    }

    /// Revises an existing movement's kind and amount in place.
    ///
    /// The new balance is an additional delta on the owning account's
    /// current balance (see [`LedgerStore::revise_movement`]).
    pub async fn revise_movement(
        &self,
        movement_id: MovementId,
        kind_token: &str,
        amount: Decimal,
    ) -> Result<MovementReceipt, LedgerError> {
        let kind = MovementKind::parse(kind_token)?;
        self.store.revise_movement(movement_id, kind, amount).await
    }

    /// Removes a movement record without adjusting the account balance.
    pub async fn remove_movement(&self, movement_id: MovementId) -> Result<(), LedgerError> {
        self.store.remove_movement(movement_id).await
    }

    // ========== Queries ==========

    /// All movements across all accounts, in insertion order.
    pub async fn list_all(&self) -> Result<Vec<MovementProjection>, LedgerError> {
        let rows = self.store.all_movements().await?;
        Ok(rows.into_iter().map(project).collect())
    }

    /// Movements on a single calendar date, supplied as `dd/MM/yyyy`.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidDateFormat` before any store access, and with
    /// `NoMovementsForDate` when the date has zero movements.
    pub async fn by_calendar_date(
        &self,
        date_input: &str,
    ) -> Result<Vec<MovementProjection>, LedgerError> {
        let date = dates::parse_report_date(date_input)?;
        let rows = self.store.movements_on_date(date).await?;
        if rows.is_empty() {
            return Err(LedgerError::NoMovementsForDate(date));
        }
        Ok(rows.into_iter().map(project).collect())
    }

    /// Movements for one account inside an inclusive date range, ascending
    /// by timestamp.
    pub async fn by_account_and_date_range(
        &self,
        account_id: AccountId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MovementProjection>, LedgerError> {
        let account = self
            .store
            .find_account_by_id(account_id)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.to_string()))?;

        let movements = self
            .store
            .movements_for_account_in_range(account_id, start, end)
            .await?;
        Ok(movements
            .into_iter()
            .map(|movement| MovementProjection {
                account_number: account.account_number.clone(),
                movement_at: movement.movement_at,
                kind: movement.kind,
                amount: movement.amount,
                balance: movement.balance,
            })
            .collect())
    }

    /// Builds a client statement: every movement in the inclusive range,
    /// concatenated across all of the client's accounts.
    ///
    /// # Errors
    ///
    /// `ClientNotFound` when the display name resolves nothing,
    /// `ClientHasNoAccounts` when the client owns zero accounts, and
    /// `NoMovementsInRange` when the concatenation is empty.
    pub async fn statement_for_client(
        &self,
        client_name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<StatementReport, LedgerError> {
        let client = self
            .store
            .find_client_by_name(client_name)
            .await?
            .ok_or_else(|| LedgerError::ClientNotFound(client_name.to_string()))?;

        let accounts = self.store.accounts_for_client(client.id).await?;
        if accounts.is_empty() {
            return Err(LedgerError::ClientHasNoAccounts(client.name));
        }

        let mut lines = Vec::new();
        for account in &accounts {
            let movements = self
                .store
                .movements_for_account_in_range(account.id, start, end)
                .await?;
            for movement in movements {
                lines.push(StatementLine {
                    date: StatementLine::format_date(movement.movement_at),
                    client: client.name.clone(),
                    account_number: account.account_number.clone(),
                    account_type: account.account_type.clone(),
                    account_balance: account.balance,
                    is_active: account.is_active,
                    kind: movement.kind,
                    amount: movement.amount,
                    available_balance: movement.balance,
                });
            }
        }

        if lines.is_empty() {
            return Err(LedgerError::NoMovementsInRange {
                client: client.name,
                start,
                end,
            });
        }

        Ok(StatementReport {
            client: client.name,
            start,
            end,
            lines,
        })
    }
}

fn project(row: MovementWithAccount) -> MovementProjection {
    MovementProjection {
        account_number: row.account_number,
        movement_at: row.movement.movement_at,
        kind: row.movement.kind,
        amount: row.movement.amount,
        balance: row.movement.balance,
    }
}

//! In-memory ledger store.
//!
//! Reference implementation of the [`LedgerStore`] contract, used as the
//! test double for the service layer. Per-account serialization comes from
//! one `tokio::sync::Mutex` per account record: mutations on the same
//! account queue up, mutations on distinct accounts do not contend. The
//! movement log lives behind its own lock, always acquired while the
//! account lock is held (fixed lock order, no cross-account blocking).

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, RwLock};

use cajero_shared::types::{AccountId, ClientId, MovementId};

use crate::ledger::engine::{self, AccountSnapshot};
use crate::ledger::{LedgerError, MovementKind, dates};
use crate::store::{
    AccountRecord, ClientRecord, LedgerStore, MovementReceipt, MovementRecord, MovementWithAccount,
};

/// In-memory implementation of the ledger store.
#[derive(Default)]
pub struct MemoryLedgerStore {
    /// Accounts keyed by account number, each behind its own mutation lock.
    accounts: DashMap<String, Arc<Mutex<AccountRecord>>>,
    /// Account id to account number, for id-keyed queries.
    account_numbers: DashMap<AccountId, String>,
    /// Clients keyed by id.
    clients: DashMap<ClientId, ClientRecord>,
    /// Append-only movement log, insertion order.
    movements: RwLock<Vec<MovementRecord>>,
    /// Next movement id to assign.
    next_movement_id: AtomicI64,
}

impl MemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_movement_id: AtomicI64::new(1),
            ..Self::default()
        }
    }

    /// Registers a client. Client creation is an external flow; this is its
    /// entry point into the store.
    pub fn insert_client(&self, client: ClientRecord) {
        self.clients.insert(client.id, client);
    }

    /// Registers an account with its opening balance. Account opening is an
    /// external flow; this is its entry point into the store.
    pub fn insert_account(&self, account: AccountRecord) {
        self.account_numbers
            .insert(account.id, account.account_number.clone());
        self.accounts.insert(
            account.account_number.clone(),
            Arc::new(Mutex::new(account)),
        );
    }

    fn account_slot(&self, account_number: &str) -> Result<Arc<Mutex<AccountRecord>>, LedgerError> {
        self.accounts
            .get(account_number)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))
    }

    fn assign_movement_id(&self) -> MovementId {
        MovementId(self.next_movement_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn apply_movement(
        &self,
        account_number: &str,
        kind: MovementKind,
        amount: Decimal,
    ) -> Result<MovementReceipt, LedgerError> {
        let slot = self.account_slot(account_number)?;
        let mut account = slot.lock().await;

        let snapshot = AccountSnapshot {
            account_number: account.account_number.clone(),
            balance: account.balance,
            is_active: account.is_active,
        };
        let new_balance = engine::apply(&snapshot, kind, amount)?;

        let record = MovementRecord {
            id: self.assign_movement_id(),
            account_id: account.id,
            kind,
            amount,
            balance: new_balance,
            movement_at: Utc::now(),
        };

        // Both writes happen under the account lock: no observer can see the
        // new balance without the movement, or vice versa.
        self.movements.write().await.push(record);
        account.balance = new_balance;

        Ok(MovementReceipt {
            account_number: account.account_number.clone(),
            kind,
            amount,
            balance: new_balance,
        })
    }

    async fn revise_movement(
        &self,
        movement_id: MovementId,
        kind: MovementKind,
        amount: Decimal,
    ) -> Result<MovementReceipt, LedgerError> {
        let account_id = {
            let movements = self.movements.read().await;
            movements
                .iter()
                .find(|m| m.id == movement_id)
                .map(|m| m.account_id)
                .ok_or(LedgerError::MovementNotFound(movement_id))?
        };

        let account_number = self
            .account_numbers
            .get(&account_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LedgerError::Store(format!("dangling account id {account_id}")))?;

        let slot = self.account_slot(&account_number)?;
        let mut account = slot.lock().await;

        let snapshot = AccountSnapshot {
            account_number: account.account_number.clone(),
            balance: account.balance,
            is_active: account.is_active,
        };
        let new_balance = engine::apply(&snapshot, kind, amount)?;

        let mut movements = self.movements.write().await;
        // Re-locate under the write lock: the movement may have been removed
        // between the lookup above and here. Nothing is mutated until found.
        let record = movements
            .iter_mut()
            .find(|m| m.id == movement_id)
            .ok_or(LedgerError::MovementNotFound(movement_id))?;
        record.kind = kind;
        record.amount = amount;
        record.balance = new_balance;
        account.balance = new_balance;

        Ok(MovementReceipt {
            account_number: account.account_number.clone(),
            kind,
            amount,
            balance: new_balance,
        })
    }

    async fn remove_movement(&self, movement_id: MovementId) -> Result<(), LedgerError> {
        let mut movements = self.movements.write().await;
        let index = movements
            .iter()
            .position(|m| m.id == movement_id)
            .ok_or(LedgerError::MovementNotFound(movement_id))?;
        // The account balance is deliberately not adjusted.
        movements.remove(index);
        Ok(())
    }

    async fn find_account_by_number(
        &self,
        account_number: &str,
    ) -> Result<Option<AccountRecord>, LedgerError> {
        match self.accounts.get(account_number) {
            Some(entry) => {
                let slot = Arc::clone(entry.value());
                drop(entry);
                Ok(Some(slot.lock().await.clone()))
            }
            None => Ok(None),
        }
    }

    async fn find_account_by_id(
        &self,
        account_id: AccountId,
    ) -> Result<Option<AccountRecord>, LedgerError> {
        match self.account_numbers.get(&account_id) {
            Some(entry) => {
                let number = entry.value().clone();
                drop(entry);
                self.find_account_by_number(&number).await
            }
            None => Ok(None),
        }
    }

    async fn find_movement(
        &self,
        movement_id: MovementId,
    ) -> Result<Option<MovementRecord>, LedgerError> {
        let movements = self.movements.read().await;
        Ok(movements.iter().find(|m| m.id == movement_id).cloned())
    }

    async fn all_movements(&self) -> Result<Vec<MovementWithAccount>, LedgerError> {
        let movements = self.movements.read().await;
        movements
            .iter()
            .map(|m| self.join_account(m))
            .collect()
    }

    async fn movements_on_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<MovementWithAccount>, LedgerError> {
        let movements = self.movements.read().await;
        movements
            .iter()
            .filter(|m| m.movement_at.date_naive() == date)
            .map(|m| self.join_account(m))
            .collect()
    }

    async fn movements_for_account_in_range(
        &self,
        account_id: AccountId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MovementRecord>, LedgerError> {
        let movements = self.movements.read().await;
        let mut matching: Vec<MovementRecord> = movements
            .iter()
            .filter(|m| m.account_id == account_id && dates::date_in_range(m.movement_at, start, end))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.movement_at
                .cmp(&b.movement_at)
                .then(a.id.cmp(&b.id))
        });
        Ok(matching)
    }

    async fn find_client_by_name(&self, name: &str) -> Result<Option<ClientRecord>, LedgerError> {
        Ok(self
            .clients
            .iter()
            .find(|entry| entry.value().name == name)
            .map(|entry| entry.value().clone()))
    }

    async fn accounts_for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<AccountRecord>, LedgerError> {
        let mut accounts = Vec::new();
        let slots: Vec<Arc<Mutex<AccountRecord>>> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for slot in slots {
            let account = slot.lock().await;
            if account.client_id == client_id {
                accounts.push(account.clone());
            }
        }
        accounts.sort_by(|a, b| a.account_number.cmp(&b.account_number));
        Ok(accounts)
    }
}

impl MemoryLedgerStore {
    fn join_account(&self, movement: &MovementRecord) -> Result<MovementWithAccount, LedgerError> {
        let account_number = self
            .account_numbers
            .get(&movement.account_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                LedgerError::Store(format!("dangling account id {}", movement.account_id))
            })?;
        Ok(MovementWithAccount {
            movement: movement.clone(),
            account_number,
        })
    }
}

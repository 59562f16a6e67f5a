//! Postgres-backed ledger store.
//!
//! Mutations run inside a database transaction and take a `SELECT ... FOR
//! UPDATE` row lock on the account, so concurrent mutations on the same
//! account serialize at the database while distinct accounts proceed in
//! parallel. Reads are plain snapshot queries.

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use cajero_core::ledger::engine::{self, AccountSnapshot};
use cajero_core::ledger::{LedgerError, MovementKind};
use cajero_core::store::{
    AccountRecord, ClientRecord, LedgerStore, MovementReceipt, MovementRecord, MovementWithAccount,
};
use cajero_shared::types::{AccountId, ClientId, MovementId};

use crate::entities::{accounts, clients, movements};

/// `LedgerStore` adapter over a `SeaORM` Postgres connection.
#[derive(Debug, Clone)]
pub struct SqlLedgerStore {
    db: DatabaseConnection,
}

impl SqlLedgerStore {
    /// Creates a store over an established connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Locks the account row for the duration of the transaction.
    async fn lock_account_by_number(
        txn: &DatabaseTransaction,
        account_number: &str,
    ) -> Result<accounts::Model, LedgerError> {
        accounts::Entity::find()
            .filter(accounts::Column::AccountNumber.eq(account_number))
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(store_err)?
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))
    }

    async fn lock_account_by_id(
        txn: &DatabaseTransaction,
        account_id: uuid::Uuid,
    ) -> Result<accounts::Model, LedgerError> {
        accounts::Entity::find_by_id(account_id)
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(store_err)?
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.to_string()))
    }

    /// Validates the movement against the locked account row and writes the
    /// new balance back.
    async fn apply_to_locked_account(
        txn: &DatabaseTransaction,
        account: &accounts::Model,
        kind: MovementKind,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let snapshot = AccountSnapshot {
            account_number: account.account_number.clone(),
            balance: account.balance,
            is_active: account.is_active,
        };
        let new_balance = engine::apply(&snapshot, kind, amount)?;

        let mut update: accounts::ActiveModel = account.clone().into();
        update.balance = Set(new_balance);
        update.updated_at = Set(Utc::now().into());
        update.update(txn).await.map_err(store_err)?;

        Ok(new_balance)
    }
}

#[async_trait]
impl LedgerStore for SqlLedgerStore {
    async fn apply_movement(
        &self,
        account_number: &str,
        kind: MovementKind,
        amount: Decimal,
    ) -> Result<MovementReceipt, LedgerError> {
        let txn = self.db.begin().await.map_err(store_err)?;

        let account = Self::lock_account_by_number(&txn, account_number).await?;
        let new_balance = Self::apply_to_locked_account(&txn, &account, kind, amount).await?;

        let movement = movements::ActiveModel {
            account_id: Set(account.id),
            kind: Set(kind.as_str().to_string()),
            amount: Set(amount),
            balance: Set(new_balance),
            movement_at: Set(Utc::now().into()),
            ..Default::default()
        };
        movement.insert(&txn).await.map_err(store_err)?;

        txn.commit().await.map_err(store_err)?;

        Ok(MovementReceipt {
            account_number: account.account_number,
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
        let txn = self.db.begin().await.map_err(store_err)?;

        let movement = movements::Entity::find_by_id(movement_id.into_inner())
            .one(&txn)
            .await
            .map_err(store_err)?
            .ok_or(LedgerError::MovementNotFound(movement_id))?;

        let account = Self::lock_account_by_id(&txn, movement.account_id).await?;
        let new_balance = Self::apply_to_locked_account(&txn, &account, kind, amount).await?;

        // Overwrite kind, amount, and resulting balance; the original
        // timestamp is kept.
        let mut update: movements::ActiveModel = movement.into();
        update.kind = Set(kind.as_str().to_string());
        update.amount = Set(amount);
        update.balance = Set(new_balance);
        update.update(&txn).await.map_err(store_err)?;

        txn.commit().await.map_err(store_err)?;

        Ok(MovementReceipt {
            account_number: account.account_number,
            kind,
            amount,
            balance: new_balance,
        })
    }

    async fn remove_movement(&self, movement_id: MovementId) -> Result<(), LedgerError> {
        // The account balance is deliberately not adjusted.
        let result = movements::Entity::delete_by_id(movement_id.into_inner())
            .exec(&self.db)
            .await
            .map_err(store_err)?;

        if result.rows_affected == 0 {
            return Err(LedgerError::MovementNotFound(movement_id));
        }
        Ok(())
    }

    async fn find_account_by_number(
        &self,
        account_number: &str,
    ) -> Result<Option<AccountRecord>, LedgerError> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::AccountNumber.eq(account_number))
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(account.map(account_record))
    }

    async fn find_account_by_id(
        &self,
        account_id: AccountId,
    ) -> Result<Option<AccountRecord>, LedgerError> {
        let account = accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(account.map(account_record))
    }

    async fn find_movement(
        &self,
        movement_id: MovementId,
    ) -> Result<Option<MovementRecord>, LedgerError> {
        let movement = movements::Entity::find_by_id(movement_id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?;
        movement.map(movement_record).transpose()
    }

    async fn all_movements(&self) -> Result<Vec<MovementWithAccount>, LedgerError> {
        let rows = movements::Entity::find()
            .find_also_related(accounts::Entity)
            .order_by_asc(movements::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        rows.into_iter().map(join_account).collect()
    }

    async fn movements_on_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<MovementWithAccount>, LedgerError> {
        let (lower, upper) = day_bounds(date, date)?;
        let rows = movements::Entity::find()
            .filter(movements::Column::MovementAt.gte(lower))
            .filter(movements::Column::MovementAt.lt(upper))
            .find_also_related(accounts::Entity)
            .order_by_asc(movements::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        rows.into_iter().map(join_account).collect()
    }

    async fn movements_for_account_in_range(
        &self,
        account_id: AccountId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MovementRecord>, LedgerError> {
        let (lower, upper) = day_bounds(start, end)?;
        let rows = movements::Entity::find()
            .filter(movements::Column::AccountId.eq(account_id.into_inner()))
            .filter(movements::Column::MovementAt.gte(lower))
            .filter(movements::Column::MovementAt.lt(upper))
            .order_by_asc(movements::Column::MovementAt)
            .order_by_asc(movements::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        rows.into_iter().map(movement_record).collect()
    }

    async fn find_client_by_name(&self, name: &str) -> Result<Option<ClientRecord>, LedgerError> {
        let client = clients::Entity::find()
            .filter(clients::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(client.map(|c| ClientRecord {
            id: ClientId::from_uuid(c.id),
            name: c.name,
            is_active: c.is_active,
        }))
    }

    async fn accounts_for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<AccountRecord>, LedgerError> {
        let rows = accounts::Entity::find()
            .filter(accounts::Column::ClientId.eq(client_id.into_inner()))
            .order_by_asc(accounts::Column::AccountNumber)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(account_record).collect())
    }
}

fn store_err(err: DbErr) -> LedgerError {
    LedgerError::Store(err.to_string())
}

/// Half-open UTC bounds `[start 00:00, end + 1 day 00:00)` covering the
/// inclusive calendar-date range.
fn day_bounds(
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(DateTime<Utc>, DateTime<Utc>), LedgerError> {
    let lower = start.and_time(NaiveTime::MIN).and_utc();
    let upper_date = end
        .checked_add_days(Days::new(1))
        .ok_or_else(|| LedgerError::Store(format!("date range upper bound overflow: {end}")))?;
    let upper = upper_date.and_time(NaiveTime::MIN).and_utc();
    Ok((lower, upper))
}

fn account_record(model: accounts::Model) -> AccountRecord {
    AccountRecord {
        id: AccountId::from_uuid(model.id),
        account_number: model.account_number,
        account_type: model.account_type,
        balance: model.balance,
        is_active: model.is_active,
        client_id: ClientId::from_uuid(model.client_id),
    }
}

fn movement_record(model: movements::Model) -> Result<MovementRecord, LedgerError> {
    // A kind the engine does not know means a corrupt row, not bad input.
    let kind = MovementKind::parse(&model.kind)
        .map_err(|_| LedgerError::Store(format!("unknown kind in movement {}", model.id)))?;
    Ok(MovementRecord {
        id: MovementId::from_i64(model.id),
        account_id: AccountId::from_uuid(model.account_id),
        kind,
        amount: model.amount,
        balance: model.balance,
        movement_at: model.movement_at.with_timezone(&Utc),
    })
}

fn join_account(
    row: (movements::Model, Option<accounts::Model>),
) -> Result<MovementWithAccount, LedgerError> {
    let (movement, account) = row;
    let account =
        account.ok_or_else(|| LedgerError::Store(format!("movement {} has no account", movement.id)))?;
    Ok(MovementWithAccount {
        movement: movement_record(movement)?,
        account_number: account.account_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_day_bounds_cover_whole_days() {
        let start = NaiveDate::from_ymd_opt(2022, 2, 8).unwrap();
        let end = NaiveDate::from_ymd_opt(2022, 2, 10).unwrap();
        let (lower, upper) = day_bounds(start, end).unwrap();
        assert_eq!(lower.to_rfc3339(), "2022-02-08T00:00:00+00:00");
        assert_eq!(upper.to_rfc3339(), "2022-02-11T00:00:00+00:00");
    }

    #[test]
    fn test_movement_record_rejects_unknown_kind() {
        let model = movements::Model {
            id: 9,
            account_id: uuid::Uuid::new_v4(),
            kind: "Transferencia".to_string(),
            amount: dec!(10.00),
            balance: dec!(10.00),
            movement_at: Utc::now().into(),
        };
        assert!(matches!(
            movement_record(model),
            Err(LedgerError::Store(_))
        ));
    }
}

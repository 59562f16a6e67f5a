//! Initial schema: clients, accounts, and the movements log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS movements CASCADE;
             DROP TABLE IF EXISTS accounts CASCADE;
             DROP TABLE IF EXISTS clients CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Clients: account holders, looked up by display name for statements
CREATE TABLE clients (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    address TEXT,
    phone VARCHAR(32),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_clients_name UNIQUE (name)
);

-- Accounts: one balance per account, mutated only through movements
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    account_number VARCHAR(32) NOT NULL,
    account_type VARCHAR(32) NOT NULL,
    balance DECIMAL(19, 2) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true,
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_accounts_number UNIQUE (account_number),
    CONSTRAINT chk_accounts_balance_nonneg CHECK (balance >= 0)
);

-- Index for a client's accounts (statement query)
CREATE INDEX idx_accounts_client ON accounts(client_id);

-- Movements: append-only log; balance is the post-movement account balance
CREATE TABLE movements (
    id BIGSERIAL PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    kind VARCHAR(16) NOT NULL,
    amount DECIMAL(19, 2) NOT NULL,
    balance DECIMAL(19, 2) NOT NULL,
    movement_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_movements_kind CHECK (kind IN ('Deposito', 'Retiro')),
    CONSTRAINT chk_movements_amount_positive CHECK (amount > 0)
);

-- Index for per-account range queries (statement)
CREATE INDEX idx_movements_account_at ON movements(account_id, movement_at);

-- Index for the calendar-date report
CREATE INDEX idx_movements_at ON movements(movement_at);
";

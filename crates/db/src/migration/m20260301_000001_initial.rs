//! Initial schema: users, agents, EDC machines, services, fees,
//! transactions, cash flows and revoked tokens.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(SCHEMA_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const SCHEMA_SQL: &str = r"
-- Users (owners and cashiers)
CREATE TABLE users (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    password VARCHAR(255) NOT NULL,
    role VARCHAR(20) NOT NULL DEFAULT 'owner',
    status VARCHAR(20) NOT NULL DEFAULT 'active',
    agent_profile_id BIGINT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_users_email UNIQUE (email),
    CONSTRAINT chk_users_role CHECK (role IN ('owner', 'kasir')),
    CONSTRAINT chk_users_status CHECK (status IN ('active', 'inactive'))
);

-- Agent profiles; total_balance is the cash-on-hand float
CREATE TABLE agent_profiles (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    owner_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
    agent_name VARCHAR(255) NOT NULL,
    address TEXT,
    phone VARCHAR(50),
    total_balance NUMERIC(15, 2) NOT NULL DEFAULT 0,
    logo VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_agent_profiles_user ON agent_profiles(user_id);
CREATE INDEX idx_agent_profiles_owner ON agent_profiles(owner_id);

ALTER TABLE users
    ADD CONSTRAINT fk_users_agent_profile
    FOREIGN KEY (agent_profile_id) REFERENCES agent_profiles(id) ON DELETE SET NULL;

-- EDC machines; saldo is the processor-side float
CREATE TABLE edc_machines (
    id BIGSERIAL PRIMARY KEY,
    agent_profile_id BIGINT REFERENCES agent_profiles(id) ON DELETE SET NULL,
    name VARCHAR(255) NOT NULL,
    bank_name VARCHAR(255) NOT NULL,
    account_number VARCHAR(100),
    saldo NUMERIC(15, 2) NOT NULL DEFAULT 0,
    status VARCHAR(20) NOT NULL DEFAULT 'active',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_edc_status CHECK (status IN ('active', 'inactive'))
);

CREATE INDEX idx_edc_machines_agent ON edc_machines(agent_profile_id);

-- Services offered at the counter
CREATE TABLE services (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    requires_target BOOLEAN NOT NULL DEFAULT FALSE,
    category VARCHAR(100),
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_services_name UNIQUE (name)
);

-- Service fee brackets
CREATE TABLE service_fees (
    id BIGSERIAL PRIMARY KEY,
    service_id BIGINT NOT NULL REFERENCES services(id) ON DELETE CASCADE,
    min_amount NUMERIC(15, 2) NOT NULL DEFAULT 0,
    max_amount NUMERIC(15, 2) NOT NULL,
    fee NUMERIC(15, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_service_fee_range CHECK (min_amount <= max_amount)
);

CREATE INDEX idx_service_fees_service ON service_fees(service_id, id);

-- Flat bank fee per (EDC machine, service)
CREATE TABLE bank_fees (
    id BIGSERIAL PRIMARY KEY,
    edc_machine_id BIGINT NOT NULL REFERENCES edc_machines(id) ON DELETE CASCADE,
    service_id BIGINT NOT NULL REFERENCES services(id) ON DELETE CASCADE,
    fee NUMERIC(15, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_bank_fees_edc_service UNIQUE (edc_machine_id, service_id)
);

-- Posted transactions; immutable after insert
CREATE TABLE transactions (
    id BIGSERIAL PRIMARY KEY,
    transaction_number VARCHAR(50) NOT NULL,
    edc_machine_id BIGINT NOT NULL REFERENCES edc_machines(id),
    service_id BIGINT NOT NULL REFERENCES services(id),
    agent_profile_id BIGINT REFERENCES agent_profiles(id) ON DELETE SET NULL,
    user_id BIGINT NOT NULL REFERENCES users(id),
    cashier_name VARCHAR(255),
    customer_name VARCHAR(255),
    target_number VARCHAR(100),
    reference_number VARCHAR(100),
    amount NUMERIC(15, 2) NOT NULL,
    service_fee NUMERIC(15, 2) NOT NULL DEFAULT 0,
    bank_fee NUMERIC(15, 2) NOT NULL DEFAULT 0,
    extra_fee NUMERIC(15, 2) NOT NULL DEFAULT 0,
    net_profit NUMERIC(15, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_transactions_number UNIQUE (transaction_number)
);

CREATE INDEX idx_transactions_created ON transactions(created_at DESC);
CREATE INDEX idx_transactions_agent ON transactions(agent_profile_id, created_at DESC);
CREATE INDEX idx_transactions_user ON transactions(user_id, created_at DESC);

-- Append-only cash movements of an agent
CREATE TABLE cash_flows (
    id BIGSERIAL PRIMARY KEY,
    agent_profile_id BIGINT REFERENCES agent_profiles(id) ON DELETE SET NULL,
    user_id BIGINT NOT NULL REFERENCES users(id),
    type VARCHAR(20) NOT NULL,
    source VARCHAR(255) NOT NULL,
    amount NUMERIC(15, 2) NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_cash_flow_type CHECK (type IN ('cash_in', 'cash_out'))
);

CREATE INDEX idx_cash_flows_user ON cash_flows(user_id, created_at DESC);
CREATE INDEX idx_cash_flows_agent ON cash_flows(agent_profile_id, created_at DESC);

-- Revoked JWTs (SHA-256 digest) until they expire
CREATE TABLE token_blacklist (
    id BIGSERIAL PRIMARY KEY,
    token VARCHAR(64) NOT NULL,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    blacklisted_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    expires_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT uq_token_blacklist_token UNIQUE (token)
);

CREATE INDEX idx_token_blacklist_expires ON token_blacklist(expires_at);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS token_blacklist CASCADE;
DROP TABLE IF EXISTS cash_flows CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS bank_fees CASCADE;
DROP TABLE IF EXISTS service_fees CASCADE;
DROP TABLE IF EXISTS services CASCADE;
DROP TABLE IF EXISTS edc_machines CASCADE;
ALTER TABLE IF EXISTS users DROP CONSTRAINT IF EXISTS fk_users_agent_profile;
DROP TABLE IF EXISTS agent_profiles CASCADE;
DROP TABLE IF EXISTS users CASCADE;
";

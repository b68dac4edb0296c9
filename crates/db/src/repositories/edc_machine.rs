//! EDC machine repository, including the float operations that bypass posting.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use serde::Serialize;

use crate::entities::{agent_profiles, cash_flows, edc_machines};

/// Error types for EDC machine operations.
#[derive(Debug, thiserror::Error)]
pub enum EdcMachineError {
    /// Machine not found.
    #[error("EDC machine not found: {0}")]
    NotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an EDC machine.
#[derive(Debug, Clone)]
pub struct CreateEdcMachineInput {
    /// Owning agent.
    pub agent_profile_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Acquiring bank.
    pub bank_name: String,
    /// Settlement account.
    pub account_number: Option<String>,
    /// Opening float.
    pub saldo: Decimal,
    /// `active` or `inactive`.
    pub status: String,
}

/// Input for updating an EDC machine.
#[derive(Debug, Clone, Default)]
pub struct UpdateEdcMachineInput {
    /// New name.
    pub name: Option<String>,
    /// New bank.
    pub bank_name: Option<String>,
    /// New account number; `Some(None)` clears it.
    pub account_number: Option<Option<String>>,
    /// New float.
    pub saldo: Option<Decimal>,
    /// New status.
    pub status: Option<String>,
}

/// Row counts of an admin reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResetSummary {
    /// EDC machines zeroed.
    pub edc_machines_reset: u64,
    /// Agents zeroed.
    pub agents_reset: u64,
    /// Cash-flow rows removed.
    pub cashflows_deleted: u64,
}

/// EDC machine repository.
#[derive(Debug, Clone)]
pub struct EdcMachineRepository {
    db: DatabaseConnection,
}

impl EdcMachineRepository {
    /// Creates a new EDC machine repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a machine by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<edc_machines::Model>, DbErr> {
        edc_machines::Entity::find_by_id(id).one(&self.db).await
    }

    /// Loads machines by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_many(
        &self,
        ids: Vec<i64>,
    ) -> Result<HashMap<i64, edc_machines::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = edc_machines::Entity::find()
            .filter(edc_machines::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|m| (m.id, m)).collect())
    }

    /// Lists machines, optionally for one agent, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, agent_id: Option<i64>) -> Result<Vec<edc_machines::Model>, DbErr> {
        let mut query = edc_machines::Entity::find();
        if let Some(agent_id) = agent_id {
            query = query.filter(edc_machines::Column::AgentProfileId.eq(agent_id));
        }
        query
            .order_by_asc(edc_machines::Column::Id)
            .all(&self.db)
            .await
    }

    /// Returns true when the agent already has a machine called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn name_exists_for_agent(
        &self,
        agent_id: Option<i64>,
        name: &str,
    ) -> Result<bool, DbErr> {
        let query = edc_machines::Entity::find().filter(edc_machines::Column::Name.eq(name));
        let query = match agent_id {
            Some(id) => query.filter(edc_machines::Column::AgentProfileId.eq(id)),
            None => query.filter(edc_machines::Column::AgentProfileId.is_null()),
        };
        Ok(query.count(&self.db).await? > 0)
    }

    /// Returns true when a machine other than `except_id` is called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn name_taken(&self, name: &str, except_id: i64) -> Result<bool, DbErr> {
        let count = edc_machines::Entity::find()
            .filter(edc_machines::Column::Name.eq(name))
            .filter(edc_machines::Column::Id.ne(except_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// Creates a machine.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        input: CreateEdcMachineInput,
    ) -> Result<edc_machines::Model, DbErr> {
        let now = chrono::Utc::now().into();
        edc_machines::ActiveModel {
            agent_profile_id: Set(input.agent_profile_id),
            name: Set(input.name),
            bank_name: Set(input.bank_name),
            account_number: Set(input.account_number),
            saldo: Set(input.saldo),
            status: Set(input.status),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Updates a machine.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateEdcMachineInput,
    ) -> Result<edc_machines::Model, EdcMachineError> {
        let machine = self
            .find_by_id(id)
            .await?
            .ok_or(EdcMachineError::NotFound(id))?;

        let mut active: edc_machines::ActiveModel = machine.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(bank_name) = input.bank_name {
            active.bank_name = Set(bank_name);
        }
        if let Some(account_number) = input.account_number {
            active.account_number = Set(account_number);
        }
        if let Some(saldo) = input.saldo {
            active.saldo = Set(saldo);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a machine. Returns false when no row matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: i64) -> Result<bool, DbErr> {
        let result = edc_machines::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Credits a machine's float with `saldo = saldo + amount`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn add_saldo(
        &self,
        id: i64,
        amount: Decimal,
    ) -> Result<edc_machines::Model, EdcMachineError> {
        let result = edc_machines::Entity::update_many()
            .col_expr(
                edc_machines::Column::Saldo,
                Expr::col(edc_machines::Column::Saldo).add(amount),
            )
            .col_expr(
                edc_machines::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(edc_machines::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(EdcMachineError::NotFound(id));
        }

        self.find_by_id(id)
            .await?
            .ok_or(EdcMachineError::NotFound(id))
    }

    /// Sum of every machine's float.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn total_saldo(&self) -> Result<Decimal, DbErr> {
        let machines = edc_machines::Entity::find().all(&self.db).await?;
        Ok(machines.iter().map(|m| m.saldo).sum())
    }

    /// Zeroes every EDC float and agent balance and deletes every cash-flow
    /// row, in one database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; nothing is applied then.
    pub async fn reset_all(&self) -> Result<ResetSummary, DbErr> {
        let txn = self.db.begin().await?;
        let now = chrono::Utc::now();

        let edc = edc_machines::Entity::update_many()
            .col_expr(edc_machines::Column::Saldo, Expr::value(Decimal::ZERO))
            .col_expr(edc_machines::Column::UpdatedAt, Expr::value(now))
            .exec(&txn)
            .await?;

        let agents = agent_profiles::Entity::update_many()
            .col_expr(
                agent_profiles::Column::TotalBalance,
                Expr::value(Decimal::ZERO),
            )
            .col_expr(agent_profiles::Column::UpdatedAt, Expr::value(now))
            .exec(&txn)
            .await?;

        let flows = cash_flows::Entity::delete_many().exec(&txn).await?;

        txn.commit().await?;

        Ok(ResetSummary {
            edc_machines_reset: edc.rows_affected,
            agents_reset: agents.rows_affected,
            cashflows_deleted: flows.rows_affected,
        })
    }
}

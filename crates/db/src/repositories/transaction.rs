//! Transaction repository: listing, lookups and atomic posting.

use std::collections::HashMap;

use brilink_core::posting::{
    FeeBreakdown, FloatChange, PostingContext, PostingError, ServiceCategory, plan_ledger,
};
use brilink_shared::types::PageRequest;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::Expr,
};
use tracing::{debug, info};

use super::{AgentRepository, EdcMachineRepository, ServiceRepository, UserRepository};
use crate::entities::{
    agent_profiles, cash_flows, edc_machines, services, transactions, users,
};

/// Error types for posting a transaction.
#[derive(Debug, thiserror::Error)]
pub enum PostingRepoError {
    /// A balance check failed while applying the ledger plan.
    #[error(transparent)]
    Posting(#[from] PostingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Everything needed to persist a transaction and its ledger effects.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Generated `TRX-…` number.
    pub transaction_number: String,
    /// EDC machine used.
    pub edc_machine_id: i64,
    /// Service sold.
    pub service_id: i64,
    /// Service name, for cash-flow text.
    pub service_name: String,
    /// Resolved service category.
    pub category: ServiceCategory,
    /// Attached agent.
    pub agent_profile_id: Option<i64>,
    /// Posting user.
    pub user_id: i64,
    /// Posting user's name.
    pub cashier_name: Option<String>,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Destination account or phone.
    pub target_number: Option<String>,
    /// External reference.
    pub reference_number: Option<String>,
    /// Amount and fees.
    pub fees: FeeBreakdown,
}

/// Rows a set of transactions refers to, keyed by ID.
#[derive(Debug, Clone, Default)]
pub struct TransactionRefs {
    /// Services.
    pub services: HashMap<i64, services::Model>,
    /// EDC machines.
    pub edc_machines: HashMap<i64, edc_machines::Model>,
    /// Agents.
    pub agents: HashMap<i64, agent_profiles::Model>,
    /// Users.
    pub users: HashMap<i64, users::Model>,
}

fn unique_ids(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut ids: Vec<i64> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Applies a float change to one EDC machine.
///
/// Debits only succeed when the float covers them. Returns false when the
/// guarded update matched no row.
async fn apply_edc_change<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    change: FloatChange,
) -> Result<bool, DbErr> {
    let now = Utc::now();
    let mut update = edc_machines::Entity::update_many()
        .col_expr(edc_machines::Column::UpdatedAt, Expr::value(now))
        .filter(edc_machines::Column::Id.eq(id));
    update = match change {
        FloatChange::Debit(amount) => update
            .col_expr(
                edc_machines::Column::Saldo,
                Expr::col(edc_machines::Column::Saldo).sub(amount),
            )
            .filter(edc_machines::Column::Saldo.gte(amount)),
        FloatChange::Credit(amount) => update.col_expr(
            edc_machines::Column::Saldo,
            Expr::col(edc_machines::Column::Saldo).add(amount),
        ),
    };
    Ok(update.exec(conn).await?.rows_affected > 0)
}

/// Applies a float change to one agent's cash, with the same guard.
async fn apply_agent_change<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    change: FloatChange,
) -> Result<bool, DbErr> {
    let now = Utc::now();
    let mut update = agent_profiles::Entity::update_many()
        .col_expr(agent_profiles::Column::UpdatedAt, Expr::value(now))
        .filter(agent_profiles::Column::Id.eq(id));
    update = match change {
        FloatChange::Debit(amount) => update
            .col_expr(
                agent_profiles::Column::TotalBalance,
                Expr::col(agent_profiles::Column::TotalBalance).sub(amount),
            )
            .filter(agent_profiles::Column::TotalBalance.gte(amount)),
        FloatChange::Credit(amount) => update.col_expr(
            agent_profiles::Column::TotalBalance,
            Expr::col(agent_profiles::Column::TotalBalance).add(amount),
        ),
    };
    Ok(update.exec(conn).await?.rows_affected > 0)
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<transactions::Model>, DbErr> {
        transactions::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists transactions newest first, optionally for one agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        agent_id: Option<i64>,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<transactions::Model>, u64), DbErr> {
        let mut query = transactions::Entity::find();
        if let Some(agent_id) = agent_id {
            query = query.filter(transactions::Column::AgentProfileId.eq(agent_id));
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Transactions created in `[start, end)`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        agent_id: Option<i64>,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::CreatedAt.gte(start))
            .filter(transactions::Column::CreatedAt.lt(end));
        if let Some(agent_id) = agent_id {
            query = query.filter(transactions::Column::AgentProfileId.eq(agent_id));
        }
        query
            .order_by_asc(transactions::Column::CreatedAt)
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await
    }

    /// One page of the transactions created in `[start, end)`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn page_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page: &PageRequest,
    ) -> Result<(Vec<transactions::Model>, u64), DbErr> {
        let query = transactions::Entity::find()
            .filter(transactions::Column::CreatedAt.gte(start))
            .filter(transactions::Column::CreatedAt.lt(end));

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// The newest `limit` transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent(&self, limit: u64) -> Result<Vec<transactions::Model>, DbErr> {
        transactions::Entity::find()
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// Loads the services, machines, agents and users `rows` refer to.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn load_refs(&self, rows: &[transactions::Model]) -> Result<TransactionRefs, DbErr> {
        if rows.is_empty() {
            return Ok(TransactionRefs::default());
        }

        let services = ServiceRepository::new(self.db.clone())
            .find_many(unique_ids(rows.iter().map(|t| t.service_id)))
            .await?;
        let edc_machines = EdcMachineRepository::new(self.db.clone())
            .find_many(unique_ids(rows.iter().map(|t| t.edc_machine_id)))
            .await?;
        let agents = AgentRepository::new(self.db.clone())
            .find_many(unique_ids(rows.iter().filter_map(|t| t.agent_profile_id)))
            .await?;
        let users = UserRepository::new(self.db.clone())
            .find_many(unique_ids(rows.iter().map(|t| t.user_id)))
            .await?;

        Ok(TransactionRefs {
            services,
            edc_machines,
            agents,
            users,
        })
    }

    /// Deletes a transaction. Balances and cash flows are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: i64) -> Result<bool, DbErr> {
        let result = transactions::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Inserts a transaction and applies its ledger plan in one database
    /// transaction.
    ///
    /// Debits are guarded updates (`… WHERE saldo >= amount`). When a guard
    /// matches no row, the database transaction is dropped uncommitted and
    /// the matching `PostingError` is returned with the balance seen at that
    /// moment.
    ///
    /// # Errors
    ///
    /// Returns `PostingRepoError::Posting` on insufficient balance, or a
    /// database error. Nothing is persisted in either case.
    pub async fn post(&self, input: NewTransaction) -> Result<transactions::Model, PostingRepoError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let fees = input.fees;

        let row = transactions::ActiveModel {
            transaction_number: Set(input.transaction_number.clone()),
            edc_machine_id: Set(input.edc_machine_id),
            service_id: Set(input.service_id),
            agent_profile_id: Set(input.agent_profile_id),
            user_id: Set(input.user_id),
            cashier_name: Set(input.cashier_name),
            customer_name: Set(input.customer_name),
            target_number: Set(input.target_number),
            reference_number: Set(input.reference_number),
            amount: Set(fees.amount),
            service_fee: Set(fees.service_fee),
            bank_fee: Set(fees.bank_fee),
            extra_fee: Set(fees.extra_fee),
            net_profit: Set(fees.net_profit()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let plan = plan_ledger(&PostingContext {
            category: &input.category,
            service_name: &input.service_name,
            transaction_number: &input.transaction_number,
            agent_profile_id: input.agent_profile_id,
            amount: fees.amount,
        });

        if let Some(change) = plan.edc {
            if !apply_edc_change(&txn, input.edc_machine_id, change).await? {
                let available = edc_machines::Entity::find_by_id(input.edc_machine_id)
                    .one(&txn)
                    .await?
                    .map_or(Decimal::ZERO, |m| m.saldo);
                return Err(PostingError::InsufficientEdcBalance {
                    available,
                    required: fees.amount,
                }
                .into());
            }
        }

        if let Some(agent) = plan.agent {
            if !apply_agent_change(&txn, agent.agent_profile_id, agent.change).await? {
                let available = agent_profiles::Entity::find_by_id(agent.agent_profile_id)
                    .one(&txn)
                    .await?
                    .map_or(Decimal::ZERO, |a| a.total_balance);
                return Err(PostingError::InsufficientCash {
                    available,
                    required: fees.amount,
                }
                .into());
            }
        }

        if let Some(flow) = plan.cash_flow {
            debug!(flow_type = %flow.flow_type, amount = %flow.amount, "Appending cash flow");
            cash_flows::ActiveModel {
                agent_profile_id: Set(flow.agent_profile_id),
                user_id: Set(input.user_id),
                flow_type: Set(flow.flow_type.as_str().to_string()),
                source: Set(flow.source),
                amount: Set(flow.amount),
                description: Set(Some(flow.description)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        info!(
            transaction_id = row.id,
            transaction_number = %row.transaction_number,
            amount = %row.amount,
            "Transaction posted"
        );

        Ok(row)
    }
}

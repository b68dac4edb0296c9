//! Cash-flow repository.

use brilink_core::{cashflow::CashFlowType, reports::CashTotals};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::cash_flows;

/// Input for recording a cash movement.
#[derive(Debug, Clone)]
pub struct CreateCashFlowInput {
    /// Agent the cash belongs to.
    pub agent_profile_id: Option<i64>,
    /// Recording user.
    pub user_id: i64,
    /// Direction.
    pub flow_type: CashFlowType,
    /// Where the money came from or went to.
    pub source: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Free text.
    pub description: Option<String>,
}

/// Input for editing a cash movement.
#[derive(Debug, Clone, Default)]
pub struct UpdateCashFlowInput {
    /// New source.
    pub source: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
}

/// Filter options for listing cash flows.
#[derive(Debug, Clone, Copy)]
pub struct CashFlowFilter {
    /// Creator; always applied.
    pub user_id: i64,
    /// Agent.
    pub agent_id: Option<i64>,
    /// Direction.
    pub flow_type: Option<CashFlowType>,
}

/// Cash-flow repository.
#[derive(Debug, Clone)]
pub struct CashFlowRepository {
    db: DatabaseConnection,
}

impl CashFlowRepository {
    /// Creates a new cash-flow repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a cash flow by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<cash_flows::Model>, DbErr> {
        cash_flows::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists cash flows newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: CashFlowFilter,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<cash_flows::Model>, u64), DbErr> {
        let mut query =
            cash_flows::Entity::find().filter(cash_flows::Column::UserId.eq(filter.user_id));
        if let Some(agent_id) = filter.agent_id {
            query = query.filter(cash_flows::Column::AgentProfileId.eq(agent_id));
        }
        if let Some(flow_type) = filter.flow_type {
            query = query.filter(cash_flows::Column::FlowType.eq(flow_type.as_str()));
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(cash_flows::Column::CreatedAt)
            .order_by_desc(cash_flows::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Records a cash movement.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateCashFlowInput) -> Result<cash_flows::Model, DbErr> {
        let now = Utc::now().into();
        cash_flows::ActiveModel {
            agent_profile_id: Set(input.agent_profile_id),
            user_id: Set(input.user_id),
            flow_type: Set(input.flow_type.as_str().to_string()),
            source: Set(input.source),
            amount: Set(input.amount),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Applies an edit to a loaded row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        row: cash_flows::Model,
        input: UpdateCashFlowInput,
    ) -> Result<cash_flows::Model, DbErr> {
        let mut active: cash_flows::ActiveModel = row.into();
        if let Some(source) = input.source {
            active.source = Set(source);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Deletes a cash flow. Returns false when no row matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: i64) -> Result<bool, DbErr> {
        let result = cash_flows::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Cash-in and cash-out sums, over `[start, end)` or all time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn totals(
        &self,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<CashTotals, DbErr> {
        let mut query = cash_flows::Entity::find();
        if let Some((start, end)) = range {
            query = query
                .filter(cash_flows::Column::CreatedAt.gte(start))
                .filter(cash_flows::Column::CreatedAt.lt(end));
        }
        let rows = query.all(&self.db).await?;

        Ok(CashTotals::from_entries(
            rows.iter()
                .filter_map(|r| r.kind().map(|kind| (kind, r.amount))),
        ))
    }
}

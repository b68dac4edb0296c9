//! Service fee bracket repository.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::service_fees;

/// Input for creating a fee bracket.
#[derive(Debug, Clone, Copy)]
pub struct CreateServiceFeeInput {
    /// Service the bracket applies to.
    pub service_id: i64,
    /// Lower bound, inclusive.
    pub min_amount: Decimal,
    /// Upper bound, inclusive.
    pub max_amount: Decimal,
    /// Fee charged inside the bracket.
    pub fee: Decimal,
}

/// Input for updating a fee bracket.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateServiceFeeInput {
    /// New service.
    pub service_id: Option<i64>,
    /// New lower bound.
    pub min_amount: Option<Decimal>,
    /// New upper bound.
    pub max_amount: Option<Decimal>,
    /// New fee.
    pub fee: Option<Decimal>,
}

/// Service fee repository.
#[derive(Debug, Clone)]
pub struct ServiceFeeRepository {
    db: DatabaseConnection,
}

impl ServiceFeeRepository {
    /// Creates a new service fee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a bracket by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<service_fees::Model>, DbErr> {
        service_fees::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists brackets, optionally for one service, ordered by ID.
    ///
    /// The order is the order the fee resolver tries brackets in.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, service_id: Option<i64>) -> Result<Vec<service_fees::Model>, DbErr> {
        let mut query = service_fees::Entity::find();
        if let Some(service_id) = service_id {
            query = query.filter(service_fees::Column::ServiceId.eq(service_id));
        }
        query
            .order_by_asc(service_fees::Column::Id)
            .all(&self.db)
            .await
    }

    /// Creates a bracket.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateServiceFeeInput) -> Result<service_fees::Model, DbErr> {
        let now = chrono::Utc::now().into();
        service_fees::ActiveModel {
            service_id: Set(input.service_id),
            min_amount: Set(input.min_amount),
            max_amount: Set(input.max_amount),
            fee: Set(input.fee),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Applies an update to a loaded bracket.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        bracket: service_fees::Model,
        input: UpdateServiceFeeInput,
    ) -> Result<service_fees::Model, DbErr> {
        let mut active: service_fees::ActiveModel = bracket.into();
        if let Some(service_id) = input.service_id {
            active.service_id = Set(service_id);
        }
        if let Some(min) = input.min_amount {
            active.min_amount = Set(min);
        }
        if let Some(max) = input.max_amount {
            active.max_amount = Set(max);
        }
        if let Some(fee) = input.fee {
            active.fee = Set(fee);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await
    }

    /// Deletes a bracket. Returns false when no row matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: i64) -> Result<bool, DbErr> {
        let result = service_fees::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

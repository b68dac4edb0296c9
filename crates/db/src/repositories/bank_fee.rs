//! Bank fee repository.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::is_unique_violation;
use crate::entities::bank_fees;

/// Error types for bank fee operations.
#[derive(Debug, thiserror::Error)]
pub enum BankFeeError {
    /// The (EDC machine, service) pair already has a fee.
    #[error("Bank fee untuk EDC dan service ini sudah ada")]
    AlreadyExists,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Bank fee repository.
#[derive(Debug, Clone)]
pub struct BankFeeRepository {
    db: DatabaseConnection,
}

impl BankFeeRepository {
    /// Creates a new bank fee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a bank fee by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<bank_fees::Model>, DbErr> {
        bank_fees::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds the fee of an (EDC machine, service) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_pair(
        &self,
        edc_machine_id: i64,
        service_id: i64,
    ) -> Result<Option<bank_fees::Model>, DbErr> {
        bank_fees::Entity::find()
            .filter(bank_fees::Column::EdcMachineId.eq(edc_machine_id))
            .filter(bank_fees::Column::ServiceId.eq(service_id))
            .one(&self.db)
            .await
    }

    /// Lists bank fees, optionally for one machine, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, edc_machine_id: Option<i64>) -> Result<Vec<bank_fees::Model>, DbErr> {
        let mut query = bank_fees::Entity::find();
        if let Some(edc_id) = edc_machine_id {
            query = query.filter(bank_fees::Column::EdcMachineId.eq(edc_id));
        }
        query.order_by_asc(bank_fees::Column::Id).all(&self.db).await
    }

    /// Creates a bank fee.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` when the pair is taken or a database error.
    pub async fn create(
        &self,
        edc_machine_id: i64,
        service_id: i64,
        fee: Decimal,
    ) -> Result<bank_fees::Model, BankFeeError> {
        if self.find_pair(edc_machine_id, service_id).await?.is_some() {
            return Err(BankFeeError::AlreadyExists);
        }

        let now = chrono::Utc::now().into();
        bank_fees::ActiveModel {
            edc_machine_id: Set(edc_machine_id),
            service_id: Set(service_id),
            fee: Set(fee),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                BankFeeError::AlreadyExists
            } else {
                BankFeeError::Database(e)
            }
        })
    }

    /// Changes the fee of a loaded row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_fee(
        &self,
        row: bank_fees::Model,
        fee: Decimal,
    ) -> Result<bank_fees::Model, DbErr> {
        let mut active: bank_fees::ActiveModel = row.into();
        active.fee = Set(fee);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await
    }

    /// Deletes a bank fee. Returns false when no row matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: i64) -> Result<bool, DbErr> {
        let result = bank_fees::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

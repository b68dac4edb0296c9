//! Service catalogue repository.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::is_unique_violation;
use crate::entities::services;

/// Error types for service operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Name already used.
    #[error("Service dengan nama tersebut sudah ada")]
    NameExists,

    /// Service not found.
    #[error("Service not found: {0}")]
    NotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

fn map_write_err(err: DbErr) -> ServiceError {
    if is_unique_violation(&err) {
        ServiceError::NameExists
    } else {
        ServiceError::Database(err)
    }
}

/// Input for creating a service.
#[derive(Debug, Clone)]
pub struct CreateServiceInput {
    /// Unique name.
    pub name: String,
    /// Whether a target number is needed.
    pub requires_target: bool,
    /// Free-text category.
    pub category: Option<String>,
    /// Description.
    pub description: Option<String>,
}

/// Input for updating a service.
#[derive(Debug, Clone, Default)]
pub struct UpdateServiceInput {
    /// New name.
    pub name: Option<String>,
    /// New flag.
    pub requires_target: Option<bool>,
    /// New category; `Some(None)` clears it.
    pub category: Option<Option<String>>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
}

/// Service repository.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    db: DatabaseConnection,
}

impl ServiceRepository {
    /// Creates a new service repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a service by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<services::Model>, DbErr> {
        services::Entity::find_by_id(id).one(&self.db).await
    }

    /// Loads services by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_many(&self, ids: Vec<i64>) -> Result<HashMap<i64, services::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = services::Entity::find()
            .filter(services::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|s| (s.id, s)).collect())
    }

    /// Lists all services ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<services::Model>, DbErr> {
        services::Entity::find()
            .order_by_asc(services::Column::Id)
            .all(&self.db)
            .await
    }

    /// Returns true when a service other than `except_id` is called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn name_exists(&self, name: &str, except_id: Option<i64>) -> Result<bool, DbErr> {
        let mut query = services::Entity::find().filter(services::Column::Name.eq(name));
        if let Some(id) = except_id {
            query = query.filter(services::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    /// Creates a service.
    ///
    /// # Errors
    ///
    /// Returns `NameExists` on a duplicate name or a database error.
    pub async fn create(&self, input: CreateServiceInput) -> Result<services::Model, ServiceError> {
        let now = chrono::Utc::now().into();
        services::ActiveModel {
            name: Set(input.name),
            requires_target: Set(input.requires_target),
            category: Set(input.category),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_write_err)
    }

    /// Updates a service.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `NameExists` or a database error.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateServiceInput,
    ) -> Result<services::Model, ServiceError> {
        let service = self
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        let mut active: services::ActiveModel = service.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(flag) = input.requires_target {
            active.requires_target = Set(flag);
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map_err(map_write_err)
    }

    /// Deletes a service. Returns false when no row matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: i64) -> Result<bool, DbErr> {
        let result = services::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

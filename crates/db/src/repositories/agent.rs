//! Agent profile repository.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::agent_profiles;

/// Error types for agent operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Agent not found.
    #[error("Agent not found: {0}")]
    NotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an agent.
#[derive(Debug, Clone)]
pub struct CreateAgentInput {
    /// User the agent belongs to.
    pub user_id: i64,
    /// Owner who created it.
    pub owner_id: Option<i64>,
    /// Display name.
    pub agent_name: String,
    /// Address.
    pub address: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Logo URL or path.
    pub logo: Option<String>,
}

/// Input for updating an agent.
///
/// The outer `Option` means "leave unchanged"; `Some(None)` clears the field.
#[derive(Debug, Clone, Default)]
pub struct UpdateAgentInput {
    /// New name.
    pub agent_name: Option<String>,
    /// New address.
    pub address: Option<Option<String>>,
    /// New phone.
    pub phone: Option<Option<String>>,
    /// New logo.
    pub logo: Option<Option<String>>,
}

/// Agent profile repository.
#[derive(Debug, Clone)]
pub struct AgentRepository {
    db: DatabaseConnection,
}

impl AgentRepository {
    /// Creates a new agent repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an agent by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<agent_profiles::Model>, DbErr> {
        agent_profiles::Entity::find_by_id(id).one(&self.db).await
    }

    /// Loads agents by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_many(
        &self,
        ids: Vec<i64>,
    ) -> Result<HashMap<i64, agent_profiles::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = agent_profiles::Entity::find()
            .filter(agent_profiles::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|a| (a.id, a)).collect())
    }

    /// Lists the agents of a user, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<agent_profiles::Model>, DbErr> {
        agent_profiles::Entity::find()
            .filter(agent_profiles::Column::UserId.eq(user_id))
            .order_by_asc(agent_profiles::Column::Id)
            .all(&self.db)
            .await
    }

    /// Returns true when the owner already has an agent called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn name_exists_for_owner(
        &self,
        owner_id: i64,
        name: &str,
        except_id: Option<i64>,
    ) -> Result<bool, DbErr> {
        let mut query = agent_profiles::Entity::find()
            .filter(agent_profiles::Column::OwnerId.eq(owner_id))
            .filter(agent_profiles::Column::AgentName.eq(name));
        if let Some(id) = except_id {
            query = query.filter(agent_profiles::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    /// Creates an agent with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateAgentInput) -> Result<agent_profiles::Model, DbErr> {
        let now = chrono::Utc::now().into();
        agent_profiles::ActiveModel {
            user_id: Set(input.user_id),
            owner_id: Set(input.owner_id),
            agent_name: Set(input.agent_name),
            address: Set(input.address),
            phone: Set(input.phone),
            total_balance: Set(Decimal::ZERO),
            logo: Set(input.logo),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Updates an agent's descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateAgentInput,
    ) -> Result<agent_profiles::Model, AgentError> {
        let agent = self.find_by_id(id).await?.ok_or(AgentError::NotFound(id))?;

        let mut active: agent_profiles::ActiveModel = agent.into();
        if let Some(name) = input.agent_name {
            active.agent_name = Set(name);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(logo) = input.logo {
            active.logo = Set(logo);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an agent. Returns false when no row matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: i64) -> Result<bool, DbErr> {
        let result = agent_profiles::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

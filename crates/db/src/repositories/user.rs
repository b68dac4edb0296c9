//! User repository for database operations.

use std::collections::HashMap;

use brilink_core::auth::{AccountStatus, UserRole};
use brilink_shared::types::PageRequest;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::is_unique_violation;
use crate::entities::{agent_profiles, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email already registered.
    #[error("Email sudah terdaftar")]
    EmailExists,

    /// User not found.
    #[error("User not found: {0}")]
    NotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

fn map_insert_err(err: DbErr) -> UserError {
    if is_unique_violation(&err) {
        UserError::EmailExists
    } else {
        UserError::Database(err)
    }
}

/// Input for creating a cashier account.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Display name.
    pub name: String,
    /// Lower-cased email.
    pub email: String,
    /// Argon2 PHC hash.
    pub password_hash: String,
    /// Role.
    pub role: UserRole,
    /// Agent the account works for.
    pub agent_profile_id: Option<i64>,
}

/// Input for updating a user. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// New name.
    pub name: Option<String>,
    /// New lower-cased email.
    pub email: Option<String>,
    /// New password hash.
    pub password_hash: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
    /// New status.
    pub status: Option<AccountStatus>,
}

/// Filter options for listing users.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Exact role.
    pub role: Option<String>,
    /// Exact status.
    pub status: Option<String>,
}

/// A user with the agent it is linked to.
#[derive(Debug, Clone)]
pub struct UserWithAgent {
    /// The user record.
    pub user: users::Model,
    /// Linked agent, if any.
    pub agent: Option<agent_profiles::Model>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Loads users by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_many(&self, ids: Vec<i64>) -> Result<HashMap<i64, users::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = users::Entity::find()
            .filter(users::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|u| (u.id, u)).collect())
    }

    /// Returns true when another user already uses `email`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_taken(&self, email: &str, except_id: Option<i64>) -> Result<bool, DbErr> {
        let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
        if let Some(id) = except_id {
            query = query.filter(users::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    /// Creates a user that does not need its own agent.
    ///
    /// # Errors
    ///
    /// Returns `EmailExists` on a duplicate email or a database error.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            password: Set(input.password_hash),
            role: Set(input.role.as_str().to_string()),
            status: Set(AccountStatus::Active.as_str().to_string()),
            agent_profile_id: Set(input.agent_profile_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user.insert(&self.db).await.map_err(map_insert_err)
    }

    /// Registers an owner together with an agent named `"<name> Agent"`.
    ///
    /// Both rows are written in one database transaction and linked to each
    /// other.
    ///
    /// # Errors
    ///
    /// Returns `EmailExists` on a duplicate email or a database error.
    pub async fn register_owner(
        &self,
        name: String,
        email: String,
        password_hash: String,
    ) -> Result<(users::Model, agent_profiles::Model), UserError> {
        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().into();

        let user = users::ActiveModel {
            name: Set(name),
            email: Set(email),
            password: Set(password_hash),
            role: Set(UserRole::Owner.as_str().to_string()),
            status: Set(AccountStatus::Active.as_str().to_string()),
            agent_profile_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(map_insert_err)?;

        let agent = agent_profiles::ActiveModel {
            user_id: Set(user.id),
            owner_id: Set(Some(user.id)),
            agent_name: Set(format!("{} Agent", user.name)),
            address: Set(None),
            phone: Set(None),
            total_balance: Set(Decimal::ZERO),
            logo: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut linked: users::ActiveModel = user.into();
        linked.agent_profile_id = Set(Some(agent.id));
        let user = linked.update(&txn).await?;

        txn.commit().await?;

        Ok((user, agent))
    }

    /// Lists users with their agents, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> Result<(Vec<UserWithAgent>, u64), DbErr> {
        let mut query = users::Entity::find();
        if let Some(role) = &filter.role {
            query = query.filter(users::Column::Role.eq(role.as_str()));
        }
        if let Some(status) = &filter.status {
            query = query.filter(users::Column::Status.eq(status.as_str()));
        }

        let total = query.clone().count(&self.db).await?;
        let users = query
            .order_by_asc(users::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let agent_ids: Vec<i64> = users.iter().filter_map(|u| u.agent_profile_id).collect();
        let agents: HashMap<i64, agent_profiles::Model> = if agent_ids.is_empty() {
            HashMap::new()
        } else {
            agent_profiles::Entity::find()
                .filter(agent_profiles::Column::Id.is_in(agent_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|a| (a.id, a))
                .collect()
        };

        let rows = users
            .into_iter()
            .map(|user| {
                let agent = user.agent_profile_id.and_then(|id| agents.get(&id).cloned());
                UserWithAgent { user, agent }
            })
            .collect();

        Ok((rows, total))
    }

    /// Updates a user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `EmailExists` or a database error.
    pub async fn update(&self, id: i64, input: UpdateUserInput) -> Result<users::Model, UserError> {
        let user = self.find_by_id(id).await?.ok_or(UserError::NotFound(id))?;

        let mut active: users::ActiveModel = user.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(hash) = input.password_hash {
            active.password = Set(hash);
        }
        if let Some(role) = input.role {
            active.role = Set(role.as_str().to_string());
        }
        if let Some(status) = input.status {
            active.status = Set(status.as_str().to_string());
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map_err(map_insert_err)
    }

    /// Hard-deletes a user. Returns false when no row matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: i64) -> Result<bool, DbErr> {
        let result = users::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Counts users with the kasir role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_kasir(&self) -> Result<u64, DbErr> {
        users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Kasir.as_str()))
            .count(&self.db)
            .await
    }
}

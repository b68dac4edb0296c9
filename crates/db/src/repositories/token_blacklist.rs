//! Revoked-token repository.
//!
//! Tokens are stored as SHA-256 hex digests, never in clear.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};

use super::is_unique_violation;
use crate::entities::token_blacklist;

/// Result of a revocation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeOutcome {
    /// The token is now revoked.
    Revoked,
    /// The token was revoked before.
    AlreadyRevoked,
}

/// Token blacklist repository.
#[derive(Debug, Clone)]
pub struct TokenBlacklistRepository {
    db: DatabaseConnection,
}

impl TokenBlacklistRepository {
    /// Creates a new token blacklist repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hashes a token for storage.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Returns true when the token has been revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_revoked(&self, token: &str) -> Result<bool, DbErr> {
        let row = token_blacklist::Entity::find()
            .filter(token_blacklist::Column::Token.eq(Self::hash_token(token)))
            .one(&self.db)
            .await?;
        Ok(row.is_some())
    }

    /// Revokes a token until `expires_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails for a reason other than
    /// a duplicate token.
    pub async fn revoke(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<RevokeOutcome, DbErr> {
        if self.is_revoked(token).await? {
            return Ok(RevokeOutcome::AlreadyRevoked);
        }

        let row = token_blacklist::ActiveModel {
            token: Set(Self::hash_token(token)),
            user_id: Set(user_id),
            blacklisted_at: Set(Utc::now().into()),
            expires_at: Set(expires_at.into()),
            ..Default::default()
        };

        match row.insert(&self.db).await {
            Ok(_) => Ok(RevokeOutcome::Revoked),
            Err(e) if is_unique_violation(&e) => Ok(RevokeOutcome::AlreadyRevoked),
            Err(e) => Err(e),
        }
    }

    /// Deletes revocations whose token has expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn cleanup_expired(&self) -> Result<u64, DbErr> {
        let result = token_blacklist::Entity::delete_many()
            .filter(token_blacklist::Column::ExpiresAt.lt(Utc::now()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

//! Authentication, password hashing and account rules.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Credential validation for registration and user updates
//! - User role and status definitions

mod password;
mod validation;

pub use password::{PasswordError, hash_password, verify_password};
pub use validation::{
    CredentialError, normalize_email, validate_email, validate_name, validate_password,
};

use serde::{Deserialize, Serialize};

/// User roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Runs an agent, manages reference data and users.
    Owner,
    /// Cashier working for an owner's agent.
    Kasir,
}

impl UserRole {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Kasir => "kasir",
        }
    }

    /// Returns true if this role can manage users and reference data.
    #[must_use]
    pub const fn is_owner(&self) -> bool {
        matches!(self, Self::Owner)
    }

    /// Parses an optional role, defaulting to owner when absent.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::InvalidRole` for anything but owner or kasir.
    pub fn parse_or_default(raw: Option<&str>) -> Result<Self, CredentialError> {
        raw.map_or(Ok(Self::Owner), str::parse)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "kasir" => Ok(Self::Kasir),
            _ => Err(CredentialError::InvalidRole),
        }
    }
}

/// Account status for users and EDC machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Usable.
    Active,
    /// Disabled.
    Inactive,
}

impl AccountStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(CredentialError::InvalidStatus),
        }
    }
}

//! Credential validation for registration and user updates.

use thiserror::Error;
use validator::ValidateEmail;

/// Minimum display name length after trimming.
pub const MIN_NAME_LEN: usize = 3;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Credential validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// Name shorter than the minimum.
    #[error("Nama minimal 3 karakter")]
    InvalidName,

    /// Email does not look like `local@domain.tld`.
    #[error("Email format tidak valid")]
    InvalidEmail,

    /// Password shorter than the minimum.
    #[error("Password minimal 8 karakter")]
    WeakPassword,

    /// Role is neither owner nor kasir.
    #[error("Role harus salah satu dari: owner, kasir")]
    InvalidRole,

    /// Status is neither active nor inactive.
    #[error("Status harus salah satu dari: active, inactive")]
    InvalidStatus,
}

impl CredentialError {
    /// Wire error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidName => "INVALID_NAME",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::InvalidRole => "INVALID_ROLE",
            Self::InvalidStatus => "INVALID_STATUS",
        }
    }
}

/// Trims a display name and checks its length.
///
/// # Errors
///
/// Returns `CredentialError::InvalidName` if fewer than 3 characters remain.
pub fn validate_name(name: &str) -> Result<String, CredentialError> {
    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(CredentialError::InvalidName);
    }
    Ok(trimmed.to_string())
}

/// Trims and lower-cases an email.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalises an email and checks its format.
///
/// The domain must contain a dot and end in an alphabetic TLD of at least two
/// letters.
///
/// # Errors
///
/// Returns `CredentialError::InvalidEmail` if the format is wrong.
pub fn validate_email(email: &str) -> Result<String, CredentialError> {
    let email = normalize_email(email);
    if !email.validate_email() {
        return Err(CredentialError::InvalidEmail);
    }

    let tld_ok = email
        .rsplit_once('@')
        .and_then(|(_, domain)| domain.rsplit_once('.'))
        .is_some_and(|(host, tld)| {
            !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        });
    if !tld_ok {
        return Err(CredentialError::InvalidEmail);
    }

    Ok(email)
}

/// Checks the password length.
///
/// # Errors
///
/// Returns `CredentialError::WeakPassword` if shorter than 8 characters.
pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CredentialError::WeakPassword);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("  Budi  ", Ok("Budi".to_string()))]
    #[case("Al", Err(CredentialError::InvalidName))]
    #[case("   ", Err(CredentialError::InvalidName))]
    fn test_validate_name(#[case] input: &str, #[case] expected: Result<String, CredentialError>) {
        assert_eq!(validate_name(input), expected);
    }

    #[rstest]
    #[case("Owner@Brilink.ID", true)]
    #[case("kasir.satu@mail.co", true)]
    #[case("no-at-sign.com", false)]
    #[case("user@localhost", false)]
    #[case("user@domain.c", false)]
    #[case("user@domain.c0m", false)]
    #[case("", false)]
    fn test_validate_email(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(validate_email(input).is_ok(), valid, "{input}");
    }

    #[test]
    fn test_validate_email_lowercases() {
        assert_eq!(validate_email(" Owner@Brilink.ID ").unwrap(), "owner@brilink.id");
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("12345678").is_ok());
        assert_eq!(validate_password("1234567"), Err(CredentialError::WeakPassword));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CredentialError::WeakPassword.code(), "WEAK_PASSWORD");
        assert_eq!(CredentialError::InvalidEmail.to_string(), "Email format tidak valid");
    }
}

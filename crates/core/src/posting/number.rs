//! Transaction numbers.

use uuid::Uuid;

/// Prefix of every transaction number.
pub const TRANSACTION_PREFIX: &str = "TRX-";

/// Generates `TRX-` followed by 12 upper-case hex characters of a v4 UUID.
#[must_use]
pub fn generate_transaction_number() -> String {
    let hex: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(12)
        .collect();
    format!("{TRANSACTION_PREFIX}{}", hex.to_uppercase())
}

//! Service categories.

use serde::Serialize;

/// How a service moves money between the EDC float and the agent's cash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ServiceCategory {
    /// Customer sends money out through the EDC; the agent receives cash.
    Transfer,
    /// Customer withdraws cash from the agent; the EDC float is credited.
    CashWithdrawal,
    /// Any other service. No balance changes.
    Other(String),
}

impl ServiceCategory {
    /// Resolves the free-text category of a service.
    ///
    /// Matching is a case-insensitive substring test on the trimmed text.
    /// "tarik tunai" wins over "transfer" when both appear.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Other(String::new());
        };

        let normalized = raw.trim().to_lowercase();
        if normalized.contains("tarik tunai") {
            Self::CashWithdrawal
        } else if normalized.contains("transfer") {
            Self::Transfer
        } else {
            Self::Other(raw.trim().to_string())
        }
    }

    /// Returns true for transfer services.
    #[must_use]
    pub const fn is_transfer(&self) -> bool {
        matches!(self, Self::Transfer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("transfer"), ServiceCategory::Transfer)]
    #[case(Some("  Transfer Antar Bank "), ServiceCategory::Transfer)]
    #[case(Some("TARIK TUNAI"), ServiceCategory::CashWithdrawal)]
    #[case(Some("tarik tunai via transfer"), ServiceCategory::CashWithdrawal)]
    #[case(Some(" Pembayaran "), ServiceCategory::Other("Pembayaran".into()))]
    #[case(None, ServiceCategory::Other(String::new()))]
    fn test_parse(#[case] raw: Option<&str>, #[case] expected: ServiceCategory) {
        assert_eq!(ServiceCategory::parse(raw), expected);
    }
}

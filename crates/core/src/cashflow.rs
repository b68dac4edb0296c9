//! Cash-flow entry kinds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction of a cash-flow entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowType {
    /// Cash received into the agent float.
    CashIn,
    /// Cash paid out of the agent float.
    CashOut,
}

/// Unknown cash-flow type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Type harus salah satu dari: cash_in, cash_out")]
pub struct InvalidCashFlowType;

impl CashFlowType {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CashIn => "cash_in",
            Self::CashOut => "cash_out",
        }
    }
}

impl std::fmt::Display for CashFlowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CashFlowType {
    type Err = InvalidCashFlowType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash_in" => Ok(Self::CashIn),
            "cash_out" => Ok(Self::CashOut),
            _ => Err(InvalidCashFlowType),
        }
    }
}

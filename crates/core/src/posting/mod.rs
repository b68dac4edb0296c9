//! Transaction posting rules.
//!
//! Everything needed to post a transaction that does not touch the database:
//! - Service category resolution
//! - Fee bracket matching and the derived totals
//! - Balance sufficiency checks and the ledger plan
//! - Transaction numbers

mod category;
mod error;
mod explain;
mod fees;
mod number;
mod plan;

#[cfg(test)]
mod fees_props;
#[cfg(test)]
mod plan_props;

pub use category::ServiceCategory;
pub use error::PostingError;
pub use explain::{CalculationDetails, FeeCalculation};
pub use fees::{FeeBracket, FeeBreakdown, resolve_bracket_fee};
pub use number::generate_transaction_number;
pub use plan::{
    AgentChange, FloatChange, LedgerPlan, PlannedCashFlow, PostingAmounts, PostingContext,
    check_sufficiency, parse_posting_amounts, plan_ledger,
};

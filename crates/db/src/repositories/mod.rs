//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod agent;
pub mod bank_fee;
pub mod cash_flow;
pub mod edc_machine;
pub mod fee_resolver;
pub mod report;
pub mod service;
pub mod service_fee;
pub mod token_blacklist;
pub mod transaction;
pub mod user;

pub use agent::{AgentError, AgentRepository, CreateAgentInput, UpdateAgentInput};
pub use bank_fee::{BankFeeError, BankFeeRepository};
pub use cash_flow::{CashFlowFilter, CashFlowRepository, CreateCashFlowInput, UpdateCashFlowInput};
pub use edc_machine::{
    CreateEdcMachineInput, EdcMachineError, EdcMachineRepository, ResetSummary,
    UpdateEdcMachineInput,
};
pub use fee_resolver::FeeResolver;
pub use report::{ReportRepository, to_facts, transfer_sum};
pub use service::{CreateServiceInput, ServiceError, ServiceRepository, UpdateServiceInput};
pub use service_fee::{CreateServiceFeeInput, ServiceFeeRepository, UpdateServiceFeeInput};
pub use token_blacklist::{RevokeOutcome, TokenBlacklistRepository};
pub use transaction::{NewTransaction, PostingRepoError, TransactionRefs, TransactionRepository};
pub use user::{CreateUserInput, UpdateUserInput, UserError, UserFilter, UserRepository, UserWithAgent};

use sea_orm::{DbErr, SqlErr};

/// Returns true when `err` is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

//! Entity prelude.

pub use super::agent_profiles::Entity as AgentProfiles;
pub use super::bank_fees::Entity as BankFees;
pub use super::cash_flows::Entity as CashFlows;
pub use super::edc_machines::Entity as EdcMachines;
pub use super::service_fees::Entity as ServiceFees;
pub use super::services::Entity as Services;
pub use super::token_blacklist::Entity as TokenBlacklist;
pub use super::transactions::Entity as Transactions;
pub use super::users::Entity as Users;

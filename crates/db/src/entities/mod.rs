//! `SeaORM` entity definitions.

pub mod prelude;

pub mod agent_profiles;
pub mod bank_fees;
pub mod cash_flows;
pub mod edc_machines;
pub mod service_fees;
pub mod services;
pub mod token_blacklist;
pub mod transactions;
pub mod users;

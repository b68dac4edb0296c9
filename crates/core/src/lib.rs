//! Core business logic for Brilink.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Roles, account status, credential validation and password hashing
//! - `cashflow` - Cash-in / cash-out flow types
//! - `posting` - Fee brackets, service categories and the ledger plan for a transaction
//! - `reports` - Report periods, aggregation and the daily PDF

pub mod auth;
pub mod cashflow;
pub mod posting;
pub mod reports;

//! Common types used across the application.

pub mod money;
pub mod pagination;

pub use money::{MONEY_SCALE, format_rupiah, parse_amount, to_money_scale};
pub use pagination::{PageMeta, PageRequest, Pagination};

//! Reporting: periods, aggregation and the daily PDF.
//!
//! This module provides pure business logic for:
//! - Resolving named periods into time-zone aware date ranges
//! - Period reports and dashboard series
//! - Rendering the daily transaction report as a PDF

pub mod error;
pub mod pdf;
pub mod period;
pub mod service;
pub mod types;


pub use error::{PeriodError, ReportRenderError};
pub use pdf::{DailyReport, DailyReportRow, render_daily_report};
pub use period::{
    DATE_FORMAT, DateRange, ReportPeriod, ResolvedPeriod, dashboard_range, local_date,
    parse_date, parse_timezone, resolve_report_period, single_day, today_in,
};
pub use service::{ReportService, TOP_SERVICES};
pub use types::*;

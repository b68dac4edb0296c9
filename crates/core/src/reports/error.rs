//! Report error types.

use thiserror::Error;

/// Errors resolving a reporting period or date filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Custom period without usable start and end dates.
    #[error(
        "Parameter periode tidak valid. Gunakan period=custom dengan start_date dan end_date, atau period=daily/weekly/monthly/yearly"
    )]
    InvalidPeriod,

    /// A date that is not `YYYY-MM-DD`.
    #[error("Format date tidak valid. Gunakan YYYY-MM-DD")]
    InvalidDateFormat,

    /// A trailing day count reaching before the earliest representable date.
    #[error("days terlalu besar")]
    DaysOutOfRange,

    /// Configured time zone is not an IANA name.
    #[error("Unknown time zone: {0}")]
    UnknownTimezone(String),
}

impl PeriodError {
    /// Wire error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidPeriod => "INVALID_PERIOD",
            Self::InvalidDateFormat => "INVALID_DATE_FORMAT",
            Self::DaysOutOfRange => "INVALID_INPUT",
            Self::UnknownTimezone(_) => "INTERNAL_ERROR",
        }
    }
}

/// Errors rendering a PDF report.
#[derive(Debug, Error)]
pub enum ReportRenderError {
    /// The PDF library failed.
    #[error("failed to render PDF: {0}")]
    Pdf(String),
}

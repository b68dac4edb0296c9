//! Reporting periods and time-zone aware date ranges.
//!
//! Dates are calendar days in the configured zone. A range of days maps to a
//! half-open UTC interval `[first midnight, midnight after the last day)`.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use super::error::PeriodError;

/// Wire format of dates in query strings and responses.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Named reporting periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// Today.
    Daily,
    /// Monday to Sunday of the current week.
    Weekly,
    /// The current calendar month.
    Monthly,
    /// The current calendar year.
    Yearly,
    /// Explicit `start_date` to `end_date`.
    Custom,
}

impl ReportPeriod {
    /// Parses the `period` query value. Absent or unknown values mean monthly.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("daily") => Self::Daily,
            Some("weekly") => Self::Weekly,
            Some("yearly") => Self::Yearly,
            Some("custom") => Self::Custom,
            _ => Self::Monthly,
        }
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day.
    pub start: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A single day.
    #[must_use]
    pub const fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// Number of days covered, counting both ends. Zero for an inverted range.
    #[must_use]
    pub fn day_count(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(0)
    }

    /// Iterates every day in the range.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// Half-open UTC interval covering the range in `tz`.
    #[must_use]
    pub fn utc_bounds(&self, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        let after_end = self.end.checked_add_days(Days::new(1)).unwrap_or(self.end);
        (local_midnight(tz, self.start), local_midnight(tz, after_end))
    }

    /// `start` formatted as `YYYY-MM-DD`.
    #[must_use]
    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// `end` formatted as `YYYY-MM-DD`.
    #[must_use]
    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

/// A period with its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPeriod {
    /// e.g. `Bulanan - January 2026`.
    pub name: String,
    /// Days covered.
    pub range: DateRange,
}

/// Parses an IANA time zone name.
///
/// # Errors
///
/// Returns `PeriodError::UnknownTimezone` for unknown names.
pub fn parse_timezone(name: &str) -> Result<Tz, PeriodError> {
    name.parse::<Tz>()
        .map_err(|_| PeriodError::UnknownTimezone(name.to_string()))
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `PeriodError::InvalidDateFormat` for anything else.
pub fn parse_date(raw: &str) -> Result<NaiveDate, PeriodError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| PeriodError::InvalidDateFormat)
}

/// Today's date in `tz`.
#[must_use]
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Calendar date of an instant in `tz`.
#[must_use]
pub fn local_date(ts: DateTime<Utc>, tz: Tz) -> NaiveDate {
    ts.with_timezone(&tz).date_naive()
}

/// The UTC instant of local midnight starting `day` in `tz`.
#[must_use]
pub fn local_midnight(tz: Tz, day: NaiveDate) -> DateTime<Utc> {
    let naive = day.and_time(chrono::NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map_or_else(|| naive.and_utc(), |dt| dt.with_timezone(&Utc))
}

/// Resolves a report period relative to `today`.
///
/// # Errors
///
/// Returns `PeriodError::InvalidPeriod` when a custom period lacks dates, has
/// a malformed date, or ends before it starts.
pub fn resolve_report_period(
    period: ReportPeriod,
    today: NaiveDate,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<ResolvedPeriod, PeriodError> {
    let resolved = match period {
        ReportPeriod::Daily => ResolvedPeriod {
            name: format!("Harian - {}", today.format("%d %B %Y")),
            range: DateRange::single(today),
        },
        ReportPeriod::Weekly => {
            let monday = today
                .checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_monday())))
                .unwrap_or(today);
            let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(monday);
            ResolvedPeriod {
                name: format!(
                    "Mingguan - {} sampai {}",
                    monday.format("%d %b"),
                    sunday.format("%d %b %Y")
                ),
                range: DateRange::new(monday, sunday),
            }
        }
        ReportPeriod::Monthly => {
            let first = today.with_day(1).unwrap_or(today);
            let last = first
                .checked_add_months(chrono::Months::new(1))
                .and_then(|next| next.pred_opt())
                .unwrap_or(today);
            ResolvedPeriod {
                name: format!("Bulanan - {}", first.format("%B %Y")),
                range: DateRange::new(first, last),
            }
        }
        ReportPeriod::Yearly => {
            let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
            let last = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
            ResolvedPeriod {
                name: format!("Tahunan - {}", today.year()),
                range: DateRange::new(first, last),
            }
        }
        ReportPeriod::Custom => {
            let (Some(start), Some(end)) = (start_date, end_date) else {
                return Err(PeriodError::InvalidPeriod);
            };
            let start = parse_date(start).map_err(|_| PeriodError::InvalidPeriod)?;
            let end = parse_date(end).map_err(|_| PeriodError::InvalidPeriod)?;
            if end < start {
                return Err(PeriodError::InvalidPeriod);
            }
            ResolvedPeriod {
                name: format!(
                    "Custom - {} sampai {}",
                    start.format("%d %b %Y"),
                    end.format("%d %b %Y")
                ),
                range: DateRange::new(start, end),
            }
        }
    };
    Ok(resolved)
}

/// Resolves the dashboard range: explicit dates when both are given, otherwise
/// the trailing `days` (default 7, at least 1) ending today.
///
/// # Errors
///
/// Returns `PeriodError::InvalidDateFormat` for a malformed date, or
/// `PeriodError::DaysOutOfRange` when `days` reaches past the calendar.
pub fn dashboard_range(
    today: NaiveDate,
    days: Option<i64>,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<DateRange, PeriodError> {
    if let (Some(start), Some(end)) = (start_date, end_date) {
        return Ok(DateRange::new(parse_date(start)?, parse_date(end)?));
    }

    let days = u64::try_from(days.unwrap_or(7).max(1)).unwrap_or(1);
    let start = today
        .checked_sub_days(Days::new(days - 1))
        .ok_or(PeriodError::DaysOutOfRange)?;
    Ok(DateRange::new(start, today))
}

/// Resolves a single day: `date`, else `start_date`, else today.
///
/// # Errors
///
/// Returns `PeriodError::InvalidDateFormat` for a malformed date.
pub fn single_day(
    today: NaiveDate,
    date: Option<&str>,
    start_date: Option<&str>,
) -> Result<DateRange, PeriodError> {
    match date.filter(|d| !d.is_empty()).or(start_date.filter(|d| !d.is_empty())) {
        Some(raw) => Ok(DateRange::single(parse_date(raw)?)),
        None => Ok(DateRange::single(today)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(None, ReportPeriod::Monthly)]
    #[case(Some("daily"), ReportPeriod::Daily)]
    #[case(Some("WEEKLY"), ReportPeriod::Weekly)]
    #[case(Some("yearly"), ReportPeriod::Yearly)]
    #[case(Some("custom"), ReportPeriod::Custom)]
    #[case(Some("quarterly"), ReportPeriod::Monthly)]
    fn test_parse_period(#[case] raw: Option<&str>, #[case] expected: ReportPeriod) {
        assert_eq!(ReportPeriod::parse(raw), expected);
    }

    #[test]
    fn test_daily() {
        let p = resolve_report_period(ReportPeriod::Daily, ymd(2026, 1, 5), None, None).unwrap();
        assert_eq!(p.name, "Harian - 05 January 2026");
        assert_eq!(p.range.day_count(), 1);
    }

    #[test]
    fn test_weekly_runs_monday_to_sunday() {
        // 2026-01-08 is a Thursday.
        let p = resolve_report_period(ReportPeriod::Weekly, ymd(2026, 1, 8), None, None).unwrap();
        assert_eq!(p.range, DateRange::new(ymd(2026, 1, 5), ymd(2026, 1, 11)));
        assert_eq!(p.name, "Mingguan - 05 Jan sampai 11 Jan 2026");
        assert_eq!(p.range.day_count(), 7);
    }

    #[rstest]
    #[case(ymd(2026, 2, 14), ymd(2026, 2, 1), ymd(2026, 2, 28))]
    #[case(ymd(2024, 2, 29), ymd(2024, 2, 1), ymd(2024, 2, 29))]
    #[case(ymd(2025, 12, 31), ymd(2025, 12, 1), ymd(2025, 12, 31))]
    fn test_monthly(#[case] today: NaiveDate, #[case] start: NaiveDate, #[case] end: NaiveDate) {
        let p = resolve_report_period(ReportPeriod::Monthly, today, None, None).unwrap();
        assert_eq!(p.range, DateRange::new(start, end));
    }

    #[test]
    fn test_monthly_and_yearly_names() {
        let today = ymd(2026, 3, 10);
        let m = resolve_report_period(ReportPeriod::Monthly, today, None, None).unwrap();
        assert_eq!(m.name, "Bulanan - March 2026");
        let y = resolve_report_period(ReportPeriod::Yearly, today, None, None).unwrap();
        assert_eq!(y.name, "Tahunan - 2026");
        assert_eq!(y.range.day_count(), 365);
    }

    #[test]
    fn test_custom() {
        let p = resolve_report_period(
            ReportPeriod::Custom,
            ymd(2026, 1, 1),
            Some("2026-01-01"),
            Some("2026-01-10"),
        )
        .unwrap();
        assert_eq!(p.name, "Custom - 01 Jan 2026 sampai 10 Jan 2026");
        assert_eq!(p.range.day_count(), 10);
    }

    #[rstest]
    #[case(None, Some("2026-01-10"))]
    #[case(Some("2026-01-01"), None)]
    #[case(Some("01/01/2026"), Some("2026-01-10"))]
    #[case(Some("2026-01-10"), Some("2026-01-01"))]
    fn test_custom_invalid(#[case] start: Option<&str>, #[case] end: Option<&str>) {
        assert_eq!(
            resolve_report_period(ReportPeriod::Custom, ymd(2026, 1, 1), start, end),
            Err(PeriodError::InvalidPeriod)
        );
    }

    #[test]
    fn test_dashboard_range() {
        let today = ymd(2026, 1, 10);
        assert_eq!(
            dashboard_range(today, None, None, None).unwrap(),
            DateRange::new(ymd(2026, 1, 4), today)
        );
        assert_eq!(
            dashboard_range(today, Some(0), None, None).unwrap(),
            DateRange::single(today)
        );
        assert_eq!(
            dashboard_range(today, Some(30), Some("2026-01-01"), Some("2026-01-02")).unwrap(),
            DateRange::new(ymd(2026, 1, 1), ymd(2026, 1, 2))
        );
        assert_eq!(
            dashboard_range(today, None, Some("bad"), Some("2026-01-02")),
            Err(PeriodError::InvalidDateFormat)
        );
        // Only one explicit date falls back to `days`.
        assert_eq!(
            dashboard_range(today, Some(2), Some("2026-01-01"), None).unwrap(),
            DateRange::new(ymd(2026, 1, 9), today)
        );
    }

    #[rstest]
    #[case(i64::MAX)]
    #[case(400_000_000)]
    fn test_dashboard_days_past_calendar(#[case] days: i64) {
        assert_eq!(
            dashboard_range(ymd(2026, 1, 10), Some(days), None, None),
            Err(PeriodError::DaysOutOfRange)
        );
    }

    #[test]
    fn test_dashboard_days_reaching_a_century_back() {
        let today = ymd(2026, 1, 10);
        let range = dashboard_range(today, Some(36_525), None, None).unwrap();
        assert_eq!(range.start, ymd(1926, 1, 11));
        assert_eq!(range.end, today);
    }

    #[test]
    fn test_single_day() {
        let today = ymd(2026, 1, 10);
        assert_eq!(single_day(today, None, None).unwrap(), DateRange::single(today));
        assert_eq!(
            single_day(today, None, Some("2026-01-02")).unwrap(),
            DateRange::single(ymd(2026, 1, 2))
        );
        assert_eq!(
            single_day(today, Some("2026-01-03"), Some("2026-01-02")).unwrap(),
            DateRange::single(ymd(2026, 1, 3))
        );
        assert!(single_day(today, Some("x"), None).is_err());
    }

    #[test]
    fn test_utc_bounds_in_jakarta() {
        let tz = parse_timezone("Asia/Jakarta").unwrap();
        let (start, end) = DateRange::single(ymd(2026, 1, 10)).utc_bounds(tz);
        assert_eq!(start.to_rfc3339(), "2026-01-09T17:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-01-10T17:00:00+00:00");
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        let tz = parse_timezone("Asia/Jakarta").unwrap();
        let ts = "2026-01-09T18:30:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(local_date(ts, tz), ymd(2026, 1, 10));
    }

    #[test]
    fn test_days_iterates_inclusive() {
        let range = DateRange::new(ymd(2026, 1, 30), ymd(2026, 2, 2));
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days[3], ymd(2026, 2, 2));
        assert_eq!(DateRange::new(ymd(2026, 1, 2), ymd(2026, 1, 1)).day_count(), 0);
    }

    #[test]
    fn test_unknown_timezone() {
        assert!(matches!(
            parse_timezone("Mars/Base"),
            Err(PeriodError::UnknownTimezone(_))
        ));
    }
}

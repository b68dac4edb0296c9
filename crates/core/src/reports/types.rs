//! Report data types.
//!
//! Money fields are `Decimal` in memory and JSON numbers on the wire.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::cashflow::CashFlowType;

/// One transaction, flattened with the names reports display.
#[derive(Debug, Clone)]
pub struct TransactionFact {
    /// Service id.
    pub service_id: i64,
    /// Service name.
    pub service_name: String,
    /// Free-text service category.
    pub service_category: Option<String>,
    /// EDC machine id.
    pub edc_machine_id: i64,
    /// EDC machine name.
    pub edc_name: String,
    /// Agent id, if attached.
    pub agent_profile_id: Option<i64>,
    /// Agent name, if attached.
    pub agent_name: Option<String>,
    /// Local calendar date of `created_at`.
    pub date: NaiveDate,
    /// Transaction amount.
    pub amount: Decimal,
    /// Service fee.
    pub service_fee: Decimal,
    /// Bank fee.
    pub bank_fee: Decimal,
    /// Extra fee.
    pub extra_fee: Decimal,
    /// Stored net profit.
    pub net_profit: Decimal,
}

/// Sums over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Number of transactions.
    pub count: u64,
    /// Sum of amounts.
    pub amount: Decimal,
    /// Sum of service fees.
    pub service_fee: Decimal,
    /// Sum of bank fees.
    pub bank_fee: Decimal,
    /// Sum of extra fees.
    pub extra_fee: Decimal,
    /// Sum of net profit.
    pub net_profit: Decimal,
}

impl Totals {
    /// Adds one transaction.
    pub fn add(&mut self, fact: &TransactionFact) {
        self.count += 1;
        self.amount += fact.amount;
        self.service_fee += fact.service_fee;
        self.bank_fee += fact.bank_fee;
        self.extra_fee += fact.extra_fee;
        self.net_profit += fact.net_profit;
    }

    /// Service, bank and extra fees together.
    #[must_use]
    pub fn total_fees(&self) -> Decimal {
        self.service_fee + self.bank_fee + self.extra_fee
    }

    /// Mean amount rounded to cents, zero when empty.
    #[must_use]
    pub fn average_amount(&self) -> Decimal {
        if self.count == 0 {
            Decimal::ZERO
        } else {
            (self.amount / Decimal::from(self.count)).round_dp(2)
        }
    }
}

/// Cash-in and cash-out sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CashTotals {
    /// Sum of cash_in entries.
    pub cash_in: Decimal,
    /// Sum of cash_out entries.
    pub cash_out: Decimal,
}

impl CashTotals {
    /// Sums `(type, amount)` pairs.
    pub fn from_entries(entries: impl IntoIterator<Item = (CashFlowType, Decimal)>) -> Self {
        entries
            .into_iter()
            .fold(Self::default(), |mut acc, (flow, amount)| {
                match flow {
                    CashFlowType::CashIn => acc.cash_in += amount,
                    CashFlowType::CashOut => acc.cash_out += amount,
                }
                acc
            })
    }

    /// `cash_in - cash_out`.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.cash_in - self.cash_out
    }
}

/// `period` block of a report.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodInfo {
    /// Display name.
    pub name: String,
    /// First day.
    pub start_date: String,
    /// Last day.
    pub end_date: String,
    /// Inclusive day count.
    pub days: i64,
}

/// `summary` block of a report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    /// Sum of amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    /// Transaction count.
    pub total_transactions: u64,
    /// Mean amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_transaction_amount: Decimal,
    /// All fees.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_fees: Decimal,
    /// Sum of net profit.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_net_profit: Decimal,
    /// Cash received in the period.
    #[serde(with = "rust_decimal::serde::float")]
    pub cash_in: Decimal,
    /// Cash paid out in the period.
    #[serde(with = "rust_decimal::serde::float")]
    pub cash_out: Decimal,
    /// `cash_in - cash_out`.
    #[serde(with = "rust_decimal::serde::float")]
    pub net_cash_flow: Decimal,
}

/// Fee sums by kind.
#[derive(Debug, Clone, Serialize)]
pub struct FeesBreakdown {
    /// Service fees.
    #[serde(with = "rust_decimal::serde::float")]
    pub service_fee: Decimal,
    /// Bank fees.
    #[serde(with = "rust_decimal::serde::float")]
    pub bank_fee: Decimal,
    /// Extra fees.
    #[serde(with = "rust_decimal::serde::float")]
    pub extra_fee: Decimal,
}

impl From<&Totals> for FeesBreakdown {
    fn from(t: &Totals) -> Self {
        Self {
            service_fee: t.service_fee,
            bank_fee: t.bank_fee,
            extra_fee: t.extra_fee,
        }
    }
}

/// Per-service totals.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceBreakdown {
    /// Service id.
    pub service_id: i64,
    /// Service name.
    pub name: String,
    /// Free-text category.
    pub category: Option<String>,
    /// Sum of amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    /// Transaction count.
    pub transaction_count: u64,
    /// Sum of service fees.
    #[serde(with = "rust_decimal::serde::float")]
    pub service_fee_total: Decimal,
    /// Sum of bank fees.
    #[serde(with = "rust_decimal::serde::float")]
    pub bank_fee_total: Decimal,
    /// Sum of net profit.
    #[serde(with = "rust_decimal::serde::float")]
    pub net_profit_total: Decimal,
}

/// One day of a report's daily breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct DailyBreakdown {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Sum of amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    /// Transaction count.
    pub transaction_count: u64,
    /// Sum of net profit.
    #[serde(with = "rust_decimal::serde::float")]
    pub net_profit: Decimal,
}

/// Per-machine totals.
#[derive(Debug, Clone, Serialize)]
pub struct EdcPerformance {
    /// EDC machine id.
    pub edc_id: i64,
    /// Machine name.
    pub name: String,
    /// Sum of amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    /// Transaction count.
    pub transaction_count: u64,
}

/// Per-agent totals.
#[derive(Debug, Clone, Serialize)]
pub struct AgentPerformance {
    /// Agent id.
    pub agent_id: i64,
    /// Agent name.
    pub agent_name: String,
    /// Sum of amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    /// Transaction count.
    pub transaction_count: u64,
}

/// Full period report.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodReport {
    /// Period covered.
    pub period: PeriodInfo,
    /// Headline figures.
    pub summary: ReportSummary,
    /// Fee sums.
    pub fees_breakdown: FeesBreakdown,
    /// By service, revenue descending.
    pub service_breakdown: Vec<ServiceBreakdown>,
    /// By day, zero-filled. Empty for single-day periods.
    pub daily_breakdown: Vec<DailyBreakdown>,
    /// By machine, revenue descending.
    pub edc_performance: Vec<EdcPerformance>,
    /// By agent, revenue descending.
    pub agent_performance: Vec<AgentPerformance>,
}

/// Dashboard service ranking entry.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRank {
    /// Service id.
    pub service_id: i64,
    /// Service name.
    pub name: String,
    /// Sum of amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    /// Transaction count.
    pub count: u64,
}

/// Dashboard trend point.
#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Sum of amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    /// Transaction count.
    pub count: u64,
}

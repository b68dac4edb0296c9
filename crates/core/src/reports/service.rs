//! Report aggregation.
//!
//! Repositories load the rows in range; everything here groups and sums them
//! in `Decimal`.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::period::{DATE_FORMAT, DateRange, ResolvedPeriod};
use super::types::{
    AgentPerformance, CashTotals, DailyBreakdown, EdcPerformance, FeesBreakdown, PeriodInfo,
    PeriodReport, ReportSummary, ServiceBreakdown, ServiceRank, Totals, TransactionFact,
    TrendPoint,
};

/// Number of services in each dashboard ranking.
pub const TOP_SERVICES: usize = 5;

/// Service for building reports and dashboard series.
pub struct ReportService;

impl ReportService {
    /// Sums every fact.
    #[must_use]
    pub fn summarize(facts: &[TransactionFact]) -> Totals {
        facts.iter().fold(Totals::default(), |mut t, f| {
            t.add(f);
            t
        })
    }

    /// Totals per service, revenue descending, ties by id.
    #[must_use]
    pub fn service_breakdown(facts: &[TransactionFact]) -> Vec<ServiceBreakdown> {
        let mut groups: BTreeMap<i64, (&TransactionFact, Totals)> = BTreeMap::new();
        for fact in facts {
            groups
                .entry(fact.service_id)
                .or_insert_with(|| (fact, Totals::default()))
                .1
                .add(fact);
        }

        let mut rows: Vec<ServiceBreakdown> = groups
            .into_values()
            .map(|(first, t)| ServiceBreakdown {
                service_id: first.service_id,
                name: first.service_name.clone(),
                category: first.service_category.clone(),
                revenue: t.amount,
                transaction_count: t.count,
                service_fee_total: t.service_fee,
                bank_fee_total: t.bank_fee,
                net_profit_total: t.net_profit,
            })
            .collect();
        rows.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.service_id.cmp(&b.service_id)));
        rows
    }

    /// Top services by revenue.
    #[must_use]
    pub fn top_services_by_revenue(facts: &[TransactionFact], n: usize) -> Vec<ServiceRank> {
        Self::service_breakdown(facts)
            .into_iter()
            .take(n)
            .map(Self::rank)
            .collect()
    }

    /// Top services by transaction count, ties by revenue then id.
    #[must_use]
    pub fn top_services_by_volume(facts: &[TransactionFact], n: usize) -> Vec<ServiceRank> {
        let mut rows = Self::service_breakdown(facts);
        rows.sort_by(|a, b| {
            b.transaction_count
                .cmp(&a.transaction_count)
                .then(b.revenue.cmp(&a.revenue))
                .then(a.service_id.cmp(&b.service_id))
        });
        rows.into_iter().take(n).map(Self::rank).collect()
    }

    fn rank(row: ServiceBreakdown) -> ServiceRank {
        ServiceRank {
            service_id: row.service_id,
            name: row.name,
            revenue: row.revenue,
            count: row.transaction_count,
        }
    }

    fn per_day(facts: &[TransactionFact], range: &DateRange) -> HashMap<NaiveDate, Totals> {
        let mut days: HashMap<NaiveDate, Totals> = HashMap::new();
        for fact in facts.iter().filter(|f| f.date >= range.start && f.date <= range.end) {
            days.entry(fact.date).or_default().add(fact);
        }
        days
    }

    /// Zero-filled revenue and count for every day in `range`.
    #[must_use]
    pub fn daily_trend(facts: &[TransactionFact], range: &DateRange) -> Vec<TrendPoint> {
        let days = Self::per_day(facts, range);
        range
            .days()
            .map(|d| {
                let t = days.get(&d).copied().unwrap_or_default();
                TrendPoint {
                    date: d.format(DATE_FORMAT).to_string(),
                    revenue: t.amount,
                    count: t.count,
                }
            })
            .collect()
    }

    /// Zero-filled revenue, count and net profit for every day in `range`.
    #[must_use]
    pub fn daily_breakdown(facts: &[TransactionFact], range: &DateRange) -> Vec<DailyBreakdown> {
        let days = Self::per_day(facts, range);
        range
            .days()
            .map(|d| {
                let t = days.get(&d).copied().unwrap_or_default();
                DailyBreakdown {
                    date: d.format(DATE_FORMAT).to_string(),
                    revenue: t.amount,
                    transaction_count: t.count,
                    net_profit: t.net_profit,
                }
            })
            .collect()
    }

    /// Totals per EDC machine, revenue descending.
    #[must_use]
    pub fn edc_performance(facts: &[TransactionFact]) -> Vec<EdcPerformance> {
        let mut groups: BTreeMap<i64, (String, Totals)> = BTreeMap::new();
        for fact in facts {
            groups
                .entry(fact.edc_machine_id)
                .or_insert_with(|| (fact.edc_name.clone(), Totals::default()))
                .1
                .add(fact);
        }

        let mut rows: Vec<EdcPerformance> = groups
            .into_iter()
            .map(|(id, (name, t))| EdcPerformance {
                edc_id: id,
                name,
                revenue: t.amount,
                transaction_count: t.count,
            })
            .collect();
        rows.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.edc_id.cmp(&b.edc_id)));
        rows
    }

    /// Totals per agent, revenue descending. Transactions without an agent
    /// are left out.
    #[must_use]
    pub fn agent_performance(facts: &[TransactionFact]) -> Vec<AgentPerformance> {
        let mut groups: BTreeMap<i64, (String, Totals)> = BTreeMap::new();
        for fact in facts {
            let Some(agent_id) = fact.agent_profile_id else {
                continue;
            };
            groups
                .entry(agent_id)
                .or_insert_with(|| (fact.agent_name.clone().unwrap_or_default(), Totals::default()))
                .1
                .add(fact);
        }

        let mut rows: Vec<AgentPerformance> = groups
            .into_iter()
            .map(|(id, (agent_name, t))| AgentPerformance {
                agent_id: id,
                agent_name,
                revenue: t.amount,
                transaction_count: t.count,
            })
            .collect();
        rows.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.agent_id.cmp(&b.agent_id)));
        rows
    }

    /// Builds the full period report.
    ///
    /// The daily breakdown is only filled when the period spans more than one day.
    #[must_use]
    pub fn build_period_report(
        period: &ResolvedPeriod,
        facts: &[TransactionFact],
        cash: CashTotals,
    ) -> PeriodReport {
        let totals = Self::summarize(facts);
        let daily_breakdown = if period.range.day_count() > 1 {
            Self::daily_breakdown(facts, &period.range)
        } else {
            Vec::new()
        };

        PeriodReport {
            period: PeriodInfo {
                name: period.name.clone(),
                start_date: period.range.start_str(),
                end_date: period.range.end_str(),
                days: period.range.day_count(),
            },
            summary: ReportSummary {
                total_revenue: totals.amount,
                total_transactions: totals.count,
                avg_transaction_amount: totals.average_amount(),
                total_fees: totals.total_fees(),
                total_net_profit: totals.net_profit,
                cash_in: cash.cash_in,
                cash_out: cash.cash_out,
                net_cash_flow: cash.net(),
            },
            fees_breakdown: FeesBreakdown::from(&totals),
            service_breakdown: Self::service_breakdown(facts),
            daily_breakdown,
            edc_performance: Self::edc_performance(facts),
            agent_performance: Self::agent_performance(facts),
        }
    }

    /// Cash on hand shown to cashiers: all-time net cash plus today's
    /// service and extra fees.
    #[must_use]
    pub fn cash_on_hand(all_time: CashTotals, today: &Totals) -> Decimal {
        all_time.net() + today.service_fee + today.extra_fee
    }
}

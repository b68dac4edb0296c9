//! Balance checks and ledger effects of a posted transaction.

use brilink_shared::types::parse_amount;
use rust_decimal::Decimal;
use serde_json::Value;

use super::category::ServiceCategory;
use super::error::PostingError;
use crate::cashflow::CashFlowType;

/// Validated money inputs of a posting request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingAmounts {
    /// Positive transaction amount.
    pub amount: Decimal,
    /// Non-negative manual surcharge.
    pub extra_fee: Decimal,
}

/// Parses and validates `amount` and `extra_fee` from a request body.
///
/// A missing amount counts as zero; a missing or null extra fee defaults to zero.
/// Both are rounded to the stored money scale before they are checked.
///
/// # Errors
///
/// Returns `InvalidAmount` for non-numeric values, `NonPositiveAmount` when the
/// amount is not above zero, and `NegativeExtraFee` for a negative extra fee.
pub fn parse_posting_amounts(
    amount: Option<&Value>,
    extra_fee: Option<&Value>,
) -> Result<PostingAmounts, PostingError> {
    let amount = match amount {
        None => Decimal::ZERO,
        Some(v) => parse_amount(v).ok_or(PostingError::InvalidAmount)?,
    };
    let extra_fee = match extra_fee {
        None | Some(Value::Null) => Decimal::ZERO,
        Some(v) => parse_amount(v).ok_or(PostingError::InvalidAmount)?,
    };

    if amount <= Decimal::ZERO {
        return Err(PostingError::NonPositiveAmount);
    }
    if extra_fee < Decimal::ZERO {
        return Err(PostingError::NegativeExtraFee);
    }

    Ok(PostingAmounts { amount, extra_fee })
}

/// Checks that the float being drawn down covers `amount`.
///
/// Transfers draw on the EDC saldo. Withdrawals draw on the agent's cash when
/// an agent is attached. Other services draw on nothing.
///
/// # Errors
///
/// Returns `InsufficientEdcBalance` or `InsufficientCash` with both figures.
pub fn check_sufficiency(
    category: &ServiceCategory,
    amount: Decimal,
    edc_saldo: Decimal,
    agent_balance: Option<Decimal>,
) -> Result<(), PostingError> {
    match (category, agent_balance) {
        (ServiceCategory::Transfer, _) if edc_saldo < amount => {
            Err(PostingError::InsufficientEdcBalance {
                available: edc_saldo,
                required: amount,
            })
        }
        (ServiceCategory::CashWithdrawal, Some(balance)) if balance < amount => {
            Err(PostingError::InsufficientCash {
                available: balance,
                required: amount,
            })
        }
        _ => Ok(()),
    }
}

/// A change to one float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatChange {
    /// Decrease, applied with a guarded compare-and-swap.
    Debit(Decimal),
    /// Increase.
    Credit(Decimal),
}

impl FloatChange {
    /// Signed delta applied to the balance.
    #[must_use]
    pub fn signed(&self) -> Decimal {
        match self {
            Self::Debit(a) => -*a,
            Self::Credit(a) => *a,
        }
    }
}

/// Change to an agent's cash float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentChange {
    /// Agent whose `total_balance` changes.
    pub agent_profile_id: i64,
    /// The change.
    pub change: FloatChange,
}

/// Cash-flow row written alongside the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCashFlow {
    /// Direction.
    pub flow_type: CashFlowType,
    /// Agent, if one is attached.
    pub agent_profile_id: Option<i64>,
    /// Transaction amount.
    pub amount: Decimal,
    /// Source label.
    pub source: String,
    /// Description referencing the transaction number.
    pub description: String,
}

/// Everything the ledger step writes for one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerPlan {
    /// Change to the EDC saldo.
    pub edc: Option<FloatChange>,
    /// Change to the agent's cash.
    pub agent: Option<AgentChange>,
    /// Cash-flow row to append.
    pub cash_flow: Option<PlannedCashFlow>,
}

/// Inputs of [`plan_ledger`].
#[derive(Debug, Clone, Copy)]
pub struct PostingContext<'a> {
    /// Resolved category of the service.
    pub category: &'a ServiceCategory,
    /// Service display name.
    pub service_name: &'a str,
    /// Number of the transaction being posted.
    pub transaction_number: &'a str,
    /// Attached agent, if any.
    pub agent_profile_id: Option<i64>,
    /// Transaction amount.
    pub amount: Decimal,
}

/// Builds the ledger effects for a transaction.
#[must_use]
pub fn plan_ledger(ctx: &PostingContext<'_>) -> LedgerPlan {
    let amount = ctx.amount;
    match ctx.category {
        ServiceCategory::Transfer => LedgerPlan {
            edc: Some(FloatChange::Debit(amount)),
            agent: ctx.agent_profile_id.map(|id| AgentChange {
                agent_profile_id: id,
                change: FloatChange::Credit(amount),
            }),
            cash_flow: ctx.agent_profile_id.map(|id| PlannedCashFlow {
                flow_type: CashFlowType::CashIn,
                agent_profile_id: Some(id),
                amount,
                source: format!("Transfer EDC - {}", ctx.service_name),
                description: format!("Transfer dari EDC. Transaction: {}", ctx.transaction_number),
            }),
        },
        ServiceCategory::CashWithdrawal => LedgerPlan {
            edc: Some(FloatChange::Credit(amount)),
            agent: ctx.agent_profile_id.map(|id| AgentChange {
                agent_profile_id: id,
                change: FloatChange::Debit(amount),
            }),
            cash_flow: Some(PlannedCashFlow {
                flow_type: CashFlowType::CashOut,
                agent_profile_id: ctx.agent_profile_id,
                amount,
                source: format!("Tarik Tunai - {}", ctx.service_name),
                description: format!("Tarik tunai. Transaction: {}", ctx.transaction_number),
            }),
        },
        ServiceCategory::Other(_) => LedgerPlan::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn ctx<'a>(category: &'a ServiceCategory, agent: Option<i64>) -> PostingContext<'a> {
        PostingContext {
            category,
            service_name: "BRI Link",
            transaction_number: "TRX-ABCDEF123456",
            agent_profile_id: agent,
            amount: dec!(100000),
        }
    }

    #[test]
    fn test_transfer_with_agent() {
        let plan = plan_ledger(&ctx(&ServiceCategory::Transfer, Some(3)));

        assert_eq!(plan.edc, Some(FloatChange::Debit(dec!(100000))));
        assert_eq!(
            plan.agent,
            Some(AgentChange {
                agent_profile_id: 3,
                change: FloatChange::Credit(dec!(100000)),
            })
        );
        let flow = plan.cash_flow.unwrap();
        assert_eq!(flow.flow_type, CashFlowType::CashIn);
        assert_eq!(flow.source, "Transfer EDC - BRI Link");
        assert_eq!(flow.description, "Transfer dari EDC. Transaction: TRX-ABCDEF123456");
    }

    #[test]
    fn test_transfer_without_agent_only_debits_edc() {
        let plan = plan_ledger(&ctx(&ServiceCategory::Transfer, None));

        assert_eq!(plan.edc, Some(FloatChange::Debit(dec!(100000))));
        assert!(plan.agent.is_none());
        assert!(plan.cash_flow.is_none());
    }

    #[test]
    fn test_withdrawal_without_agent_still_records_cash_out() {
        let plan = plan_ledger(&ctx(&ServiceCategory::CashWithdrawal, None));

        assert_eq!(plan.edc, Some(FloatChange::Credit(dec!(100000))));
        assert!(plan.agent.is_none());
        let flow = plan.cash_flow.unwrap();
        assert_eq!(flow.flow_type, CashFlowType::CashOut);
        assert_eq!(flow.agent_profile_id, None);
        assert_eq!(flow.source, "Tarik Tunai - BRI Link");
        assert_eq!(flow.description, "Tarik tunai. Transaction: TRX-ABCDEF123456");
    }

    #[test]
    fn test_other_category_changes_nothing() {
        let category = ServiceCategory::Other("pembayaran".into());
        assert_eq!(plan_ledger(&ctx(&category, Some(1))), LedgerPlan::default());
    }

    #[test]
    fn test_sufficiency() {
        let transfer = ServiceCategory::Transfer;
        let withdrawal = ServiceCategory::CashWithdrawal;

        assert!(check_sufficiency(&transfer, dec!(100), dec!(100), None).is_ok());
        assert_eq!(
            check_sufficiency(&transfer, dec!(100), dec!(50), Some(dec!(1000))),
            Err(PostingError::InsufficientEdcBalance {
                available: dec!(50),
                required: dec!(100),
            })
        );
        assert!(matches!(
            check_sufficiency(&withdrawal, dec!(100), dec!(0), Some(dec!(99))),
            Err(PostingError::InsufficientCash { .. })
        ));
        assert!(check_sufficiency(&withdrawal, dec!(100), dec!(0), None).is_ok());
        assert!(
            check_sufficiency(&ServiceCategory::Other(String::new()), dec!(1), dec!(0), None)
                .is_ok()
        );
    }

    #[test]
    fn test_parse_amounts() {
        let ok = parse_posting_amounts(Some(&json!("150000")), None).unwrap();
        assert_eq!(ok.amount, dec!(150000));
        assert_eq!(ok.extra_fee, Decimal::ZERO);

        assert_eq!(
            parse_posting_amounts(None, None),
            Err(PostingError::NonPositiveAmount)
        );
        assert_eq!(
            parse_posting_amounts(Some(&json!("abc")), None),
            Err(PostingError::InvalidAmount)
        );
        assert_eq!(
            parse_posting_amounts(Some(&json!(0)), None),
            Err(PostingError::NonPositiveAmount)
        );
        assert_eq!(
            parse_posting_amounts(Some(&json!(10)), Some(&json!(-1))),
            Err(PostingError::NegativeExtraFee)
        );
        assert_eq!(
            parse_posting_amounts(Some(&json!(10)), Some(&json!(null))).unwrap().extra_fee,
            Decimal::ZERO
        );
    }

    #[rstest]
    #[case(json!("0.004"), Err(PostingError::NonPositiveAmount))]
    #[case(json!(0.004), Err(PostingError::NonPositiveAmount))]
    #[case(json!("0.005"), Ok(dec!(0.01)))]
    #[case(json!("15000.456"), Ok(dec!(15000.46)))]
    fn test_amount_checked_at_stored_scale(
        #[case] raw: Value,
        #[case] expected: Result<Decimal, PostingError>,
    ) {
        assert_eq!(
            parse_posting_amounts(Some(&raw), None).map(|a| a.amount),
            expected
        );
    }

    #[test]
    fn test_sub_cent_extra_fee_is_rounded() {
        let parsed = parse_posting_amounts(Some(&json!(1000)), Some(&json!("-0.004"))).unwrap();
        assert_eq!(parsed.extra_fee, Decimal::ZERO);

        let parsed = parse_posting_amounts(Some(&json!(1000)), Some(&json!("2500.555"))).unwrap();
        assert_eq!(parsed.extra_fee, dec!(2500.56));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(PostingError::MissingFields.code(), "MISSING_FIELDS");
        assert_eq!(PostingError::NegativeExtraFee.code(), "INVALID_INPUT");
        assert_eq!(
            PostingError::InsufficientCash {
                available: dec!(1),
                required: dec!(2)
            }
            .code(),
            "INSUFFICIENT_BALANCE"
        );
    }
}

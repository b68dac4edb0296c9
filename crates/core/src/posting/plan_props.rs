//! Property-based tests for the ledger plan.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::category::ServiceCategory;
use super::plan::{PostingContext, check_sufficiency, plan_ledger};

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn moving_category() -> impl Strategy<Value = ServiceCategory> {
    prop_oneof![
        Just(ServiceCategory::Transfer),
        Just(ServiceCategory::CashWithdrawal)
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// With an agent attached, money only moves between the two floats.
    #[test]
    fn prop_plan_conserves_amount_between_floats(
        category in moving_category(),
        amount in positive_amount(),
        agent_id in 1i64..1000,
    ) {
        let plan = plan_ledger(&PostingContext {
            category: &category,
            service_name: "svc",
            transaction_number: "TRX-000000000000",
            agent_profile_id: Some(agent_id),
            amount,
        });

        let edc = plan.edc.map_or(Decimal::ZERO, |c| c.signed());
        let agent = plan.agent.map_or(Decimal::ZERO, |a| a.change.signed());
        prop_assert_eq!(edc + agent, Decimal::ZERO);
        prop_assert_eq!(edc.abs(), amount);

        let flow = plan.cash_flow.expect("cash flow recorded when agent attached");
        prop_assert_eq!(flow.amount, amount);
        prop_assert_eq!(flow.agent_profile_id, Some(agent_id));
    }

    /// A plan never debits a float that passed the sufficiency check below zero.
    #[test]
    fn prop_checked_debits_stay_non_negative(
        category in moving_category(),
        amount in positive_amount(),
        edc_saldo in positive_amount(),
        agent_balance in positive_amount(),
    ) {
        if check_sufficiency(&category, amount, edc_saldo, Some(agent_balance)).is_ok() {
            let plan = plan_ledger(&PostingContext {
                category: &category,
                service_name: "svc",
                transaction_number: "TRX-000000000000",
                agent_profile_id: Some(1),
                amount,
            });
            let edc_after = edc_saldo + plan.edc.map_or(Decimal::ZERO, |c| c.signed());
            let agent_after = agent_balance + plan.agent.map_or(Decimal::ZERO, |a| a.change.signed());
            prop_assert!(edc_after >= Decimal::ZERO);
            prop_assert!(agent_after >= Decimal::ZERO);
        }
    }

    /// Other categories never touch balances.
    #[test]
    fn prop_other_category_is_inert(amount in positive_amount(), label in "[a-z ]{0,12}") {
        prop_assume!(!label.contains("transfer") && !label.contains("tarik tunai"));
        let category = ServiceCategory::parse(Some(&label));
        let plan = plan_ledger(&PostingContext {
            category: &category,
            service_name: "svc",
            transaction_number: "TRX-000000000000",
            agent_profile_id: Some(1),
            amount,
        });
        prop_assert!(plan.edc.is_none());
        prop_assert!(plan.agent.is_none());
        prop_assert!(plan.cash_flow.is_none());
    }
}

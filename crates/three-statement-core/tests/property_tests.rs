//! Property tests for projection invariants.
//!
//! 1. Revolver bounds: 0 <= revolver <= revolver_limit every period
//! 2. Balancing identity: ties whenever the opening position balances and
//!    there is no interest, working capital investment or payables
//! 3. Repeatability: identical assumptions give identical statements
//! 4. Sequencing: one aligned entry per period, in order
//! 5. Revenue compounding: each period grows the prior one by the growth rate

use proptest::prelude::*;
use rust_decimal::Decimal;
use three_statement_core::ratios::calculate_ratios;
use three_statement_core::three_statement::statements::within_tolerance;
use three_statement_core::three_statement::{project, AssumptionSet};

// ── Strategies ───────────────────────────────────────────────────────

/// Money with two decimal places in [0, max]
fn arb_money(max: i64) -> impl Strategy<Value = Decimal> {
    (0..=max * 100).prop_map(|cents| Decimal::new(cents, 2))
}

/// Rate with four decimal places in [lo, hi] (in basis points)
fn arb_rate(lo_bp: i64, hi_bp: i64) -> impl Strategy<Value = Decimal> {
    (lo_bp..=hi_bp).prop_map(|bp| Decimal::new(bp, 4))
}

prop_compose! {
    fn arb_assumptions()(
        revenue_growth in arb_rate(-2000, 3000),
        cogs_percent in arb_rate(2000, 9000),
        opex_percent in arb_rate(0, 5000),
        depreciation in arb_money(2_000),
        interest_rate in arb_rate(0, 1500),
        revolver_interest_rate in arb_rate(0, 1500),
        tax_rate in arb_rate(0, 5000),
        capex in arb_money(3_000),
        change_in_working_cap in arb_money(1_000),
        debt_repayment in arb_money(2_000),
        initial_revenue in arb_money(50_000),
        initial_debt in arb_money(20_000),
        initial_cash in arb_money(5_000),
        fixed_assets in arb_money(30_000),
        initial_equity in arb_money(20_000),
        min_cash_balance in arb_money(2_000),
        revolver_limit in arb_money(10_000),
        ap_percent in arb_rate(0, 3000),
    ) -> AssumptionSet {
        AssumptionSet {
            revenue_growth,
            cogs_percent,
            opex_percent,
            depreciation,
            interest_rate,
            revolver_interest_rate,
            tax_rate,
            capex,
            change_in_working_cap,
            debt_repayment,
            initial_revenue,
            initial_debt,
            initial_cash,
            initial_equity,
            initial_assets: initial_cash + fixed_assets,
            min_cash_balance,
            revolver_limit,
            ap_percent,
        }
    }
}

/// Same assumptions with the opening position balanced and every item that
/// the statements do not carry through to cash (interest, working capital,
/// payables) switched off.
fn tying(a: AssumptionSet) -> AssumptionSet {
    AssumptionSet {
        interest_rate: Decimal::ZERO,
        revolver_interest_rate: Decimal::ZERO,
        change_in_working_cap: Decimal::ZERO,
        ap_percent: Decimal::ZERO,
        initial_equity: a.initial_assets - a.initial_debt,
        ..a
    }
}

// ── 1. Revolver bounds ───────────────────────────────────────────────

proptest! {
    #[test]
    fn revolver_stays_within_facility(a in arb_assumptions(), years in 1u32..=15) {
        let out = project(&a, years).unwrap();
        for bs in &out.balance_sheets {
            prop_assert!(bs.revolver >= Decimal::ZERO, "year {}: revolver {}", bs.year, bs.revolver);
            prop_assert!(
                bs.revolver <= a.revolver_limit || within_tolerance(bs.revolver, a.revolver_limit),
                "year {}: revolver {}", bs.year, bs.revolver
            );
            prop_assert!(!bs.flags.revolver_over_limit);
        }
    }

    #[test]
    fn cash_meets_floor_unless_revolver_exhausted(a in arb_assumptions(), years in 1u32..=15) {
        let out = project(&a, years).unwrap();
        for bs in &out.balance_sheets {
            if bs.flags.below_min_cash {
                prop_assert!(bs.flags.revolver_exhausted);
                prop_assert!(within_tolerance(bs.revolver, a.revolver_limit));
            }
        }
    }
}

// ── 2. Balancing identity ────────────────────────────────────────────

proptest! {
    #[test]
    fn balance_sheet_ties_when_everything_flows_through_cash(
        a in arb_assumptions(),
        years in 1u32..=15,
    ) {
        // Equity can go negative here; that is fine for the identity
        let a = tying(a);
        let out = project(&a, years).unwrap();
        for bs in &out.balance_sheets {
            prop_assert!(
                bs.is_balanced(),
                "year {}: assets {} vs L+E {}",
                bs.year, bs.total_assets, bs.total_liabilities_and_equity
            );
            prop_assert!(!bs.flags.out_of_balance);
        }
    }
}

// ── 3. Repeatability ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn projection_is_repeatable(a in arb_assumptions(), years in 1u32..=10) {
        let first = project(&a, years).unwrap();
        let second = project(&a, years).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ── 4. Sequencing ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn statements_are_aligned_and_ratios_never_fail(a in arb_assumptions(), years in 1u32..=10) {
        let out = project(&a, years).unwrap();
        prop_assert_eq!(out.income_statements.len(), years as usize);
        for (i, is) in out.income_statements.iter().enumerate() {
            prop_assert_eq!(is.year, i as u32 + 1);
        }

        let table = calculate_ratios(&out).unwrap();
        prop_assert_eq!(table.profitability.len(), years as usize);
        prop_assert_eq!(table.cash_flow.len(), years as usize);
    }
}

// ── 5. Revenue compounding ───────────────────────────────────────────

proptest! {
    #[test]
    fn revenue_compounds_from_the_prior_period(a in arb_assumptions(), years in 1u32..=12) {
        let out = project(&a, years).unwrap();
        let growth = Decimal::ONE + a.revenue_growth;

        prop_assert_eq!(out.income_statements[0].revenue, a.initial_revenue * growth);
        for pair in out.income_statements.windows(2) {
            prop_assert_eq!(pair[1].revenue, pair[0].revenue * growth);
        }
    }
}

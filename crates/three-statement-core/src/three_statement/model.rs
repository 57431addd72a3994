use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::assumptions::{AssumptionInput, AssumptionSet};
use super::balance_sheet::update_balance_sheet;
use super::cash_flow::compute_cash_flow_statement;
use super::income::compute_income_statement;
use super::state::PeriodState;
use super::statements::{BalanceSheet, CashFlowStatement, IncomeStatement};
use crate::error::ModelError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::ModelResult;

// ---------------------------------------------------------------------------
// Output structs
// ---------------------------------------------------------------------------

/// Three index-aligned statement sequences, one entry per period in
/// chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionOutput {
    pub income_statements: Vec<IncomeStatement>,
    pub cash_flow_statements: Vec<CashFlowStatement>,
    pub balance_sheets: Vec<BalanceSheet>,
    pub summary: ProjectionSummary,
}

/// Aggregate figures across the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_years: u32,
    pub ending_cash: Money,
    pub ending_revolver: Money,
    pub peak_revolver: Money,
    pub ending_debt: Money,
    pub ending_equity: Money,
    pub cumulative_net_income: Money,
    pub cumulative_net_cash_flow: Money,
    pub periods_revolver_exhausted: u32,
    pub periods_out_of_balance: u32,
}

/// One period's transition: the closing state plus the three statements.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodResult {
    pub closing: PeriodState,
    pub income: IncomeStatement,
    pub cash_flow: CashFlowStatement,
    pub balance_sheet: BalanceSheet,
}

#[derive(Serialize)]
struct EchoedAssumptions<'a> {
    #[serde(flatten)]
    assumptions: &'a AssumptionSet,
    years: u32,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run one period from `opening`. Revenue is the period's (already grown)
/// revenue. The opening state is left untouched; the closing state comes
/// back in the result.
pub fn project_period(
    year: u32,
    revenue: Money,
    opening: PeriodState,
    assumptions: &AssumptionSet,
) -> ModelResult<PeriodResult> {
    let income = compute_income_statement(year, revenue, &opening, assumptions)?;
    let cash_flow = compute_cash_flow_statement(&income, assumptions)?;

    let mut closing = opening;
    let balance_sheet = update_balance_sheet(
        &mut closing,
        &cash_flow,
        income.net_income,
        income.cogs,
        assumptions,
    )?;

    Ok(PeriodResult {
        closing,
        income,
        cash_flow,
        balance_sheet,
    })
}

/// Project `years` periods. Revenue compounds before period 1 is computed.
/// Any line item that overflows `Decimal` aborts with `ArithmeticOverflow`.
pub fn project(assumptions: &AssumptionSet, years: u32) -> ModelResult<ProjectionOutput> {
    let n = years as usize;
    let mut income_statements = Vec::with_capacity(n);
    let mut cash_flow_statements = Vec::with_capacity(n);
    let mut balance_sheets = Vec::with_capacity(n);

    let growth_factor = Decimal::ONE
        .checked_add(assumptions.revenue_growth)
        .ok_or_else(|| ModelError::ArithmeticOverflow {
            context: "revenue growth factor".into(),
        })?;
    let mut state = PeriodState::opening(assumptions);
    let mut revenue = assumptions.initial_revenue;

    for year in 1..=years {
        revenue = revenue
            .checked_mul(growth_factor)
            .ok_or_else(|| ModelError::ArithmeticOverflow {
                context: format!("revenue growth for year {year}"),
            })?;

        let period = project_period(year, revenue, state, assumptions)?;
        state = period.closing;

        log::debug!(
            "year {year}: revenue={} net_income={} cash={} revolver={} debt={}",
            period.income.revenue,
            period.income.net_income,
            state.cash,
            state.revolver,
            state.debt
        );
        for line in period.balance_sheet.flags.describe(&period.balance_sheet) {
            log::warn!("{line}");
        }

        income_statements.push(period.income);
        cash_flow_statements.push(period.cash_flow);
        balance_sheets.push(period.balance_sheet);
    }

    let summary = build_summary(&income_statements, &cash_flow_statements, &balance_sheets)?;

    Ok(ProjectionOutput {
        income_statements,
        cash_flow_statements,
        balance_sheets,
        summary,
    })
}

/// Resolve raw assumptions and run the linked three-statement projection,
/// wrapped in the standard output envelope.
pub fn build_three_statement_model(
    input: &AssumptionInput,
) -> ModelResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();

    let assumptions = AssumptionSet::from_input(input)?;
    let years = input.resolve_years()?;

    let mut warnings = assumptions.opening_warnings();
    for warning in &warnings {
        log::warn!("{warning}");
    }

    let output = project(&assumptions, years)?;
    for bs in &output.balance_sheets {
        warnings.extend(bs.flags.describe(bs));
    }

    Ok(with_metadata(
        "Three-Statement Projection with Revolver Cash Sweep",
        &EchoedAssumptions {
            assumptions: &assumptions,
            years,
        },
        warnings,
        start,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_summary(
    income_statements: &[IncomeStatement],
    cash_flow_statements: &[CashFlowStatement],
    balance_sheets: &[BalanceSheet],
) -> ModelResult<ProjectionSummary> {
    let last_bs = balance_sheets.last();

    Ok(ProjectionSummary {
        total_years: balance_sheets.len() as u32,
        ending_cash: last_bs.map(|bs| bs.cash).unwrap_or_default(),
        ending_revolver: last_bs.map(|bs| bs.revolver).unwrap_or_default(),
        peak_revolver: balance_sheets
            .iter()
            .map(|bs| bs.revolver)
            .max()
            .unwrap_or_default(),
        ending_debt: last_bs.map(|bs| bs.debt).unwrap_or_default(),
        ending_equity: last_bs.map(|bs| bs.equity).unwrap_or_default(),
        cumulative_net_income: checked_total(
            "cumulative net income",
            income_statements.iter().map(|is| is.net_income),
        )?,
        cumulative_net_cash_flow: checked_total(
            "cumulative net cash flow",
            cash_flow_statements.iter().map(|cf| cf.net_cash_flow),
        )?,
        periods_revolver_exhausted: balance_sheets
            .iter()
            .filter(|bs| bs.flags.revolver_exhausted)
            .count() as u32,
        periods_out_of_balance: balance_sheets
            .iter()
            .filter(|bs| bs.flags.out_of_balance)
            .count() as u32,
    })
}

fn checked_total(item: &str, mut values: impl Iterator<Item = Money>) -> ModelResult<Money> {
    values.try_fold(Decimal::ZERO, |total, value| {
        total
            .checked_add(value)
            .ok_or_else(|| ModelError::ArithmeticOverflow {
                context: item.to_string(),
            })
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Period-end balance sheet update and revolver sweep

use rust_decimal::Decimal;

use super::arithmetic::Checked;
use super::assumptions::AssumptionSet;
use super::state::PeriodState;
use super::statements::{within_tolerance, BalanceSheet, CashFlowStatement, PeriodFlags, RevolverSweep};
use crate::types::Money;
use crate::ModelResult;

/// Draw on or repay the revolver so cash ends at or above `min_cash`.
///
/// A shortfall draws `min(need, limit - revolver)`; if the facility cannot
/// cover the need, cash is left below the minimum. A surplus repays
/// `min(excess, revolver)`, never more than is outstanding. The only error
/// is arithmetic overflow.
pub fn revolver_sweep(
    year: u32,
    opening_cash: Money,
    net_cash_flow: Money,
    opening_revolver: Money,
    min_cash: Money,
    limit: Money,
) -> ModelResult<RevolverSweep> {
    let ck = Checked::new(year);
    let projected_cash = ck.add("projected cash", opening_cash, net_cash_flow)?;

    if projected_cash < min_cash {
        let draw_needed = ck.sub("revolver draw", min_cash, projected_cash)?;
        let capacity = ck.sub("revolver capacity", limit, opening_revolver)?;
        let draw = draw_needed.min(capacity);
        Ok(RevolverSweep {
            projected_cash,
            draw,
            repayment: Decimal::ZERO,
            unfunded_shortfall: ck.sub("unfunded shortfall", draw_needed, draw)?,
            ending_cash: ck.add("cash", projected_cash, draw)?,
            ending_revolver: ck.add("revolver", opening_revolver, draw)?,
        })
    } else {
        let excess_cash = ck.sub("excess cash", projected_cash, min_cash)?;
        let repayment = excess_cash.min(opening_revolver);
        Ok(RevolverSweep {
            projected_cash,
            draw: Decimal::ZERO,
            repayment,
            unfunded_shortfall: Decimal::ZERO,
            ending_cash: ck.sub("cash", projected_cash, repayment)?,
            ending_revolver: ck.sub("revolver", opening_revolver, repayment)?,
        })
    }
}

/// Roll the balance sheet forward one period.
///
/// Applies fixed assets, then cash and revolver via the sweep, then term
/// debt, then equity. Accounts payable is a stock recomputed from the
/// period's COGS rather than accumulated. Policy outcomes are flags; on
/// arithmetic overflow the error is returned and `state` is left as it was.
pub fn update_balance_sheet(
    state: &mut PeriodState,
    cash_flow: &CashFlowStatement,
    net_income: Money,
    cogs: Money,
    assumptions: &AssumptionSet,
) -> ModelResult<BalanceSheet> {
    let year = cash_flow.year;
    let ck = Checked::new(year);

    let fixed_assets = ck.add(
        "fixed assets",
        state.fixed_assets,
        ck.sub("fixed assets", assumptions.capex, assumptions.depreciation)?,
    )?;

    let sweep = revolver_sweep(
        year,
        state.cash,
        cash_flow.net_cash_flow,
        state.revolver,
        assumptions.min_cash_balance,
        assumptions.revolver_limit,
    )?;

    // No floor: amortisation beyond the balance drives debt negative
    let debt = ck.sub("term debt", state.debt, assumptions.debt_repayment)?;
    let equity = ck.add("equity", state.equity, net_income)?;

    let accounts_payable = ck.mul("accounts payable", cogs, assumptions.ap_percent)?;

    let closing = PeriodState {
        debt,
        equity,
        fixed_assets,
        cash: sweep.ending_cash,
        revolver: sweep.ending_revolver,
    };

    let total_assets = ck.add("total assets", closing.cash, closing.fixed_assets)?;
    let total_liabilities = ck.add(
        "total liabilities",
        ck.add("total liabilities", closing.revolver, accounts_payable)?,
        closing.debt,
    )?;
    let total_liabilities_and_equity =
        ck.add("liabilities and equity", total_liabilities, closing.equity)?;
    let balance_difference =
        ck.sub("balance difference", total_assets, total_liabilities_and_equity)?;

    let flags = PeriodFlags {
        revolver_exhausted: sweep.unfunded_shortfall > Decimal::ZERO,
        below_min_cash: closing.cash < assumptions.min_cash_balance
            && !within_tolerance(closing.cash, assumptions.min_cash_balance),
        negative_debt: closing.debt < Decimal::ZERO,
        revolver_over_limit: closing.revolver > assumptions.revolver_limit
            && !within_tolerance(closing.revolver, assumptions.revolver_limit),
        out_of_balance: !within_tolerance(total_assets, total_liabilities_and_equity),
    };

    *state = closing;

    Ok(BalanceSheet {
        year,
        cash: closing.cash,
        fixed_assets: closing.fixed_assets,
        total_assets,
        revolver: closing.revolver,
        accounts_payable,
        debt: closing.debt,
        total_liabilities,
        equity: closing.equity,
        total_liabilities_and_equity,
        balance_difference,
        sweep,
        flags,
    })
}

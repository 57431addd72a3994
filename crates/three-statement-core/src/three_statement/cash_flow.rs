use super::arithmetic::Checked;
use super::assumptions::AssumptionSet;
use super::statements::{CashFlowStatement, IncomeStatement};
use crate::ModelResult;

/// Cash flow statement for one period, derived from its income statement.
///
/// Total interest (term and revolver) is reported in financing, alongside
/// scheduled debt repayment.
pub fn compute_cash_flow_statement(
    income: &IncomeStatement,
    assumptions: &AssumptionSet,
) -> ModelResult<CashFlowStatement> {
    let ck = Checked::new(income.year);

    let cash_from_operations = ck.sub(
        "cash from operations",
        ck.add("cash from operations", income.net_income, income.depreciation)?,
        assumptions.change_in_working_cap,
    )?;
    let cash_from_investing = -assumptions.capex;
    let cash_from_financing =
        ck.sub("cash from financing", -income.interest, assumptions.debt_repayment)?;
    let net_cash_flow = ck.add(
        "net cash flow",
        ck.add("net cash flow", cash_from_operations, cash_from_investing)?,
        cash_from_financing,
    )?;

    Ok(CashFlowStatement {
        year: income.year,
        cash_from_operations,
        cash_from_investing,
        cash_from_financing,
        net_cash_flow,
    })
}

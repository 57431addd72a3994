use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ModelError;
use crate::three_statement::assumptions::AssumptionInput;
use crate::three_statement::model::{build_three_statement_model, ProjectionOutput};
use crate::three_statement::statements::{BalanceSheet, CashFlowStatement, IncomeStatement};
use crate::types::{with_metadata, ComputationOutput, Multiple, Rate};
use crate::ModelResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------
//
// A `None` cell means the ratio is undefined for that period because its
// denominator is zero. It serialises as `null`.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityRatios {
    pub year: u32,
    pub gross_margin: Option<Rate>,
    pub ebit_margin: Option<Rate>,
    pub net_margin: Option<Rate>,
    pub return_on_assets: Option<Rate>,
    pub return_on_equity: Option<Rate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityRatios {
    pub year: u32,
    /// Cash / (revolver + accounts payable)
    pub quick_ratio: Option<Multiple>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverageRatios {
    pub year: u32,
    pub debt_to_equity: Option<Multiple>,
    pub debt_to_assets: Option<Rate>,
    /// EBIT / total interest
    pub interest_coverage: Option<Multiple>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowRatios {
    pub year: u32,
    /// CFO / (revolver + term debt)
    pub cfo_to_total_debt: Option<Multiple>,
    pub cfo_to_capex: Option<Multiple>,
}

/// Four ratio groups, each one row per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioTable {
    pub profitability: Vec<ProfitabilityRatios>,
    pub liquidity: Vec<LiquidityRatios>,
    pub leverage: Vec<LeverageRatios>,
    pub cash_flow: Vec<CashFlowRatios>,
}

impl RatioTable {
    /// Name every undefined cell as "Year N: ratio".
    pub fn undefined_cells(&self) -> Vec<String> {
        let mut cells = Vec::new();
        for (i, p) in self.profitability.iter().enumerate() {
            let year = p.year;
            let mut push = |name: &str, value: &Option<Decimal>| {
                if value.is_none() {
                    cells.push(format!("Year {year}: {name}"));
                }
            };
            push("gross_margin", &p.gross_margin);
            push("ebit_margin", &p.ebit_margin);
            push("net_margin", &p.net_margin);
            push("return_on_assets", &p.return_on_assets);
            push("return_on_equity", &p.return_on_equity);
            push("quick_ratio", &self.liquidity[i].quick_ratio);
            push("debt_to_equity", &self.leverage[i].debt_to_equity);
            push("debt_to_assets", &self.leverage[i].debt_to_assets);
            push("interest_coverage", &self.leverage[i].interest_coverage);
            push("cfo_to_total_debt", &self.cash_flow[i].cfo_to_total_debt);
            push("cfo_to_capex", &self.cash_flow[i].cfo_to_capex);
        }
        cells
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Ratios for every period of a projection.
pub fn calculate_ratios(projection: &ProjectionOutput) -> ModelResult<RatioTable> {
    calculate_ratios_from_statements(
        &projection.income_statements,
        &projection.cash_flow_statements,
        &projection.balance_sheets,
    )
}

/// Ratios from three statement sequences, which must be index-aligned by
/// period.
pub fn calculate_ratios_from_statements(
    income_statements: &[IncomeStatement],
    cash_flow_statements: &[CashFlowStatement],
    balance_sheets: &[BalanceSheet],
) -> ModelResult<RatioTable> {
    check_alignment(income_statements, cash_flow_statements, balance_sheets)?;

    let n = income_statements.len();
    let mut table = RatioTable {
        profitability: Vec::with_capacity(n),
        liquidity: Vec::with_capacity(n),
        leverage: Vec::with_capacity(n),
        cash_flow: Vec::with_capacity(n),
    };

    for ((is, cf), bs) in income_statements
        .iter()
        .zip(cash_flow_statements)
        .zip(balance_sheets)
    {
        let year = is.year;

        table.profitability.push(ProfitabilityRatios {
            year,
            gross_margin: ratio(is.gross_profit, is.revenue),
            ebit_margin: ratio(is.ebit, is.revenue),
            net_margin: ratio(is.net_income, is.revenue),
            return_on_assets: ratio(is.net_income, bs.total_assets),
            return_on_equity: ratio(is.net_income, bs.equity),
        });

        table.liquidity.push(LiquidityRatios {
            year,
            quick_ratio: ratio_over_sum(bs.cash, bs.revolver, bs.accounts_payable),
        });

        table.leverage.push(LeverageRatios {
            year,
            debt_to_equity: ratio(bs.total_liabilities, bs.equity),
            debt_to_assets: ratio(bs.total_liabilities, bs.total_assets),
            interest_coverage: ratio(is.ebit, is.interest),
        });

        table.cash_flow.push(CashFlowRatios {
            year,
            cfo_to_total_debt: ratio_over_sum(cf.cash_from_operations, bs.revolver, bs.debt),
            cfo_to_capex: ratio(cf.cash_from_operations, -cf.cash_from_investing),
        });
    }

    Ok(table)
}

/// Run the projection described by `input` and derive its ratio table.
/// Projection warnings carry through; each undefined cell adds one more.
pub fn analyse_projection(input: &AssumptionInput) -> ModelResult<ComputationOutput<RatioTable>> {
    let start = Instant::now();

    let model = build_three_statement_model(input)?;
    let table = calculate_ratios(&model.result)?;

    let mut warnings = model.warnings;
    warnings.extend(
        table
            .undefined_cells()
            .into_iter()
            .map(|cell| format!("{cell} undefined (zero denominator)")),
    );

    Ok(with_metadata(
        "Per-period profitability, liquidity, leverage and cash flow ratios",
        &model.assumptions,
        warnings,
        start,
        table,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `None` when the denominator is zero (or the quotient overflows).
fn ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        None
    } else {
        numerator.checked_div(denominator)
    }
}

/// `numerator / (a + b)`, also `None` when the sum overflows.
fn ratio_over_sum(numerator: Decimal, a: Decimal, b: Decimal) -> Option<Decimal> {
    a.checked_add(b).and_then(|denominator| ratio(numerator, denominator))
}

fn check_alignment(
    income_statements: &[IncomeStatement],
    cash_flow_statements: &[CashFlowStatement],
    balance_sheets: &[BalanceSheet],
) -> ModelResult<()> {
    let n = income_statements.len();
    if cash_flow_statements.len() != n || balance_sheets.len() != n {
        return Err(ModelError::MisalignedStatements(format!(
            "{} income statements, {} cash flow statements, {} balance sheets",
            n,
            cash_flow_statements.len(),
            balance_sheets.len()
        )));
    }

    for ((is, cf), bs) in income_statements
        .iter()
        .zip(cash_flow_statements)
        .zip(balance_sheets)
    {
        if is.year != cf.year || is.year != bs.year {
            return Err(ModelError::MisalignedStatements(format!(
                "period mismatch: income year {}, cash flow year {}, balance sheet year {}",
                is.year, cf.year, bs.year
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::three_statement::assumptions::test_support::{base_case, cash_only};
    use crate::three_statement::model::project;
    use rust_decimal_macros::dec;

    #[test]
    fn test_first_period_ratios() {
        let out = project(&base_case(), 5).unwrap();
        let table = calculate_ratios(&out).unwrap();

        let p = &table.profitability[0];
        assert_eq!(p.gross_margin, Some(dec!(0.4)));
        assert_eq!(p.ebit_margin, Some(dec!(1700) / dec!(11000)));
        assert_eq!(p.return_on_assets, Some(dec!(1012.5) / dec!(10962.5)));
        assert_eq!(p.return_on_equity, Some(dec!(1012.5) / dec!(6012.5)));

        assert_eq!(table.liquidity[0].quick_ratio, Some(dec!(462.5) / dec!(1320)));

        let l = &table.leverage[0];
        assert_eq!(l.debt_to_equity, Some(dec!(5820) / dec!(6012.5)));
        assert_eq!(l.interest_coverage, Some(dec!(1700) / dec!(350)));

        let c = &table.cash_flow[0];
        assert_eq!(c.cfo_to_total_debt, Some(dec!(1312.5) / dec!(4500)));
        assert_eq!(c.cfo_to_capex, Some(dec!(1.3125)));
    }

    #[test]
    fn test_zero_denominators_are_undefined_cells() {
        // No debt, no revolver, no AP, no capex: several denominators vanish
        let out = project(&cash_only(dec!(100)), 2).unwrap();
        let table = calculate_ratios(&out).unwrap();

        assert_eq!(table.liquidity[0].quick_ratio, None);
        assert_eq!(table.leverage[0].interest_coverage, None);
        assert_eq!(table.cash_flow[0].cfo_to_total_debt, None);
        assert_eq!(table.cash_flow[0].cfo_to_capex, None);
        // Revenue and equity are positive, so these stay defined
        assert_eq!(table.profitability[0].net_margin, Some(Decimal::ONE));
        assert!(table.profitability[0].return_on_equity.is_some());

        let cells = table.undefined_cells();
        assert!(cells.contains(&"Year 2: interest_coverage".to_string()));
        assert_eq!(cells.len(), 8);
    }

    #[test]
    fn test_overflowing_denominator_is_undefined() {
        assert_eq!(ratio_over_sum(dec!(1), Decimal::MAX, Decimal::MAX), None);
        assert_eq!(ratio_over_sum(dec!(1), dec!(2), dec!(2)), Some(dec!(0.25)));
        assert_eq!(ratio(Decimal::MAX, dec!(0.5)), None);
    }

    #[test]
    fn test_misaligned_sequences_rejected() {
        let out = project(&base_case(), 3).unwrap();
        let err = calculate_ratios_from_statements(
            &out.income_statements,
            &out.cash_flow_statements[..2],
            &out.balance_sheets,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::MisalignedStatements(_)));
    }

    #[test]
    fn test_period_mismatch_rejected() {
        let out = project(&base_case(), 2).unwrap();
        let mut balance_sheets = out.balance_sheets.clone();
        balance_sheets.swap(0, 1);
        let err = calculate_ratios_from_statements(
            &out.income_statements,
            &out.cash_flow_statements,
            &balance_sheets,
        )
        .unwrap_err();
        assert!(err.to_string().contains("period mismatch"));
    }
}

use super::arithmetic::Checked;
use super::assumptions::AssumptionSet;
use super::state::PeriodState;
use super::statements::IncomeStatement;
use crate::types::Money;
use crate::ModelResult;

/// Income statement for one period.
///
/// Interest accrues on the opening term debt and opening revolver balance.
/// Taxes are `EBT * tax_rate` with no floor, so a loss produces a tax benefit.
pub fn compute_income_statement(
    year: u32,
    revenue: Money,
    opening: &PeriodState,
    assumptions: &AssumptionSet,
) -> ModelResult<IncomeStatement> {
    let ck = Checked::new(year);

    let cogs = ck.mul("cogs", revenue, assumptions.cogs_percent)?;
    let opex = ck.mul("opex", revenue, assumptions.opex_percent)?;
    let depreciation = assumptions.depreciation;
    let gross_profit = ck.sub("gross profit", revenue, cogs)?;
    let ebit = ck.sub("ebit", ck.sub("ebit", gross_profit, opex)?, depreciation)?;

    let term_interest = ck.mul("term interest", assumptions.interest_rate, opening.debt)?;
    let revolver_interest =
        ck.mul("revolver interest", assumptions.revolver_interest_rate, opening.revolver)?;
    let interest = ck.add("interest", term_interest, revolver_interest)?;

    let ebt = ck.sub("ebt", ebit, interest)?;
    let taxes = ck.mul("taxes", ebt, assumptions.tax_rate)?;
    let net_income = ck.sub("net income", ebt, taxes)?;

    Ok(IncomeStatement {
        year,
        revenue,
        cogs,
        gross_profit,
        opex,
        depreciation,
        ebit,
        term_interest,
        revolver_interest,
        interest,
        ebt,
        taxes,
        net_income,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn assumptions() -> AssumptionSet {
        AssumptionSet {
            revenue_growth: dec!(0.10),
            cogs_percent: dec!(0.6),
            opex_percent: dec!(0.20),
            depreciation: dec!(500),
            interest_rate: dec!(0.07),
            revolver_interest_rate: dec!(0.04),
            tax_rate: dec!(0.25),
            capex: dec!(1000),
            change_in_working_cap: dec!(200),
            debt_repayment: dec!(500),
            initial_revenue: dec!(10000),
            initial_debt: dec!(5000),
            initial_cash: dec!(1000),
            initial_equity: dec!(5000),
            initial_assets: dec!(11000),
            min_cash_balance: dec!(20),
            revolver_limit: dec!(8000),
            ap_percent: dec!(0.2),
        }
    }

    #[test]
    fn test_first_period_line_items() {
        let a = assumptions();
        let opening = PeriodState::opening(&a);
        let is = compute_income_statement(1, dec!(11000), &opening, &a).unwrap();

        assert_eq!(is.cogs, dec!(6600));
        assert_eq!(is.opex, dec!(2200));
        assert_eq!(is.gross_profit, dec!(4400));
        assert_eq!(is.ebit, dec!(1700));
        assert_eq!(is.term_interest, dec!(350));
        assert_eq!(is.revolver_interest, Decimal::ZERO);
        assert_eq!(is.interest, dec!(350));
        assert_eq!(is.ebt, dec!(1350));
        assert_eq!(is.taxes, dec!(337.5));
        assert_eq!(is.net_income, dec!(1012.5));
    }

    #[test]
    fn test_revolver_interest_on_opening_balance() {
        let a = assumptions();
        let opening = PeriodState {
            revolver: dec!(2500),
            ..PeriodState::opening(&a)
        };
        let is = compute_income_statement(2, dec!(11000), &opening, &a).unwrap();

        // 0.04 * 2500 = 100
        assert_eq!(is.revolver_interest, dec!(100));
        assert_eq!(is.interest, dec!(450));
    }

    #[test]
    fn test_negative_ebt_yields_tax_benefit() {
        let a = assumptions();
        let opening = PeriodState::opening(&a);
        // 1000 revenue: EBIT = 1000 - 600 - 200 - 500 = -300, EBT = -650
        let is = compute_income_statement(1, dec!(1000), &opening, &a).unwrap();

        assert_eq!(is.ebt, dec!(-650));
        assert_eq!(is.taxes, dec!(-162.5));
        assert_eq!(is.net_income, dec!(-487.5));
    }

    #[test]
    fn test_zero_revenue_not_special_cased() {
        let a = assumptions();
        let opening = PeriodState::opening(&a);
        let is = compute_income_statement(1, Decimal::ZERO, &opening, &a).unwrap();

        assert_eq!(is.cogs, Decimal::ZERO);
        assert_eq!(is.ebit, dec!(-500));
        assert_eq!(is.ebt, dec!(-850));
    }

    #[test]
    fn test_oversized_margin_overflows_to_error() {
        let a = AssumptionSet {
            cogs_percent: dec!(20),
            ..assumptions()
        };
        let opening = PeriodState::opening(&a);
        let err = compute_income_statement(1, dec!(5000000000000000000000000000), &opening, &a)
            .unwrap_err();

        assert!(matches!(err, ModelError::ArithmeticOverflow { ref context } if context == "cogs for year 1"));
    }
}

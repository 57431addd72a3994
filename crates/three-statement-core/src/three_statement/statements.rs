use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Relative tolerance for the Assets = Liabilities + Equity check.
pub const BALANCE_TOLERANCE: Decimal = dec!(0.000000001);

// ---------------------------------------------------------------------------
// Income statement
// ---------------------------------------------------------------------------

/// Income statement for a single projected year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub year: u32,
    pub revenue: Money,
    pub cogs: Money,
    pub gross_profit: Money,
    pub opex: Money,
    pub depreciation: Money,
    pub ebit: Money,
    pub term_interest: Money,
    pub revolver_interest: Money,
    /// Term + revolver interest
    pub interest: Money,
    pub ebt: Money,
    pub taxes: Money,
    pub net_income: Money,
}

// ---------------------------------------------------------------------------
// Cash flow statement
// ---------------------------------------------------------------------------

/// Cash flow statement for a single projected year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub year: u32,
    pub cash_from_operations: Money,
    pub cash_from_investing: Money,
    pub cash_from_financing: Money,
    pub net_cash_flow: Money,
}

// ---------------------------------------------------------------------------
// Balance sheet
// ---------------------------------------------------------------------------

/// Outcome of the period-end revolver sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevolverSweep {
    /// Opening cash plus the period's net cash flow, before any draw or repayment
    pub projected_cash: Money,
    pub draw: Money,
    pub repayment: Money,
    /// Part of the draw needed that the facility could not cover
    pub unfunded_shortfall: Money,
    pub ending_cash: Money,
    pub ending_revolver: Money,
}

/// Policy outcomes the projection absorbs rather than rejects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFlags {
    /// The revolver could not cover the full shortfall
    pub revolver_exhausted: bool,
    /// Ending cash sits below min_cash_balance
    pub below_min_cash: bool,
    /// Flat amortisation has pushed term debt below zero
    pub negative_debt: bool,
    /// Revolver balance exceeds the facility limit
    pub revolver_over_limit: bool,
    /// Assets differ from liabilities + equity beyond tolerance
    pub out_of_balance: bool,
}

impl PeriodFlags {
    pub fn any(&self) -> bool {
        self.revolver_exhausted
            || self.below_min_cash
            || self.negative_debt
            || self.revolver_over_limit
            || self.out_of_balance
    }

    /// One warning line per raised flag.
    pub fn describe(&self, balance_sheet: &BalanceSheet) -> Vec<String> {
        let year = balance_sheet.year;
        let mut lines = Vec::new();
        if self.revolver_exhausted {
            lines.push(format!(
                "Year {year}: revolver exhausted, {} of the cash shortfall left unfunded",
                balance_sheet.sweep.unfunded_shortfall
            ));
        }
        if self.below_min_cash {
            lines.push(format!(
                "Year {year}: ending cash {} is below the minimum cash balance",
                balance_sheet.cash
            ));
        }
        if self.negative_debt {
            lines.push(format!(
                "Year {year}: term debt is negative ({})",
                balance_sheet.debt
            ));
        }
        if self.revolver_over_limit {
            lines.push(format!(
                "Year {year}: revolver balance {} exceeds the facility limit",
                balance_sheet.revolver
            ));
        }
        if self.out_of_balance {
            lines.push(format!(
                "Year {year}: assets differ from liabilities + equity by {}",
                balance_sheet.balance_difference
            ));
        }
        lines
    }
}

/// Balance sheet at the end of a single projected year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub year: u32,
    pub cash: Money,
    pub fixed_assets: Money,
    pub total_assets: Money,
    /// Revolver (current liability)
    pub revolver: Money,
    pub accounts_payable: Money,
    /// Term debt (non-current)
    pub debt: Money,
    pub total_liabilities: Money,
    pub equity: Money,
    pub total_liabilities_and_equity: Money,
    /// total_assets - total_liabilities_and_equity
    pub balance_difference: Money,
    pub sweep: RevolverSweep,
    pub flags: PeriodFlags,
}

impl BalanceSheet {
    pub fn is_balanced(&self) -> bool {
        within_tolerance(self.total_assets, self.total_liabilities_and_equity)
    }
}

/// Relative comparison, scaled by the larger magnitude (floor of one).
/// Values too far apart to subtract are never within tolerance.
pub fn within_tolerance(a: Money, b: Money) -> bool {
    let scale = a.abs().max(b.abs()).max(Decimal::ONE);
    match a.checked_sub(b) {
        Some(diff) => diff.abs() <= BALANCE_TOLERANCE * scale,
        None => false,
    }
}

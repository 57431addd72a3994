//! Running balance-sheet state carried from one period to the next

use serde::{Deserialize, Serialize};

use super::assumptions::AssumptionSet;
use crate::types::Money;

/// Closing balances of one period, which are the opening balances of the next.
///
/// Only [`super::balance_sheet::update_balance_sheet`] mutates a state; the
/// income and cash flow calculators read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodState {
    /// Term debt outstanding (may go negative if amortisation exceeds it)
    pub debt: Money,
    pub equity: Money,
    pub fixed_assets: Money,
    pub cash: Money,
    /// Revolver drawn balance, 0 <= revolver <= revolver_limit
    pub revolver: Money,
}

impl PeriodState {
    /// Opening state before period 1.
    pub fn opening(assumptions: &AssumptionSet) -> Self {
        Self {
            debt: assumptions.initial_debt,
            equity: assumptions.initial_equity,
            fixed_assets: assumptions.opening_fixed_assets(),
            cash: assumptions.initial_cash,
            revolver: Money::ZERO,
        }
    }
}

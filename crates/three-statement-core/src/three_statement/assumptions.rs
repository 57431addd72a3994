use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::types::{Money, Rate};
use crate::ModelResult;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_MIN_CASH_BALANCE: Money = dec!(0);
pub const DEFAULT_REVOLVER_LIMIT: Money = dec!(5000);
pub const DEFAULT_AP_PERCENT: Rate = dec!(0);
pub const DEFAULT_YEARS: u32 = 5;
pub const MAX_YEARS: u32 = 200;

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// Assumptions as supplied by a caller or an input file.
///
/// Every field is optional at this stage so that a missing value can be
/// reported by name. [`AssumptionSet::from_input`] turns this into the
/// immutable set the projection runs on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssumptionInput {
    /// Annual revenue growth, applied before the first period
    pub revenue_growth: Option<Rate>,
    /// COGS as % of revenue
    pub cogs_percent: Option<Rate>,
    /// Operating expenses as % of revenue
    pub opex_percent: Option<Rate>,
    /// Flat annual depreciation charge
    pub depreciation: Option<Money>,
    /// Rate on opening term debt
    pub interest_rate: Option<Rate>,
    /// Rate on opening revolver balance
    pub revolver_interest_rate: Option<Rate>,
    /// Tax rate applied to EBT (negative EBT yields a benefit)
    pub tax_rate: Option<Rate>,
    /// Flat annual capital expenditure
    pub capex: Option<Money>,
    /// Annual investment in working capital (reduces CFO)
    pub change_in_working_cap: Option<Money>,
    /// Flat annual term debt amortisation
    pub debt_repayment: Option<Money>,
    /// Base-year revenue (period 0, never reported)
    pub initial_revenue: Option<Money>,
    pub initial_debt: Option<Money>,
    pub initial_cash: Option<Money>,
    pub initial_equity: Option<Money>,
    /// Opening total assets (cash + fixed assets)
    pub initial_assets: Option<Money>,
    /// Cash floor maintained by the revolver sweep (default 0)
    pub min_cash_balance: Option<Money>,
    /// Revolver facility size (default 5000)
    pub revolver_limit: Option<Money>,
    /// Accounts payable as % of COGS (default 0)
    pub ap_percent: Option<Rate>,
    /// Number of annual periods to project (default 5)
    pub years: Option<u32>,
}

impl AssumptionInput {
    /// Resolve the projection length, applying the default.
    pub fn resolve_years(&self) -> ModelResult<u32> {
        let years = self.years.unwrap_or(DEFAULT_YEARS);
        if years == 0 || years > MAX_YEARS {
            return Err(ModelError::InvalidInput {
                field: "years".into(),
                reason: format!("Period count must be between 1 and {MAX_YEARS}, got {years}"),
            });
        }
        Ok(years)
    }
}

// ---------------------------------------------------------------------------
// Resolved assumption set
// ---------------------------------------------------------------------------

/// The immutable assumption set a projection runs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssumptionSet {
    pub revenue_growth: Rate,
    pub cogs_percent: Rate,
    pub opex_percent: Rate,
    pub depreciation: Money,
    pub interest_rate: Rate,
    pub revolver_interest_rate: Rate,
    pub tax_rate: Rate,
    pub capex: Money,
    pub change_in_working_cap: Money,
    pub debt_repayment: Money,
    pub initial_revenue: Money,
    pub initial_debt: Money,
    pub initial_cash: Money,
    pub initial_equity: Money,
    pub initial_assets: Money,
    pub min_cash_balance: Money,
    pub revolver_limit: Money,
    pub ap_percent: Rate,
}

impl AssumptionSet {
    /// Resolve and validate raw input. Fails with a configuration error
    /// before any period is computed; required fields never default to zero.
    pub fn from_input(input: &AssumptionInput) -> ModelResult<Self> {
        let mut missing: Vec<&'static str> = Vec::new();
        let mut require = |field: &'static str, value: Option<Decimal>| {
            value.unwrap_or_else(|| {
                missing.push(field);
                Decimal::ZERO
            })
        };

        let set = AssumptionSet {
            revenue_growth: require("revenue_growth", input.revenue_growth),
            cogs_percent: require("cogs_percent", input.cogs_percent),
            opex_percent: require("opex_percent", input.opex_percent),
            depreciation: require("depreciation", input.depreciation),
            interest_rate: require("interest_rate", input.interest_rate),
            revolver_interest_rate: require("revolver_interest_rate", input.revolver_interest_rate),
            tax_rate: require("tax_rate", input.tax_rate),
            capex: require("capex", input.capex),
            change_in_working_cap: require("change_in_working_cap", input.change_in_working_cap),
            debt_repayment: require("debt_repayment", input.debt_repayment),
            initial_revenue: require("initial_revenue", input.initial_revenue),
            initial_debt: require("initial_debt", input.initial_debt),
            initial_cash: require("initial_cash", input.initial_cash),
            initial_equity: require("initial_equity", input.initial_equity),
            initial_assets: require("initial_assets", input.initial_assets),
            min_cash_balance: input.min_cash_balance.unwrap_or(DEFAULT_MIN_CASH_BALANCE),
            revolver_limit: input.revolver_limit.unwrap_or(DEFAULT_REVOLVER_LIMIT),
            ap_percent: input.ap_percent.unwrap_or(DEFAULT_AP_PERCENT),
        };

        if !missing.is_empty() {
            return Err(ModelError::MissingAssumption {
                field: missing.join(", "),
            });
        }

        set.validate()?;
        Ok(set)
    }

    fn validate(&self) -> ModelResult<()> {
        validate_non_negative("depreciation", self.depreciation)?;
        validate_non_negative("interest_rate", self.interest_rate)?;
        validate_non_negative("revolver_interest_rate", self.revolver_interest_rate)?;
        // Policy bound: a rate above 100% of EBT is treated as a data error
        validate_rate("tax_rate", self.tax_rate)?;
        validate_non_negative("capex", self.capex)?;
        validate_non_negative("change_in_working_cap", self.change_in_working_cap)?;
        validate_non_negative("debt_repayment", self.debt_repayment)?;
        validate_non_negative("initial_revenue", self.initial_revenue)?;
        validate_non_negative("initial_debt", self.initial_debt)?;
        validate_non_negative("initial_cash", self.initial_cash)?;
        validate_non_negative("initial_equity", self.initial_equity)?;
        validate_non_negative("initial_assets", self.initial_assets)?;
        validate_non_negative("min_cash_balance", self.min_cash_balance)?;
        validate_non_negative("revolver_limit", self.revolver_limit)?;
        validate_non_negative("ap_percent", self.ap_percent)?;
        if self.initial_debt.checked_add(self.initial_equity).is_none() {
            return Err(ModelError::InvalidInput {
                field: "initial_equity".into(),
                reason: "initial_debt + initial_equity exceeds the decimal range".into(),
            });
        }
        Ok(())
    }

    /// Opening fixed assets implied by total assets less cash.
    pub fn opening_fixed_assets(&self) -> Money {
        self.initial_assets - self.initial_cash
    }

    /// Assets less liabilities and equity on the opening balance sheet.
    pub fn opening_imbalance(&self) -> Money {
        self.initial_assets
            .saturating_sub(self.initial_debt.saturating_add(self.initial_equity))
    }

    /// Notices about an opening position the projection will carry forward
    /// as-is rather than reject.
    pub fn opening_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let fixed_assets = self.opening_fixed_assets();
        if fixed_assets < Decimal::ZERO {
            warnings.push(format!(
                "Opening fixed assets are negative ({fixed_assets}): initial_cash exceeds initial_assets"
            ));
        }

        let imbalance = self.opening_imbalance();
        if !imbalance.is_zero() {
            warnings.push(format!(
                "Opening balance sheet does not balance: assets exceed liabilities + equity by {imbalance}"
            ));
        }

        if self.debt_repayment > self.initial_debt {
            warnings.push(format!(
                "Annual debt_repayment ({}) exceeds initial_debt ({}); term debt will turn negative",
                self.debt_repayment, self.initial_debt
            ));
        }

        warnings
    }
}

impl TryFrom<&AssumptionInput> for AssumptionSet {
    type Error = ModelError;

    fn try_from(input: &AssumptionInput) -> ModelResult<Self> {
        AssumptionSet::from_input(input)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_rate(field: &str, value: Rate) -> ModelResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ModelError::InvalidInput {
            field: field.into(),
            reason: format!("Rate must be between 0 and 1, got {value}"),
        });
    }
    Ok(())
}

fn validate_non_negative(field: &str, value: Money) -> ModelResult<()> {
    if value < Decimal::ZERO {
        return Err(ModelError::InvalidInput {
            field: field.into(),
            reason: format!("Value must be non-negative, got {value}"),
        });
    }
    Ok(())
}

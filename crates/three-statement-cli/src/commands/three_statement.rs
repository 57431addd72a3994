use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use three_statement_core::three_statement::{self, AssumptionInput};

use crate::input;

const SAMPLE_ASSUMPTIONS: &str = include_str!("../../fixtures/base_case.json");

/// Arguments for the three-statement projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to a JSON or YAML assumptions file
    #[arg(long)]
    pub input: Option<String>,

    /// Number of periods to project (1 to 200, default 5)
    #[arg(long)]
    pub years: Option<u32>,

    #[command(flatten)]
    pub overrides: AssumptionArgs,
}

/// Per-field overrides, applied on top of the file or stdin assumptions
#[derive(Args, Default)]
pub struct AssumptionArgs {
    /// Revenue growth per period (decimal, e.g. 0.10)
    #[arg(long)]
    pub revenue_growth: Option<Decimal>,
    /// COGS as a fraction of revenue
    #[arg(long)]
    pub cogs_percent: Option<Decimal>,
    /// Operating expenses as a fraction of revenue
    #[arg(long)]
    pub opex_percent: Option<Decimal>,
    /// Depreciation per period
    #[arg(long)]
    pub depreciation: Option<Decimal>,
    /// Interest rate on opening term debt
    #[arg(long)]
    pub interest_rate: Option<Decimal>,
    /// Interest rate on the opening revolver balance
    #[arg(long)]
    pub revolver_interest_rate: Option<Decimal>,
    /// Tax rate on EBT (0 to 1)
    #[arg(long)]
    pub tax_rate: Option<Decimal>,
    /// Capital expenditure per period
    #[arg(long)]
    pub capex: Option<Decimal>,
    /// Working capital investment per period
    #[arg(long)]
    pub change_in_working_cap: Option<Decimal>,
    /// Scheduled term debt repayment per period
    #[arg(long)]
    pub debt_repayment: Option<Decimal>,
    /// Revenue of the period before the first projected period
    #[arg(long)]
    pub initial_revenue: Option<Decimal>,
    /// Opening term debt
    #[arg(long)]
    pub initial_debt: Option<Decimal>,
    /// Opening cash
    #[arg(long)]
    pub initial_cash: Option<Decimal>,
    /// Opening equity
    #[arg(long)]
    pub initial_equity: Option<Decimal>,
    /// Opening total assets (cash plus fixed assets)
    #[arg(long)]
    pub initial_assets: Option<Decimal>,
    /// Cash floor the revolver defends (default 0)
    #[arg(long)]
    pub min_cash_balance: Option<Decimal>,
    /// Revolver facility limit (default 5000)
    #[arg(long)]
    pub revolver_limit: Option<Decimal>,
    /// Accounts payable as a fraction of COGS (default 0)
    #[arg(long)]
    pub ap_percent: Option<Decimal>,
}

impl AssumptionArgs {
    /// Overwrite every field of `input` that was given on the command line.
    pub fn apply(&self, input: &mut AssumptionInput) {
        let fields: [(&Option<Decimal>, &mut Option<Decimal>); 18] = [
            (&self.revenue_growth, &mut input.revenue_growth),
            (&self.cogs_percent, &mut input.cogs_percent),
            (&self.opex_percent, &mut input.opex_percent),
            (&self.depreciation, &mut input.depreciation),
            (&self.interest_rate, &mut input.interest_rate),
            (&self.revolver_interest_rate, &mut input.revolver_interest_rate),
            (&self.tax_rate, &mut input.tax_rate),
            (&self.capex, &mut input.capex),
            (&self.change_in_working_cap, &mut input.change_in_working_cap),
            (&self.debt_repayment, &mut input.debt_repayment),
            (&self.initial_revenue, &mut input.initial_revenue),
            (&self.initial_debt, &mut input.initial_debt),
            (&self.initial_cash, &mut input.initial_cash),
            (&self.initial_equity, &mut input.initial_equity),
            (&self.initial_assets, &mut input.initial_assets),
            (&self.min_cash_balance, &mut input.min_cash_balance),
            (&self.revolver_limit, &mut input.revolver_limit),
            (&self.ap_percent, &mut input.ap_percent),
        ];
        for (flag, field) in fields {
            if flag.is_some() {
                *field = *flag;
            }
        }
    }
}

/// Build the raw assumptions from `--input`, else piped JSON, else nothing,
/// then layer the command-line flags on top. Missing fields are reported by
/// the core when the set is resolved.
pub fn load_assumptions(args: &ProjectArgs) -> Result<AssumptionInput, Box<dyn std::error::Error>> {
    let mut assumptions: AssumptionInput = if let Some(ref path) = args.input {
        log::debug!("reading assumptions from {path}");
        input::file::read_structured(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        log::debug!("reading assumptions from stdin");
        piped
    } else {
        AssumptionInput::default()
    };

    args.overrides.apply(&mut assumptions);
    if args.years.is_some() {
        assumptions.years = args.years;
    }
    Ok(assumptions)
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = load_assumptions(&args)?;
    let result = three_statement::build_three_statement_model(&assumptions)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_sample() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::from_str(SAMPLE_ASSUMPTIONS)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_a_complete_assumption_set() {
        let input: AssumptionInput = serde_json::from_str(SAMPLE_ASSUMPTIONS).unwrap();
        let out = three_statement::build_three_statement_model(&input).unwrap();
        assert_eq!(out.result.summary.total_years, 5);
    }

    #[test]
    fn test_flags_override_only_given_fields() {
        let mut input: AssumptionInput = serde_json::from_str(SAMPLE_ASSUMPTIONS).unwrap();
        let overrides = AssumptionArgs {
            tax_rate: Some(Decimal::new(30, 2)),
            revolver_limit: Some(Decimal::ZERO),
            ..Default::default()
        };
        overrides.apply(&mut input);

        assert_eq!(input.tax_rate, Some(Decimal::new(30, 2)));
        assert_eq!(input.revolver_limit, Some(Decimal::ZERO));
        assert_eq!(input.capex, Some(Decimal::from(1000)));
    }

    #[test]
    fn test_flags_alone_fill_an_empty_input() {
        let mut input = AssumptionInput::default();
        AssumptionArgs {
            capex: Some(Decimal::from(250)),
            ..Default::default()
        }
        .apply(&mut input);

        assert_eq!(input.capex, Some(Decimal::from(250)));
        assert_eq!(input.revenue_growth, None);
    }
}

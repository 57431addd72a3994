use clap::Args;
use serde_json::Value;

use three_statement_core::ratios;

use super::three_statement::{load_assumptions, ProjectArgs};

/// Arguments for ratio analysis; the projection is run first
#[derive(Args)]
pub struct RatiosArgs {
    #[command(flatten)]
    pub projection: ProjectArgs,
}

pub fn run_ratios(args: RatiosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = load_assumptions(&args.projection)?;
    let result = ratios::analyse_projection(&assumptions)?;
    Ok(serde_json::to_value(result)?)
}

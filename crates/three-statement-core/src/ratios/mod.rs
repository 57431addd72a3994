//! Per-period ratio analysis over a projected set of statements

pub mod engine;

pub use engine::{
    analyse_projection, calculate_ratios, calculate_ratios_from_statements, CashFlowRatios,
    LeverageRatios, LiquidityRatios, ProfitabilityRatios, RatioTable,
};

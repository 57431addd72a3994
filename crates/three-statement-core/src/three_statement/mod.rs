//! Linked three-statement projection.
//!
//! Each annual period runs the income calculator, then the cash flow
//! calculator, then the balance sheet updater, which is the only place the
//! running [`PeriodState`] changes.

mod arithmetic;
pub mod assumptions;
pub mod balance_sheet;
pub mod cash_flow;
pub mod income;
pub mod model;
pub mod state;
pub mod statements;

pub use assumptions::{AssumptionInput, AssumptionSet};
pub use model::{
    build_three_statement_model, project, project_period, PeriodResult, ProjectionOutput,
    ProjectionSummary,
};
pub use state::PeriodState;
pub use statements::{BalanceSheet, CashFlowStatement, IncomeStatement, PeriodFlags, RevolverSweep};

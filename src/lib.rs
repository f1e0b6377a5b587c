//! Debt Planner - Deterministic amortization and repayment strategy engine
//!
//! This library provides:
//! - Single-debt amortization schedules with fees and one-off extra payments
//! - Multi-debt snowball and avalanche plans sharing a monthly extra budget
//! - Strategy comparison against a no-extra baseline
//! - CSV and JSON loaders for debts, extra payments and plan documents

pub mod error;
pub mod money;
pub mod month;
pub mod debt;
pub mod amortization;
pub mod planner;
pub mod comparison;
pub mod input;

// Re-export commonly used types
pub use error::PlanError;
pub use month::MonthIndex;
pub use debt::{AprType, Debt, ExtraPayment, ExtraPaymentMode};
pub use amortization::{
    simulate_debt, AmortizationEngine, AmortizationEntry, Metrics, ScheduleCache, SimulationConfig,
    SimulationResult, MAX_MONTHS,
};
pub use planner::{plan_debts, PlanEngine, PlanResult, Strategy, StrategyBudget};
pub use comparison::{compare_strategies, StrategyComparator, StrategyComparison, StrategySavings};
pub use input::{load_plan_input, PlanInput};

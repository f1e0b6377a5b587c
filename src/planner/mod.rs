//! Multi-debt planner with a shared, rolling extra budget

mod state;
mod strategy;
mod ledger;
mod engine;

pub use strategy::{Strategy, StrategyBudget};
pub use ledger::{DebtSummary, PlanMonth, PlanPaymentEntry, PlanResult};
pub use engine::{plan_debts, PlanEngine};

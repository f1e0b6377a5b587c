//! Single-debt amortization: rates, payment rules, schedules and memoization

mod rate;
mod terms;
mod extras;
mod metrics;
mod schedule;
mod cache;

pub use rate::{amortizing_payment, monthly_rate};
pub use terms::{Installment, PaymentTerms};
pub use extras::{ExtraSchedule, ScheduledExtra};
pub use metrics::Metrics;
pub(crate) use metrics::Totals;
pub use schedule::{simulate_debt, AmortizationEngine, AmortizationEntry, SimulationConfig, SimulationResult};
pub use cache::{schedule_key, ScheduleCache};

/// Hard cap on simulated months for both the single-debt engine and the planner
pub const MAX_MONTHS: u32 = 1200;

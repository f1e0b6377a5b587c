//! Repayment strategies, the shared extra budget, and target selection

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::money::{check_precision, DEFAULT_PRECISION};
use crate::month::MonthIndex;

use super::state::DebtState;

/// Rule for choosing which debt receives the shared extra budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Smallest balance first; ties go to the higher rate
    Snowball,
    /// Highest rate first; ties go to the smaller balance
    #[default]
    Avalanche,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Snowball => "snowball",
            Strategy::Avalanche => "avalanche",
        }
    }
}

fn default_precision() -> u32 {
    DEFAULT_PRECISION
}

/// Planner configuration: the monthly extra budget and how it is directed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyBudget {
    /// Extra money available every month on top of regular payments
    #[serde(default)]
    pub monthly_extra: f64,

    #[serde(default)]
    pub strategy: Strategy,

    /// First month the monthly extra is available; released minimums are not gated
    #[serde(default)]
    pub extra_start_month: Option<MonthIndex>,

    /// Decimal places money is rounded to (0-4)
    #[serde(default = "default_precision")]
    pub precision: u32,
}

impl Default for StrategyBudget {
    fn default() -> Self {
        Self {
            monthly_extra: 0.0,
            strategy: Strategy::default(),
            extra_start_month: None,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl StrategyBudget {
    pub fn new(monthly_extra: f64, strategy: Strategy) -> Self {
        Self {
            monthly_extra,
            strategy,
            ..Self::default()
        }
    }

    /// Same budget directed by a different strategy
    pub fn with_strategy(&self, strategy: Strategy) -> Self {
        Self {
            strategy,
            ..self.clone()
        }
    }

    /// Same budget with the monthly extra removed
    pub fn without_extra(&self) -> Self {
        Self {
            monthly_extra: 0.0,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        check_precision(self.precision)?;
        if !(self.monthly_extra.is_finite() && self.monthly_extra >= 0.0) {
            return Err(PlanError::InvalidBudget(format!(
                "monthly extra must be zero or positive, got {}",
                self.monthly_extra
            )));
        }
        Ok(())
    }

    /// Whether the configured monthly extra applies in `month`
    pub fn extra_applies(&self, month: &MonthIndex) -> bool {
        self.extra_start_month.map_or(true, |start| *month >= start)
    }
}

/// Active debts in the order they receive the shared extra budget in `month`
///
/// Remaining ties keep the earlier debt in input order.
pub(crate) fn rank_targets(states: &[DebtState], month: &MonthIndex, strategy: Strategy) -> Vec<usize> {
    let mut ranked: Vec<&DebtState> = states.iter().filter(|s| s.is_active(month)).collect();
    ranked.sort_by(|a, b| priority(strategy, a, b));
    ranked.into_iter().map(|s| s.index).collect()
}

fn priority(strategy: Strategy, a: &DebtState, b: &DebtState) -> Ordering {
    let by_rate = b.terms.monthly_rate.total_cmp(&a.terms.monthly_rate);
    let by_balance = a.balance.cmp(&b.balance);
    match strategy {
        Strategy::Snowball => by_balance.then(by_rate),
        Strategy::Avalanche => by_rate.then(by_balance),
    }
}

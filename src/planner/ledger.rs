//! Plan output structures

use serde::{Deserialize, Serialize};

use crate::amortization::{Installment, Metrics};
use crate::money::from_minor_units;
use crate::month::MonthIndex;

use super::state::DebtState;
use super::strategy::Strategy;

/// One debt's payment within a plan month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPaymentEntry {
    pub debt_id: String,
    pub installment: u32,
    pub starting_balance: f64,
    pub regular_payment: f64,

    /// Explicit extra payments scheduled for this installment
    pub scheduled_extra: f64,

    /// Share of the strategy budget; non-zero only for the month's target
    pub strategy_extra: f64,

    /// `scheduled_extra + strategy_extra`
    pub extra_payment: f64,

    pub total_payment: f64,
    pub interest: f64,
    pub fees: f64,
    pub principal: f64,
    pub ending_balance: f64,
}

impl PlanPaymentEntry {
    pub(crate) fn new(
        debt_id: &str,
        installment: u32,
        step: &Installment,
        scheduled_extra: i64,
        strategy_extra: i64,
        precision: u32,
    ) -> Self {
        let m = |units| from_minor_units(units, precision);
        Self {
            debt_id: debt_id.to_string(),
            installment,
            starting_balance: m(step.starting_balance),
            regular_payment: m(step.regular_payment),
            scheduled_extra: m(scheduled_extra),
            strategy_extra: m(strategy_extra),
            extra_payment: m(step.extra_payment),
            total_payment: m(step.total_payment),
            interest: m(step.interest),
            fees: m(step.fees),
            principal: m(step.principal),
            ending_balance: m(step.ending_balance),
        }
    }
}

/// All payments made in one calendar month of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanMonth {
    pub month: MonthIndex,

    /// Debt ranked first for the strategy budget this month
    pub target_debt_id: Option<String>,

    /// Strategy budget available this month: monthly extra, released
    /// minimums, and regular payment left unspent by debts paid off this month
    pub available_extra: f64,

    /// Part of the available budget no active debt could absorb
    pub unused_extra: f64,

    pub payments: Vec<PlanPaymentEntry>,
}

/// Lifetime totals for one debt within a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtSummary {
    pub debt_id: String,
    pub name: String,
    pub total_interest: f64,
    pub total_fees: f64,
    pub total_paid: f64,
    pub total_principal: f64,
    pub months_active: u32,
    pub payoff_month: Option<MonthIndex>,
}

impl DebtSummary {
    pub(crate) fn from_state(state: &DebtState, name: &str, precision: u32) -> Self {
        let m = |units| from_minor_units(units, precision);
        Self {
            debt_id: state.debt_id.clone(),
            name: name.to_string(),
            total_interest: m(state.totals.interest),
            total_fees: m(state.totals.fees),
            total_paid: m(state.totals.paid),
            total_principal: m(state.totals.principal),
            months_active: state.months_active,
            payoff_month: state.payoff_month,
        }
    }
}

/// Complete multi-debt plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    pub strategy: Strategy,
    pub months: Vec<PlanMonth>,
    pub debts: Vec<DebtSummary>,
    pub metrics: Metrics,
}

impl PlanResult {
    /// Summary for `debt_id`, if the debt was part of the plan
    pub fn debt(&self, debt_id: &str) -> Option<&DebtSummary> {
        self.debts.iter().find(|d| d.debt_id == debt_id)
    }

    /// Payment entries for `debt_id` in ledger order
    pub fn payments_for<'a>(&'a self, debt_id: &'a str) -> impl Iterator<Item = (&'a MonthIndex, &'a PlanPaymentEntry)> + 'a {
        self.months.iter().flat_map(move |m| {
            m.payments
                .iter()
                .filter(move |p| p.debt_id == debt_id)
                .map(move |p| (&m.month, p))
        })
    }
}

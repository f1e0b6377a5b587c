//! Multi-debt planner: all debts advance together, one calendar month at a time

use log::{debug, warn};

use crate::amortization::{ExtraSchedule, Installment, Totals, MAX_MONTHS};
use crate::debt::{Debt, ExtraPayment};
use crate::error::PlanError;
use crate::money::{from_minor_units, to_minor_units};
use crate::month::MonthIndex;

use super::ledger::{DebtSummary, PlanMonth, PlanPaymentEntry, PlanResult};
use super::state::DebtState;
use super::strategy::{rank_targets, StrategyBudget};

/// Main planning engine
#[derive(Debug, Clone, Default)]
pub struct PlanEngine {
    budget: StrategyBudget,
}

impl PlanEngine {
    /// Create a new planning engine for the given budget
    pub fn new(budget: StrategyBudget) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> &StrategyBudget {
        &self.budget
    }

    /// Simulate every debt together until all are paid off, the plan stalls,
    /// or `MAX_MONTHS` months have passed
    ///
    /// The shared budget fills debts in strategy order, so money one debt
    /// cannot absorb moves on to the next. A paid-off debt releases its
    /// current minimum payment into the shared budget from the following
    /// month on; in the payoff month itself, the part of that payment the
    /// payoff did not need joins the budget at once. A month with no principal
    /// reduction, no available budget, no pending release and no explicit
    /// extra payment left anywhere in the input ends the plan as
    /// non-amortizable.
    pub fn plan(&self, debts: &[Debt], extras: &[ExtraPayment]) -> Result<PlanResult, PlanError> {
        self.budget.validate()?;
        let precision = self.budget.precision;
        for debt in debts {
            debt.validate_at(precision)?;
        }
        let schedule = ExtraSchedule::build(debts, extras, precision)?;

        let mut states: Vec<DebtState> = debts
            .iter()
            .enumerate()
            .map(|(i, debt)| DebtState::from_debt(i, debt, precision))
            .collect();

        let mut months = Vec::new();
        let mut totals = Totals::default();
        let mut payoff_month = None;
        let mut non_amortizable = false;

        let Some(first_month) = debts.iter().map(|d| d.start_month).min() else {
            return Ok(self.finish(debts, &states, months, totals, payoff_month, non_amortizable));
        };

        debug!(
            "planning {} debts from {} with {} strategy, monthly extra {}",
            debts.len(),
            first_month,
            self.budget.strategy.as_str(),
            self.budget.monthly_extra
        );

        let monthly_extra = to_minor_units(self.budget.monthly_extra, precision);
        let mut released: i64 = 0;

        for offset in 0..MAX_MONTHS {
            let month = first_month.add_months(offset as i32);

            let configured = if self.budget.extra_applies(&month) { monthly_extra } else { 0 };
            let mut dues: Vec<Option<Due>> = states
                .iter()
                .map(|state| state.is_active(&month).then(|| Due::new(state, &schedule, &month)))
                .collect();
            let spilled: i64 = dues.iter().flatten().map(|due| due.spilled).sum();
            let available = configured + released + spilled;

            let ranking = rank_targets(&states, &month, self.budget.strategy);
            let mut pool = available;
            for &index in &ranking {
                if pool == 0 {
                    break;
                }
                if let Some(due) = dues[index].as_mut() {
                    due.strategy_extra = pool.min(due.headroom());
                    pool -= due.strategy_extra;
                }
            }

            let mut principal_reduced: i64 = 0;
            let mut pending_release: i64 = 0;
            let mut payments = Vec::new();

            for (state, due) in states.iter_mut().zip(&dues) {
                let Some(due) = due else {
                    continue;
                };

                let step = Installment::settle(
                    state.balance,
                    due.interest,
                    state.terms.fee,
                    due.regular,
                    due.explicit + due.strategy_extra,
                );
                totals.add(step.interest, step.fees, step.total_payment, step.principal);
                principal_reduced = principal_reduced.saturating_add(step.principal);
                payments.push(PlanPaymentEntry::new(
                    &state.debt_id,
                    due.installment,
                    &step,
                    due.explicit,
                    due.strategy_extra,
                    precision,
                ));

                if state.apply(&step, month) {
                    debug!(
                        "debt {} paid off in {}, releasing {} per month",
                        state.debt_id,
                        month,
                        from_minor_units(state.terms.regular_payment, precision)
                    );
                    pending_release += state.terms.regular_payment;
                } else if due.reduce_payment {
                    state.terms.reamortize(due.installment, state.balance);
                }
            }

            months.push(PlanMonth {
                month,
                target_debt_id: ranking.first().map(|&i| states[i].debt_id.clone()),
                available_extra: from_minor_units(available, precision),
                unused_extra: from_minor_units(pool, precision),
                payments,
            });
            released += pending_release;

            if states.iter().all(|s| s.paid_off) {
                payoff_month = Some(month);
                break;
            }

            let extras_remaining = states
                .iter()
                .any(|s| schedule.has_after(&s.debt_id, s.installment(&month)));
            if principal_reduced == 0 && available == 0 && pending_release == 0 && !extras_remaining {
                warn!("plan stalled in {}: payments no longer reduce any balance", month);
                non_amortizable = true;
                break;
            }
        }

        if payoff_month.is_none() && !non_amortizable {
            warn!("plan truncated after {} months with balances outstanding", MAX_MONTHS);
        }

        Ok(self.finish(debts, &states, months, totals, payoff_month, non_amortizable))
    }

    fn finish(
        &self,
        debts: &[Debt],
        states: &[DebtState],
        months: Vec<PlanMonth>,
        totals: Totals,
        payoff_month: Option<MonthIndex>,
        non_amortizable: bool,
    ) -> PlanResult {
        let precision = self.budget.precision;
        let summaries = states
            .iter()
            .zip(debts)
            .map(|(state, debt)| DebtSummary::from_state(state, &debt.name, precision))
            .collect();

        PlanResult {
            strategy: self.budget.strategy,
            metrics: totals.into_metrics(precision, months.len() as u32, payoff_month, non_amortizable),
            months,
            debts: summaries,
        }
    }
}

/// What one active debt owes in the current month, before it is settled
#[derive(Debug, Clone, Copy)]
struct Due {
    installment: u32,
    interest: i64,
    payoff: i64,
    regular: i64,

    /// Part of the regular payment a smaller payoff left unspent
    spilled: i64,

    explicit: i64,
    reduce_payment: bool,
    strategy_extra: i64,
}

impl Due {
    fn new(state: &DebtState, schedule: &ExtraSchedule, month: &MonthIndex) -> Self {
        let installment = state.installment(month) as u32;
        let interest = state.terms.interest_on(state.balance);
        let payoff = state.balance.saturating_add(interest).saturating_add(state.terms.fee);
        let regular = state.terms.regular_due(installment, payoff);
        let scheduled = schedule.get(&state.debt_id, installment).unwrap_or_default();

        Self {
            installment,
            interest,
            payoff,
            regular,
            spilled: (state.terms.regular_payment - regular).max(0),
            explicit: scheduled.amount.min(payoff - regular),
            reduce_payment: scheduled.reduce_payment,
            strategy_extra: 0,
        }
    }

    /// Strategy money this debt can still absorb before it is paid off
    fn headroom(&self) -> i64 {
        self.payoff - self.regular - self.explicit
    }
}

/// Plan `debts` under `budget`
pub fn plan_debts(
    debts: &[Debt],
    budget: &StrategyBudget,
    extras: &[ExtraPayment],
) -> Result<PlanResult, PlanError> {
    PlanEngine::new(budget.clone()).plan(debts, extras)
}

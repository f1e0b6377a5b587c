//! Single-debt amortization engine

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::debt::{Debt, ExtraPayment};
use crate::error::PlanError;
use crate::money::{check_precision, from_minor_units, to_minor_units, DEFAULT_PRECISION};
use crate::month::MonthIndex;

use super::extras::ExtraSchedule;
use super::metrics::{Metrics, Totals};
use super::terms::{Installment, PaymentTerms};
use super::MAX_MONTHS;

/// Configuration for a single-debt simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Decimal places money is rounded to (0-4)
    pub precision: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

/// One row of a single-debt ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    /// 1-based installment number
    pub installment: u32,
    pub month: MonthIndex,
    pub starting_balance: f64,
    pub regular_payment: f64,
    pub extra_payment: f64,
    pub total_payment: f64,
    pub interest: f64,
    pub fees: f64,
    pub principal: f64,
    pub ending_balance: f64,
}

impl AmortizationEntry {
    fn from_installment(installment: u32, month: MonthIndex, step: &Installment, precision: u32) -> Self {
        let m = |units| from_minor_units(units, precision);
        Self {
            installment,
            month,
            starting_balance: m(step.starting_balance),
            regular_payment: m(step.regular_payment),
            extra_payment: m(step.extra_payment),
            total_payment: m(step.total_payment),
            interest: m(step.interest),
            fees: m(step.fees),
            principal: m(step.principal),
            ending_balance: m(step.ending_balance),
        }
    }
}

/// Complete single-debt simulation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub debt_id: String,

    /// Regular payment at the first installment
    pub monthly_payment: f64,

    pub entries: Vec<AmortizationEntry>,

    pub metrics: Metrics,
}

/// Single-debt amortization engine
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    config: SimulationConfig,
}

impl AmortizationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulate `debt` to payoff, applying the extra payments that target it
    ///
    /// Extra payments for other debts are ignored. The run stops at payoff, at
    /// the first installment whose payment cannot cover interest and fees
    /// (flagged `non_amortizable`), or after `MAX_MONTHS` installments.
    pub fn simulate(&self, debt: &Debt, extras: &[ExtraPayment]) -> Result<SimulationResult, PlanError> {
        let precision = check_precision(self.config.precision)?;
        debt.validate_at(precision)?;
        let schedule = ExtraSchedule::for_debt(debt, extras, precision)?;

        let mut terms = PaymentTerms::from_debt(debt, precision);
        let monthly_payment = from_minor_units(terms.regular_payment, precision);
        let mut balance = to_minor_units(debt.principal, precision);

        debug!(
            "simulating debt {}: balance {} at monthly rate {:.6}, regular payment {}",
            debt.id, debt.principal, terms.monthly_rate, monthly_payment
        );

        let mut entries = Vec::new();
        let mut totals = Totals::default();
        let mut payoff_month = None;
        let mut non_amortizable = false;

        for installment in 1..=MAX_MONTHS {
            if balance <= 0 {
                break;
            }
            let month = debt.start_month.add_months(installment as i32 - 1);

            let interest = terms.interest_on(balance);
            let payoff = balance.saturating_add(interest).saturating_add(terms.fee);
            let regular = terms.regular_due(installment, payoff);
            let scheduled = schedule.get(&debt.id, installment).unwrap_or_default();
            let extra = scheduled.amount.min(payoff - regular);

            let step = Installment::settle(balance, interest, terms.fee, regular, extra);
            if !step.covers_charges() {
                warn!(
                    "debt {} cannot amortize: installment {} pays {} against {} of interest and fees",
                    debt.id,
                    installment,
                    from_minor_units(step.total_payment, precision),
                    from_minor_units(interest.saturating_add(terms.fee), precision),
                );
                non_amortizable = true;
                break;
            }

            totals.add(step.interest, step.fees, step.total_payment, step.principal);
            entries.push(AmortizationEntry::from_installment(installment, month, &step, precision));
            balance = step.ending_balance;

            if balance == 0 {
                debug!("debt {} paid off in {} after {} installments", debt.id, month, installment);
                payoff_month = Some(month);
            } else if scheduled.reduce_payment {
                terms.reamortize(installment, balance);
            }
        }

        if balance > 0 && !non_amortizable {
            warn!("debt {} still owes {} after {} months", debt.id, from_minor_units(balance, precision), MAX_MONTHS);
        }

        let metrics = totals.into_metrics(precision, entries.len() as u32, payoff_month, non_amortizable);
        Ok(SimulationResult {
            debt_id: debt.id.clone(),
            monthly_payment,
            entries,
            metrics,
        })
    }
}

/// Simulate one debt with the default configuration
pub fn simulate_debt(debt: &Debt, extras: &[ExtraPayment]) -> Result<SimulationResult, PlanError> {
    AmortizationEngine::default().simulate(debt, extras)
}

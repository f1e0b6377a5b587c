//! Per-debt running state during a plan

use crate::amortization::{Installment, PaymentTerms, Totals};
use crate::debt::Debt;
use crate::money::to_minor_units;
use crate::month::MonthIndex;

/// Mutable working state of one debt, private to a single planner run
#[derive(Debug, Clone)]
pub(crate) struct DebtState {
    /// Position of the debt in the caller's input
    pub index: usize,

    pub debt_id: String,

    pub start_month: MonthIndex,

    /// Payment rules; `regular_payment` is the current minimum
    pub terms: PaymentTerms,

    /// Outstanding balance in minor units
    pub balance: i64,

    /// Terminal once the balance reaches zero
    pub paid_off: bool,

    pub totals: Totals,

    /// Months in which this debt made a payment
    pub months_active: u32,

    /// First month the balance reached zero
    pub payoff_month: Option<MonthIndex>,
}

impl DebtState {
    /// Initialize state from a validated debt at plan start
    pub fn from_debt(index: usize, debt: &Debt, precision: u32) -> Self {
        Self {
            index,
            debt_id: debt.id.clone(),
            start_month: debt.start_month,
            terms: PaymentTerms::from_debt(debt, precision),
            balance: to_minor_units(debt.principal, precision),
            paid_off: false,
            totals: Totals::default(),
            months_active: 0,
            payoff_month: None,
        }
    }

    /// Started, not paid off, and still owing
    pub fn is_active(&self, month: &MonthIndex) -> bool {
        !self.paid_off && *month >= self.start_month && self.balance > 0
    }

    /// Installment number of `month`; zero or negative before the start month
    pub fn installment(&self, month: &MonthIndex) -> i32 {
        month.installment_from(&self.start_month)
    }

    /// Record a settled installment and move the balance forward
    ///
    /// Returns true when this installment paid the debt off.
    pub fn apply(&mut self, step: &Installment, month: MonthIndex) -> bool {
        self.totals.add(step.interest, step.fees, step.total_payment, step.principal);
        self.months_active += 1;
        self.balance = step.ending_balance;

        if self.balance == 0 && !self.paid_off {
            self.paid_off = true;
            self.payoff_month = Some(month);
            return true;
        }
        false
    }
}

//! Regular payment rules shared by the single-debt engine and the planner

use crate::debt::Debt;
use crate::money::{accrue, from_minor_units, to_minor_units};

use super::rate::{amortizing_payment, monthly_rate};

/// Payment parameters of one debt, in minor units
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentTerms {
    /// Rate applied to the starting balance each installment
    pub monthly_rate: f64,

    /// Flat fee per installment
    pub fee: i64,

    /// Fixed term, if the debt has one
    pub term: Option<u32>,

    /// Stated minimum payment, if any
    pub min_payment: Option<i64>,

    /// Current regular payment; lowered by `reduce_payment` extras
    pub regular_payment: i64,

    precision: u32,
}

impl PaymentTerms {
    /// Derive terms from a validated debt
    ///
    /// The regular payment is the larger of the term-derived payment and the
    /// stated minimum.
    pub fn from_debt(debt: &Debt, precision: u32) -> Self {
        let rate = monthly_rate(debt.annual_rate, debt.apr_type);
        let term_payment = debt
            .term_months
            .map(|n| to_minor_units(amortizing_payment(debt.principal, rate, n), precision));
        let min_payment = debt.min_payment.map(|m| to_minor_units(m, precision));

        Self {
            monthly_rate: rate,
            fee: to_minor_units(debt.monthly_fee, precision),
            term: debt.term_months,
            min_payment,
            regular_payment: term_payment.max(min_payment).unwrap_or(0),
            precision,
        }
    }

    /// Interest accrued on `balance` for one installment
    pub fn interest_on(&self, balance: i64) -> i64 {
        accrue(balance, self.monthly_rate)
    }

    /// Regular payment due for `installment`, never more than `payoff`
    ///
    /// The last installment of a fixed term settles the full payoff so rounding
    /// of the level payment never leaves a residual installment.
    pub fn regular_due(&self, installment: u32, payoff: i64) -> i64 {
        match self.term {
            Some(term) if installment >= term => payoff,
            _ => self.regular_payment.min(payoff),
        }
    }

    /// Recompute the regular payment after a `reduce_payment` extra on `installment`
    ///
    /// The new payment amortizes `balance` over the months left in the term and
    /// never drops below the stated minimum. Debts without a term keep their
    /// payment.
    pub fn reamortize(&mut self, installment: u32, balance: i64) {
        let Some(term) = self.term else {
            return;
        };
        let remaining = term.saturating_sub(installment);
        if remaining == 0 || balance <= 0 {
            return;
        }

        let payment = amortizing_payment(
            from_minor_units(balance, self.precision),
            self.monthly_rate,
            remaining,
        );
        self.regular_payment = to_minor_units(payment, self.precision).max(self.min_payment.unwrap_or(0));
    }
}

/// One installment's payment split, in minor units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Installment {
    pub starting_balance: i64,
    pub regular_payment: i64,
    pub extra_payment: i64,
    pub total_payment: i64,
    pub interest: i64,
    pub fees: i64,
    pub principal: i64,
    pub ending_balance: i64,
}

impl Installment {
    /// Apply `regular + extra` against interest, then fees, then principal
    ///
    /// Callers cap the payment at the payoff amount, so the ending balance is
    /// never negative. A payment short of interest and fees leaves a zero
    /// principal portion and a larger ending balance. A runaway balance
    /// saturates at `i64::MAX` instead of overflowing.
    pub fn settle(starting_balance: i64, interest: i64, fees: i64, regular: i64, extra: i64) -> Self {
        let total = regular + extra;
        Self {
            starting_balance,
            regular_payment: regular,
            extra_payment: extra,
            total_payment: total,
            interest,
            fees,
            principal: total.saturating_sub(interest).saturating_sub(fees).max(0),
            ending_balance: starting_balance.saturating_add(interest).saturating_add(fees) - total,
        }
    }

    /// Whether the payment at least covers the interest and fees charged
    pub fn covers_charges(&self) -> bool {
        self.total_payment >= self.interest.saturating_add(self.fees)
    }
}

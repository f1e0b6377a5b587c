//! Aggregate metrics for schedules and plans

use serde::{Deserialize, Serialize};

use crate::money::from_minor_units;
use crate::month::MonthIndex;

/// Aggregate outcome of a single-debt schedule or a multi-debt plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_interest: f64,
    pub total_fees: f64,
    pub total_paid: f64,
    pub total_principal: f64,

    /// Number of simulated months (ledger length)
    pub months: u32,

    /// Month in which the last balance reached zero
    pub payoff_month: Option<MonthIndex>,

    /// Payments could not keep pace with interest and fees
    pub non_amortizable: bool,
}

/// Running minor-unit totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Totals {
    pub interest: i64,
    pub fees: i64,
    pub paid: i64,
    pub principal: i64,
}

impl Totals {
    pub fn add(&mut self, interest: i64, fees: i64, paid: i64, principal: i64) {
        self.interest = self.interest.saturating_add(interest);
        self.fees = self.fees.saturating_add(fees);
        self.paid = self.paid.saturating_add(paid);
        self.principal = self.principal.saturating_add(principal);
    }

    pub fn into_metrics(
        self,
        precision: u32,
        months: u32,
        payoff_month: Option<MonthIndex>,
        non_amortizable: bool,
    ) -> Metrics {
        Metrics {
            total_interest: from_minor_units(self.interest, precision),
            total_fees: from_minor_units(self.fees, precision),
            total_paid: from_minor_units(self.paid, precision),
            total_principal: from_minor_units(self.principal, precision),
            months,
            payoff_month,
            non_amortizable,
        }
    }
}

//! Lookup of explicit extra payments by debt and installment

use std::collections::{BTreeMap, HashMap};

use crate::debt::{Debt, ExtraPayment, ExtraPaymentMode};
use crate::error::PlanError;
use crate::money::to_minor_units;

/// Combined extra payments landing on one installment of one debt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduledExtra {
    /// Sum of all extra amounts for the installment, in minor units
    pub amount: i64,
    /// Whether any of them asked to lower the regular payment
    pub reduce_payment: bool,
}

/// Extra payments grouped by debt id, then by installment number
#[derive(Debug, Clone, Default)]
pub struct ExtraSchedule {
    by_debt: HashMap<String, BTreeMap<u32, ScheduledExtra>>,
}

impl ExtraSchedule {
    /// Index extra payments against a set of debts
    ///
    /// Every payment must target one of `debts`; month references are resolved
    /// relative to the target's start month.
    pub fn build(debts: &[Debt], extras: &[ExtraPayment], precision: u32) -> Result<Self, PlanError> {
        let mut schedule = Self::default();
        for extra in extras {
            let debt = debts
                .iter()
                .find(|d| d.id == extra.debt_id)
                .ok_or_else(|| PlanError::UnknownDebt(extra.debt_id.clone()))?;
            schedule.insert(debt, extra, precision)?;
        }
        Ok(schedule)
    }

    /// Index only the extra payments that target `debt`, ignoring the rest
    pub fn for_debt(debt: &Debt, extras: &[ExtraPayment], precision: u32) -> Result<Self, PlanError> {
        let mut schedule = Self::default();
        for extra in extras.iter().filter(|e| e.debt_id == debt.id) {
            schedule.insert(debt, extra, precision)?;
        }
        Ok(schedule)
    }

    fn insert(&mut self, debt: &Debt, extra: &ExtraPayment, precision: u32) -> Result<(), PlanError> {
        extra.validate()?;
        let installment = extra.resolve_installment(&debt.start_month)?;
        let slot = self
            .by_debt
            .entry(debt.id.clone())
            .or_default()
            .entry(installment)
            .or_default();
        slot.amount += to_minor_units(extra.amount, precision);
        slot.reduce_payment |= extra.mode == ExtraPaymentMode::ReducePayment;
        Ok(())
    }

    /// Extra payment scheduled for `installment` of `debt_id`, if any
    pub fn get(&self, debt_id: &str, installment: u32) -> Option<ScheduledExtra> {
        self.by_debt.get(debt_id)?.get(&installment).copied()
    }

    /// Whether `debt_id` has an extra payment after `installment`
    ///
    /// `installment` may be zero or negative for a debt that has not started yet.
    pub fn has_after(&self, debt_id: &str, installment: i32) -> bool {
        let from = (installment + 1).max(1) as u32;
        self.by_debt
            .get(debt_id)
            .is_some_and(|per_installment| per_installment.range(from..).next().is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.by_debt.is_empty()
    }
}

//! Memoization of single-debt schedules
//!
//! Without extra payments a schedule depends only on the debt's fields and
//! the rounding precision, so repeated requests for the same debt (a form
//! re-rendering, a comparison table) can reuse the first result.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::debt::Debt;
use crate::error::PlanError;

use super::schedule::{AmortizationEngine, SimulationConfig, SimulationResult};

/// Hash of every field that influences a schedule without extras
///
/// Floats are hashed by bit pattern, so `0.1` and `0.10000000000000001`
/// share a key exactly when they are the same `f64`.
pub fn schedule_key(debt: &Debt, precision: u32) -> u64 {
    let mut hasher = DefaultHasher::new();
    debt.id.hash(&mut hasher);
    debt.principal.to_bits().hash(&mut hasher);
    debt.annual_rate.to_bits().hash(&mut hasher);
    debt.apr_type.hash(&mut hasher);
    debt.start_month.hash(&mut hasher);
    debt.term_months.hash(&mut hasher);
    debt.min_payment.map(f64::to_bits).hash(&mut hasher);
    debt.monthly_fee.to_bits().hash(&mut hasher);
    precision.hash(&mut hasher);
    hasher.finish()
}

/// Whether two debts produce the same schedule without extras
///
/// Compares exactly the fields `schedule_key` hashes, floats by bit pattern.
fn same_schedule_inputs(a: &Debt, b: &Debt) -> bool {
    a.id == b.id
        && a.principal.to_bits() == b.principal.to_bits()
        && a.annual_rate.to_bits() == b.annual_rate.to_bits()
        && a.apr_type == b.apr_type
        && a.start_month == b.start_month
        && a.term_months == b.term_months
        && a.min_payment.map(f64::to_bits) == b.min_payment.map(f64::to_bits)
        && a.monthly_fee.to_bits() == b.monthly_fee.to_bits()
}

/// Cache of schedules simulated without extra payments
///
/// Entries sharing a key are kept side by side with the debt that produced
/// them, so a hash collision costs a simulation rather than a wrong schedule.
#[derive(Debug, Default)]
pub struct ScheduleCache {
    engine: AmortizationEngine,
    entries: HashMap<u64, Vec<(Debt, SimulationResult)>>,
    hits: u64,
}

impl ScheduleCache {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            engine: AmortizationEngine::new(config),
            entries: HashMap::new(),
            hits: 0,
        }
    }

    /// Return the cached schedule for `debt`, simulating it on first request
    pub fn get_or_simulate(&mut self, debt: &Debt) -> Result<&SimulationResult, PlanError> {
        let key = schedule_key(debt, self.engine.config().precision);
        let cached = self
            .entries
            .get(&key)
            .and_then(|bucket| bucket.iter().position(|(seen, _)| same_schedule_inputs(seen, debt)));

        match cached {
            Some(position) => {
                self.hits += 1;
                Ok(&self.entries[&key][position].1)
            }
            None => {
                let result = self.engine.simulate(debt, &[])?;
                let bucket = self.entries.entry(key).or_default();
                bucket.push((debt.clone(), result));
                Ok(&bucket[bucket.len() - 1].1)
            }
        }
    }

    /// Number of cached schedules
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of requests served from the cache
    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::MonthIndex;

    fn debt() -> Debt {
        Debt::with_term("car", 8_000.0, 0.07, MonthIndex::parse("2024-01").unwrap(), 24)
    }

    #[test]
    fn test_same_debt_hits_cache() {
        let mut cache = ScheduleCache::default();
        let first = cache.get_or_simulate(&debt()).unwrap().clone();
        let second = cache.get_or_simulate(&debt()).unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_changed_field_misses_cache() {
        let mut cache = ScheduleCache::default();
        cache.get_or_simulate(&debt()).unwrap();

        let mut other = debt();
        other.monthly_fee = 1.0;
        cache.get_or_simulate(&other).unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.hits(), 0);
        assert_ne!(schedule_key(&debt(), 2), schedule_key(&debt(), 3));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = ScheduleCache::default();
        let mut bad = debt();
        bad.term_months = None;
        assert!(cache.get_or_simulate(&bad).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_colliding_key_does_not_serve_another_debt() {
        let mut cache = ScheduleCache::default();
        cache.get_or_simulate(&debt()).unwrap();

        // File the car schedule under the key of a different debt
        let mut boat = debt();
        boat.id = "boat".to_string();
        boat.principal = 3_000.0;
        let car_bucket = cache.entries.remove(&schedule_key(&debt(), 2)).unwrap();
        cache.entries.insert(schedule_key(&boat, 2), car_bucket);

        let served = cache.get_or_simulate(&boat).unwrap().clone();
        assert_eq!(served.debt_id, "boat");
        assert_eq!(served, crate::amortization::simulate_debt(&boat, &[]).unwrap());
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.len(), 2);
    }
}

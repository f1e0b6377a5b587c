//! Strategy comparison against a no-extra baseline
//!
//! Runs the planner three times over the same debts and explicit extra
//! payments: once with the monthly extra removed, once per strategy.

use serde::{Deserialize, Serialize};

use crate::debt::{Debt, ExtraPayment};
use crate::error::PlanError;
use crate::money::{from_minor_units, to_minor_units};
use crate::planner::{PlanEngine, PlanResult, Strategy, StrategyBudget};

/// What a strategy saves relative to the baseline; never negative
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategySavings {
    pub interest_saved: f64,
    pub months_saved: u32,
}

impl StrategySavings {
    fn between(baseline: &PlanResult, candidate: &PlanResult, precision: u32) -> Self {
        let baseline_interest = to_minor_units(baseline.metrics.total_interest, precision);
        let candidate_interest = to_minor_units(candidate.metrics.total_interest, precision);
        Self {
            interest_saved: from_minor_units((baseline_interest - candidate_interest).max(0), precision),
            months_saved: baseline.metrics.months.saturating_sub(candidate.metrics.months),
        }
    }
}

/// Baseline, snowball and avalanche plans with their savings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub baseline: PlanResult,
    pub snowball: PlanResult,
    pub avalanche: PlanResult,
    pub snowball_savings: StrategySavings,
    pub avalanche_savings: StrategySavings,
}

impl StrategyComparison {
    /// Strategy with the lower total interest; avalanche wins ties
    pub fn best_strategy(&self) -> Strategy {
        if self.snowball.metrics.total_interest < self.avalanche.metrics.total_interest {
            Strategy::Snowball
        } else {
            Strategy::Avalanche
        }
    }

    pub fn savings(&self, strategy: Strategy) -> &StrategySavings {
        match strategy {
            Strategy::Snowball => &self.snowball_savings,
            Strategy::Avalanche => &self.avalanche_savings,
        }
    }
}

/// Pre-configured runner for strategy comparisons
///
/// # Example
/// ```ignore
/// let comparator = StrategyComparator::new(StrategyBudget::new(250.0, Strategy::Avalanche));
/// let comparison = comparator.compare(&debts, &extras)?;
/// println!("avalanche saves {}", comparison.avalanche_savings.interest_saved);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StrategyComparator {
    /// Budget shared by all three runs; its strategy field is overridden
    base_budget: StrategyBudget,
}

impl StrategyComparator {
    pub fn new(base_budget: StrategyBudget) -> Self {
        Self { base_budget }
    }

    /// Run a single plan with the base budget directed by `strategy`
    pub fn run(&self, strategy: Strategy, debts: &[Debt], extras: &[ExtraPayment]) -> Result<PlanResult, PlanError> {
        PlanEngine::new(self.base_budget.with_strategy(strategy)).plan(debts, extras)
    }

    /// Run the base budget with the monthly extra removed
    ///
    /// Released minimum payments still roll over; only the monthly extra is dropped.
    pub fn run_baseline(&self, debts: &[Debt], extras: &[ExtraPayment]) -> Result<PlanResult, PlanError> {
        PlanEngine::new(self.base_budget.without_extra()).plan(debts, extras)
    }

    /// Baseline, snowball and avalanche with savings clamped at zero
    pub fn compare(&self, debts: &[Debt], extras: &[ExtraPayment]) -> Result<StrategyComparison, PlanError> {
        let precision = self.base_budget.precision;
        let baseline = self.run_baseline(debts, extras)?;
        let snowball = self.run(Strategy::Snowball, debts, extras)?;
        let avalanche = self.run(Strategy::Avalanche, debts, extras)?;

        Ok(StrategyComparison {
            snowball_savings: StrategySavings::between(&baseline, &snowball, precision),
            avalanche_savings: StrategySavings::between(&baseline, &avalanche, precision),
            baseline,
            snowball,
            avalanche,
        })
    }

    pub fn budget(&self) -> &StrategyBudget {
        &self.base_budget
    }
}

/// Compare strategies for `debts` under `budget`
pub fn compare_strategies(
    debts: &[Debt],
    budget: &StrategyBudget,
    extras: &[ExtraPayment],
) -> Result<StrategyComparison, PlanError> {
    StrategyComparator::new(budget.clone()).compare(debts, extras)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::MonthIndex;
    use proptest::prelude::{any, prop, prop_assert, prop_assert_eq, prop_assume, proptest};

    fn m(token: &str) -> MonthIndex {
        MonthIndex::parse(token).unwrap()
    }

    fn household_debts() -> Vec<Debt> {
        vec![
            Debt::with_min_payment("store_card", 900.0, 0.09, m("2024-01"), 35.0),
            Debt::with_min_payment("visa", 7_500.0, 0.2299, m("2024-01"), 225.0),
            Debt::with_term("car", 14_000.0, 0.069, m("2024-01"), 60),
        ]
    }

    #[test]
    fn test_strategies_beat_baseline() {
        let budget = StrategyBudget::new(300.0, Strategy::Snowball);
        let comparison = compare_strategies(&household_debts(), &budget, &[]).unwrap();

        let baseline = comparison.baseline.metrics.total_interest;
        let snowball = comparison.snowball.metrics.total_interest;
        let avalanche = comparison.avalanche.metrics.total_interest;
        assert!(avalanche <= snowball);
        assert!(snowball <= baseline);

        assert!(comparison.avalanche_savings.interest_saved > 0.0);
        assert!(comparison.snowball_savings.months_saved > 0);
        assert_eq!(comparison.best_strategy(), Strategy::Avalanche);
        assert_eq!(comparison.baseline.strategy, Strategy::Snowball);
        assert_eq!(comparison.avalanche.strategy, Strategy::Avalanche);
    }

    #[test]
    fn test_zero_budget_saves_nothing() {
        let comparison = compare_strategies(&household_debts(), &StrategyBudget::default(), &[]).unwrap();

        // Baseline keeps the default strategy, so the avalanche run is identical
        assert_eq!(comparison.avalanche.metrics, comparison.baseline.metrics);
        assert_eq!(comparison.avalanche_savings.interest_saved, 0.0);
        assert_eq!(comparison.avalanche_savings.months_saved, 0);
        assert!(comparison.savings(Strategy::Snowball).interest_saved >= 0.0);
    }

    #[test]
    fn test_savings_are_clamped_at_zero() {
        let baseline = compare_strategies(&household_debts(), &StrategyBudget::default(), &[])
            .unwrap()
            .baseline;
        let mut worse = baseline.clone();
        worse.metrics.total_interest += 10.0;
        worse.metrics.months += 3;

        let savings = StrategySavings::between(&baseline, &worse, 2);
        assert_eq!(savings.interest_saved, 0.0);
        assert_eq!(savings.months_saved, 0);
    }

    #[test]
    fn test_baseline_keeps_explicit_extras() {
        let debts = vec![Debt::with_term("loan", 1_200.0, 0.0, m("2024-01"), 12)];
        let extras = vec![ExtraPayment::at_installment(
            "loan",
            600.0,
            crate::debt::ExtraPaymentMode::ReduceTerm,
            1,
        )];
        let comparison = compare_strategies(&debts, &StrategyBudget::new(100.0, Strategy::Avalanche), &extras).unwrap();

        assert_eq!(comparison.baseline.metrics.months, 6);
        assert_eq!(comparison.avalanche.metrics.months, 3);
        assert_eq!(comparison.avalanche_savings.months_saved, 3);
        assert_eq!(comparison.avalanche_savings.interest_saved, 0.0);
    }

    #[test]
    fn test_errors_propagate() {
        let mut debts = household_debts();
        debts[0].min_payment = None;
        assert_eq!(
            compare_strategies(&debts, &StrategyBudget::default(), &[]).unwrap_err(),
            PlanError::MissingPaymentBasis { debt_id: "store_card".into() }
        );
    }

    /// Debt set from generated (principal, rate in bp, fixed term?, term, minimum in bp of principal)
    fn generated_debts(specs: &[(u32, u32, bool, u32, u32)]) -> Vec<Debt> {
        specs
            .iter()
            .enumerate()
            .map(|(i, &(principal, rate_bp, fixed_term, term, min_bp))| {
                let id = format!("debt_{i}");
                let principal = principal as f64;
                let rate = rate_bp as f64 / 10_000.0;
                if fixed_term {
                    Debt::with_term(&id, principal, rate, m("2025-01"), term)
                } else {
                    // Always above the first month's interest, so every debt amortizes
                    let min = (principal * rate / 12.0 * 1.2 + 5.0).max(principal * min_bp as f64 / 10_000.0);
                    Debt::with_min_payment(&id, principal, rate, m("2025-01"), (min * 100.0).round() / 100.0)
                }
            })
            .collect()
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_avalanche_never_costs_more_interest(
            specs in prop::collection::vec((200u32..20_000, 0u32..3_000, any::<bool>(), 3u32..72, 100u32..500), 2..5),
            monthly_extra in 1u32..800
        ) {
            let debts = generated_debts(&specs);
            let budget = StrategyBudget::new(monthly_extra as f64, Strategy::Avalanche);
            let comparison = compare_strategies(&debts, &budget, &[]).unwrap();

            prop_assume!(comparison.baseline.metrics.payoff_month.is_some());
            prop_assert!(comparison.snowball.metrics.payoff_month.is_some());
            prop_assert!(comparison.avalanche.metrics.payoff_month.is_some());

            let avalanche = comparison.avalanche.metrics.total_interest;
            prop_assert!(avalanche <= comparison.snowball.metrics.total_interest);
            prop_assert!(avalanche <= comparison.baseline.metrics.total_interest);
            prop_assert!(comparison.avalanche.metrics.months <= comparison.baseline.metrics.months);
            prop_assert!(comparison.snowball_savings.interest_saved >= 0.0);
            prop_assert!(comparison.avalanche_savings.interest_saved >= 0.0);

            // Budget money is only left over once every debt is paid off
            for plan in [&comparison.snowball, &comparison.avalanche] {
                for month in &plan.months[..plan.months.len() - 1] {
                    prop_assert_eq!(month.unused_extra, 0.0);
                }
            }
        }
    }
}

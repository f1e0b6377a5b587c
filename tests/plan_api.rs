use approx::assert_abs_diff_eq;
use debt_planner::debt::{load_debts, load_extra_payments};
use debt_planner::{
    compare_strategies, load_plan_input, plan_debts, simulate_debt, Debt, MonthIndex, ScheduleCache,
    SimulationConfig, Strategy, StrategyBudget,
};
use std::path::PathBuf;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

fn m(token: &str) -> MonthIndex {
    MonthIndex::parse(token).unwrap()
}

#[test]
fn test_json_and_csv_inputs_agree() {
    let from_json = load_plan_input(demo("household.json")).unwrap();
    let debts = load_debts(demo("debts.csv")).unwrap();
    let extras = load_extra_payments(demo("extras.csv")).unwrap();

    assert_eq!(from_json.debts, debts);
    assert_eq!(from_json.extra_payments, extras);
}

#[test]
fn test_household_plan_end_to_end() {
    let input = load_plan_input(demo("household.json")).unwrap();
    let result = plan_debts(&input.debts, &input.budget, &input.extra_payments).unwrap();

    assert_eq!(result.strategy, Strategy::Avalanche);
    assert!(!result.metrics.non_amortizable);
    assert!(result.metrics.payoff_month.is_some());
    assert_eq!(result.months[0].month, m("2025-01"));
    assert_eq!(result.months[0].available_extra, 0.0);
    assert_eq!(result.months[2].available_extra, 300.0);
    assert_eq!(result.months[2].target_debt_id.as_deref(), Some("visa"));

    // Every debt is fully repaid and the ledger rolls balances forward exactly
    let principal: f64 = result.debts.iter().map(|d| d.total_principal).sum();
    assert_abs_diff_eq!(principal, 22_400.0, epsilon = 0.01);
    for debt in &input.debts {
        let mut previous_end: Option<f64> = None;
        for (_, p) in result.payments_for(&debt.id) {
            if let Some(end) = previous_end {
                assert_abs_diff_eq!(p.starting_balance, end, epsilon = 1e-9);
            }
            assert_abs_diff_eq!(
                p.ending_balance,
                p.starting_balance + p.interest + p.fees - p.total_payment,
                epsilon = 1e-6
            );
            previous_end = Some(p.ending_balance);
        }
        assert_eq!(previous_end, Some(0.0));
    }

    let paid: f64 = result.debts.iter().map(|d| d.total_paid).sum();
    assert_abs_diff_eq!(paid, result.metrics.total_paid, epsilon = 1e-6);
}

#[test]
fn test_household_comparison_orders_strategies() {
    let input = load_plan_input(demo("household.json")).unwrap();
    let comparison = compare_strategies(&input.debts, &input.budget, &input.extra_payments).unwrap();

    let baseline = comparison.baseline.metrics.total_interest;
    assert!(comparison.avalanche.metrics.total_interest <= comparison.snowball.metrics.total_interest);
    assert!(comparison.snowball.metrics.total_interest <= baseline);
    assert!(comparison.avalanche_savings.interest_saved > 0.0);
    assert!(comparison.avalanche_savings.months_saved > 0);
    assert!(comparison.avalanche.metrics.months <= comparison.baseline.metrics.months);
}

#[test]
fn test_single_debt_schedule_properties() {
    let debt = Debt::with_term("mortgage", 250_000.0, 0.0575, m("2025-06"), 360);
    let result = simulate_debt(&debt, &[]).unwrap();

    assert_eq!(result.entries.len(), 360);
    assert_eq!(result.metrics.payoff_month, Some(m("2055-05")));
    assert_abs_diff_eq!(result.monthly_payment, 1458.94, epsilon = 0.02);
    assert_eq!(result.entries.last().unwrap().ending_balance, 0.0);
    assert!(result
        .entries
        .windows(2)
        .all(|w| w[1].starting_balance <= w[0].starting_balance));
    assert_abs_diff_eq!(result.metrics.total_principal, 250_000.0, epsilon = 0.01);
}

#[test]
fn test_cached_schedule_matches_fresh_simulation() {
    let debt = Debt::with_min_payment("card", 4_000.0, 0.1799, m("2025-01"), 120.0);
    let mut cache = ScheduleCache::new(SimulationConfig::default());

    let cached = cache.get_or_simulate(&debt).unwrap().clone();
    cache.get_or_simulate(&debt).unwrap();

    assert_eq!(cache.hits(), 1);
    assert_eq!(cached, simulate_debt(&debt, &[]).unwrap());
}

#[test]
fn test_budget_round_trips_through_json() {
    let budget = StrategyBudget {
        extra_start_month: Some(m("2026-01")),
        ..StrategyBudget::new(125.5, Strategy::Snowball)
    };
    let json = serde_json::to_string(&budget).unwrap();
    assert!(json.contains("\"2026-01\""));
    assert!(json.contains("\"snowball\""));
    assert_eq!(serde_json::from_str::<StrategyBudget>(&json).unwrap(), budget);
}

//! JSON plan documents bundling debts, budget and extra payments

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::debt::{Debt, ExtraPayment};
use crate::planner::StrategyBudget;

/// Everything a planner or comparison run needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanInput {
    pub debts: Vec<Debt>,

    #[serde(default)]
    pub budget: StrategyBudget,

    #[serde(default)]
    pub extra_payments: Vec<ExtraPayment>,
}

impl PlanInput {
    pub fn new(debts: Vec<Debt>, budget: StrategyBudget, extra_payments: Vec<ExtraPayment>) -> Self {
        Self { debts, budget, extra_payments }
    }

    pub fn debt(&self, debt_id: &str) -> Option<&Debt> {
        self.debts.iter().find(|d| d.id == debt_id)
    }

    /// Extra payments targeting `debt_id`
    pub fn extras_for(&self, debt_id: &str) -> Vec<ExtraPayment> {
        self.extra_payments
            .iter()
            .filter(|e| e.debt_id == debt_id)
            .cloned()
            .collect()
    }
}

/// Load a plan document from a JSON file
pub fn load_plan_input<P: AsRef<Path>>(path: P) -> Result<PlanInput, Box<dyn Error>> {
    let file = File::open(path)?;
    load_plan_input_from_reader(BufReader::new(file))
}

/// Load a plan document from any reader
///
/// Every debt is validated so malformed documents fail here rather than mid-run.
pub fn load_plan_input_from_reader<R: Read>(reader: R) -> Result<PlanInput, Box<dyn Error>> {
    let input: PlanInput = serde_json::from_reader(reader)?;
    input.budget.validate()?;
    for debt in &input.debts {
        debt.validate_at(input.budget.precision)?;
    }
    for extra in &input.extra_payments {
        extra.validate()?;
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debt::ExtraPaymentMode;
    use crate::planner::Strategy;

    const PLAN_JSON: &str = r#"{
        "debts": [
            {"id": "card", "name": "Visa", "principal": 2500.0, "annual_rate": 0.199,
             "start_month": "2024-01", "min_payment": 75.0},
            {"id": "car", "name": "Auto loan", "principal": 12000.0, "annual_rate": 0.059,
             "apr_type": "effective", "start_month": "2024-03", "term_months": 48, "monthly_fee": 2.5}
        ],
        "budget": {"monthly_extra": 200.0, "strategy": "snowball", "extra_start_month": "2024-06"},
        "extra_payments": [
            {"debt_id": "car", "amount": 1000.0, "mode": "reduce_payment", "month": "2024-12"}
        ]
    }"#;

    #[test]
    fn test_load_plan_document() {
        let input = load_plan_input_from_reader(PLAN_JSON.as_bytes()).unwrap();

        assert_eq!(input.debts.len(), 2);
        assert_eq!(input.debts[0].currency, "USD");
        assert_eq!(input.debt("car").unwrap().term_months, Some(48));
        assert_eq!(input.budget.strategy, Strategy::Snowball);
        assert_eq!(input.budget.precision, 2);
        assert_eq!(input.budget.extra_start_month.map(|m| m.to_string()).as_deref(), Some("2024-06"));

        let extras = input.extras_for("car");
        assert_eq!(extras.len(), 1);
        assert_eq!(extras[0].mode, ExtraPaymentMode::ReducePayment);
        assert!(input.extras_for("card").is_empty());
    }

    #[test]
    fn test_budget_and_extras_are_optional() {
        let json = r#"{"debts": [{"id": "a", "name": "A", "principal": 100.0,
            "annual_rate": 0.0, "start_month": "2025-01", "term_months": 4}]}"#;
        let input = load_plan_input_from_reader(json.as_bytes()).unwrap();

        assert_eq!(input.budget, StrategyBudget::default());
        assert!(input.extra_payments.is_empty());
    }

    #[test]
    fn test_rejects_invalid_documents() {
        let bad_month = PLAN_JSON.replace("\"2024-01\"", "\"2024-13\"");
        assert!(load_plan_input_from_reader(bad_month.as_bytes()).is_err());

        let no_basis = r#"{"debts": [{"id": "a", "name": "A", "principal": 100.0,
            "annual_rate": 0.1, "start_month": "2025-01"}]}"#;
        let err = load_plan_input_from_reader(no_basis.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("needs a term"));
    }
}

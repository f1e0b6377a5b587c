//! Error types for debt simulation and planning

use thiserror::Error;

/// Errors raised for caller input the engine cannot simulate
///
/// A debt that fails to amortize is not an error; it is reported through
/// the `non_amortizable` flag on the result metrics.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlanError {
    #[error("debt {debt_id} needs a term or a minimum payment")]
    MissingPaymentBasis { debt_id: String },

    #[error("invalid debt {debt_id}: {reason}")]
    InvalidDebt { debt_id: String, reason: String },

    #[error("invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),

    #[error("extra payment for debt {debt_id} cannot be resolved to an installment")]
    UnresolvableExtraPayment { debt_id: String },

    #[error("invalid extra payment for debt {debt_id}: {reason}")]
    InvalidExtraPayment { debt_id: String, reason: String },

    #[error("extra payment targets unknown debt {0}")]
    UnknownDebt(String),

    #[error("rounding precision {0} is outside 0..=4")]
    InvalidPrecision(u32),

    #[error("invalid strategy budget: {0}")]
    InvalidBudget(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_debt() {
        let err = PlanError::MissingPaymentBasis { debt_id: "visa".into() };
        assert_eq!(err.to_string(), "debt visa needs a term or a minimum payment");

        let err = PlanError::InvalidMonth("2024-13".into());
        assert!(err.to_string().contains("2024-13"));
    }
}

//! Debt and extra payment records supplied by the caller

use serde::{Deserialize, Serialize};

use crate::amortization::MAX_MONTHS;
use crate::error::PlanError;
use crate::money::to_minor_units;
use crate::month::MonthIndex;

/// Convention used to quote the annual rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AprType {
    /// Annual rate divided evenly across 12 months
    #[default]
    Nominal,
    /// Annual rate already compounded; monthly rate is its 12th root
    Effective,
}

/// A single debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    /// Unique debt identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Outstanding principal at the start month
    pub principal: f64,

    /// Annual rate as a decimal fraction (0.199 for 19.9%)
    pub annual_rate: f64,

    #[serde(default)]
    pub apr_type: AprType,

    /// First installment month
    pub start_month: MonthIndex,

    /// Fixed term in months
    #[serde(default)]
    pub term_months: Option<u32>,

    /// Stated minimum monthly payment
    #[serde(default)]
    pub min_payment: Option<f64>,

    /// Flat fee charged every installment
    #[serde(default)]
    pub monthly_fee: f64,

    /// ISO currency code; plans assume every debt shares it
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Debt {
    /// Create a fixed-term debt with nominal APR and no fee
    pub fn with_term(
        id: &str,
        principal: f64,
        annual_rate: f64,
        start_month: MonthIndex,
        term_months: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            principal,
            annual_rate,
            apr_type: AprType::Nominal,
            start_month,
            term_months: Some(term_months),
            min_payment: None,
            monthly_fee: 0.0,
            currency: default_currency(),
        }
    }

    /// Create a revolving debt paid by a stated minimum, nominal APR and no fee
    pub fn with_min_payment(
        id: &str,
        principal: f64,
        annual_rate: f64,
        start_month: MonthIndex,
        min_payment: f64,
    ) -> Self {
        Self {
            term_months: None,
            min_payment: Some(min_payment),
            ..Self::with_term(id, principal, annual_rate, start_month, 1)
        }
    }

    /// Check field ranges and that a payment basis exists
    pub fn validate(&self) -> Result<(), PlanError> {
        let invalid = |reason: &str| PlanError::InvalidDebt {
            debt_id: self.id.clone(),
            reason: reason.to_string(),
        };

        if !(self.principal.is_finite() && self.principal > 0.0) {
            return Err(invalid("principal must be positive"));
        }
        if !(self.annual_rate.is_finite() && self.annual_rate >= 0.0) {
            return Err(invalid("annual rate must be zero or positive"));
        }
        if !(self.monthly_fee.is_finite() && self.monthly_fee >= 0.0) {
            return Err(invalid("monthly fee must be zero or positive"));
        }
        if self.term_months == Some(0) {
            return Err(invalid("term must be at least one month"));
        }
        if let Some(min) = self.min_payment {
            if !(min.is_finite() && min > 0.0) {
                return Err(invalid("minimum payment must be positive"));
            }
        }
        if self.start_month.checked_add_months(MAX_MONTHS as i32 - 1).is_none() {
            return Err(invalid("start month leaves no room for a full schedule before 9999-12"));
        }
        if self.term_months.is_none() && self.min_payment.is_none() {
            return Err(PlanError::MissingPaymentBasis { debt_id: self.id.clone() });
        }
        Ok(())
    }

    /// `validate`, plus amounts that must survive rounding to `precision`
    pub fn validate_at(&self, precision: u32) -> Result<(), PlanError> {
        self.validate()?;
        let invalid = |reason: String| PlanError::InvalidDebt {
            debt_id: self.id.clone(),
            reason,
        };

        if to_minor_units(self.principal, precision) <= 0 {
            return Err(invalid(format!("principal rounds to zero at precision {}", precision)));
        }
        if let Some(min) = self.min_payment {
            if to_minor_units(min, precision) <= 0 {
                return Err(invalid(format!("minimum payment rounds to zero at precision {}", precision)));
            }
        }
        Ok(())
    }
}

/// How an extra payment changes the rest of the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraPaymentMode {
    /// Keep the regular payment, finish sooner
    #[default]
    ReduceTerm,
    /// Keep the term, lower the regular payment from the next installment
    ReducePayment,
}

/// A one-off extra payment against a named debt
///
/// Timing is an explicit `installment` number or a calendar `month`; the
/// installment wins when both are given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraPayment {
    pub debt_id: String,
    pub amount: f64,
    #[serde(default)]
    pub mode: ExtraPaymentMode,
    #[serde(default)]
    pub installment: Option<u32>,
    #[serde(default)]
    pub month: Option<String>,
}

impl ExtraPayment {
    pub fn at_installment(debt_id: &str, amount: f64, mode: ExtraPaymentMode, installment: u32) -> Self {
        Self {
            debt_id: debt_id.to_string(),
            amount,
            mode,
            installment: Some(installment),
            month: None,
        }
    }

    pub fn in_month(debt_id: &str, amount: f64, mode: ExtraPaymentMode, month: &str) -> Self {
        Self {
            debt_id: debt_id.to_string(),
            amount,
            mode,
            installment: None,
            month: Some(month.to_string()),
        }
    }

    /// Resolve the 1-based installment this payment lands on for a debt starting in `start`
    pub fn resolve_installment(&self, start: &MonthIndex) -> Result<u32, PlanError> {
        let unresolvable = || PlanError::UnresolvableExtraPayment { debt_id: self.debt_id.clone() };

        match (self.installment, self.month.as_deref()) {
            (Some(0), _) => Err(unresolvable()),
            (Some(installment), _) => Ok(installment),
            (None, Some(token)) => {
                let month = MonthIndex::parse(token).map_err(|_| unresolvable())?;
                let installment = month.installment_from(start);
                u32::try_from(installment)
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(unresolvable)
            }
            (None, None) => Err(unresolvable()),
        }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(PlanError::InvalidExtraPayment {
                debt_id: self.debt_id.clone(),
                reason: "amount must be positive".to_string(),
            });
        }
        Ok(())
    }
}

//! Monthly rate resolution and the level-payment formula

use crate::debt::AprType;

/// Convert an annual rate to the monthly rate applied to balances
///
/// Nominal rates are split evenly; effective rates are de-compounded:
/// `(1 + annual)^(1/12) - 1`.
pub fn monthly_rate(annual_rate: f64, apr_type: AprType) -> f64 {
    match apr_type {
        AprType::Nominal => annual_rate / 12.0,
        AprType::Effective => (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0,
    }
}

/// Level payment that retires `principal` over `term` months at `monthly_rate`
///
/// PMT = P * r / (1 - (1 + r)^-n), or P / n when r is exactly zero.
pub fn amortizing_payment(principal: f64, monthly_rate: f64, term: u32) -> f64 {
    if term == 0 {
        return principal;
    }
    if monthly_rate == 0.0 {
        return principal / term as f64;
    }
    principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powi(-(term as i32)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_nominal_monthly_rate() {
        assert_abs_diff_eq!(monthly_rate(0.12, AprType::Nominal), 0.01, epsilon = 1e-12);
        assert_eq!(monthly_rate(0.0, AprType::Nominal), 0.0);
    }

    #[test]
    fn test_effective_monthly_rate() {
        // (1.12)^(1/12) - 1 = 0.009488...
        let rate = monthly_rate(0.12, AprType::Effective);
        assert!(rate > 0.0094 && rate < 0.0095);
        assert_abs_diff_eq!((1.0 + rate).powi(12), 1.12, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_rate_payment_is_even_split() {
        assert_eq!(amortizing_payment(1200.0, 0.0, 12), 100.0);
    }

    #[test]
    fn test_level_payment() {
        let payment = amortizing_payment(12_000.0, 0.01, 12);
        assert_abs_diff_eq!(payment, 1066.19, epsilon = 0.02);
    }

    #[test]
    fn test_single_month_term_repays_with_interest() {
        assert_abs_diff_eq!(amortizing_payment(1000.0, 0.02, 1), 1020.0, epsilon = 1e-9);
    }
}

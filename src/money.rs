//! Fixed-point money helpers
//!
//! Every monetary running total in the engines is kept as an `i64` count of
//! minor units (cents at precision 2). Decimal `f64` amounts only appear at the
//! boundary: when reading a debt and when writing a ledger row.

use crate::error::PlanError;

/// Default rounding precision (decimal places)
pub const DEFAULT_PRECISION: u32 = 2;

/// Largest supported rounding precision
pub const MAX_PRECISION: u32 = 4;

/// Reject precisions outside `0..=MAX_PRECISION`
pub fn check_precision(precision: u32) -> Result<u32, PlanError> {
    if precision > MAX_PRECISION {
        return Err(PlanError::InvalidPrecision(precision));
    }
    Ok(precision)
}

/// Number of minor units in one major unit, e.g. 100 at precision 2
pub fn scale_factor(precision: u32) -> f64 {
    10f64.powi(precision as i32)
}

/// Convert a decimal amount to integer minor units, rounding half away from zero
pub fn to_minor_units(amount: f64, precision: u32) -> i64 {
    (amount * scale_factor(precision)).round() as i64
}

/// Convert integer minor units back to a decimal amount
pub fn from_minor_units(units: i64, precision: u32) -> f64 {
    units as f64 / scale_factor(precision)
}

/// Round a decimal amount to `precision` places via the minor-unit round trip
pub fn round_to_precision(value: f64, precision: u32) -> f64 {
    from_minor_units(to_minor_units(value, precision), precision)
}

/// Interest accrued on a minor-unit balance at `rate`, rounded to a whole minor unit
pub fn accrue(balance: i64, rate: f64) -> i64 {
    (balance as f64 * rate).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_at_default_precision() {
        assert_eq!(to_minor_units(1066.19, 2), 106_619);
        assert_eq!(from_minor_units(106_619, 2), 1066.19);
        assert_eq!(to_minor_units(0.125, 2), 13);
    }

    #[test]
    fn test_precision_zero_and_four() {
        assert_eq!(to_minor_units(99.5, 0), 100);
        assert_eq!(to_minor_units(1.23456, 4), 12_346);
        assert_eq!(round_to_precision(1.23456, 4), 1.2346);
    }

    #[test]
    fn test_accumulation_has_no_drift() {
        let mut total = 0i64;
        for _ in 0..1200 {
            total += to_minor_units(0.1, 2);
        }
        assert_eq!(from_minor_units(total, 2), 120.0);
    }

    #[test]
    fn test_check_precision() {
        assert_eq!(check_precision(4), Ok(4));
        assert_eq!(check_precision(5), Err(PlanError::InvalidPrecision(5)));
    }

    #[test]
    fn test_accrue_rounds_to_minor_unit() {
        // 1000.00 at 1.5% = 15.00; 333.33 at 1% = 3.3333 -> 3.33
        assert_eq!(accrue(100_000, 0.015), 1_500);
        assert_eq!(accrue(33_333, 0.01), 333);
    }
}

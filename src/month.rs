//! Calendar month index (`YYYY-MM`)
//!
//! All month arithmetic in the engines goes through this type, in total-month
//! space (`year * 12 + month - 1`), so no calendar library is needed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// A calendar month, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthIndex {
    year: i32,
    month: u32,
}

impl MonthIndex {
    /// Build a month from a year and a 1-based month number
    pub fn new(year: i32, month: u32) -> Result<Self, PlanError> {
        if !(0..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(PlanError::InvalidMonth(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// Parse a strict `YYYY-MM` token
    pub fn parse(token: &str) -> Result<Self, PlanError> {
        let invalid = || PlanError::InvalidMonth(token.to_string());
        let bytes = token.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let digits_ok = bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit);
        if !digits_ok {
            return Err(invalid());
        }

        let year: i32 = token[..4].parse().map_err(|_| invalid())?;
        let month: u32 = token[5..].parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    fn total_months(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_total_months(total: i64) -> Self {
        Self {
            year: total.div_euclid(12) as i32,
            month: (total.rem_euclid(12) + 1) as u32,
        }
    }

    /// Shift by a signed number of months
    ///
    /// The result may leave the `0000-9999` range that `parse` accepts; use
    /// `checked_add_months` where the month has to stay printable and parseable.
    pub fn add_months(&self, months: i32) -> Self {
        Self::from_total_months(self.total_months() + months as i64)
    }

    /// Shift by a signed number of months, or `None` outside years `0..=9999`
    pub fn checked_add_months(&self, months: i32) -> Option<Self> {
        let shifted = self.add_months(months);
        (0..=9999).contains(&shifted.year).then_some(shifted)
    }

    /// Signed number of months from `self` to `later` (negative if `later` is earlier)
    pub fn months_until(&self, later: &MonthIndex) -> i32 {
        (later.total_months() - self.total_months()) as i32
    }

    /// 1-based installment number of `self` for a debt starting in `start`
    ///
    /// Zero or negative when `self` precedes the start month.
    pub fn installment_from(&self, start: &MonthIndex) -> i32 {
        start.months_until(self) + 1
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthIndex {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MonthIndex {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MonthIndex> for String {
    fn from(value: MonthIndex) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(token: &str) -> MonthIndex {
        MonthIndex::parse(token).unwrap()
    }

    #[test]
    fn test_parse_valid() {
        let month = m("2024-03");
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 3);
        assert_eq!(month.to_string(), "2024-03");
    }

    #[test]
    fn test_parse_rejects_malformed_tokens() {
        for token in ["2024-3", "2024-13", "2024-00", "24-03", "2024/03", "abcd-ef", "2024-03-01", ""] {
            assert_eq!(
                MonthIndex::parse(token),
                Err(PlanError::InvalidMonth(token.to_string())),
                "token {token:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_checked_add_months_stays_in_range() {
        assert_eq!(m("9990-01").checked_add_months(119), Some(m("9999-12")));
        assert_eq!(m("9990-01").checked_add_months(120), None);
        assert_eq!(m("0000-06").checked_add_months(-6), None);

        let last = m("9999-12");
        let token = last.to_string();
        assert_eq!(MonthIndex::parse(&token), Ok(last));
    }

    #[test]
    fn test_add_months_crosses_years() {
        assert_eq!(m("2024-11").add_months(3), m("2025-02"));
        assert_eq!(m("2024-01").add_months(-1), m("2023-12"));
        assert_eq!(m("2024-06").add_months(0), m("2024-06"));
        assert_eq!(m("2024-01").add_months(1199), m("2123-12"));
    }

    #[test]
    fn test_months_until_is_signed() {
        assert_eq!(m("2024-01").months_until(&m("2025-03")), 14);
        assert_eq!(m("2025-03").months_until(&m("2024-01")), -14);
        assert_eq!(m("2024-05").installment_from(&m("2024-05")), 1);
        assert_eq!(m("2024-04").installment_from(&m("2024-05")), 0);
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(m("2023-12") < m("2024-01"));
        assert!(m("2024-02") > m("2024-01"));
        let mut months = vec![m("2025-01"), m("2023-07"), m("2024-12")];
        months.sort();
        assert_eq!(months, vec![m("2023-07"), m("2024-12"), m("2025-01")]);
    }

    #[test]
    fn test_serde_uses_token() {
        let json = serde_json::to_string(&m("2024-09")).unwrap();
        assert_eq!(json, "\"2024-09\"");
        let back: MonthIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m("2024-09"));
        assert!(serde_json::from_str::<MonthIndex>("\"2024-9\"").is_err());
    }
}

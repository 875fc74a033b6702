//! Amount type for handling monetary values with optional dollar signs and commas.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Input may or may not include a
//! dollar sign and thousands separators; output is always written as `-$60,000.00`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

/// Represents a dollar amount.
///
/// Amounts are compared by value, so `$5,000.00` and `5000` are equal.
///
/// The `+` and `-` operators and `Sum` saturate at the bounds of `Decimal`. Use `checked_add` or
/// `checked_sum` where an overflow has to be reported.
///
/// # Examples
///
/// ```
/// # use findash::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("-5000.00").unwrap();
/// let b = Amount::from_str("-$5,000.00").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "-$5,000.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the amount is less than zero.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// `None` when the sum does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Adds up `amounts`, or returns `None` as soon as the running total overflows.
    pub fn checked_sum<I>(amounts: I) -> Option<Amount>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |total, amount| total.checked_add(amount))
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // "-$50.00", "$50.00", "-50.00" or "50.00"
        let without_dollar = match trimmed.strip_prefix('-') {
            Some(after_minus) => match after_minus.strip_prefix('$') {
                Some(after_dollar) => format!("-{after_dollar}"),
                None => trimmed.to_string(),
            },
            None => trimmed.strip_prefix('$').unwrap_or(trimmed).to_string(),
        };

        let without_commas = without_dollar.replace(',', "");
        let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let cents = self
            .0
            .abs()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if self.is_negative() && !cents.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = format!("{cents:.2}");
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
        write!(f, "{sign}${}.{fraction}", group_thousands(whole))
    }
}

/// Inserts a comma between every group of three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (ix, ch) in digits.chars().enumerate() {
        if ix > 0 && (len - ix) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Amount::new(Decimal::from(value))
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::new(Decimal::from(value))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_dollar_sign() {
        let amount = Amount::from_str("$50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_negative_with_dollar_sign() {
        let amount = Amount::from_str("-$50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-50.00").unwrap());
    }

    #[test]
    fn test_parse_empty_string() {
        let amount = Amount::from_str("").unwrap();
        assert_eq!(amount.value(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_multiple_commas() {
        let amount = Amount::from_str("$1,234,567.89").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1234567.89").unwrap());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Amount::from_str("fifty").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from(45000).to_string(), "$45,000.00");
        assert_eq!(Amount::from(-200).to_string(), "-$200.00");
        assert_eq!(Amount::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Amount::from(50)).unwrap();
        assert_eq!(json, "\"$50.00\"");
        let amount: Amount = serde_json::from_str("\"1,000\"").unwrap();
        assert_eq!(amount, Amount::from(1000));
    }

    #[test]
    fn test_zero_is_not_positive_or_negative() {
        let zero = Amount::from_str("-0.00").unwrap();
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert!(zero.is_zero());
    }

    #[test]
    fn test_arithmetic() {
        let mut a = Amount::from(5000);
        a += Amount::from(200);
        assert_eq!(a, Amount::from(5200));
        assert_eq!(a - Amount::from(5300), Amount::from(-100));
        let total: Amount = [Amount::from(1), Amount::from(2)].iter().sum();
        assert_eq!(total, Amount::from(3));
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let max = Amount::new(Decimal::MAX);
        assert_eq!(max.checked_add(Amount::from(1)), None);
        assert_eq!(
            Amount::from(2).checked_add(Amount::from(3)),
            Some(Amount::from(5))
        );
        assert_eq!(Amount::new(Decimal::MIN).checked_sub(Amount::from(1)), None);
        assert_eq!(Amount::checked_sum([max, Amount::from(1)]), None);
        assert_eq!(
            Amount::checked_sum([Amount::from(4), Amount::from(6)]),
            Some(Amount::from(10))
        );
        assert_eq!(Amount::checked_sum([]), Some(Amount::ZERO));
    }

    #[test]
    fn test_operators_saturate() {
        let max = Amount::new(Decimal::MAX);
        assert_eq!(max + Amount::from(1), max);
        assert_eq!(Amount::new(Decimal::MIN) - Amount::from(1), Amount::new(Decimal::MIN));
        let total: Amount = [max, max].iter().sum();
        assert_eq!(total, max);
    }

    #[test]
    fn test_display_is_exact_for_large_amounts() {
        let amount = Amount::from_str("12345678901234567.89").unwrap();
        assert_eq!(amount.to_string(), "$12,345,678,901,234,567.89");
        assert_eq!(
            Amount::new(Decimal::MAX).to_string(),
            "$79,228,162,514,264,337,593,543,950,335.00"
        );
        assert_eq!(
            Amount::new(Decimal::MIN).to_string(),
            "-$79,228,162,514,264,337,593,543,950,335.00"
        );
    }

    #[test]
    fn test_display_rounds_cents() {
        assert_eq!(Amount::from_str("0.005").unwrap().to_string(), "$0.01");
        assert_eq!(Amount::from_str("999.994").unwrap().to_string(), "$999.99");
        assert_eq!(Amount::from_str("-1234.5").unwrap().to_string(), "-$1,234.50");
        assert_eq!(Amount::from(100).to_string(), "$100.00");
        assert_eq!(Amount::from(1000).to_string(), "$1,000.00");
        assert_eq!(Amount::from_str("-0.001").unwrap().to_string(), "$0.00");
    }
}

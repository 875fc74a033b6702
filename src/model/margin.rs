use crate::model::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A profit margin expressed as a fraction, e.g. `0.32` for 32%. Typically in `[-1, 1]` but not
/// bounded. Displays as a percentage with two decimal places, or as the bare fraction when it is
/// too large to scale to a percentage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Margin(Decimal);

impl Margin {
    pub const ZERO: Margin = Margin(Decimal::ZERO);

    pub const fn new(fraction: Decimal) -> Self {
        Self(fraction)
    }

    /// The fraction, e.g. `0.32`.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// `(revenue - expenses) / revenue`, or `None` when `revenue` is zero or the result does not
    /// fit in a `Decimal`.
    pub fn checked_from_totals(revenue: Amount, expenses: Amount) -> Option<Self> {
        if revenue.is_zero() {
            return None;
        }
        revenue
            .checked_sub(expenses)?
            .value()
            .checked_div(revenue.value())
            .map(Margin)
    }

    /// Like `checked_from_totals` but a zero revenue gives a zero margin. `None` only when the
    /// result does not fit in a `Decimal`.
    pub fn from_totals(revenue: Amount, expenses: Amount) -> Option<Self> {
        if revenue.is_zero() {
            Some(Margin::ZERO)
        } else {
            Self::checked_from_totals(revenue, expenses)
        }
    }
}

impl Display for Margin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0.checked_mul(Decimal::ONE_HUNDRED) {
            Some(percent) => write!(f, "{:.2}%", percent.round_dp(2)),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<Decimal> for Margin {
    fn from(value: Decimal) -> Self {
        Margin(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_as_percent() {
        assert_eq!(Margin::new(Decimal::new(32, 2)).to_string(), "32.00%");
        assert_eq!(Margin::new(Decimal::new(-5, 1)).to_string(), "-50.00%");
        assert_eq!(Margin::ZERO.to_string(), "0.00%");
    }

    #[test]
    fn test_from_totals() {
        let m = Margin::from_totals(Amount::from(1000), Amount::from(750)).unwrap();
        assert_eq!(m.value(), Decimal::new(25, 2));
    }

    #[test]
    fn test_zero_revenue() {
        assert!(Margin::checked_from_totals(Amount::ZERO, Amount::from(10)).is_none());
        assert_eq!(
            Margin::from_totals(Amount::ZERO, Amount::from(10)),
            Some(Margin::ZERO)
        );
    }

    #[test]
    fn test_unscalable_margin_displays_as_fraction() {
        let huge = Decimal::from_str("-999999999999999999999999999").unwrap();
        assert_eq!(Margin::new(huge).to_string(), "-999999999999999999999999999");
        assert_eq!(Margin::new(Decimal::MAX).to_string(), Decimal::MAX.to_string());
        let large = Decimal::from_str("-1000000000000000000000000").unwrap();
        assert_eq!(
            Margin::new(large).to_string(),
            "-100000000000000000000000000.00%"
        );
    }

    #[test]
    fn test_overflowing_division_is_none() {
        let tiny = Amount::new(Decimal::new(1, 28));
        let expenses = Amount::from(10_000_000_000i64);
        assert_eq!(Margin::checked_from_totals(tiny, expenses), None);
        assert_eq!(Margin::from_totals(tiny, expenses), None);
    }

    #[test]
    fn test_huge_negative_margin_from_totals() {
        let revenue = Amount::new(Decimal::new(1, 2));
        let expenses = Amount::new(Decimal::from_str("10000000000000000000000000").unwrap());
        let margin = Margin::checked_from_totals(revenue, expenses).unwrap();
        assert_eq!(
            margin.value(),
            Decimal::from_str("-999999999999999999999999999").unwrap()
        );
        assert_eq!(margin.to_string(), "-999999999999999999999999999");
    }
}

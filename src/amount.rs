//! Fixed-point monetary amounts in the smallest tradable unit.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Most decimal places a unit scale may carry (satoshi-sized units).
pub const MAX_DECIMALS: u32 = 8;

/// Amount in minor units of the reference currency.
///
/// `Amount(100050)` is 1000.50 when the unit scale has two decimals.
/// Integer minor units keep plan conservation exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Amount(pub i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Minor units per major unit for `decimals` places, or `None` past [`MAX_DECIMALS`].
    pub fn scale(decimals: u32) -> Option<i64> {
        if decimals > MAX_DECIMALS {
            return None;
        }
        Some(10_i64.pow(decimals))
    }

    /// Convert a major-unit value, rounding half to even.
    ///
    /// Returns `None` for non-finite input, an unsupported scale, or a value
    /// that does not fit in `i64` minor units.
    pub fn from_major(value: f64, decimals: u32) -> Option<Amount> {
        if !value.is_finite() {
            return None;
        }
        let scale = Self::scale(decimals)?;
        let scaled = (value * scale as f64).round_ties_even();
        // 2^63 is exactly representable; anything at or past it overflows.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        if !(-LIMIT..LIMIT).contains(&scaled) {
            return None;
        }
        Some(Amount(scaled as i64))
    }

    /// Value in major units. Lossy for very large amounts.
    pub fn to_major(self, decimals: u32) -> f64 {
        let scale = Self::scale(decimals.min(MAX_DECIMALS)).unwrap_or(1);
        self.0 as f64 / scale as f64
    }

    pub fn abs(self) -> Amount {
        Amount(self.0.saturating_abs())
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Render with `decimals` fractional digits.
    pub fn display(self, decimals: u32) -> AmountDisplay {
        AmountDisplay {
            amount: self,
            decimals: decimals.min(MAX_DECIMALS),
        }
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

/// Display adapter returned by [`Amount::display`].
#[derive(Clone, Copy, Debug)]
pub struct AmountDisplay {
    amount: Amount,
    decimals: u32,
}

impl fmt::Display for AmountDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.amount.0;
        let sign = if raw < 0 { "-" } else { "" };
        let magnitude = raw.unsigned_abs();
        if self.decimals == 0 {
            return f.pad(&format!("{sign}{magnitude}"));
        }
        let scale = 10_u64.pow(self.decimals);
        let whole = magnitude / scale;
        let frac = magnitude % scale;
        let width = self.decimals as usize;
        f.pad(&format!("{sign}{whole}.{frac:0width$}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_cents() {
        assert_eq!(Amount(100050).display(2).to_string(), "1000.50");
        assert_eq!(Amount(5).display(2).to_string(), "0.05");
        assert_eq!(Amount(-250).display(2).to_string(), "-2.50");
        assert_eq!(Amount(-5).display(2).to_string(), "-0.05");
    }

    #[test]
    fn display_other_scales() {
        assert_eq!(Amount(42).display(0).to_string(), "42");
        assert_eq!(Amount(1_00000001).display(8).to_string(), "1.00000001");
    }

    #[test]
    fn display_respects_width() {
        assert_eq!(format!("{:>8}", Amount(150).display(2)), "    1.50");
    }

    #[test]
    fn from_major_rounds_half_to_even() {
        assert_eq!(Amount::from_major(0.125, 2), Some(Amount(12)));
        assert_eq!(Amount::from_major(0.375, 2), Some(Amount(38)));
        assert_eq!(Amount::from_major(2.5, 0), Some(Amount(2)));
        assert_eq!(Amount::from_major(3.5, 0), Some(Amount(4)));
        assert_eq!(Amount::from_major(-2.5, 0), Some(Amount(-2)));
    }

    #[test]
    fn from_major_rejects_bad_input() {
        assert_eq!(Amount::from_major(f64::NAN, 2), None);
        assert_eq!(Amount::from_major(f64::INFINITY, 2), None);
        assert_eq!(Amount::from_major(1e30, 2), None);
        assert_eq!(Amount::from_major(1.0, 9), None);
    }

    #[test]
    fn to_major_round_trips_cents() {
        assert_eq!(Amount(1_234_50).to_major(2), 1234.5);
    }

    #[test]
    fn arithmetic() {
        let total: Amount = [Amount(100), Amount(-40), Amount(-60)].iter().sum();
        assert_eq!(total, Amount::ZERO);
        assert_eq!(-Amount(5), Amount(-5));
        assert_eq!(Amount(7) - Amount(10), Amount(-3));
        assert_eq!(Amount(-9).abs(), Amount(9));
        assert_eq!(Amount(i64::MAX).checked_add(Amount(1)), None);
    }
}

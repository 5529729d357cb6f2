//! Risk level: the user's slider position, always in `[1, 10]`.

use std::fmt;

/// A risk level in `[RiskLevel::MIN, RiskLevel::MAX]`.
///
/// The only constructor clamps, so every value of this type indexes a valid
/// curve row. Out-of-range input is a normal UI state, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RiskLevel(u8);

impl RiskLevel {
    pub const MIN: RiskLevel = RiskLevel(1);
    pub const MAX: RiskLevel = RiskLevel(10);

    /// Number of distinct levels.
    pub const COUNT: usize = 10;

    /// Clamp any integer into range.
    pub fn clamped(level: i64) -> Self {
        RiskLevel(level.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based row index into the curve table.
    pub(crate) fn row(self) -> usize {
        (self.0 - 1) as usize
    }

    /// All levels, lowest first.
    pub fn all() -> impl Iterator<Item = RiskLevel> {
        (Self::MIN.0..=Self::MAX.0).map(RiskLevel)
    }
}

impl From<i64> for RiskLevel {
    fn from(level: i64) -> Self {
        RiskLevel::clamped(level)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RiskLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <i64 as serde::Deserialize>::deserialize(deserializer)?;
        Ok(RiskLevel::clamped(raw))
    }
}

//! The closed set of portfolio asset classes.

use std::fmt;
use std::str::FromStr;

/// One of the five portfolio buckets the allocation curve is tuned for.
///
/// Declaration order is the canonical order: safest first, most speculative
/// last. Tables, iteration and tie-breaks all follow it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AssetClass {
    Stablecoin,
    Bitcoin,
    LargeCapAlt,
    MidCapAlt,
    SmallCapAlt,
}

impl AssetClass {
    /// Number of asset classes.
    pub const COUNT: usize = 5;

    /// All classes in canonical order.
    pub const ALL: [AssetClass; Self::COUNT] = [
        AssetClass::Stablecoin,
        AssetClass::Bitcoin,
        AssetClass::LargeCapAlt,
        AssetClass::MidCapAlt,
        AssetClass::SmallCapAlt,
    ];

    /// Position in [`AssetClass::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// snake_case identifier, as used in holdings files.
    pub const fn name(self) -> &'static str {
        match self {
            AssetClass::Stablecoin => "stablecoin",
            AssetClass::Bitcoin => "bitcoin",
            AssetClass::LargeCapAlt => "large_cap_alt",
            AssetClass::MidCapAlt => "mid_cap_alt",
            AssetClass::SmallCapAlt => "small_cap_alt",
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            AssetClass::Stablecoin => "Stablecoin",
            AssetClass::Bitcoin => "Bitcoin",
            AssetClass::LargeCapAlt => "Large-cap alt",
            AssetClass::MidCapAlt => "Mid-cap alt",
            AssetClass::SmallCapAlt => "Small-cap alt",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Returned when a string names no asset class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown asset class: {0:?}")]
pub struct ParseAssetClassError(pub String);

impl FromStr for AssetClass {
    type Err = ParseAssetClassError;

    /// Accepts the snake_case name or the CamelCase variant name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetClass::ALL
            .into_iter()
            .find(|class| class.name() == s || format!("{class:?}") == s)
            .ok_or_else(|| ParseAssetClassError(s.to_string()))
    }
}

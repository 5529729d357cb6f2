//! Caller-supplied valuation of current holdings.

use crate::asset::AssetClass;

/// Market value per asset class, in major units of one reference currency.
///
/// Absent classes are zero. Values are stored as given; the planner rejects
/// non-finite values and treats negative values as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HoldingsSnapshot {
    values: [f64; AssetClass::COUNT],
}

impl HoldingsSnapshot {
    /// An empty portfolio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`HoldingsSnapshot::set`].
    pub fn with(mut self, class: AssetClass, value: f64) -> Self {
        self.set(class, value);
        self
    }

    /// Replace the value held in `class`.
    pub fn set(&mut self, class: AssetClass, value: f64) {
        self.values[class.index()] = value;
    }

    /// Value held in `class`, zero if never set.
    pub fn get(&self, class: AssetClass) -> f64 {
        self.values[class.index()]
    }

    /// `(class, value)` pairs in canonical order, including zeros.
    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, f64)> + '_ {
        AssetClass::ALL
            .into_iter()
            .map(move |class| (class, self.get(class)))
    }
}

/// Later entries for the same class overwrite earlier ones.
impl FromIterator<(AssetClass, f64)> for HoldingsSnapshot {
    fn from_iter<I: IntoIterator<Item = (AssetClass, f64)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (class, value) in iter {
            snapshot.set(class, value);
        }
        snapshot
    }
}

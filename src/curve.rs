//! Allocation curve: risk level -> target percentage per asset class.
//!
//! The curve is a static ten-row table, not a fitted formula. Rows are
//! authored by hand and checked once for the invariants every caller relies
//! on (each row sums to 100, safe classes shrink and speculative classes grow
//! with risk, no class jumps more than [`MAX_LEVEL_STEP`] points between
//! adjacent levels). A curve that fails validation is never constructed.

use std::fmt;
use std::sync::LazyLock;

use crate::asset::AssetClass;
use crate::error::CurveError;
use crate::risk_level::RiskLevel;

/// Largest move, in percentage points, any class may make between adjacent levels.
pub const MAX_LEVEL_STEP: u8 = 10;

/// Built-in table. Columns follow [`AssetClass::ALL`]:
/// stablecoin, bitcoin, large-cap, mid-cap, small-cap.
const STANDARD_ROWS: [[u8; AssetClass::COUNT]; RiskLevel::COUNT] = [
    [60, 30, 7, 2, 1],
    [52, 30, 10, 5, 3],
    [45, 29, 13, 8, 5],
    [38, 28, 15, 11, 8],
    [31, 27, 17, 14, 11],
    [24, 26, 19, 17, 14],
    [18, 24, 21, 20, 17],
    [12, 22, 23, 23, 20],
    [6, 20, 25, 25, 24],
    [0, 18, 27, 27, 28],
];

static STANDARD: LazyLock<AllocationCurve> = LazyLock::new(|| {
    match AllocationCurve::try_new(STANDARD_ROWS) {
        Ok(curve) => curve,
        Err(e) => panic!("built-in allocation curve is invalid: {e}"),
    }
});

/// Target allocation for one risk level over the standard curve.
///
/// Any integer is accepted; out-of-range levels clamp to 1 or 10.
pub fn target_allocation(level: i64) -> AllocationTarget {
    AllocationCurve::standard().target(RiskLevel::clamped(level))
}

/// Target percentages for one risk level. Always sums to 100.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AllocationTarget {
    level: RiskLevel,
    percentages: [u8; AssetClass::COUNT],
}

impl AllocationTarget {
    /// The level this row belongs to.
    pub fn level(&self) -> RiskLevel {
        self.level
    }

    /// Target percentage for `class`.
    pub fn get(&self, class: AssetClass) -> u8 {
        self.percentages[class.index()]
    }

    /// Percentages in canonical class order.
    pub fn percentages(&self) -> [u8; AssetClass::COUNT] {
        self.percentages
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, u8)> + '_ {
        AssetClass::ALL
            .into_iter()
            .map(move |class| (class, self.get(class)))
    }

    pub fn total(&self) -> u32 {
        self.percentages.iter().map(|&p| p as u32).sum()
    }
}

impl fmt::Display for AllocationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RISK LEVEL {}:", self.level)?;
        for (class, pct) in self.iter() {
            writeln!(f, "  {:14} {:>3}%", class, pct)?;
        }
        Ok(())
    }
}

/// A validated ten-row allocation table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationCurve {
    rows: [[u8; AssetClass::COUNT]; RiskLevel::COUNT],
}

impl AllocationCurve {
    /// The process-wide built-in curve.
    ///
    /// # Panics
    ///
    /// Panics on first access if the built-in table fails validation. No
    /// plan is ever produced from an invalid table.
    pub fn standard() -> &'static AllocationCurve {
        &STANDARD
    }

    /// Build a curve from caller-authored rows (level 1 first).
    pub fn try_new(rows: [[u8; AssetClass::COUNT]; RiskLevel::COUNT]) -> Result<Self, CurveError> {
        validate(&rows)?;
        Ok(Self { rows })
    }

    /// Row for `level`.
    pub fn target(&self, level: RiskLevel) -> AllocationTarget {
        AllocationTarget {
            level,
            percentages: self.rows[level.row()],
        }
    }

    /// All ten rows, lowest risk first.
    pub fn targets(&self) -> impl Iterator<Item = AllocationTarget> + '_ {
        RiskLevel::all().map(move |level| self.target(level))
    }
}

impl Default for AllocationCurve {
    fn default() -> Self {
        AllocationCurve::standard().clone()
    }
}

/// Which way a column is allowed to move as risk increases.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Glide {
    NonIncreasing,
    NonDecreasing,
    /// Either direction, as long as it never reverses.
    Monotonic,
}

fn glide_for(class: AssetClass) -> Glide {
    match class {
        AssetClass::Stablecoin | AssetClass::Bitcoin => Glide::NonIncreasing,
        AssetClass::SmallCapAlt => Glide::NonDecreasing,
        AssetClass::LargeCapAlt | AssetClass::MidCapAlt => Glide::Monotonic,
    }
}

fn validate(rows: &[[u8; AssetClass::COUNT]; RiskLevel::COUNT]) -> Result<(), CurveError> {
    for (i, row) in rows.iter().enumerate() {
        let sum: u32 = row.iter().map(|&p| p as u32).sum();
        if sum != 100 {
            return Err(CurveError::RowSum {
                level: i as u8 + 1,
                sum,
            });
        }
    }

    for class in AssetClass::ALL {
        let col = class.index();
        let glide = glide_for(class);
        // Sign of the first non-flat step, for columns free to pick a direction.
        let mut direction = 0_i16;

        for (i, pair) in rows.windows(2).enumerate() {
            let level = i as u8 + 1;
            let (from, to) = (pair[0][col], pair[1][col]);
            let step = to as i16 - from as i16;

            match glide {
                Glide::NonIncreasing if step > 0 => {
                    return Err(CurveError::MustNotIncrease { class, level });
                }
                Glide::NonDecreasing if step < 0 => {
                    return Err(CurveError::MustNotDecrease { class, level });
                }
                Glide::Monotonic if step != 0 => {
                    if direction != 0 && step.signum() != direction {
                        return Err(CurveError::NotMonotonic { class, level });
                    }
                    direction = step.signum();
                }
                _ => {}
            }

            let magnitude = step.unsigned_abs();
            if magnitude > MAX_LEVEL_STEP as u16 {
                return Err(CurveError::StepTooLarge {
                    class,
                    level,
                    step: magnitude as u8,
                    max: MAX_LEVEL_STEP,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_rows_validate() {
        assert!(AllocationCurve::try_new(STANDARD_ROWS).is_ok());
    }

    #[test]
    fn level_one_row() {
        let t = target_allocation(1);
        assert_eq!(t.percentages(), [60, 30, 7, 2, 1]);
        assert_eq!(t.level(), RiskLevel::MIN);
    }

    #[test]
    fn level_ten_has_no_stablecoins() {
        let t = target_allocation(10);
        assert_eq!(t.get(AssetClass::Stablecoin), 0);
        assert_eq!(t.get(AssetClass::SmallCapAlt), 28);
    }

    #[test]
    fn clamps_out_of_range() {
        assert_eq!(target_allocation(0), target_allocation(1));
        assert_eq!(target_allocation(-5), target_allocation(1));
        assert_eq!(target_allocation(99), target_allocation(10));
    }

    #[test]
    fn targets_iterates_all_levels() {
        let levels: Vec<u8> = AllocationCurve::standard()
            .targets()
            .map(|t| t.level().get())
            .collect();
        assert_eq!(levels, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn reject_bad_sum() {
        let mut rows = STANDARD_ROWS;
        rows[4][0] += 1;
        assert_eq!(
            AllocationCurve::try_new(rows),
            Err(CurveError::RowSum { level: 5, sum: 101 })
        );
    }

    #[test]
    fn reject_rising_stablecoin() {
        let mut rows = STANDARD_ROWS;
        // level 3 stablecoin above level 2, funded from mid and small caps
        rows[2] = [53, 29, 13, 5, 0];
        assert_eq!(
            AllocationCurve::try_new(rows),
            Err(CurveError::MustNotIncrease {
                class: AssetClass::Stablecoin,
                level: 2,
            })
        );
    }

    #[test]
    fn reject_falling_small_cap() {
        let mut rows = STANDARD_ROWS;
        // level 10 small-cap below level 9
        rows[9] = [0, 20, 28, 29, 23];
        assert_eq!(
            AllocationCurve::try_new(rows),
            Err(CurveError::MustNotDecrease {
                class: AssetClass::SmallCapAlt,
                level: 9,
            })
        );
    }

    #[test]
    fn reject_reversing_mid_cap() {
        let mut rows = STANDARD_ROWS;
        // level 6 mid-cap dips below level 5
        rows[5] = [24, 26, 19, 13, 18];
        assert_eq!(
            AllocationCurve::try_new(rows),
            Err(CurveError::NotMonotonic {
                class: AssetClass::MidCapAlt,
                level: 5,
            })
        );
    }

    #[test]
    fn reject_large_step() {
        let mut rows = STANDARD_ROWS;
        // stablecoin drops 60 -> 40 between levels 1 and 2
        rows[1] = [40, 30, 14, 10, 6];
        rows[2] = [40, 29, 15, 10, 6];
        assert_eq!(
            AllocationCurve::try_new(rows),
            Err(CurveError::StepTooLarge {
                class: AssetClass::Stablecoin,
                level: 1,
                step: 20,
                max: MAX_LEVEL_STEP,
            })
        );
    }

    #[test]
    fn flat_columns_are_monotonic() {
        let rows = [[20, 20, 20, 20, 20]; RiskLevel::COUNT];
        assert!(AllocationCurve::try_new(rows).is_ok());
    }

    #[test]
    fn display_lists_every_class() {
        let text = target_allocation(5).to_string();
        assert!(text.starts_with("RISK LEVEL 5:"));
        for class in AssetClass::ALL {
            assert!(text.contains(class.label()));
        }
    }
}

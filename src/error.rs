//! Error types for curve validation and plan evaluation.

use crate::asset::AssetClass;

/// A curve table that breaks one of its invariants.
///
/// Levels are 1-based. Step errors name the lower of the two adjacent levels.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CurveError {
    #[error("level {level}: row sums to {sum}, expected 100")]
    RowSum { level: u8, sum: u32 },

    #[error("{class} must not increase with risk (level {level} -> {next})", next = .level + 1)]
    MustNotIncrease { class: AssetClass, level: u8 },

    #[error("{class} must not decrease with risk (level {level} -> {next})", next = .level + 1)]
    MustNotDecrease { class: AssetClass, level: u8 },

    #[error("{class} reverses direction at level {level}")]
    NotMonotonic { class: AssetClass, level: u8 },

    #[error("{class} moves {step} points between levels {level} and {next} (max {max})", next = .level + 1)]
    StepTooLarge {
        class: AssetClass,
        level: u8,
        step: u8,
        max: u8,
    },
}

/// Rejected plan inputs. These are caller programming errors; empty
/// portfolios and out-of-range levels are not errors.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("tolerance must be a non-negative number of percentage points, got {0}")]
    InvalidTolerance(f64),

    #[error("holding for {class} is not finite: {value}")]
    NonFiniteHolding { class: AssetClass, value: f64 },

    #[error("unit scale supports at most {max} decimals, got {0}", max = crate::amount::MAX_DECIMALS)]
    InvalidDecimals(u32),

    #[error("portfolio value does not fit in fixed-point minor units")]
    Overflow,
}

// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! # glidepath
//!
//! A risk-tiered allocation curve and a deterministic rebalance planner for
//! crypto portfolios split across five asset classes.
//!
//! ## Features
//!
//! - **Allocation curve**: ten hand-authored rows, one per risk level, validated
//!   once for sum-to-100 and monotonic glide
//! - **Clamping**: any integer risk level maps to a valid row, never an error
//! - **Rebalance planner**: per-class drift, tolerance filtering, largest moves first
//! - **Conservation**: plan deltas always net to exactly zero minor units
//! - **Fixed-point amounts**: integer minor units with round-half-to-even
//!
//! ## Quick Start
//!
//! ```
//! use glidepath::{plan, target_allocation, AssetClass, Direction, HoldingsSnapshot};
//!
//! let target = target_allocation(1);
//! assert_eq!(target.get(AssetClass::Stablecoin), 60);
//! assert_eq!(target.total(), 100);
//!
//! let holdings = HoldingsSnapshot::new()
//!     .with(AssetClass::Stablecoin, 900.0)
//!     .with(AssetClass::Bitcoin, 100.0);
//!
//! let plan = plan(1, &holdings, 1.0).unwrap();
//! assert_eq!(plan.actions[0].asset_class, AssetClass::Stablecoin);
//! assert_eq!(plan.actions[0].direction(), Direction::Sell);
//! assert_eq!(plan.actions[0].delta_value.0, -300_00);
//! assert_eq!(plan.net_delta().0, 0);
//! ```
//!
//! ## Risk Levels
//!
//! Levels run from 1 (capital preservation) to 10 (speculative). Inputs outside
//! that range clamp to the nearest boundary:
//!
//! ```
//! use glidepath::target_allocation;
//!
//! assert_eq!(target_allocation(-5), target_allocation(1));
//! assert_eq!(target_allocation(99), target_allocation(10));
//! ```
//!
//! ## Amount Representation
//!
//! Plan values are stored as [`i64`] in the smallest tradable unit. With the
//! default two decimals that is cents:
//!
//! ```
//! use glidepath::Amount;
//!
//! let amount = Amount(1_234_50);
//! assert_eq!(amount.display(2).to_string(), "1234.50");
//! ```
//!
//! ## Errors
//!
//! Empty portfolios and out-of-range levels are ordinary inputs. Only a
//! negative tolerance or a non-finite holding value is rejected:
//!
//! ```
//! use glidepath::{plan, AssetClass, HoldingsSnapshot, PlanError};
//!
//! let empty = plan(10, &HoldingsSnapshot::new(), 1.0).unwrap();
//! assert!(empty.is_empty());
//!
//! let err = plan(5, &HoldingsSnapshot::new(), -1.0).unwrap_err();
//! assert!(matches!(err, PlanError::InvalidTolerance(_)));
//!
//! let bad = HoldingsSnapshot::new().with(AssetClass::Bitcoin, f64::NAN);
//! assert!(matches!(plan(5, &bad, 1.0), Err(PlanError::NonFiniteHolding { .. })));
//! ```

pub mod amount;
pub mod asset;
pub mod curve;
pub mod error;
pub mod holdings;
pub mod planner;
pub mod risk_level;

pub use amount::{Amount, AmountDisplay, MAX_DECIMALS};
pub use asset::{AssetClass, ParseAssetClassError};
pub use curve::{AllocationCurve, AllocationTarget, MAX_LEVEL_STEP, target_allocation};
pub use error::{CurveError, PlanError};
pub use holdings::HoldingsSnapshot;
pub use planner::{
    DEFAULT_DECIMALS, DEFAULT_TOLERANCE_PCT, Direction, Planner, RebalanceAction, RebalancePlan,
    plan,
};
pub use risk_level::RiskLevel;

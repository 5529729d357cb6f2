//! Rebalance planner: CURRENT holdings -> TARGET allocation deltas.
//!
//! One pass, no state. Values are converted to fixed-point minor units up
//! front so that the plan's buys and sells net to exactly zero.
//!
//! Conservation under tolerance filtering: a class inside tolerance is left
//! alone, but if the out-of-tolerance classes alone do not net to zero, the
//! in-tolerance classes whose moves offset the imbalance are pulled in as
//! funding legs, largest first, until the plan balances.

use std::fmt;

use crate::amount::{Amount, MAX_DECIMALS};
use crate::asset::AssetClass;
use crate::curve::AllocationCurve;
use crate::error::PlanError;
use crate::holdings::HoldingsSnapshot;
use crate::risk_level::RiskLevel;

/// Default minimum drift, in percentage points, before a class is traded.
pub const DEFAULT_TOLERANCE_PCT: f64 = 1.0;

/// Default unit scale: two decimals (cents).
pub const DEFAULT_DECIMALS: u32 = 2;

/// Plan with the standard curve and two-decimal minor units.
///
/// `level` is clamped to `[1, 10]`.
///
/// # Errors
///
/// - [`PlanError::InvalidTolerance`] for a negative or NaN tolerance.
/// - [`PlanError::NonFiniteHolding`] for a NaN or infinite holding.
/// - [`PlanError::Overflow`] when a holding or the portfolio total, in minor
///   units, does not fit an `i64` (about 9.2e16 major units at two decimals).
pub fn plan(
    level: i64,
    holdings: &HoldingsSnapshot,
    tolerance_pct: f64,
) -> Result<RebalancePlan, PlanError> {
    Planner::new(tolerance_pct)?.plan(RiskLevel::clamped(level), holdings)
}

/// Trade direction of a single action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Buy,
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => f.pad("BUY"),
            Direction::Sell => f.pad("SELL"),
        }
    }
}

/// One asset class that has to move.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RebalanceAction {
    pub asset_class: AssetClass,
    pub current_value: Amount,
    /// Share of the portfolio today, 0-100.
    pub current_pct: f64,
    pub target_pct: u8,
    pub target_value: Amount,
    /// Positive = buy, negative = sell.
    pub delta_value: Amount,
}

impl RebalanceAction {
    pub fn direction(&self) -> Direction {
        if self.delta_value.0 < 0 {
            Direction::Sell
        } else {
            Direction::Buy
        }
    }

    /// Signed drift in percentage points (current minus target).
    pub fn drift_pct(&self) -> f64 {
        self.current_pct - self.target_pct as f64
    }
}

/// Ordered actions for one evaluation, largest absolute delta first.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RebalancePlan {
    pub level: RiskLevel,
    pub total_value: Amount,
    pub tolerance_pct: f64,
    /// Decimal places of the minor unit used for every amount in this plan.
    pub decimals: u32,
    pub actions: Vec<RebalanceAction>,
}

impl RebalancePlan {
    fn empty(level: RiskLevel, total_value: Amount, tolerance_pct: f64, decimals: u32) -> Self {
        Self {
            level,
            total_value,
            tolerance_pct,
            decimals,
            actions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Sum of all deltas. Zero for every plan the planner returns.
    pub fn net_delta(&self) -> Amount {
        self.actions.iter().map(|a| a.delta_value).sum()
    }

    /// Total value bought (equal to total value sold).
    pub fn turnover(&self) -> Amount {
        self.actions
            .iter()
            .filter(|a| a.direction() == Direction::Buy)
            .map(|a| a.delta_value)
            .sum()
    }

    /// The action for `class`, if the plan touches it.
    pub fn action(&self, class: AssetClass) -> Option<&RebalanceAction> {
        self.actions.iter().find(|a| a.asset_class == class)
    }
}

impl fmt::Display for RebalancePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.decimals;
        writeln!(
            f,
            "REBALANCE PLAN (risk level {}, total {}, tolerance {:.2}pp):",
            self.level,
            self.total_value.display(d),
            self.tolerance_pct,
        )?;
        if self.actions.is_empty() {
            if self.total_value.is_zero() {
                writeln!(f, "  no action: portfolio is empty")?;
            } else {
                writeln!(f, "  no action: every class is within tolerance")?;
            }
            return Ok(());
        }
        writeln!(
            f,
            "  {:14} {:>4} {:>14} {:>9} {:>8} {:>14} {:>14}",
            "Class", "Side", "Current", "Current%", "Target%", "Target", "Delta"
        )?;
        for a in &self.actions {
            writeln!(
                f,
                "  {:14} {:>4} {:>14} {:>8.2}% {:>7}% {:>14} {:>14}",
                a.asset_class,
                a.direction(),
                a.current_value.display(d),
                a.current_pct,
                a.target_pct,
                a.target_value.display(d),
                a.delta_value.display(d),
            )?;
        }
        writeln!(f, "\n  Turnover: {}", self.turnover().display(d))?;
        Ok(())
    }
}

/// Rebalance planner over one allocation curve.
#[derive(Clone, Debug)]
pub struct Planner {
    curve: AllocationCurve,
    tolerance_pct: f64,
    decimals: u32,
}

impl Default for Planner {
    fn default() -> Self {
        Self {
            curve: AllocationCurve::default(),
            tolerance_pct: DEFAULT_TOLERANCE_PCT,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl Planner {
    /// Planner over the standard curve with two-decimal units.
    pub fn new(tolerance_pct: f64) -> Result<Self, PlanError> {
        if tolerance_pct.is_nan() || tolerance_pct < 0.0 {
            return Err(PlanError::InvalidTolerance(tolerance_pct));
        }
        Ok(Self {
            tolerance_pct,
            ..Self::default()
        })
    }

    /// Use a different unit scale (0 to [`MAX_DECIMALS`] places).
    pub fn with_decimals(mut self, decimals: u32) -> Result<Self, PlanError> {
        if decimals > MAX_DECIMALS {
            return Err(PlanError::InvalidDecimals(decimals));
        }
        self.decimals = decimals;
        Ok(self)
    }

    /// Plan against a caller-validated curve instead of the standard one.
    pub fn with_curve(mut self, curve: AllocationCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn tolerance_pct(&self) -> f64 {
        self.tolerance_pct
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    pub fn curve(&self) -> &AllocationCurve {
        &self.curve
    }

    /// Compute the rebalance plan for `holdings` at `level`.
    pub fn plan(
        &self,
        level: RiskLevel,
        holdings: &HoldingsSnapshot,
    ) -> Result<RebalancePlan, PlanError> {
        let current = self.to_minor_units(holdings)?;
        let total = current
            .iter()
            .try_fold(Amount::ZERO, |acc, &v| acc.checked_add(v))
            .ok_or(PlanError::Overflow)?;

        if total.is_zero() {
            return Ok(RebalancePlan::empty(
                level,
                total,
                self.tolerance_pct,
                self.decimals,
            ));
        }

        let target = self.curve.target(level);
        let mut target_values = [Amount::ZERO; AssetClass::COUNT];
        let mut deltas = [Amount::ZERO; AssetClass::COUNT];
        for class in AssetClass::ALL {
            let i = class.index();
            target_values[i] = percent_of(total, target.get(class));
            deltas[i] = target_values[i] - current[i];
        }

        // Per-class rounding can leave the targets a few units off the total.
        let residual = total - target_values.iter().sum::<Amount>();
        absorb_residual(residual, &mut target_values, &mut deltas);

        let current_pct: [f64; AssetClass::COUNT] =
            std::array::from_fn(|i| 100.0 * current[i].0 as f64 / total.0 as f64);

        let mut selected = [false; AssetClass::COUNT];
        for class in AssetClass::ALL {
            let i = class.index();
            let drift = (current_pct[i] - target.get(class) as f64).abs();
            selected[i] = !deltas[i].is_zero() && drift >= self.tolerance_pct;
        }

        let mut imbalance: Amount = (0..AssetClass::COUNT)
            .filter(|&i| selected[i])
            .map(|i| deltas[i])
            .sum();
        while !imbalance.is_zero() {
            let offsetting = |i: usize| {
                !selected[i] && deltas[i].0.signum() == -imbalance.0.signum()
            };
            let Some(i) = largest_by_magnitude(&deltas, offsetting) else {
                break;
            };
            log::debug!(
                "funding leg {}: delta {} offsets imbalance {}",
                AssetClass::ALL[i].name(),
                deltas[i].0,
                imbalance.0
            );
            selected[i] = true;
            imbalance += deltas[i];
        }
        debug_assert!(imbalance.is_zero(), "plan does not conserve value");

        let mut actions: Vec<RebalanceAction> = AssetClass::ALL
            .into_iter()
            .filter(|class| selected[class.index()])
            .map(|class| {
                let i = class.index();
                RebalanceAction {
                    asset_class: class,
                    current_value: current[i],
                    current_pct: current_pct[i],
                    target_pct: target.get(class),
                    target_value: target_values[i],
                    delta_value: deltas[i],
                }
            })
            .collect();
        // Stable sort keeps canonical class order on equal magnitudes.
        actions.sort_by(|a, b| b.delta_value.abs().cmp(&a.delta_value.abs()));

        log::trace!(
            "planned level {} over {} minor units: {} actions",
            level,
            total.0,
            actions.len()
        );

        Ok(RebalancePlan {
            level,
            total_value: total,
            tolerance_pct: self.tolerance_pct,
            decimals: self.decimals,
            actions,
        })
    }

    fn to_minor_units(
        &self,
        holdings: &HoldingsSnapshot,
    ) -> Result<[Amount; AssetClass::COUNT], PlanError> {
        let mut out = [Amount::ZERO; AssetClass::COUNT];
        for (class, value) in holdings.iter() {
            if !value.is_finite() {
                return Err(PlanError::NonFiniteHolding { class, value });
            }
            let value = if value < 0.0 {
                log::debug!("negative holding for {} clamped to zero: {value}", class.name());
                0.0
            } else {
                value
            };
            out[class.index()] =
                Amount::from_major(value, self.decimals).ok_or(PlanError::Overflow)?;
        }
        Ok(out)
    }
}

/// `total * pct / 100`, rounded half to even.
fn percent_of(total: Amount, pct: u8) -> Amount {
    let value = div_round_half_even(total.0 as i128 * pct as i128, 100);
    // pct <= 100, so the result never exceeds total
    Amount(value as i64)
}

fn div_round_half_even(num: i128, den: i128) -> i128 {
    let q = num.div_euclid(den);
    let r = num.rem_euclid(den);
    match (2 * r).cmp(&den) {
        std::cmp::Ordering::Less => q,
        std::cmp::Ordering::Greater => q + 1,
        std::cmp::Ordering::Equal => q + (q & 1),
    }
}

/// Fold the rounding residual into the largest-magnitude move.
///
/// A target value never goes below zero. When no single class can take a
/// negative residual (tiny portfolios), it is spread one unit at a time.
fn absorb_residual(
    residual: Amount,
    target_values: &mut [Amount; AssetClass::COUNT],
    deltas: &mut [Amount; AssetClass::COUNT],
) {
    if residual.is_zero() {
        return;
    }
    let whole = largest_by_magnitude(deltas, |i| (target_values[i] + residual).0 >= 0);
    if let Some(i) = whole {
        target_values[i] += residual;
        deltas[i] += residual;
        return;
    }

    let step = Amount(residual.0.signum());
    let mut remaining = residual;
    while !remaining.is_zero() {
        let Some(i) = largest_by_magnitude(deltas, |i| (target_values[i] + step).0 >= 0) else {
            break;
        };
        target_values[i] += step;
        deltas[i] += step;
        remaining = remaining - step;
    }
}

/// Index of the largest |delta| among candidates; lowest index wins ties.
fn largest_by_magnitude(
    deltas: &[Amount; AssetClass::COUNT],
    candidate: impl Fn(usize) -> bool,
) -> Option<usize> {
    let mut best: Option<usize> = None;
    for i in (0..AssetClass::COUNT).filter(|&i| candidate(i)) {
        match best {
            Some(b) if deltas[i].abs() <= deltas[b].abs() => {}
            _ => best = Some(i),
        }
    }
    best
}

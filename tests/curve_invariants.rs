//! Allocation curve invariants over the full built-in table.

use glidepath::{AllocationCurve, AssetClass, CurveError, MAX_LEVEL_STEP, RiskLevel, target_allocation};

fn column(class: AssetClass) -> Vec<u8> {
    (1..=10).map(|l| target_allocation(l).get(class)).collect()
}

// === Sum to 100 ===

#[test]
fn every_level_sums_to_100() {
    for level in 1..=10 {
        assert_eq!(target_allocation(level).total(), 100, "level {level}");
    }
}

#[test]
fn exactly_ten_rows() {
    assert_eq!(AllocationCurve::standard().targets().count(), 10);
}

// === Clamping ===

#[test]
fn low_levels_clamp_to_one() {
    for level in [0, -1, -5, i64::MIN] {
        assert_eq!(target_allocation(level), target_allocation(1));
    }
}

#[test]
fn high_levels_clamp_to_ten() {
    for level in [11, 99, i64::MAX] {
        assert_eq!(target_allocation(level), target_allocation(10));
    }
}

// === Monotonic glide ===

#[test]
fn safe_classes_shrink_with_risk() {
    for class in [AssetClass::Stablecoin, AssetClass::Bitcoin] {
        let col = column(class);
        assert!(col.windows(2).all(|w| w[0] >= w[1]), "{class}: {col:?}");
    }
}

#[test]
fn small_caps_grow_with_risk() {
    let col = column(AssetClass::SmallCapAlt);
    assert!(col.windows(2).all(|w| w[0] <= w[1]), "{col:?}");
}

#[test]
fn large_and_mid_caps_glide_one_way() {
    for class in [AssetClass::LargeCapAlt, AssetClass::MidCapAlt] {
        let col = column(class);
        let up = col.windows(2).all(|w| w[0] <= w[1]);
        let down = col.windows(2).all(|w| w[0] >= w[1]);
        assert!(up || down, "{class}: {col:?}");
    }
}

#[test]
fn adjacent_levels_move_in_bounded_steps() {
    for class in AssetClass::ALL {
        let col = column(class);
        for w in col.windows(2) {
            assert!(w[0].abs_diff(w[1]) <= MAX_LEVEL_STEP, "{class}: {col:?}");
        }
    }
}

#[test]
fn level_one_is_the_conservative_row() {
    let t = target_allocation(1);
    assert_eq!(t.get(AssetClass::Stablecoin), 60);
    assert_eq!(t.get(AssetClass::Bitcoin), 30);
    assert_eq!(t.get(AssetClass::LargeCapAlt), 7);
    assert_eq!(t.get(AssetClass::MidCapAlt), 2);
    assert_eq!(t.get(AssetClass::SmallCapAlt), 1);
}

// === Custom tables ===

#[test]
fn custom_table_is_validated() {
    let mut rows = [[20, 20, 20, 20, 20]; RiskLevel::COUNT];
    rows[9] = [20, 20, 20, 20, 21];
    assert_eq!(
        AllocationCurve::try_new(rows),
        Err(CurveError::RowSum { level: 10, sum: 101 })
    );
}

#[test]
fn concurrent_readers_see_the_same_table() {
    let handles: Vec<_> = (1..=10)
        .map(|level| std::thread::spawn(move || target_allocation(level)))
        .collect();
    for (level, handle) in (1..=10).zip(handles) {
        assert_eq!(handle.join().unwrap(), target_allocation(level));
    }
}

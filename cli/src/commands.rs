//! Command implementations: curve, plan, check.

use std::path::Path;

use glidepath::{AllocationCurve, AssetClass, RebalancePlan, RiskLevel};
use log::info;

use crate::audit::{self, AuditLog};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::holdings::HoldingsFile;

/// Options for a `plan` run.
pub struct PlanOptions {
    pub level: Option<i64>,
    pub tolerance_pct: Option<f64>,
    pub json: bool,
    pub no_audit: bool,
}

/// Print one curve row, or the whole table.
pub fn show_curve(level: Option<i64>) -> Result<()> {
    let curve = AllocationCurve::standard();
    match level {
        Some(level) => print!("{}", curve.target(RiskLevel::clamped(level))),
        None => print!("{}", curve_table(curve)),
    }
    Ok(())
}

/// The full allocation table, one row per level.
pub fn curve_table(curve: &AllocationCurve) -> String {
    let mut out = String::from("ALLOCATION CURVE:\n");
    out.push_str(&format!("  {:>5}", "Level"));
    for class in AssetClass::ALL {
        out.push_str(&format!(" {:>14}", class.label()));
    }
    out.push('\n');
    for target in curve.targets() {
        out.push_str(&format!("  {:>5}", target.level()));
        for (_, pct) in target.iter() {
            out.push_str(&format!(" {:>13}%", pct));
        }
        out.push('\n');
    }
    out
}

/// Load holdings, compute the plan and record it.
pub fn compute_plan(
    config: &Config,
    holdings_path: &Path,
    opts: &PlanOptions,
) -> Result<RebalancePlan> {
    let file = HoldingsFile::load(holdings_path)?;
    let planner = config.planner(opts.tolerance_pct)?;
    let level = opts
        .level
        .map(RiskLevel::clamped)
        .unwrap_or(config.planner.risk_level);

    let plan = planner.plan(level, &file.snapshot())?;
    info!(
        "planned {} actions at risk level {} (tolerance {:.2}pp)",
        plan.actions.len(),
        plan.level,
        plan.tolerance_pct
    );

    if config.audit.enabled && !opts.no_audit {
        let mut log = AuditLog::open(&config.audit_path())?;
        audit::log_plan(&mut log, &plan, &holdings_path.display().to_string())?;
    }

    Ok(plan)
}

/// `plan` command: compute and print.
pub fn run_plan(config: &Config, holdings_path: &Path, opts: &PlanOptions) -> Result<()> {
    let plan = compute_plan(config, holdings_path, opts)?;
    if opts.json {
        let json =
            serde_json::to_string_pretty(&plan).map_err(|e| Error::Render(e.to_string()))?;
        println!("{json}");
    } else {
        print!("{plan}");
    }
    Ok(())
}

/// `check` command: force curve validation and report the config in use.
pub fn run_check(config: &Config) -> Result<()> {
    let curve = AllocationCurve::standard();
    let rows = curve.targets().count();
    let planner = config.planner(None)?;
    println!("Allocation curve: OK ({rows} levels)");
    println!(
        "Planner: level {}, tolerance {:.2}pp, {} decimals",
        config.planner.risk_level,
        planner.tolerance_pct(),
        planner.decimals()
    );
    if config.audit.enabled {
        println!("Audit log: {}", config.audit_path().display());
    } else {
        println!("Audit log: disabled");
    }
    Ok(())
}

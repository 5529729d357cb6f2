//! JSONL audit trail logging.
//!
//! Each computed plan is appended to an audit.jsonl file,
//! one JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use glidepath::RebalancePlan;
use serde::Serialize;

use crate::error::Result;

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<std::fs::File>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Convenience: log a computed plan.
pub fn log_plan(audit: &mut AuditLog, plan: &RebalancePlan, holdings_file: &str) -> Result<()> {
    let d = plan.decimals;
    let actions: Vec<_> = plan
        .actions
        .iter()
        .map(|a| {
            serde_json::json!({
                "class": a.asset_class.name(),
                "side": a.direction().to_string(),
                "current": a.current_value.to_major(d),
                "current_pct": a.current_pct,
                "target_pct": a.target_pct,
                "delta": a.delta_value.to_major(d),
            })
        })
        .collect();

    audit.log(
        "plan_computed",
        serde_json::json!({
            "holdings_file": holdings_file,
            "level": plan.level.get(),
            "tolerance_pct": plan.tolerance_pct,
            "total": plan.total_value.to_major(d),
            "actions": actions,
        }),
    )
}

//! glidepath-cli: operator tool over the glidepath engine.
//!
//! Reads planner settings from a TOML file and a holdings snapshot from a
//! JSON file, prints the allocation curve or a rebalance plan, and appends
//! each computed plan to a JSONL audit trail.

pub mod audit;
pub mod commands;
pub mod config;
pub mod error;
pub mod holdings;

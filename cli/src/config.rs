//! TOML configuration loading and validation.

use std::path::{Path, PathBuf};

use glidepath::{MAX_DECIMALS, Planner, RiskLevel};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default config path, used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "glidepath.toml";

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// Clamped to [1, 10] on load.
    #[serde(default = "default_level")]
    pub risk_level: RiskLevel,
    #[serde(default = "default_tolerance")]
    pub tolerance_pct: f64,
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            risk_level: default_level(),
            tolerance_pct: default_tolerance(),
            decimals: default_decimals(),
        }
    }
}

fn default_level() -> RiskLevel {
    RiskLevel::clamped(5)
}
fn default_tolerance() -> f64 {
    glidepath::DEFAULT_TOLERANCE_PCT
}
fn default_decimals() -> u32 {
    glidepath::DEFAULT_DECIMALS
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_audit_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub file: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            dir: default_audit_dir(),
            file: default_audit_file(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_audit_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Resolve the config for a run.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_PATH`] is
    /// read if present and built-in defaults are used otherwise.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::load(path)
                } else {
                    log::debug!("no {DEFAULT_CONFIG_PATH} found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse and validate from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        let tol = self.planner.tolerance_pct;
        if !tol.is_finite() || tol < 0.0 {
            return Err(Error::Config(format!(
                "tolerance_pct must be >= 0 and finite, got {tol}"
            )));
        }
        if self.planner.decimals > MAX_DECIMALS {
            return Err(Error::Config(format!(
                "decimals must be in [0, {MAX_DECIMALS}], got {}",
                self.planner.decimals
            )));
        }
        if self.audit.enabled && self.audit.file.is_empty() {
            return Err(Error::Config("audit file name must not be empty".into()));
        }
        Ok(())
    }

    /// Build a planner from the `[planner]` section, with an optional
    /// tolerance override from the command line.
    pub fn planner(&self, tolerance_override: Option<f64>) -> Result<Planner> {
        let tolerance = tolerance_override.unwrap_or(self.planner.tolerance_pct);
        let planner = Planner::new(tolerance)?.with_decimals(self.planner.decimals)?;
        Ok(planner)
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        Path::new(&self.audit.dir).join(&self.audit.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_toml() -> &'static str {
        r#"
[planner]
risk_level = 7
tolerance_pct = 2.5
decimals = 2

[audit]
enabled = true
dir = "./logs"
file = "audit.jsonl"
"#
    }

    #[test]
    fn parse_example_config() {
        let config = Config::from_toml(example_toml()).unwrap();
        assert_eq!(config.planner.risk_level.get(), 7);
        assert_eq!(config.planner.tolerance_pct, 2.5);
        assert_eq!(config.planner.decimals, 2);
        assert!(config.audit.enabled);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.planner.risk_level.get(), 5);
        assert_eq!(config.planner.tolerance_pct, 1.0);
        assert_eq!(config.planner.decimals, 2);
        assert_eq!(config.audit.file, "audit.jsonl");
    }

    #[test]
    fn risk_level_clamps_on_load() {
        let config = Config::from_toml("[planner]\nrisk_level = 42\n").unwrap();
        assert_eq!(config.planner.risk_level, RiskLevel::MAX);
        let config = Config::from_toml("[planner]\nrisk_level = -3\n").unwrap();
        assert_eq!(config.planner.risk_level, RiskLevel::MIN);
    }

    #[test]
    fn validate_catches_negative_tolerance() {
        let err = Config::from_toml("[planner]\ntolerance_pct = -1.0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn validate_catches_nan_tolerance() {
        assert!(Config::from_toml("[planner]\ntolerance_pct = nan\n").is_err());
    }

    #[test]
    fn validate_catches_bad_decimals() {
        assert!(Config::from_toml("[planner]\ndecimals = 12\n").is_err());
    }

    #[test]
    fn reject_unknown_keys() {
        assert!(matches!(
            Config::from_toml("[planner]\nrisk = 3\n"),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn planner_uses_override() {
        let config = Config::from_toml(example_toml()).unwrap();
        assert_eq!(config.planner(None).unwrap().tolerance_pct(), 2.5);
        assert_eq!(config.planner(Some(0.0)).unwrap().tolerance_pct(), 0.0);
        assert!(matches!(config.planner(Some(-2.0)), Err(Error::Plan(_))));
    }

    #[test]
    fn audit_path() {
        let config = Config::from_toml(example_toml()).unwrap();
        assert_eq!(config.audit_path(), PathBuf::from("./logs/audit.jsonl"));
    }
}

//! Holdings snapshot file (holdings.json) loading and validation.

use std::path::Path;

use chrono::{DateTime, Utc};
use glidepath::{AssetClass, HoldingsSnapshot};
use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::error::{Error, Result};

/// JSON object entries in file order. Repeated keys are kept so that
/// validation can reject them instead of silently keeping the last one.
mod serde_entries {
    use std::fmt;

    use glidepath::AssetClass;
    use serde::de::{Deserializer, MapAccess, Visitor};

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(AssetClass, f64)>, D::Error> {
        struct Entries;

        impl<'de> Visitor<'de> for Entries {
            type Value = Vec<(AssetClass, f64)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of asset class to market value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<AssetClass, f64>()? {
                    entries.push(entry);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(Entries)
    }
}

/// A holdings valuation exported by the valuation service.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HoldingsFile {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Market value per asset class in the reference currency, in file order.
    #[serde(deserialize_with = "serde_entries::deserialize")]
    pub holdings: Vec<(AssetClass, f64)>,
}

impl HoldingsFile {
    /// Load and validate a holdings.json file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::HoldingsRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    /// Parse from a JSON string (useful for testing).
    pub fn from_json(json: &str) -> Result<Self> {
        let file: HoldingsFile = serde_json::from_str(json)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = FxHashSet::default();
        for &(class, _) in &self.holdings {
            if !seen.insert(class) {
                return Err(Error::Holdings(format!(
                    "duplicate asset class: {}",
                    class.name()
                )));
            }
        }

        for &(class, value) in &self.holdings {
            if value < 0.0 {
                log::warn!(
                    "negative holding for {} ({value}) will be treated as zero",
                    class.name()
                );
            }
        }
        Ok(())
    }

    /// The engine's view of this file.
    pub fn snapshot(&self) -> HoldingsSnapshot {
        self.holdings.iter().copied().collect()
    }
}

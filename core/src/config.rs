//! Predictor configuration.
//!
//! Reference calibration pairs live in a JSON file, not in code: they are
//! observations of a specific live deployment's RNG state and go stale
//! whenever the upstream game resynchronizes its stream.

use crate::calibration::SeedReference;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictorConfig {
    pub references: Vec<SeedReference>,
}

#[derive(Debug, Clone, Deserialize)]
struct CalibrationFile {
    references: Vec<SeedReference>,
}

impl PredictorConfig {
    /// Load reference pairs from a calibration JSON file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: CalibrationFile = serde_json::from_str(&content)?;
        Ok(Self {
            references: file.references,
        })
    }

    /// Config with a hardcoded reference pair for use in tests.
    pub fn default_test() -> Self {
        Self {
            references: vec![SeedReference {
                shop_type: "Seed".into(),
                seed: 12345,
                observed_at: 1_700_000_000,
            }],
        }
    }
}

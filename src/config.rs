use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::drift::DriftThresholds;
use crate::metrics::quality::QualityWeights;

/// Tunables for severity banding and quality scoring. Every field defaults,
/// so a config file only needs the values it overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub drift_thresholds: DriftThresholds,
    pub quality_weights: QualityWeights,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.drift_thresholds.validate()?;
        self.quality_weights.validate()
    }
}

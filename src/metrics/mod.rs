//! Pure reducers over caller-supplied observations.

pub mod attribution;
pub mod classification;
pub mod confusion;
pub mod curves;
pub mod drift;
pub mod quality;
pub mod training;

pub use classification::{SortOrder, macro_average, weighted_average};
pub use curves::{pr_average_precision, roc_auc};
pub use drift::{
    DriftSeverity, DriftThresholds, classify_drift_severity, js_divergence, ks_statistic,
    population_stability_index,
};
pub use quality::{QualityWeights, quality_score};

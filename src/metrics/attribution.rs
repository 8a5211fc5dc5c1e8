//! Feature attribution rankings (SHAP aggregates, importance bars).

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{FeatureImportance, ShapSample};

pub const DEFAULT_MAX_FEATURES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapSummary {
    pub feature: String,
    pub mean_abs_shap: f64,
    pub sample_count: usize,
}

/// Mean |SHAP| per feature across samples, strongest first, truncated to
/// `max_features`. Features tie-break on first appearance.
pub fn aggregate_shap(samples: &[ShapSample], max_features: usize) -> Vec<ShapSummary> {
    let mut order = Vec::<&str>::new();
    let mut totals = HashMap::<&str, (f64, usize)>::new();

    for value in samples.iter().flat_map(|sample| &sample.shap_values) {
        let entry = totals.entry(value.feature.as_str()).or_insert_with(|| {
            order.push(value.feature.as_str());
            (0.0, 0)
        });
        entry.0 += value.shap_value.abs();
        entry.1 += 1;
    }

    let mut summaries = order
        .into_iter()
        .map(|feature| {
            let (sum, count) = totals[feature];
            ShapSummary {
                feature: feature.to_string(),
                mean_abs_shap: sum / count as f64,
                sample_count: count,
            }
        })
        .collect::<Vec<ShapSummary>>();

    summaries.sort_by(|left, right| right.mean_abs_shap.total_cmp(&left.mean_abs_shap));
    summaries.truncate(max_features);
    summaries
}

/// Stable sort by |importance| descending, keeping at most `max_features`.
pub fn rank_importance(features: &[FeatureImportance], max_features: usize) -> Vec<FeatureImportance> {
    let mut ranked = features.to_vec();
    ranked.sort_by(|left, right| right.importance.abs().total_cmp(&left.importance.abs()));
    ranked.truncate(max_features);
    ranked
}

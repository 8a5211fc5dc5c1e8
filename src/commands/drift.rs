use anyhow::{Context, Result};
use mlmetrics::metrics::drift::{DriftReading, DriftSeverity, DriftThresholds, measure_drift};
use mlmetrics::model::DriftFeature;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::DriftArgs;
use crate::util::{
    ReportEnvelope, emit_report, load_engine_config, read_json_with_digest,
};

#[derive(Debug, Serialize)]
struct FeatureDrift {
    feature_name: String,
    timestamp: Option<i64>,
    bins: usize,
    reading: DriftReading,
}

#[derive(Debug, Serialize)]
struct DriftSummary {
    thresholds: DriftThresholds,
    feature_count: usize,
    drifted_features: usize,
    features: Vec<FeatureDrift>,
}

pub fn run(args: DriftArgs) -> Result<()> {
    let thresholds = resolve_thresholds(&args)?;
    let (features, input_sha256): (Vec<DriftFeature>, String) =
        read_json_with_digest(&args.input_path)?;
    info!(
        path = %args.input_path.display(),
        features = features.len(),
        low = thresholds.low,
        medium = thresholds.medium,
        high = thresholds.high,
        "loaded drift input"
    );

    let summary = summarize(&features, thresholds)?;
    for feature in &summary.features {
        if feature.reading.overall >= DriftSeverity::Medium {
            warn!(
                feature = %feature.feature_name,
                severity = feature.reading.overall.as_str(),
                ks = feature.reading.ks.value,
                psi = feature.reading.psi.value,
                js = feature.reading.js_divergence.value,
                "drift detected"
            );
        }
    }
    info!(
        drifted = summary.drifted_features,
        total = summary.feature_count,
        "drift evaluation completed"
    );

    let envelope = ReportEnvelope::for_input(&args.input_path, input_sha256, summary);
    emit_report(args.output.output_path.as_deref(), &envelope)
}

fn resolve_thresholds(args: &DriftArgs) -> Result<DriftThresholds> {
    let config = load_engine_config(args.config_path.as_deref())?;
    let mut thresholds = config.drift_thresholds;
    if let Some(low) = args.low {
        thresholds.low = low;
    }
    if let Some(medium) = args.medium {
        thresholds.medium = medium;
    }
    if let Some(high) = args.high {
        thresholds.high = high;
    }
    thresholds
        .validate()
        .context("invalid drift thresholds after applying flags")?;
    Ok(thresholds)
}

fn summarize(features: &[DriftFeature], thresholds: DriftThresholds) -> Result<DriftSummary> {
    let mut rows = Vec::with_capacity(features.len());
    for feature in features {
        let pair = &feature.distributions;
        let reading = measure_drift(&pair.baseline, &pair.current, &thresholds)
            .with_context(|| format!("failed to measure drift for {}", feature.feature_name))?;
        rows.push(FeatureDrift {
            feature_name: feature.feature_name.clone(),
            timestamp: feature.timestamp,
            bins: pair.baseline.len(),
            reading,
        });
    }

    Ok(DriftSummary {
        thresholds,
        feature_count: rows.len(),
        drifted_features: rows
            .iter()
            .filter(|row| row.reading.overall != DriftSeverity::None)
            .count(),
        features: rows,
    })
}

use anyhow::{Result, bail};
use mlmetrics::metrics::attribution::{ShapSummary, aggregate_shap, rank_importance};
use mlmetrics::model::{FeatureImportance, ShapSample};
use serde::Serialize;
use tracing::info;

use crate::cli::{AttributionArgs, AttributionKind};
use crate::util::{ReportEnvelope, emit_report, read_json_with_digest};

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum AttributionSummary {
    Shap {
        sample_count: usize,
        features: Vec<ShapSummary>,
    },
    Importance {
        feature_count: usize,
        features: Vec<FeatureImportance>,
    },
}

pub fn run(args: AttributionArgs) -> Result<()> {
    if args.max_features == 0 {
        bail!("--max-features must be at least 1");
    }

    let (summary, input_sha256) = match args.kind {
        AttributionKind::Shap => {
            let (samples, input_sha256): (Vec<ShapSample>, String) =
                read_json_with_digest(&args.input_path)?;
            info!(
                path = %args.input_path.display(),
                samples = samples.len(),
                "loaded shap samples"
            );
            (summarize_shap(&samples, args.max_features), input_sha256)
        }
        AttributionKind::Importance => {
            let (features, input_sha256): (Vec<FeatureImportance>, String) =
                read_json_with_digest(&args.input_path)?;
            info!(
                path = %args.input_path.display(),
                features = features.len(),
                "loaded feature importances"
            );
            (summarize_importance(&features, args.max_features), input_sha256)
        }
    };

    let envelope = ReportEnvelope::for_input(&args.input_path, input_sha256, summary);
    emit_report(args.output.output_path.as_deref(), &envelope)
}

fn summarize_shap(samples: &[ShapSample], max_features: usize) -> AttributionSummary {
    let features = aggregate_shap(samples, max_features);
    if let Some(top) = features.first() {
        info!(feature = %top.feature, mean_abs_shap = top.mean_abs_shap, "top shap feature");
    }
    AttributionSummary::Shap {
        sample_count: samples.len(),
        features,
    }
}

fn summarize_importance(features: &[FeatureImportance], max_features: usize) -> AttributionSummary {
    let ranked = rank_importance(features, max_features);
    info!(kept = ranked.len(), total = features.len(), "ranked feature importances");
    AttributionSummary::Importance {
        feature_count: features.len(),
        features: ranked,
    }
}

use anyhow::Result;
use mlmetrics::metrics::quality::{
    QualityBreakdown, QualityWeights, completeness, dataset_completeness, quality_breakdown,
};
use mlmetrics::model::FieldQualityRecord;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::QualityArgs;
use crate::util::{
    ReportEnvelope, emit_report, load_engine_config, read_json_with_digest,
};

#[derive(Debug, Serialize)]
struct FieldQuality {
    field_name: String,
    data_type: Option<String>,
    completeness: f64,
    breakdown: QualityBreakdown,
}

#[derive(Debug, Serialize)]
struct QualitySummary {
    weights: QualityWeights,
    field_count: usize,
    dataset_completeness: f64,
    mean_score: f64,
    fields: Vec<FieldQuality>,
}

pub fn run(args: QualityArgs) -> Result<()> {
    let config = load_engine_config(args.config_path.as_deref())?;
    let (fields, input_sha256): (Vec<FieldQualityRecord>, String) =
        read_json_with_digest(&args.input_path)?;
    info!(
        path = %args.input_path.display(),
        fields = fields.len(),
        "loaded field quality records"
    );

    let summary = summarize(&fields, config.quality_weights);
    for field in summary.fields.iter().filter(|field| field.breakdown.score.is_nan()) {
        warn!(field = %field.field_name, "quality score is NaN (zero total count)");
    }
    info!(
        fields = summary.field_count,
        mean_score = summary.mean_score,
        completeness = summary.dataset_completeness,
        "quality scoring completed"
    );

    let envelope = ReportEnvelope::for_input(&args.input_path, input_sha256, summary);
    emit_report(args.output.output_path.as_deref(), &envelope)
}

fn summarize(fields: &[FieldQualityRecord], weights: QualityWeights) -> QualitySummary {
    let rows = fields
        .iter()
        .map(|field| FieldQuality {
            field_name: field.field_name.clone(),
            data_type: field.data_type.clone(),
            completeness: completeness(field),
            breakdown: quality_breakdown(field, &weights),
        })
        .collect::<Vec<FieldQuality>>();

    let mean_score =
        rows.iter().map(|row| row.breakdown.score).sum::<f64>() / rows.len() as f64;

    QualitySummary {
        weights,
        field_count: rows.len(),
        dataset_completeness: dataset_completeness(fields),
        mean_score,
        fields: rows,
    }
}

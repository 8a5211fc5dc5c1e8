use anyhow::Result;
use mlmetrics::metrics::confusion::ConfusionMatrix;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::ConfusionArgs;
use crate::util::{ReportEnvelope, emit_report, read_json_with_digest};

#[derive(Debug, Serialize)]
struct ConfusionSummary {
    n_classes: usize,
    total: f64,
    accuracy: f64,
    max_cell: Option<f64>,
    row_totals: Vec<f64>,
    column_totals: Vec<f64>,
    precision: Vec<f64>,
    recall: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalized: Option<Vec<Vec<f64>>>,
}

pub fn run(args: ConfusionArgs) -> Result<()> {
    let (matrix, input_sha256): (ConfusionMatrix, String) =
        read_json_with_digest(&args.input_path)?;
    info!(
        path = %args.input_path.display(),
        classes = matrix.n_classes(),
        "loaded confusion matrix"
    );

    let summary = summarize(&matrix, args.normalize);
    for (class, total) in summary.row_totals.iter().enumerate() {
        if *total == 0.0 {
            warn!(class, "class has no actual samples; recall is NaN");
        }
    }
    info!(
        classes = summary.n_classes,
        accuracy = summary.accuracy,
        "confusion summary completed"
    );

    let envelope = ReportEnvelope::for_input(&args.input_path, input_sha256, summary);
    emit_report(args.output.output_path.as_deref(), &envelope)
}

fn summarize(matrix: &ConfusionMatrix, normalize: bool) -> ConfusionSummary {
    ConfusionSummary {
        n_classes: matrix.n_classes(),
        total: matrix.total(),
        accuracy: matrix.accuracy(),
        max_cell: matrix.max_cell(),
        row_totals: matrix.row_totals(),
        column_totals: matrix.column_totals(),
        precision: matrix.precisions(),
        recall: matrix.recalls(),
        normalized: normalize.then(|| matrix.normalized()),
    }
}

#[cfg(test)]
mod tests {
    use mlmetrics::metrics::confusion::ConfusionMatrix;

    use super::summarize;

    fn matrix() -> ConfusionMatrix {
        serde_json::from_str("[[8, 2], [1, 9]]").expect("matrix should deserialize")
    }

    #[test]
    fn summary_reports_per_class_rates() {
        let summary = summarize(&matrix(), false);
        assert_eq!(summary.n_classes, 2);
        assert_eq!(summary.total, 20.0);
        assert!((summary.accuracy - 0.85).abs() < 1e-12);
        assert_eq!(summary.max_cell, Some(9.0));
        assert_eq!(summary.row_totals, vec![10.0, 10.0]);
        assert_eq!(summary.column_totals, vec![9.0, 11.0]);
        assert!((summary.precision[0] - 8.0 / 9.0).abs() < 1e-12);
        assert!((summary.recall[1] - 0.9).abs() < 1e-12);
        assert!(summary.normalized.is_none());
    }

    #[test]
    fn normalize_flag_adds_row_shares() {
        let summary = summarize(&matrix(), true);
        let normalized = summary.normalized.expect("normalized rows");
        assert_eq!(normalized[0], vec![0.8, 0.2]);

        let json = serde_json::to_value(summarize(&matrix(), false)).expect("serialize");
        assert!(json.get("normalized").is_none());
    }

    #[test]
    fn ragged_matrix_is_rejected_on_load() {
        let err = serde_json::from_str::<ConfusionMatrix>("[[1, 2], [3]]")
            .expect_err("ragged input");
        assert!(err.to_string().contains("row 1"));
    }
}

use anyhow::{Result, bail};
use mlmetrics::metrics::curves::{
    DEFAULT_ISOLINE_TARGETS, F1Isoline, best_f1_point, default_recall_sweep, f1_isolines,
    pr_average_precision, roc_auc,
};
use mlmetrics::model::{PrPoint, RocPoint};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{PrArgs, RocArgs};
use crate::util::{ReportEnvelope, emit_report, read_json_with_digest};

#[derive(Debug, Serialize)]
struct RocSummary {
    point_count: usize,
    auc: f64,
    monotonic_fpr: bool,
}

#[derive(Debug, Serialize)]
struct BestF1 {
    index: usize,
    f1: f64,
    point: PrPoint,
}

#[derive(Debug, Serialize)]
struct PrSummary {
    point_count: usize,
    average_precision: f64,
    monotonic_recall: bool,
    best_f1: Option<BestF1>,
    isolines: Vec<F1Isoline>,
}

pub fn run_roc(args: RocArgs) -> Result<()> {
    let (points, input_sha256): (Vec<RocPoint>, String) =
        read_json_with_digest(&args.input_path)?;
    let summary = summarize_roc(&points);

    if !summary.monotonic_fpr {
        warn!("fpr is not non-decreasing; auc is reported without resorting");
    }
    info!(points = summary.point_count, auc = summary.auc, "computed roc auc");

    let envelope = ReportEnvelope::for_input(&args.input_path, input_sha256, summary);
    emit_report(args.output.output_path.as_deref(), &envelope)
}

pub fn run_pr(args: PrArgs) -> Result<()> {
    let targets = isoline_targets(&args)?;
    let (points, input_sha256): (Vec<PrPoint>, String) =
        read_json_with_digest(&args.input_path)?;
    let summary = summarize_pr(&points, &targets);

    if !summary.monotonic_recall {
        warn!("recall is not non-decreasing; average precision is reported without resorting");
    }
    info!(
        points = summary.point_count,
        average_precision = summary.average_precision,
        isolines = summary.isolines.len(),
        "computed average precision"
    );

    let envelope = ReportEnvelope::for_input(&args.input_path, input_sha256, summary);
    emit_report(args.output.output_path.as_deref(), &envelope)
}

fn isoline_targets(args: &PrArgs) -> Result<Vec<f64>> {
    if args.default_isolines && !args.isolines.is_empty() {
        bail!("--default-isolines cannot be combined with --isoline");
    }
    if let Some(target) = args
        .isolines
        .iter()
        .find(|target| !(0.0..=1.0).contains(*target))
    {
        bail!("isoline F1 target must lie in [0, 1], got {target}");
    }

    if args.default_isolines {
        Ok(DEFAULT_ISOLINE_TARGETS.to_vec())
    } else {
        Ok(args.isolines.clone())
    }
}

fn summarize_roc(points: &[RocPoint]) -> RocSummary {
    RocSummary {
        point_count: points.len(),
        auc: roc_auc(points),
        monotonic_fpr: points.windows(2).all(|pair| pair[0].fpr <= pair[1].fpr),
    }
}

fn summarize_pr(points: &[PrPoint], isoline_targets: &[f64]) -> PrSummary {
    let isolines = if isoline_targets.is_empty() {
        Vec::new()
    } else {
        f1_isolines(isoline_targets, &default_recall_sweep())
    };

    PrSummary {
        point_count: points.len(),
        average_precision: pr_average_precision(points),
        monotonic_recall: points.windows(2).all(|pair| pair[0].recall <= pair[1].recall),
        best_f1: best_f1_point(points).map(|(index, f1)| BestF1 {
            index,
            f1,
            point: points[index],
        }),
        isolines,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use mlmetrics::model::{PrPoint, RocPoint};

    use super::{isoline_targets, summarize_pr, summarize_roc};
    use crate::cli::{OutputArgs, PrArgs};

    fn pr_args(isolines: Vec<f64>, default_isolines: bool) -> PrArgs {
        PrArgs {
            input_path: PathBuf::from("pr.json"),
            isolines,
            default_isolines,
            output: OutputArgs { output_path: None },
        }
    }

    #[test]
    fn roc_summary_flags_unordered_curves() {
        let points: Vec<RocPoint> = serde_json::from_str(
            r#"[{"fpr": 0.0, "tpr": 0.0}, {"fpr": 0.6, "tpr": 0.9, "threshold": 0.4}, {"fpr": 0.4, "tpr": 1.0}]"#,
        )
        .expect("points should deserialize");
        let summary = summarize_roc(&points);
        assert_eq!(summary.point_count, 3);
        assert!(!summary.monotonic_fpr);
    }

    #[test]
    fn pr_summary_reports_best_point_and_isolines() {
        let points = vec![
            PrPoint::new(0.0, 1.0),
            PrPoint::new(0.5, 0.9),
            PrPoint::new(1.0, 0.4),
        ];
        let summary = summarize_pr(&points, &[0.5]);
        assert!(summary.monotonic_recall);
        assert!((summary.average_precision - 0.65).abs() < 1e-12);
        assert_eq!(summary.best_f1.as_ref().map(|best| best.index), Some(1));
        assert_eq!(summary.isolines.len(), 1);
        assert!(summarize_pr(&points, &[]).isolines.is_empty());
    }

    #[test]
    fn isoline_targets_are_validated() {
        assert_eq!(
            isoline_targets(&pr_args(Vec::new(), true)).expect("defaults"),
            vec![0.2, 0.4, 0.6, 0.8]
        );
        assert!(isoline_targets(&pr_args(vec![1.5], false)).is_err());
        assert!(isoline_targets(&pr_args(vec![0.3], true)).is_err());
        assert!(isoline_targets(&pr_args(Vec::new(), false))
            .expect("none")
            .is_empty());
    }
}

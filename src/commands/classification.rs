use anyhow::Result;
use mlmetrics::metrics::classification::{
    SortOrder, SummaryRow, filter_classes, sort_classes, summarize,
};
use mlmetrics::model::{ClassReport, MetricKey};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::ClassificationArgs;
use crate::util::{ReportEnvelope, emit_report, read_json_with_digest};

#[derive(Debug, Serialize)]
struct ClassificationSummary {
    metrics: Vec<MetricKey>,
    sorted_by: Option<MetricKey>,
    order: Option<SortOrder>,
    class_count: usize,
    classes: ClassReport,
    summary: Vec<SummaryRow>,
}

pub fn run(args: ClassificationArgs) -> Result<()> {
    let (report, input_sha256): (ClassReport, String) =
        read_json_with_digest(&args.input_path)?;
    info!(
        path = %args.input_path.display(),
        classes = report.len(),
        "loaded classification report"
    );

    let summary = build_summary(&report, &args);
    if summary.class_count == 0 {
        warn!("no classes left after filtering; averages will be NaN");
    }
    let has_nan = summary
        .summary
        .iter()
        .flat_map(|row| &row.values)
        .any(|cell| cell.value.is_nan());
    if has_nan {
        warn!("summary contains NaN averages (missing metric or zero support)");
    }

    let envelope = ReportEnvelope::for_input(&args.input_path, input_sha256, summary);
    emit_report(args.output.output_path.as_deref(), &envelope)
}

fn build_summary(report: &ClassReport, args: &ClassificationArgs) -> ClassificationSummary {
    let metrics = if args.metrics.is_empty() {
        MetricKey::DEFAULT_COLUMNS.to_vec()
    } else {
        args.metrics.iter().copied().map(MetricKey::from).collect()
    };

    let mut classes = match args.search.as_deref() {
        Some(query) => filter_classes(report, query),
        None => report.clone(),
    };

    let sorted_by = args.sort_by.map(MetricKey::from);
    let order = sorted_by.map(|_| SortOrder::from(args.order));
    if let (Some(key), Some(order)) = (sorted_by, order) {
        classes = sort_classes(&classes, key, order);
    }

    // Averages cover the visible (filtered) classes, as the table footer does.
    let summary = summarize(&classes, &metrics);

    ClassificationSummary {
        metrics,
        sorted_by,
        order,
        class_count: classes.len(),
        classes,
        summary,
    }
}

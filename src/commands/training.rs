use std::path::Path;

use anyhow::Result;
use mlmetrics::metrics::training::{
    GradientHealth, classify_gradient, problematic_layers, smooth_learning_curve,
};
use mlmetrics::model::{LayerGradient, LearningCurvePoint};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::LearningCurveArgs;
use crate::util::{ReportEnvelope, emit_report, read_json, read_json_with_digest};

#[derive(Debug, Serialize)]
struct LayerHealth {
    layer_name: String,
    mean: f64,
    std: f64,
    zero_gradient_percent: Option<f64>,
    health: GradientHealth,
    problematic: bool,
}

#[derive(Debug, Serialize)]
struct GradientSummary {
    layer_count: usize,
    problematic_count: usize,
    layers: Vec<LayerHealth>,
}

#[derive(Debug, Serialize)]
struct TrainingSummary {
    smoothing: usize,
    point_count: usize,
    final_gap: Option<f64>,
    curve: Vec<LearningCurvePoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gradients: Option<GradientSummary>,
}

pub fn run(args: LearningCurveArgs) -> Result<()> {
    let (points, input_sha256): (Vec<LearningCurvePoint>, String) =
        read_json_with_digest(&args.input_path)?;
    info!(
        path = %args.input_path.display(),
        points = points.len(),
        smoothing = args.smoothing,
        "loaded learning curve"
    );

    let gradients = args
        .gradients_path
        .as_deref()
        .map(load_gradients)
        .transpose()?;

    let summary = summarize(&points, args.smoothing, gradients.as_deref());
    if let Some(gradients) = &summary.gradients {
        for layer in gradients.layers.iter().filter(|layer| layer.problematic) {
            warn!(
                layer = %layer.layer_name,
                mean = layer.mean,
                health = ?layer.health,
                "problematic gradient"
            );
        }
    }
    info!(
        points = summary.point_count,
        final_gap = ?summary.final_gap,
        "learning curve summary completed"
    );

    let envelope = ReportEnvelope::for_input(&args.input_path, input_sha256, summary);
    emit_report(args.output.output_path.as_deref(), &envelope)
}

fn load_gradients(path: &Path) -> Result<Vec<LayerGradient>> {
    let layers: Vec<LayerGradient> = read_json(path)?;
    info!(path = %path.display(), layers = layers.len(), "loaded layer gradients");
    Ok(layers)
}

fn summarize(
    points: &[LearningCurvePoint],
    smoothing: usize,
    gradients: Option<&[LayerGradient]>,
) -> TrainingSummary {
    let curve = smooth_learning_curve(points, smoothing);
    // Positive when validation trails training at the last step.
    let final_gap = curve.last().map(|point| point.train - point.validation);

    TrainingSummary {
        smoothing,
        point_count: curve.len(),
        final_gap,
        curve,
        gradients: gradients.map(summarize_gradients),
    }
}

fn summarize_gradients(layers: &[LayerGradient]) -> GradientSummary {
    let flagged = problematic_layers(layers);
    let rows = layers
        .iter()
        .map(|layer| LayerHealth {
            layer_name: layer.layer_name.clone(),
            mean: layer.mean,
            std: layer.std,
            zero_gradient_percent: layer.zero_gradient_percent,
            health: classify_gradient(layer.mean),
            problematic: flagged.iter().any(|candidate| std::ptr::eq(*candidate, layer)),
        })
        .collect::<Vec<LayerHealth>>();

    GradientSummary {
        layer_count: rows.len(),
        problematic_count: flagged.len(),
        layers: rows,
    }
}

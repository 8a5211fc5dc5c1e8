//! Training-run helpers: learning-curve smoothing and gradient health.

use serde::{Deserialize, Serialize};

use crate::model::{LayerGradient, LearningCurvePoint};

pub const VANISHING_GRADIENT_MAX: f64 = 1e-4;
pub const EXPLODING_GRADIENT_MIN: f64 = 10.0;

/// Trailing moving average over `window + 1` points.
///
/// The first `window` points have no full window and pass through as-is. A
/// missing confidence bound inside a window counts as zero, but a point only
/// gets smoothed bounds if it carried its own.
pub fn smooth_learning_curve(points: &[LearningCurvePoint], window: usize) -> Vec<LearningCurvePoint> {
    if window == 0 {
        return points.to_vec();
    }

    points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            if index < window {
                return point.clone();
            }

            let span = &points[index - window..=index];
            let mean = |select: fn(&LearningCurvePoint) -> f64| {
                span.iter().map(select).sum::<f64>() / span.len() as f64
            };

            LearningCurvePoint {
                name: point.name.clone(),
                train: mean(|p| p.train),
                validation: mean(|p| p.validation),
                confidence_low: point
                    .confidence_low
                    .map(|_| mean(|p| p.confidence_low.unwrap_or(0.0))),
                confidence_high: point
                    .confidence_high
                    .map(|_| mean(|p| p.confidence_high.unwrap_or(0.0))),
            }
        })
        .collect()
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientHealth {
    Vanishing,
    Exploding,
    Healthy,
}

pub fn classify_gradient(mean: f64) -> GradientHealth {
    let magnitude = mean.abs();
    if magnitude < VANISHING_GRADIENT_MAX {
        GradientHealth::Vanishing
    } else if magnitude > EXPLODING_GRADIENT_MIN {
        GradientHealth::Exploding
    } else {
        GradientHealth::Healthy
    }
}

/// Layers that are not healthy or have more than half of their gradients
/// at zero.
pub fn problematic_layers(layers: &[LayerGradient]) -> Vec<&LayerGradient> {
    layers
        .iter()
        .filter(|layer| {
            classify_gradient(layer.mean) != GradientHealth::Healthy
                || layer.zero_gradient_percent.unwrap_or(0.0) > 0.5
        })
        .collect()
}

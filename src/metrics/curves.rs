//! Scalar summaries of ROC and precision-recall curves.
//!
//! Curves are taken in the order the caller supplies them. Neither summary
//! resorts or validates the independent axis, so an unordered curve can
//! integrate outside [0, 1].

use serde::Serialize;

use crate::model::{PrPoint, RocPoint};

pub const DEFAULT_ISOLINE_TARGETS: [f64; 4] = [0.2, 0.4, 0.6, 0.8];

/// Trapezoidal area under a ROC curve, integrating tpr over fpr.
pub fn roc_auc(points: &[RocPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| (pair[1].fpr - pair[0].fpr) * (pair[1].tpr + pair[0].tpr) / 2.0)
        .sum()
}

/// Average precision as a right-endpoint sum over recall steps.
///
/// Unlike [`roc_auc`] this does not average neighbouring heights: each step
/// is weighted by the precision at its right end.
pub fn pr_average_precision(points: &[PrPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| (pair[1].recall - pair[0].recall) * pair[1].precision)
        .sum()
}

#[derive(Debug, Clone, Serialize)]
pub struct F1Isoline {
    pub f1: f64,
    pub points: Vec<PrPoint>,
}

/// Recall values 0.01, 0.02, ..., 1.00.
pub fn default_recall_sweep() -> Vec<f64> {
    (1..=100_u32).map(|step| f64::from(step) / 100.0).collect()
}

/// Points of constant F1 across `recall_values`.
///
/// Solves `precision = f1 * r / (2r - f1)` per recall value and drops any
/// point whose precision is not a finite value in [0, 1].
pub fn f1_isoline(f1: f64, recall_values: &[f64]) -> Vec<PrPoint> {
    recall_values
        .iter()
        .filter_map(|&recall| {
            let precision = (f1 * recall) / (2.0 * recall - f1);
            (precision.is_finite() && (0.0..=1.0).contains(&precision))
                .then(|| PrPoint::new(recall, precision))
        })
        .collect()
}

pub fn f1_isolines(targets: &[f64], recall_values: &[f64]) -> Vec<F1Isoline> {
    targets
        .iter()
        .map(|&f1| F1Isoline {
            f1,
            points: f1_isoline(f1, recall_values),
        })
        .collect()
}

/// Point with the highest F1; the point's own `f1Score` wins over the
/// harmonic mean. First occurrence wins ties.
pub fn best_f1_point(points: &[PrPoint]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, point) in points.iter().enumerate() {
        let f1 = point.f1_score.unwrap_or_else(|| harmonic_mean(point));
        if f1.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if current >= f1 => {}
            _ => best = Some((index, f1)),
        }
    }
    best
}

fn harmonic_mean(point: &PrPoint) -> f64 {
    let denominator = point.precision + point.recall;
    if denominator == 0.0 {
        return 0.0;
    }
    2.0 * point.precision * point.recall / denominator
}

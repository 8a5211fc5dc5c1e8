//! Bounded health score for a single data field.
//!
//! The score starts at [`MAX_SCORE`] and loses three independent linear
//! penalties: missing ratio, outlier ratio, and failed-rule ratio. The
//! penalties are summed unclamped and only the final value is clamped to
//! [0, 100], so two large penalties are never capped individually.

use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, Result};
use crate::model::FieldQualityRecord;

pub const MAX_SCORE: f64 = 100.0;
pub const MISSING_WEIGHT: f64 = 30.0;
pub const OUTLIER_WEIGHT: f64 = 20.0;
pub const RULE_WEIGHT: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityWeights {
    pub missing: f64,
    pub outlier: f64,
    pub rule: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            missing: MISSING_WEIGHT,
            outlier: OUTLIER_WEIGHT,
            rule: RULE_WEIGHT,
        }
    }
}

impl QualityWeights {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("missing", self.missing),
            ("outlier", self.outlier),
            ("rule", self.rule),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MetricsError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityBreakdown {
    pub missing_penalty: f64,
    pub outlier_penalty: f64,
    pub rule_penalty: f64,
    pub failed_rules: usize,
    pub score: f64,
}

pub fn quality_score(field: &FieldQualityRecord) -> f64 {
    quality_score_with(field, &QualityWeights::default())
}

pub fn quality_score_with(field: &FieldQualityRecord, weights: &QualityWeights) -> f64 {
    quality_breakdown(field, weights).score
}

/// Individual penalties alongside the clamped score.
///
/// An absent or zero outlier count and an absent or empty rule list add no
/// penalty. A zero `totalCount` makes the missing ratio NaN, and NaN clamps
/// to NaN.
pub fn quality_breakdown(field: &FieldQualityRecord, weights: &QualityWeights) -> QualityBreakdown {
    let total = field.total_count as f64;

    let missing_penalty = weights.missing * (field.missing_count as f64 / total);

    let outlier_penalty = match field.outlier_count {
        Some(outliers) if outliers > 0 => weights.outlier * (outliers as f64 / total),
        _ => 0.0,
    };

    let (rule_penalty, failed_rules) = match field.validation_rules.as_deref() {
        Some(rules) if !rules.is_empty() => {
            let failed = rules.iter().filter(|rule| !rule.passed).count();
            (weights.rule * (failed as f64 / rules.len() as f64), failed)
        }
        _ => (0.0, 0),
    };

    let raw = MAX_SCORE - missing_penalty - outlier_penalty - rule_penalty;

    QualityBreakdown {
        missing_penalty,
        outlier_penalty,
        rule_penalty,
        failed_rules,
        score: clamp_score(raw),
    }
}

/// Share of present values, `1 - missing / total`.
pub fn completeness(field: &FieldQualityRecord) -> f64 {
    1.0 - field.missing_count as f64 / field.total_count as f64
}

/// Mean completeness across fields as a percentage. Empty input is NaN.
pub fn dataset_completeness(fields: &[FieldQualityRecord]) -> f64 {
    let total = fields.iter().map(|field| completeness(field) * 100.0).sum::<f64>();
    total / fields.len() as f64
}

fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return raw;
    }
    raw.clamp(0.0, MAX_SCORE)
}

//! Distance measures between a baseline and a current binned distribution,
//! and the severity bands a monitoring view paints them with.
//!
//! Every measure rejects arrays of different length rather than truncating,
//! since a silently shortened histogram would report the wrong drift.

use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, Result};

/// Floor substituted for empty bins before taking the PSI log ratio.
pub const PSI_EPSILON: f64 = 1e-4;

pub const DEFAULT_LOW_THRESHOLD: f64 = 0.1;
pub const DEFAULT_MEDIUM_THRESHOLD: f64 = 0.2;
pub const DEFAULT_HIGH_THRESHOLD: f64 = 0.3;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftSeverity {
    None,
    Low,
    Medium,
    High,
}

impl DriftSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftThresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for DriftThresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_THRESHOLD,
            medium: DEFAULT_MEDIUM_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl DriftThresholds {
    pub fn validate(&self) -> Result<()> {
        let finite = self.low.is_finite() && self.medium.is_finite() && self.high.is_finite();
        if !finite || self.low > self.medium || self.medium > self.high {
            return Err(MetricsError::InvalidThresholds {
                low: self.low,
                medium: self.medium,
                high: self.high,
            });
        }
        Ok(())
    }
}

/// Maps a drift value onto its band. Each threshold is inclusive for the
/// band it opens; NaN falls through to `None`.
pub fn classify_drift_severity(value: f64, thresholds: &DriftThresholds) -> DriftSeverity {
    if value >= thresholds.high {
        DriftSeverity::High
    } else if value >= thresholds.medium {
        DriftSeverity::Medium
    } else if value >= thresholds.low {
        DriftSeverity::Low
    } else {
        DriftSeverity::None
    }
}

/// Largest gap between the two cumulative distributions after each array is
/// normalised to sum to one.
pub fn ks_statistic(baseline: &[f64], current: &[f64]) -> Result<f64> {
    ensure_same_length("ks statistic", baseline, current)?;

    let baseline = normalize(baseline);
    let current = normalize(current);

    let mut baseline_cdf = 0.0;
    let mut current_cdf = 0.0;
    let mut max_gap = 0.0_f64;
    for (b, c) in baseline.iter().zip(&current) {
        baseline_cdf += b;
        current_cdf += c;
        let gap = (baseline_cdf - current_cdf).abs();
        // NaN must propagate, f64::max would swallow it.
        if gap.is_nan() || gap > max_gap {
            max_gap = gap;
        }
        if max_gap.is_nan() {
            break;
        }
    }
    Ok(max_gap)
}

/// Σ (current − baseline) · ln(current / baseline), with empty bins floored
/// to [`PSI_EPSILON`].
pub fn population_stability_index(baseline: &[f64], current: &[f64]) -> Result<f64> {
    ensure_same_length("population stability index", baseline, current)?;

    Ok(baseline
        .iter()
        .zip(current)
        .map(|(&b, &c)| {
            let b = floor_empty_bin(b);
            let c = floor_empty_bin(c);
            (c - b) * (c / b).ln()
        })
        .sum())
}

/// Jensen-Shannon divergence in bits, bounded to [0, 1] and symmetric.
pub fn js_divergence(baseline: &[f64], current: &[f64]) -> Result<f64> {
    ensure_same_length("jensen-shannon divergence", baseline, current)?;

    let p = normalize(baseline);
    let q = normalize(current);
    let midpoint = p
        .iter()
        .zip(&q)
        .map(|(a, b)| (a + b) / 2.0)
        .collect::<Vec<f64>>();

    Ok(0.5 * kl_divergence_bits(&p, &midpoint) + 0.5 * kl_divergence_bits(&q, &midpoint))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriftMeasure {
    pub value: f64,
    pub severity: DriftSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriftReading {
    pub ks: DriftMeasure,
    pub psi: DriftMeasure,
    pub js_divergence: DriftMeasure,
    pub overall: DriftSeverity,
}

/// All three measures with their bands; `overall` is the worst band.
pub fn measure_drift(
    baseline: &[f64],
    current: &[f64],
    thresholds: &DriftThresholds,
) -> Result<DriftReading> {
    let measure = |value: f64| DriftMeasure {
        value,
        severity: classify_drift_severity(value, thresholds),
    };

    let ks = measure(ks_statistic(baseline, current)?);
    let psi = measure(population_stability_index(baseline, current)?);
    let js_divergence = measure(js_divergence(baseline, current)?);
    let overall = ks.severity.max(psi.severity).max(js_divergence.severity);

    Ok(DriftReading {
        ks,
        psi,
        js_divergence,
        overall,
    })
}

fn ensure_same_length(context: &'static str, baseline: &[f64], current: &[f64]) -> Result<()> {
    if baseline.len() != current.len() {
        return Err(MetricsError::LengthMismatch {
            context,
            baseline: baseline.len(),
            current: current.len(),
        });
    }
    Ok(())
}

fn normalize(values: &[f64]) -> Vec<f64> {
    let total = values.iter().sum::<f64>();
    values.iter().map(|value| value / total).collect()
}

fn floor_empty_bin(value: f64) -> f64 {
    if value == 0.0 { PSI_EPSILON } else { value }
}

// Terms with p_i = 0 contribute nothing (0 · log 0 := 0).
fn kl_divergence_bits(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .filter(|(pi, _)| **pi != 0.0)
        .map(|(pi, qi)| pi * (pi / qi).log2())
        .sum()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{
        DriftSeverity, DriftThresholds, PSI_EPSILON, classify_drift_severity, js_divergence,
        ks_statistic, measure_drift, population_stability_index,
    };
    use crate::error::MetricsError;

    const BASELINE: [f64; 5] = [0.1, 0.2, 0.4, 0.2, 0.1];
    const SHIFTED: [f64; 5] = [0.05, 0.1, 0.3, 0.35, 0.2];

    #[test]
    fn identical_distributions_have_no_drift() {
        assert_eq!(ks_statistic(&BASELINE, &BASELINE).expect("ks"), 0.0);
        assert_eq!(
            population_stability_index(&BASELINE, &BASELINE).expect("psi"),
            0.0
        );
        assert_relative_eq!(
            js_divergence(&BASELINE, &BASELINE).expect("js"),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn ks_normalizes_before_accumulating() {
        // Raw counts at ten times the scale describe the same distribution.
        let counts = BASELINE.map(|value| value * 10.0);
        assert_relative_eq!(
            ks_statistic(&BASELINE, &counts).expect("ks"),
            0.0,
            epsilon = 1e-12
        );

        let ks = ks_statistic(&[1.0, 0.0], &[0.0, 1.0]).expect("ks");
        assert_eq!(ks, 1.0);
    }

    #[test]
    fn ks_reports_largest_cumulative_gap() {
        // CDF gaps: 0.05, 0.15, 0.25, 0.1, 0.0
        let ks = ks_statistic(&BASELINE, &SHIFTED).expect("ks");
        assert_relative_eq!(ks, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn psi_matches_hand_computed_value() {
        let psi = population_stability_index(&[0.5, 0.5], &[0.25, 0.75]).expect("psi");
        let expected = (0.25 - 0.5) * (0.25_f64 / 0.5).ln() + (0.75 - 0.5) * (0.75_f64 / 0.5).ln();
        assert_relative_eq!(psi, expected, epsilon = 1e-12);
        assert!(psi > 0.0);
    }

    #[test]
    fn psi_floors_empty_bins() {
        let psi = population_stability_index(&[0.0, 1.0], &[0.5, 0.5]).expect("psi");
        let expected =
            (0.5 - PSI_EPSILON) * (0.5 / PSI_EPSILON).ln() + (0.5 - 1.0) * (0.5_f64 / 1.0).ln();
        assert!(psi.is_finite());
        assert_relative_eq!(psi, expected, epsilon = 1e-12);
    }

    #[test]
    fn js_is_symmetric_and_bounded() {
        let forward = js_divergence(&BASELINE, &SHIFTED).expect("js");
        let backward = js_divergence(&SHIFTED, &BASELINE).expect("js");
        assert_relative_eq!(forward, backward, epsilon = 1e-12);
        assert!(forward > 0.0 && forward < 1.0);

        let disjoint = js_divergence(&[1.0, 0.0], &[0.0, 1.0]).expect("js");
        assert_relative_eq!(disjoint, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn mismatched_lengths_fail_fast() {
        let err = ks_statistic(&[0.5, 0.5], &[1.0]).expect_err("length mismatch");
        assert_eq!(
            err,
            MetricsError::LengthMismatch {
                context: "ks statistic",
                baseline: 2,
                current: 1,
            }
        );
        assert!(population_stability_index(&[1.0], &[0.5, 0.5]).is_err());
        assert!(js_divergence(&[], &[1.0]).is_err());
    }

    #[test]
    fn all_zero_distribution_normalizes_to_nan() {
        assert!(ks_statistic(&[0.0, 0.0], &[0.5, 0.5]).expect("ks").is_nan());
        assert!(js_divergence(&[0.0, 0.0], &[0.5, 0.5]).expect("js").is_nan());
    }

    #[test]
    fn severity_bands_use_default_thresholds() {
        let thresholds = DriftThresholds::default();
        assert_eq!(classify_drift_severity(0.05, &thresholds), DriftSeverity::None);
        assert_eq!(classify_drift_severity(0.15, &thresholds), DriftSeverity::Low);
        assert_eq!(classify_drift_severity(0.25, &thresholds), DriftSeverity::Medium);
        assert_eq!(classify_drift_severity(0.35, &thresholds), DriftSeverity::High);
    }

    #[test]
    fn severity_thresholds_are_inclusive() {
        let thresholds = DriftThresholds {
            low: 0.5,
            medium: 1.0,
            high: 2.0,
        };
        assert_eq!(classify_drift_severity(0.5, &thresholds), DriftSeverity::Low);
        assert_eq!(classify_drift_severity(1.0, &thresholds), DriftSeverity::Medium);
        assert_eq!(classify_drift_severity(2.0, &thresholds), DriftSeverity::High);
        assert_eq!(classify_drift_severity(0.49, &thresholds), DriftSeverity::None);
        assert_eq!(classify_drift_severity(f64::NAN, &thresholds), DriftSeverity::None);
    }

    #[test]
    fn thresholds_must_ascend() {
        assert!(DriftThresholds::default().validate().is_ok());
        let inverted = DriftThresholds {
            low: 0.3,
            medium: 0.2,
            high: 0.1,
        };
        assert!(matches!(
            inverted.validate(),
            Err(MetricsError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn thresholds_deserialize_with_partial_overrides() {
        let thresholds: DriftThresholds =
            serde_json::from_str(r#"{"high": 0.5}"#).expect("thresholds should deserialize");
        assert_eq!(thresholds.low, 0.1);
        assert_eq!(thresholds.medium, 0.2);
        assert_eq!(thresholds.high, 0.5);
    }

    #[test]
    fn reading_overall_is_worst_measure() {
        let reading = measure_drift(&[1.0, 0.0], &[0.0, 1.0], &DriftThresholds::default())
            .expect("reading");
        assert_eq!(reading.ks.severity, DriftSeverity::High);
        assert_eq!(reading.overall, DriftSeverity::High);

        let calm = measure_drift(&BASELINE, &BASELINE, &DriftThresholds::default())
            .expect("reading");
        assert_eq!(calm.overall, DriftSeverity::None);
    }
}

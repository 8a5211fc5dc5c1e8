use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specificity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl ClassMetrics {
    /// Reads the named metric. Absent optional fields read as NaN so they
    /// poison any average built from them instead of being silently skipped.
    pub fn value(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::Precision => self.precision,
            MetricKey::Recall => self.recall,
            MetricKey::F1Score => self.f1_score,
            MetricKey::Support => self.support as f64,
            MetricKey::Specificity => self.specificity.unwrap_or(f64::NAN),
            MetricKey::Accuracy => self.accuracy.unwrap_or(f64::NAN),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    Precision,
    Recall,
    F1Score,
    Support,
    Specificity,
    Accuracy,
}

impl MetricKey {
    pub const DEFAULT_COLUMNS: [MetricKey; 4] = [
        MetricKey::Precision,
        MetricKey::Recall,
        MetricKey::F1Score,
        MetricKey::Support,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Precision => "precision",
            Self::Recall => "recall",
            Self::F1Score => "f1Score",
            Self::Support => "support",
            Self::Specificity => "specificity",
            Self::Accuracy => "accuracy",
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label -> metrics mapping that keeps document order.
///
/// Deserializes from a JSON object. A repeated label overwrites the earlier
/// value in place, so the first occurrence fixes the position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassReport {
    entries: Vec<(String, ClassMetrics)>,
}

impl ClassReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, metrics: ClassMetrics) {
        let label = label.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, slot)) => *slot = metrics,
            None => self.entries.push((label, metrics)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&ClassMetrics> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, metrics)| metrics)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassMetrics)> {
        self.entries
            .iter()
            .map(|(label, metrics)| (label.as_str(), metrics))
    }

    pub fn metrics(&self) -> impl Iterator<Item = &ClassMetrics> {
        self.entries.iter().map(|(_, metrics)| metrics)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<(String, ClassMetrics)> {
        &mut self.entries
    }
}

impl<S: Into<String>> FromIterator<(S, ClassMetrics)> for ClassReport {
    fn from_iter<I: IntoIterator<Item = (S, ClassMetrics)>>(iter: I) -> Self {
        let mut report = ClassReport::new();
        for (label, metrics) in iter {
            report.insert(label, metrics);
        }
        report
    }
}

impl Serialize for ClassReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, metrics) in &self.entries {
            map.serialize_entry(label, metrics)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ClassReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ClassReportVisitor;

        impl<'de> Visitor<'de> for ClassReportVisitor {
            type Value = ClassReport;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object mapping class labels to metrics")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ClassReport, A::Error> {
                let mut report = ClassReport::new();
                while let Some((label, metrics)) = access.next_entry::<String, ClassMetrics>()? {
                    report.insert(label, metrics);
                }
                Ok(report)
            }
        }

        deserializer.deserialize_map(ClassReportVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    pub fpr: f64,
    pub tpr: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrPoint {
    pub recall: f64,
    pub precision: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f1_score: Option<f64>,
}

impl PrPoint {
    pub fn new(recall: f64, precision: f64) -> Self {
        Self {
            recall,
            precision,
            threshold: None,
            f1_score: None,
        }
    }
}

/// Binned baseline and current frequencies over the same bin edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionPair {
    pub baseline: Vec<f64>,
    pub current: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftFeature {
    pub feature_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(flatten)]
    pub distributions: DistributionPair,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    pub rule: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldQualityRecord {
    #[serde(default)]
    pub field_name: String,
    #[serde(default)]
    pub data_type: Option<String>,
    pub total_count: u64,
    pub missing_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlier_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_rules: Option<Vec<ValidationRule>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapValue {
    pub feature: String,
    pub shap_value: f64,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub base_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapSample {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub prediction: Option<f64>,
    pub shap_values: Vec<ShapValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub name: String,
    pub importance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningCurvePoint {
    pub name: String,
    pub train: f64,
    pub validation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_high: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerGradient {
    pub layer_name: String,
    pub mean: f64,
    pub std: f64,
    #[serde(default)]
    pub zero_gradient_percent: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::{ClassMetrics, ClassReport, FieldQualityRecord, MetricKey};

    #[test]
    fn class_report_keeps_document_order() {
        let raw = r#"
        {
          "zebra": {"precision": 0.5, "recall": 0.5, "f1Score": 0.5, "support": 10},
          "apple": {"precision": 0.9, "recall": 0.8, "f1Score": 0.85, "support": 20, "specificity": 0.95}
        }
        "#;

        let report: ClassReport = serde_json::from_str(raw).expect("report should deserialize");
        assert_eq!(report.labels(), vec!["zebra", "apple"]);
        let apple = report.get("apple").expect("apple present");
        assert_eq!(apple.specificity, Some(0.95));
        assert!(apple.accuracy.is_none());
    }

    #[test]
    fn class_report_repeated_label_overwrites_in_place() {
        let raw = r#"
        {
          "a": {"precision": 0.1, "recall": 0.1, "f1Score": 0.1, "support": 1},
          "b": {"precision": 0.2, "recall": 0.2, "f1Score": 0.2, "support": 2},
          "a": {"precision": 0.3, "recall": 0.3, "f1Score": 0.3, "support": 3}
        }
        "#;

        let report: ClassReport = serde_json::from_str(raw).expect("report should deserialize");
        assert_eq!(report.labels(), vec!["a", "b"]);
        assert_eq!(report.get("a").map(|m| m.support), Some(3));
    }

    #[test]
    fn class_report_serializes_as_ordered_object() {
        let metrics = ClassMetrics {
            precision: 1.0,
            recall: 1.0,
            f1_score: 1.0,
            support: 4,
            specificity: None,
            accuracy: None,
        };
        let report: ClassReport = [("z", metrics), ("a", metrics)].into_iter().collect();
        let json = serde_json::to_string(&report).expect("serialize");
        assert!(json.find("\"z\"") < json.find("\"a\""));
        assert!(!json.contains("specificity"));
    }

    #[test]
    fn missing_optional_metric_reads_as_nan() {
        let metrics = ClassMetrics {
            precision: 0.4,
            recall: 0.6,
            f1_score: 0.48,
            support: 7,
            specificity: None,
            accuracy: Some(0.9),
        };
        assert!(metrics.value(MetricKey::Specificity).is_nan());
        assert_eq!(metrics.value(MetricKey::Accuracy), 0.9);
        assert_eq!(metrics.value(MetricKey::Support), 7.0);
    }

    #[test]
    fn field_quality_record_accepts_minimal_shape() {
        let raw = r#"{"totalCount": 100, "missingCount": 5}"#;
        let field: FieldQualityRecord = serde_json::from_str(raw).expect("field should deserialize");
        assert_eq!(field.field_name, "");
        assert!(field.outlier_count.is_none());
        assert!(field.validation_rules.is_none());
    }
}

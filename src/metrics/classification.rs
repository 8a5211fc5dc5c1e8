//! Summary rows for per-class classification reports.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{ClassReport, MetricKey};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryCell {
    pub metric: MetricKey,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub label: &'static str,
    pub values: Vec<SummaryCell>,
}

/// Unweighted mean of `key` across classes. An empty report yields NaN.
pub fn macro_average(classes: &ClassReport, key: MetricKey) -> f64 {
    let total = classes.metrics().map(|metrics| metrics.value(key)).sum::<f64>();
    total / classes.len() as f64
}

/// Support-weighted mean of `key`. Zero total support yields NaN.
pub fn weighted_average(classes: &ClassReport, key: MetricKey) -> f64 {
    let total_support = classes
        .metrics()
        .map(|metrics| metrics.support as f64)
        .sum::<f64>();
    let weighted_sum = classes
        .metrics()
        .map(|metrics| metrics.value(key) * metrics.support as f64)
        .sum::<f64>();
    weighted_sum / total_support
}

/// Stable sort by `key`; classes that compare equal keep insertion order.
/// NaN values (an absent optional metric) sort last in either direction.
pub fn sort_classes(classes: &ClassReport, key: MetricKey, order: SortOrder) -> ClassReport {
    let mut sorted = classes.clone();
    sorted.entries_mut().sort_by(|(_, left), (_, right)| {
        let (left, right) = (left.value(key), right.value(key));
        let ordering = match (left.is_nan(), right.is_nan()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => left.total_cmp(&right),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

/// Keeps classes whose label contains `query`, ignoring case. An empty query
/// keeps everything.
pub fn filter_classes(classes: &ClassReport, query: &str) -> ClassReport {
    if query.is_empty() {
        return classes.clone();
    }

    let needle = query.to_lowercase();
    classes
        .iter()
        .filter(|(label, _)| label.to_lowercase().contains(&needle))
        .map(|(label, metrics)| (label, *metrics))
        .collect()
}

pub fn summarize(classes: &ClassReport, keys: &[MetricKey]) -> Vec<SummaryRow> {
    let row = |label: &'static str, reducer: fn(&ClassReport, MetricKey) -> f64| SummaryRow {
        label,
        values: keys
            .iter()
            .map(|&metric| SummaryCell {
                metric,
                value: reducer(classes, metric),
            })
            .collect(),
    };

    vec![
        row("macro avg", macro_average),
        row("weighted avg", weighted_average),
    ]
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{
        SortOrder, filter_classes, macro_average, sort_classes, summarize, weighted_average,
    };
    use crate::model::{ClassMetrics, ClassReport, MetricKey};

    fn metrics(score: f64, support: u64) -> ClassMetrics {
        ClassMetrics {
            precision: score,
            recall: score,
            f1_score: score,
            support,
            specificity: None,
            accuracy: None,
        }
    }

    fn two_class_report() -> ClassReport {
        [("A", metrics(0.9, 100)), ("B", metrics(0.5, 300))]
            .into_iter()
            .collect()
    }

    #[test]
    fn weighted_and_macro_averages_differ_by_support() {
        let classes = two_class_report();
        assert_relative_eq!(
            weighted_average(&classes, MetricKey::Precision),
            0.6,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            macro_average(&classes, MetricKey::Precision),
            0.7,
            epsilon = 1e-12
        );
    }

    #[test]
    fn equal_support_makes_weighted_match_macro() {
        let classes: ClassReport = [
            ("cat", metrics(0.81, 50)),
            ("dog", metrics(0.64, 50)),
            ("bird", metrics(0.33, 50)),
        ]
        .into_iter()
        .collect();

        for key in [MetricKey::Precision, MetricKey::Recall, MetricKey::F1Score] {
            assert_relative_eq!(
                weighted_average(&classes, key),
                macro_average(&classes, key),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn empty_report_averages_to_nan() {
        let classes = ClassReport::new();
        assert!(macro_average(&classes, MetricKey::Recall).is_nan());
        assert!(weighted_average(&classes, MetricKey::Recall).is_nan());
    }

    #[test]
    fn zero_total_support_is_nan() {
        let classes: ClassReport = [("x", metrics(0.7, 0)), ("y", metrics(0.2, 0))]
            .into_iter()
            .collect();
        assert!(weighted_average(&classes, MetricKey::F1Score).is_nan());
        assert_relative_eq!(
            macro_average(&classes, MetricKey::F1Score),
            0.45,
            epsilon = 1e-12
        );
    }

    #[test]
    fn absent_optional_metric_poisons_average() {
        let mut with_specificity = metrics(0.5, 10);
        with_specificity.specificity = Some(0.9);
        let classes: ClassReport = [("a", with_specificity), ("b", metrics(0.5, 10))]
            .into_iter()
            .collect();
        assert!(macro_average(&classes, MetricKey::Specificity).is_nan());
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let classes: ClassReport = [
            ("first", metrics(0.5, 1)),
            ("high", metrics(0.9, 1)),
            ("second", metrics(0.5, 1)),
            ("third", metrics(0.5, 1)),
        ]
        .into_iter()
        .collect();

        let desc = sort_classes(&classes, MetricKey::Precision, SortOrder::Desc);
        assert_eq!(desc.labels(), vec!["high", "first", "second", "third"]);

        let asc = sort_classes(&classes, MetricKey::Precision, SortOrder::Asc);
        assert_eq!(asc.labels(), vec!["first", "second", "third", "high"]);
    }

    #[test]
    fn sort_puts_absent_metric_last_in_both_directions() {
        let classes: ClassReport = (0..40_u32)
            .map(|index| {
                let mut entry = metrics(0.5, 1);
                if index % 3 != 0 {
                    entry.specificity = Some(f64::from((index * 17) % 40) / 40.0);
                }
                (format!("class-{index}"), entry)
            })
            .collect();

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let sorted = sort_classes(&classes, MetricKey::Specificity, order);
            assert_eq!(sorted.len(), 40);

            let values = sorted
                .metrics()
                .map(|entry| entry.value(MetricKey::Specificity))
                .collect::<Vec<f64>>();
            let present = values.iter().take_while(|value| !value.is_nan()).count();
            assert_eq!(present, 26);
            assert!(values[present..].iter().all(|value| value.is_nan()));

            let in_order = values[..present].windows(2).all(|pair| match order {
                SortOrder::Asc => pair[0] <= pair[1],
                SortOrder::Desc => pair[0] >= pair[1],
            });
            assert!(in_order, "{order:?}: {values:?}");

            // Absent entries keep insertion order.
            let absent = sorted.labels()[present..].to_vec();
            assert_eq!(absent[..3], ["class-0", "class-3", "class-6"]);
        }
    }

    #[test]
    fn sort_by_support_orders_numerically() {
        let classes: ClassReport = [
            ("a", metrics(0.1, 30)),
            ("b", metrics(0.1, 200)),
            ("c", metrics(0.1, 4)),
        ]
        .into_iter()
        .collect();
        let sorted = sort_classes(&classes, MetricKey::Support, SortOrder::Asc);
        assert_eq!(sorted.labels(), vec!["c", "a", "b"]);
    }

    #[test]
    fn filter_matches_case_insensitive_substring() {
        let classes: ClassReport = [
            ("Positive", metrics(0.8, 1)),
            ("negative", metrics(0.7, 1)),
            ("Neutral", metrics(0.6, 1)),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            filter_classes(&classes, "TIVE").labels(),
            vec!["Positive", "negative"]
        );
        assert_eq!(filter_classes(&classes, "").len(), 3);
        assert!(filter_classes(&classes, "absent").is_empty());
    }

    #[test]
    fn summarize_builds_macro_and_weighted_rows() {
        let classes = two_class_report();
        let rows = summarize(&classes, &[MetricKey::Precision, MetricKey::Support]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "macro avg");
        assert_eq!(rows[1].label, "weighted avg");
        assert_relative_eq!(rows[0].values[0].value, 0.7, epsilon = 1e-12);
        assert_relative_eq!(rows[0].values[1].value, 200.0, epsilon = 1e-12);
        assert_relative_eq!(rows[1].values[0].value, 0.6, epsilon = 1e-12);
    }
}

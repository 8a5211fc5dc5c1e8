use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetricsError>;

#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("{context}: baseline has {baseline} bins but current has {current}")]
    LengthMismatch {
        context: &'static str,
        baseline: usize,
        current: usize,
    },
    #[error("drift thresholds must ascend (low {low} <= medium {medium} <= high {high})")]
    InvalidThresholds { low: f64, medium: f64, high: f64 },
    #[error("confusion matrix must be square: row {row} has {len} cells, expected {expected}")]
    NonSquareMatrix {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("quality weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
}

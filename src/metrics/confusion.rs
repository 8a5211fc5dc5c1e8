//! Row-major confusion matrix statistics.
//!
//! Cell `(i, j)` counts samples whose actual class is `i` and predicted class
//! is `j`. Empty rows or columns divide by zero and surface as NaN.

use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct ConfusionMatrix {
    rows: Vec<Vec<f64>>,
}

impl ConfusionMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let expected = rows.len();
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != expected)
        {
            return Err(MetricsError::NonSquareMatrix {
                row,
                len: cells.len(),
                expected,
            });
        }
        Ok(Self { rows })
    }

    pub fn n_classes(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn total(&self) -> f64 {
        self.rows.iter().flatten().sum()
    }

    pub fn row_totals(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn column_totals(&self) -> Vec<f64> {
        (0..self.n_classes())
            .map(|column| self.rows.iter().map(|row| row[column]).sum())
            .collect()
    }

    /// Largest cell, used to scale colour intensity. None for an empty matrix.
    pub fn max_cell(&self) -> Option<f64> {
        self.rows.iter().flatten().copied().reduce(f64::max)
    }

    pub fn accuracy(&self) -> f64 {
        let correct = (0..self.n_classes()).map(|i| self.rows[i][i]).sum::<f64>();
        correct / self.total()
    }

    pub fn precision(&self, class: usize) -> f64 {
        let column_total = self.rows.iter().map(|row| row[class]).sum::<f64>();
        self.rows[class][class] / column_total
    }

    pub fn recall(&self, class: usize) -> f64 {
        let row_total = self.rows[class].iter().sum::<f64>();
        self.rows[class][class] / row_total
    }

    pub fn precisions(&self) -> Vec<f64> {
        (0..self.n_classes()).map(|class| self.precision(class)).collect()
    }

    pub fn recalls(&self) -> Vec<f64> {
        (0..self.n_classes()).map(|class| self.recall(class)).collect()
    }

    /// Each row divided by its own total.
    pub fn normalized(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| {
                let total = row.iter().sum::<f64>();
                row.iter().map(|cell| cell / total).collect()
            })
            .collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for ConfusionMatrix {
    type Error = MetricsError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<ConfusionMatrix> for Vec<Vec<f64>> {
    fn from(matrix: ConfusionMatrix) -> Self {
        matrix.rows
    }
}

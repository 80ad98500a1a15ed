//! Z-score scaler over the numerical feature columns.

use serde::{Deserialize, Serialize};

/// Per-column (mean, std) parameters fitted on the training split.
///
/// The std is the population standard deviation. Parameters are fixed for
/// the lifetime of the deployed model and must never be refit at inference.
/// A zero-variance column would divide by zero in `transform`; that edge is
/// left unhandled, matching the training-time contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    /// Scaled column names, in fit order.
    pub columns: Vec<String>,
    /// Mean per scaled column.
    pub means: Vec<f32>,
    /// Population standard deviation per scaled column.
    pub stds: Vec<f32>,
}

impl Scaler {
    /// Fit (mean, std) for each named column over the given rows.
    ///
    /// `feature_columns` names every column of `rows`; only `columns` are
    /// fitted and later transformed, indicator columns stay untouched.
    pub fn fit(
        columns: &[String],
        rows: &[Vec<f32>],
        feature_columns: &[String],
    ) -> Result<Self, String> {
        if rows.is_empty() {
            return Err("Cannot fit scaler on an empty split".to_string());
        }
        let indices = resolve_indices(columns, feature_columns)?;
        let n = rows.len() as f64;
        let mut means = Vec::with_capacity(indices.len());
        let mut stds = Vec::with_capacity(indices.len());
        for &idx in &indices {
            let mean: f64 = rows.iter().map(|row| row[idx] as f64).sum::<f64>() / n;
            let var: f64 = rows
                .iter()
                .map(|row| {
                    let d = row[idx] as f64 - mean;
                    d * d
                })
                .sum::<f64>()
                / n;
            means.push(mean as f32);
            stds.push(var.sqrt() as f32);
        }
        Ok(Self {
            columns: columns.to_vec(),
            means,
            stds,
        })
    }

    /// Validate structural invariants of the fitted parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.columns.is_empty() {
            return Err("Scaler has no columns".to_string());
        }
        if self.means.len() != self.columns.len() || self.stds.len() != self.columns.len() {
            return Err("Scaler parameter lengths mismatch".to_string());
        }
        Ok(())
    }

    /// Transform one row in place, addressing scaled columns by name.
    pub fn transform_row(
        &self,
        row: &mut [f32],
        feature_columns: &[String],
    ) -> Result<(), String> {
        let indices = resolve_indices(&self.columns, feature_columns)?;
        for (slot, &idx) in indices.iter().enumerate() {
            row[idx] = (row[idx] - self.means[slot]) / self.stds[slot];
        }
        Ok(())
    }

    /// Transform every row of a matrix in place.
    pub fn transform_rows(
        &self,
        rows: &mut [Vec<f32>],
        feature_columns: &[String],
    ) -> Result<(), String> {
        let indices = resolve_indices(&self.columns, feature_columns)?;
        for row in rows {
            for (slot, &idx) in indices.iter().enumerate() {
                row[idx] = (row[idx] - self.means[slot]) / self.stds[slot];
            }
        }
        Ok(())
    }
}

fn resolve_indices(columns: &[String], feature_columns: &[String]) -> Result<Vec<usize>, String> {
    columns
        .iter()
        .map(|column| {
            feature_columns
                .iter()
                .position(|c| c == column)
                .ok_or_else(|| format!("Column {column} not present in feature columns"))
        })
        .collect()
}

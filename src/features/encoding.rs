//! Drop-first one-hot encoding and the target label mapping.

use serde::{Deserialize, Serialize};

use crate::dataset::{self, NUMERICAL_COLUMNS, PipeRecord};

/// One-hot scheme for a single categorical column.
///
/// Observed levels are sorted; the first is the dropped baseline and has no
/// indicator column. A value equal to the baseline (or never observed at fit
/// time) therefore encodes as all-zero indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotColumn {
    /// Raw column name, used as the indicator-column prefix.
    pub name: String,
    /// Dropped first level.
    pub baseline: String,
    /// Remaining levels in sorted order, one indicator column each.
    pub levels: Vec<String>,
}

impl OneHotColumn {
    fn fit(name: &str, sorted_levels: Vec<String>) -> Result<Self, String> {
        let mut levels = sorted_levels;
        if levels.is_empty() {
            return Err(format!("Column {name} has no observed levels"));
        }
        let baseline = levels.remove(0);
        Ok(Self {
            name: name.to_string(),
            baseline,
            levels,
        })
    }

    /// Indicator column names, in order.
    pub fn column_names(&self) -> impl Iterator<Item = String> + '_ {
        self.levels
            .iter()
            .map(|level| format!("{}_{}", self.name, level))
    }

    /// Indicator values for one categorical value.
    pub fn encode(&self, value: &str) -> Vec<f32> {
        self.levels
            .iter()
            .map(|level| if level == value { 1.0 } else { 0.0 })
            .collect()
    }
}

/// Fitted encoder producing the exact ordered feature columns used at
/// training time: the eight numericals, then `Material_*`, then `Grade_*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoder {
    /// Material one-hot scheme.
    pub material: OneHotColumn,
    /// Grade one-hot scheme.
    pub grade: OneHotColumn,
}

impl FeatureEncoder {
    /// Fit the encoder over every observed record.
    pub fn fit(records: &[PipeRecord]) -> Result<Self, String> {
        let material = OneHotColumn::fit("Material", dataset::material_levels(records))?;
        let grade = OneHotColumn::fit("Grade", dataset::grade_levels(records))?;
        Ok(Self { material, grade })
    }

    /// Ordered list of feature-column names. This exact list is persisted as
    /// an artifact and must match inference rows byte for byte.
    pub fn feature_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = NUMERICAL_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.extend(self.material.column_names());
        columns.extend(self.grade.column_names());
        columns
    }

    /// Encode one record into a feature row matching `feature_columns`.
    pub fn encode_record(&self, record: &PipeRecord) -> Vec<f32> {
        let mut row: Vec<f32> = NUMERICAL_COLUMNS
            .iter()
            .map(|column| record.numeric_value(column).unwrap_or(0.0))
            .collect();
        row.extend(self.material.encode(&record.material));
        row.extend(self.grade.encode(&record.grade));
        row
    }
}

/// Bijection between condition labels and integer class codes.
///
/// Fitted once at training time over the sorted observed target strings and
/// reused verbatim at inference; never refit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMapping {
    /// Class labels in code order: `classes[code] == label`.
    pub classes: Vec<String>,
}

impl LabelMapping {
    /// Fit the mapping over all observed condition values.
    pub fn fit(records: &[PipeRecord]) -> Result<Self, String> {
        let classes = dataset::condition_levels(records);
        if classes.is_empty() {
            return Err("No condition labels observed".to_string());
        }
        Ok(Self { classes })
    }

    /// Integer code for a label.
    pub fn encode(&self, label: &str) -> Result<usize, String> {
        self.classes
            .iter()
            .position(|class| class == label)
            .ok_or_else(|| format!("Unknown condition label: {label}"))
    }

    /// Label for an integer code.
    pub fn decode(&self, code: usize) -> Result<&str, String> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| format!("Class code {code} out of range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(material: &str, grade: &str, condition: &str) -> PipeRecord {
        PipeRecord {
            pipe_size_mm: 800.0,
            thickness_mm: 15.0,
            max_pressure_psi: 1000.0,
            temperature_c: 25.0,
            corrosion_impact_percent: 15.0,
            thickness_loss_mm: 0.075,
            material_loss_percent: 0.5,
            time_years: 10.0,
            material: material.into(),
            grade: grade.into(),
            condition: condition.into(),
        }
    }

    fn fixture() -> Vec<PipeRecord> {
        vec![
            record("Carbon Steel", "API 5L X42", "Normal"),
            record("HDPE", "API 5L X52", "Moderate"),
            record("PVC", "API 5L X42", "Critical"),
        ]
    }

    #[test]
    fn baseline_level_encodes_all_zero() {
        let encoder = FeatureEncoder::fit(&fixture()).unwrap();
        assert_eq!(encoder.material.baseline, "Carbon Steel");
        assert_eq!(encoder.material.encode("Carbon Steel"), vec![0.0, 0.0]);
    }

    #[test]
    fn non_baseline_level_sets_exactly_one_indicator() {
        let encoder = FeatureEncoder::fit(&fixture()).unwrap();
        assert_eq!(encoder.material.encode("HDPE"), vec![1.0, 0.0]);
        assert_eq!(encoder.material.encode("PVC"), vec![0.0, 1.0]);
    }

    #[test]
    fn unseen_level_encodes_all_zero() {
        let encoder = FeatureEncoder::fit(&fixture()).unwrap();
        assert_eq!(encoder.material.encode("Titanium"), vec![0.0, 0.0]);
    }

    #[test]
    fn feature_columns_are_numericals_then_indicators() {
        let encoder = FeatureEncoder::fit(&fixture()).unwrap();
        let columns = encoder.feature_columns();
        assert_eq!(&columns[..8], &NUMERICAL_COLUMNS.map(String::from));
        assert_eq!(
            &columns[8..],
            &[
                "Material_HDPE".to_string(),
                "Material_PVC".to_string(),
                "Grade_API 5L X52".to_string(),
            ]
        );
    }

    #[test]
    fn encoded_row_aligns_with_columns() {
        let encoder = FeatureEncoder::fit(&fixture()).unwrap();
        let row = encoder.encode_record(&record("PVC", "API 5L X52", "Normal"));
        assert_eq!(row.len(), encoder.feature_columns().len());
        assert_eq!(row[0], 800.0);
        assert_eq!(&row[8..], &[0.0, 1.0, 1.0]);
    }

    #[test]
    fn label_mapping_is_a_sorted_bijection() {
        let mapping = LabelMapping::fit(&fixture()).unwrap();
        assert_eq!(mapping.classes, vec!["Critical", "Moderate", "Normal"]);
        assert_eq!(mapping.encode("Moderate").unwrap(), 1);
        assert_eq!(mapping.decode(2).unwrap(), "Normal");
        assert!(mapping.encode("Unknown").is_err());
        assert!(mapping.decode(3).is_err());
    }
}

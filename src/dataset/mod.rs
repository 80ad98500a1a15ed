//! Pipeline segment dataset types and loading.

mod loader;

pub use loader::{DatasetError, load_records};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Default file name for the pipeline dataset CSV.
pub const DATASET_FILE_NAME: &str = "market_pipe_thickness_loss_dataset.csv";

/// Numerical feature columns in schema order. Scaling and feature-vector
/// construction both address these by name.
pub const NUMERICAL_COLUMNS: [&str; 8] = [
    "Pipe_Size_mm",
    "Thickness_mm",
    "Max_Pressure_psi",
    "Temperature_C",
    "Corrosion_Impact_Percent",
    "Thickness_Loss_mm",
    "Material_Loss_Percent",
    "Time_Years",
];

/// One pipeline-segment observation from the dataset CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipeRecord {
    #[serde(rename = "Pipe_Size_mm")]
    pub pipe_size_mm: f32,
    #[serde(rename = "Thickness_mm")]
    pub thickness_mm: f32,
    #[serde(rename = "Max_Pressure_psi")]
    pub max_pressure_psi: f32,
    #[serde(rename = "Temperature_C")]
    pub temperature_c: f32,
    #[serde(rename = "Corrosion_Impact_Percent")]
    pub corrosion_impact_percent: f32,
    #[serde(rename = "Thickness_Loss_mm")]
    pub thickness_loss_mm: f32,
    #[serde(rename = "Material_Loss_Percent")]
    pub material_loss_percent: f32,
    #[serde(rename = "Time_Years")]
    pub time_years: f32,
    #[serde(rename = "Material")]
    pub material: String,
    #[serde(rename = "Grade")]
    pub grade: String,
    #[serde(rename = "Condition")]
    pub condition: String,
}

impl PipeRecord {
    /// Numerical value for a column name, `None` for categorical columns.
    pub fn numeric_value(&self, column: &str) -> Option<f32> {
        match column {
            "Pipe_Size_mm" => Some(self.pipe_size_mm),
            "Thickness_mm" => Some(self.thickness_mm),
            "Max_Pressure_psi" => Some(self.max_pressure_psi),
            "Temperature_C" => Some(self.temperature_c),
            "Corrosion_Impact_Percent" => Some(self.corrosion_impact_percent),
            "Thickness_Loss_mm" => Some(self.thickness_loss_mm),
            "Material_Loss_Percent" => Some(self.material_loss_percent),
            "Time_Years" => Some(self.time_years),
            _ => None,
        }
    }
}

/// Unique observed material levels in deterministic (sorted) order.
pub fn material_levels(records: &[PipeRecord]) -> Vec<String> {
    sorted_levels(records.iter().map(|r| r.material.as_str()))
}

/// Unique observed grade levels in deterministic (sorted) order.
pub fn grade_levels(records: &[PipeRecord]) -> Vec<String> {
    sorted_levels(records.iter().map(|r| r.grade.as_str()))
}

/// Unique observed condition levels in deterministic (sorted) order.
pub fn condition_levels(records: &[PipeRecord]) -> Vec<String> {
    sorted_levels(records.iter().map(|r| r.condition.as_str()))
}

fn sorted_levels<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<&str> = values.collect();
    set.into_iter().map(str::to_string).collect()
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

    #[test]
    fn levels_are_sorted_and_deduplicated() {
        let records = vec![
            record("PVC", "B", "Normal"),
            record("Carbon Steel", "A", "Critical"),
            record("PVC", "A", "Moderate"),
        ];
        assert_eq!(material_levels(&records), vec!["Carbon Steel", "PVC"]);
        assert_eq!(grade_levels(&records), vec!["A", "B"]);
        assert_eq!(
            condition_levels(&records),
            vec!["Critical", "Moderate", "Normal"]
        );
    }

    #[test]
    fn numeric_value_covers_all_numerical_columns() {
        let r = record("PVC", "A", "Normal");
        for column in NUMERICAL_COLUMNS {
            assert!(r.numeric_value(column).is_some(), "missing {column}");
        }
        assert!(r.numeric_value("Material").is_none());
    }
}

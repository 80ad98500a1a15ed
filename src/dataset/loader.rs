//! CSV loader for the pipeline segment dataset.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::PipeRecord;

/// Errors raised while loading the dataset CSV.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file does not exist. Both stages halt on this.
    #[error("Dataset file not found: {path}")]
    Missing { path: PathBuf },
    /// The file exists but could not be read or parsed.
    #[error("Failed to read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        source: csv::Error,
    },
    /// The file parsed but contained no rows.
    #[error("Dataset {path} contains no rows")]
    Empty { path: PathBuf },
}

/// Load every record from the dataset CSV at `path`.
///
/// The header row must carry the exact raw column names; rows are
/// serde-deserialized by name so column order in the file does not matter.
pub fn load_records(path: &Path) -> Result<Vec<PipeRecord>, DatasetError> {
    if !path.is_file() {
        return Err(DatasetError::Missing {
            path: path.to_path_buf(),
        });
    }
    let mut reader = csv::Reader::from_path(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut records = Vec::new();
    for row in reader.deserialize::<PipeRecord>() {
        let record = row.map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        records.push(record);
    }
    if records.is_empty() {
        return Err(DatasetError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const HEADER: &str = "Pipe_Size_mm,Thickness_mm,Max_Pressure_psi,Temperature_C,\
Corrosion_Impact_Percent,Thickness_Loss_mm,Material_Loss_Percent,Time_Years,\
Material,Grade,Condition";

    #[test]
    fn loads_rows_by_header_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipes.csv");
        std::fs::write(
            &path,
            format!(
                "{HEADER}\n800,15.0,1000,25.0,15.0,0.075,0.5,10,Carbon Steel,API 5L X42,Normal\n\
400,8.0,2200,60.0,40.0,3.2,40.0,25,PVC,API 5L X52,Critical\n"
            ),
        )
        .unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].material, "Carbon Steel");
        assert_eq!(records[0].pipe_size_mm, 800.0);
        assert_eq!(records[1].condition, "Critical");
    }

    #[test]
    fn missing_file_yields_missing_variant() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        match load_records(&path) {
            Err(DatasetError::Missing { path: reported }) => assert_eq!(reported, path),
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, format!("{HEADER}\n")).unwrap();
        assert!(matches!(
            load_records(&path),
            Err(DatasetError::Empty { .. })
        ));
    }
}

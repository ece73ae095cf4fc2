use nalgebra::Vector3;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV writing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

/// One row of the per-atom force difference report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForceDiffRecord {
    pub atom: usize,
    pub dfx: f64,
    pub dfy: f64,
    pub dfz: f64,
    pub max_abs: f64,
}

impl ForceDiffRecord {
    pub fn from_diff(index: usize, diff: &Vector3<f64>) -> Self {
        Self {
            atom: index + 1,
            dfx: diff.x,
            dfy: diff.y,
            dfz: diff.z,
            max_abs: diff.amax(),
        }
    }
}

pub fn write_force_report_to<W: Write>(
    diff: &[Vector3<f64>],
    writer: W,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (i, row) in diff.iter().enumerate() {
        csv_writer.serialize(ForceDiffRecord::from_diff(i, row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the per-atom force differences to `path` as CSV with columns
/// `atom,dfx,dfy,dfz,max_abs`. Atom numbering is 1-based.
pub fn write_force_report(diff: &[Vector3<f64>], path: &Path) -> Result<(), ReportError> {
    let to_error = |source: csv::Error| ReportError::Csv {
        path: path.to_string_lossy().to_string(),
        source,
    };
    let file = std::fs::File::create(path).map_err(|e| to_error(e.into()))?;
    write_force_report_to(diff, file).map_err(to_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn record_uses_one_based_atom_index_and_max_abs() {
        let record = ForceDiffRecord::from_diff(0, &Vector3::new(0.1, -0.4, 0.2));
        assert_eq!(record.atom, 1);
        assert_eq!(record.max_abs, 0.4);
    }

    #[test]
    fn writes_header_and_one_row_per_atom() {
        let diff = vec![Vector3::new(0.0, 0.5, 0.0), Vector3::new(-1.0, 0.0, 0.25)];
        let mut buffer = Vec::new();
        write_force_report_to(&diff, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "atom,dfx,dfy,dfz,max_abs");
        assert_eq!(lines[1], "1,0.0,0.5,0.0,0.5");
        assert_eq!(lines[2], "2,-1.0,0.0,0.25,1.0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn write_force_report_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diff.csv");
        write_force_report(&[Vector3::zeros()], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("atom,dfx,dfy,dfz,max_abs"));
    }

    #[test]
    fn write_force_report_fails_for_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no/such/dir/diff.csv");
        let result = write_force_report(&[], &path);
        assert!(matches!(result, Err(ReportError::Csv { .. })));
    }
}

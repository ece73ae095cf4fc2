use crate::error::{CliError, Result};
use ddxcheck::compare::config::EnergyCheckMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSolverConfig {
    pub executable: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileToleranceConfig {
    pub threshold: Option<f64>,
    pub energy_check: Option<EnergyCheckMode>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub solver: Option<FileSolverConfig>,
    pub tolerance: Option<FileToleranceConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration file {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_full_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("check.toml");
        fs::write(
            &path,
            r#"
            [solver]
            executable = "/opt/ddx/ddx_driver_testing"
            timeout-secs = 600

            [tolerance]
            threshold = 1e-5
            energy-check = "absolute"
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let solver = config.solver.unwrap();
        assert_eq!(
            solver.executable,
            Some(PathBuf::from("/opt/ddx/ddx_driver_testing"))
        );
        assert_eq!(solver.timeout_secs, Some(600));
        let tolerance = config.tolerance.unwrap();
        assert_eq!(tolerance.threshold, Some(1e-5));
        assert_eq!(tolerance.energy_check, Some(EnergyCheckMode::Absolute));
    }

    #[test]
    fn empty_file_yields_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        fs::write(&path, "").unwrap();
        assert_eq!(FileConfig::from_file(&path).unwrap(), FileConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("typo.toml");
        fs::write(&path, "[tolerance]\nthreshhold = 1e-4\n").unwrap();
        assert!(matches!(
            FileConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn unknown_energy_check_mode_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mode.toml");
        fs::write(&path, "[tolerance]\nenergy-check = \"relative\"\n").unwrap();
        assert!(FileConfig::from_file(&path).is_err());
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = FileConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }
}

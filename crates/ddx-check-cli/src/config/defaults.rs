use ddxcheck::compare::config::{DEFAULT_THRESHOLD, EnergyCheckMode};
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub solver_executable: PathBuf,
    pub timeout_secs: Option<u64>,
    pub threshold: f64,
    pub energy_check: EnergyCheckMode,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            solver_executable: PathBuf::from("./ddx_driver_testing"),
            timeout_secs: None,
            threshold: DEFAULT_THRESHOLD,
            energy_check: EnergyCheckMode::Signed,
        }
    }
}

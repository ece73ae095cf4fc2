use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_THRESHOLD: f64 = 1e-4;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Threshold must be a finite positive number, got {0}")]
    InvalidThreshold(f64),
    #[error("Unknown energy check mode '{0}'. Expected 'signed' or 'absolute'.")]
    UnknownEnergyCheckMode(String),
}

/// How the relative energy error is formed before it is compared to the threshold.
///
/// `Signed` evaluates `(computed - reference) / reference`, so any deviation
/// with a negative ratio passes whatever its size. For a negative reference
/// energy that is a computed energy above the reference. `Absolute` evaluates
/// `|computed - reference| / |reference|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnergyCheckMode {
    #[default]
    Signed,
    Absolute,
}

impl FromStr for EnergyCheckMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "signed" => Ok(Self::Signed),
            "absolute" => Ok(Self::Absolute),
            _ => Err(ConfigError::UnknownEnergyCheckMode(s.to_string())),
        }
    }
}

impl fmt::Display for EnergyCheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed => write!(f, "signed"),
            Self::Absolute => write!(f, "absolute"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonConfig {
    pub threshold: f64,
    pub energy_check: EnergyCheckMode,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            energy_check: EnergyCheckMode::default(),
        }
    }
}

#[derive(Default)]
pub struct ComparisonConfigBuilder {
    threshold: Option<f64>,
    energy_check: Option<EnergyCheckMode>,
}

impl ComparisonConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn energy_check(mut self, mode: EnergyCheckMode) -> Self {
        self.energy_check = Some(mode);
        self
    }

    pub fn build(self) -> Result<ComparisonConfig, ConfigError> {
        let threshold = self.threshold.unwrap_or(DEFAULT_THRESHOLD);
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(threshold));
        }

        Ok(ComparisonConfig {
            threshold,
            energy_check: self.energy_check.unwrap_or_default(),
        })
    }
}

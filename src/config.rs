use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::analysis::{AnalysisError, Parameter, Parameters, Variation};
use crate::predict::GroundStation;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid station coordinates '{0}', expected \"lat, lon\"")]
    InvalidCoordinates(String),
    #[error("invalid duration '{value}': {source}")]
    InvalidDuration {
        value: String,
        source: humantime::DurationError,
    },
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub station: StationConfig,
    pub tle: TleConfig,
    pub parameters: HashMap<String, f64>,
    #[serde(default)]
    pub variations: Vec<VariationConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TleConfig {
    pub folder: PathBuf,
    /// e.g. "3h"; older files are reported as stale
    pub max_age: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariationConfig {
    pub parameter: String,
    pub values: Vec<f64>,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn station(&self) -> Result<GroundStation, ConfigError> {
        GroundStation::from_coordinates(&self.station.coordinates, Some(self.station.altitude_m))
            .ok_or_else(|| ConfigError::InvalidCoordinates(self.station.coordinates.clone()))
    }

    pub fn tle_max_age(&self) -> Result<Option<Duration>, ConfigError> {
        self.tle
            .max_age
            .as_deref()
            .map(|value| {
                humantime::parse_duration(value).map_err(|source| ConfigError::InvalidDuration {
                    value: value.to_string(),
                    source,
                })
            })
            .transpose()
    }

    pub fn parameters(&self) -> Result<Parameters, ConfigError> {
        Ok(Parameters::from_map(&self.parameters)?)
    }

    pub fn variations(&self) -> Result<Vec<Variation>, ConfigError> {
        self.variations
            .iter()
            .map(|v| {
                let parameter = Parameter::from_name(&v.parameter)
                    .ok_or_else(|| AnalysisError::UnknownParameter(v.parameter.clone()))?;
                Ok(Variation {
                    parameter,
                    values: v.values.clone(),
                })
            })
            .collect()
    }
}

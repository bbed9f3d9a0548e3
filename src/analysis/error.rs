use thiserror::Error;

use crate::analysis::Parameter;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("missing required parameter: {0}")]
    MissingParameter(Parameter),
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("invalid value {value} for {parameter}: {reason}")]
    InvalidParameter {
        parameter: Parameter,
        value: f64,
        reason: &'static str,
    },
}

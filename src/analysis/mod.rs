mod error;
pub mod evaluation;
pub mod geometry;
pub mod hazard;
pub mod params;
pub mod pipeline;
pub mod region;
pub mod sensitivity;
pub mod stats;
pub mod survival;
#[cfg(test)]
pub(crate) mod testing;
mod time_grid;
pub mod utility;
pub mod windows;

pub use error::AnalysisError;
pub use evaluation::evaluate;
pub use params::{Parameter, Parameters};
pub use pipeline::{RepresentativeTrace, VisibilityPipeline, VisibilityRecord};
pub use sensitivity::{run_sensitivity, summarize_by_parameter, SensitivityRecord, Variation};
pub use time_grid::TimeGrid;

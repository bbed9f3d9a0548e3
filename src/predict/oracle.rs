use chrono::{DateTime, Utc};

use crate::predict::propagation::{elevation_deg, ecef_to_subpoint, propagate_ecef_km};
use crate::predict::{GroundStation, PredictError, SubPoint, TleEntry};

/// Source of per-satellite look geometry.
///
/// Implementations must be pure: the same satellite, instants and station
/// always yield the same samples.
pub trait EphemerisOracle {
    type Satellite;

    fn satellite_id<'a>(&self, satellite: &'a Self::Satellite) -> &'a str;

    /// Elevation in degrees, one value per instant in `times`
    fn elevation(
        &self,
        satellite: &Self::Satellite,
        times: &[DateTime<Utc>],
        station: &GroundStation,
    ) -> Result<Vec<f64>, PredictError>;

    /// Ground sub-point, one value per instant in `times`
    fn subpoint(
        &self,
        satellite: &Self::Satellite,
        times: &[DateTime<Utc>],
    ) -> Result<Vec<SubPoint>, PredictError>;
}

/// SGP4-backed oracle over TLE entries
#[derive(Debug, Default, Clone, Copy)]
pub struct Sgp4Oracle;

impl EphemerisOracle for Sgp4Oracle {
    type Satellite = TleEntry;

    fn satellite_id<'a>(&self, satellite: &'a TleEntry) -> &'a str {
        &satellite.info.name
    }

    fn elevation(
        &self,
        satellite: &TleEntry,
        times: &[DateTime<Utc>],
        station: &GroundStation,
    ) -> Result<Vec<f64>, PredictError> {
        times
            .iter()
            .map(|t| {
                propagate_ecef_km(
                    &satellite.info.name,
                    &satellite.elements,
                    &satellite.constants,
                    *t,
                )
                .map(|ecef| elevation_deg(station, ecef))
            })
            .collect()
    }

    fn subpoint(
        &self,
        satellite: &TleEntry,
        times: &[DateTime<Utc>],
    ) -> Result<Vec<SubPoint>, PredictError> {
        times
            .iter()
            .map(|t| {
                propagate_ecef_km(
                    &satellite.info.name,
                    &satellite.elements,
                    &satellite.constants,
                    *t,
                )
                .map(ecef_to_subpoint)
            })
            .collect()
    }
}

use chrono::{DateTime, Utc};

use crate::predict::{EphemerisOracle, GroundStation, PredictError, SubPoint};

pub struct ScriptedSatellite {
    pub id: String,
    pub elevation_deg: Vec<f64>,
    pub subpoint: SubPoint,
    pub fail: bool,
}

impl ScriptedSatellite {
    pub fn new(id: &str, elevation_deg: Vec<f64>, subpoint: (f64, f64)) -> Self {
        Self {
            id: id.to_string(),
            elevation_deg,
            subpoint: SubPoint {
                latitude_deg: subpoint.0,
                longitude_deg: subpoint.1,
            },
            fail: false,
        }
    }

    pub fn failing(id: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(id, Vec::new(), (0.0, 0.0))
        }
    }
}

/// Replays each satellite's stored elevation series verbatim
pub struct ScriptedOracle;

impl EphemerisOracle for ScriptedOracle {
    type Satellite = ScriptedSatellite;

    fn satellite_id<'a>(&self, satellite: &'a ScriptedSatellite) -> &'a str {
        &satellite.id
    }

    fn elevation(
        &self,
        satellite: &ScriptedSatellite,
        _times: &[DateTime<Utc>],
        _station: &GroundStation,
    ) -> Result<Vec<f64>, PredictError> {
        if satellite.fail {
            return Err(PredictError::Propagation {
                satellite: satellite.id.clone(),
                message: "decayed".to_string(),
            });
        }
        Ok(satellite.elevation_deg.clone())
    }

    fn subpoint(
        &self,
        satellite: &ScriptedSatellite,
        times: &[DateTime<Utc>],
    ) -> Result<Vec<SubPoint>, PredictError> {
        Ok(vec![satellite.subpoint; times.len()])
    }
}

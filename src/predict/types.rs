use serde::Serialize;

/// Information about a single satellite from TLE
#[derive(Debug, Clone, Serialize)]
pub struct SatelliteInfo {
    pub name: String,
    pub norad_id: u32,
    pub tle_source: String,
}

/// Geodetic point directly below a satellite
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubPoint {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::predict::ground_station::{WGS84_A_KM, WGS84_E2};
use crate::predict::{GroundStation, PredictError, SubPoint};

const GEODETIC_ITERATIONS: usize = 5;

/// Propagate to `timestamp` and return the satellite position in ECEF (km)
pub fn propagate_ecef_km(
    satellite: &str,
    elements: &Elements,
    constants: &Constants,
    timestamp: DateTime<Utc>,
) -> Result<[f64; 3], PredictError> {
    let propagation = |message: String| PredictError::Propagation {
        satellite: satellite.to_string(),
        message,
    };

    let minutes = elements
        .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
        .map_err(|e| propagation(e.to_string()))?;

    let prediction = constants
        .propagate(minutes)
        .map_err(|e| propagation(e.to_string()))?;

    let sidereal =
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()));

    Ok(teme_to_ecef_position(prediction.position, sidereal))
}

/// Elevation (degrees) of an ECEF position as seen from the station
pub fn elevation_deg(station: &GroundStation, sat_ecef: [f64; 3]) -> f64 {
    let sta_ecef = station.position_ecef_km();
    let dr = [
        sat_ecef[0] - sta_ecef[0],
        sat_ecef[1] - sta_ecef[1],
        sat_ecef[2] - sta_ecef[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();
    if range_km <= 0.0 {
        return 90.0;
    }
    let (_, _, up) = ecef_to_enu(dr, station.lat_rad(), station.lon_rad());
    (up / range_km).clamp(-1.0, 1.0).asin().to_degrees()
}

/// Geodetic sub-point of an ECEF position
pub fn ecef_to_subpoint(ecef: [f64; 3]) -> SubPoint {
    let [x, y, z] = ecef;
    let p = (x * x + y * y).sqrt();
    let longitude = y.atan2(x);

    let mut latitude = z.atan2(p * (1.0 - WGS84_E2));
    for _ in 0..GEODETIC_ITERATIONS {
        let sin_lat = latitude.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        latitude = (z + WGS84_E2 * n * sin_lat).atan2(p);
    }

    SubPoint {
        latitude_deg: latitude.to_degrees(),
        longitude_deg: longitude.to_degrees(),
    }
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zenith_elevation() {
        let station = GroundStation {
            latitude_deg: 16.5,
            longitude_deg: 80.6,
            altitude_m: 0.0,
        };
        let ground = station.position_ecef_km();
        let norm = (ground[0].powi(2) + ground[1].powi(2) + ground[2].powi(2)).sqrt();
        // Radially outward is close to, but not exactly, geodetic up
        let overhead = [
            ground[0] * (norm + 550.0) / norm,
            ground[1] * (norm + 550.0) / norm,
            ground[2] * (norm + 550.0) / norm,
        ];
        assert!(elevation_deg(&station, overhead) > 89.0);
    }

    #[test]
    fn test_antipode_below_horizon() {
        let station = GroundStation::default();
        assert!(elevation_deg(&station, [-7000.0, 0.0, 0.0]) < -80.0);
    }

    #[test]
    fn test_subpoint_roundtrip_through_station() {
        let station = GroundStation {
            latitude_deg: 45.0,
            longitude_deg: -120.0,
            altitude_m: 550_000.0,
        };
        let sub = ecef_to_subpoint(station.position_ecef_km());
        assert!((sub.latitude_deg - 45.0).abs() < 1e-6);
        assert!((sub.longitude_deg + 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_teme_rotation_preserves_norm() {
        let pos = [4000.0, 3000.0, 2000.0];
        let rotated = teme_to_ecef_position(pos, 1.234);
        let n0 = pos.iter().map(|v| v * v).sum::<f64>().sqrt();
        let n1 = rotated.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((n0 - n1).abs() < 1e-9);
        assert_eq!(rotated[2], 2000.0);
    }
}

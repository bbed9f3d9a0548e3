use std::fmt;

use crate::analysis::geometry::great_circle_distance_km;
use crate::analysis::stats::mean;
use crate::analysis::{Parameters, TimeGrid};
use crate::predict::{EphemerisOracle, GroundStation, PredictError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    NeverVisible,
    InsufficientVisibility { visible_s: f64 },
    LowElevation { mean_elevation_deg: f64 },
    OutOfRegion { min_distance_km: f64 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NeverVisible => write!(f, "never above minimum elevation"),
            RejectReason::InsufficientVisibility { visible_s } => {
                write!(f, "visible for only {:.0} s", visible_s)
            }
            RejectReason::LowElevation { mean_elevation_deg } => {
                write!(f, "mean visible elevation {:.1} deg", mean_elevation_deg)
            }
            RejectReason::OutOfRegion { min_distance_km } => {
                write!(f, "closest sub-point {:.0} km away", min_distance_km)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionDecision {
    Accepted { min_ground_distance_km: f64 },
    Rejected(RejectReason),
}

/// `true` wherever elevation reaches the configured minimum
pub fn visibility_mask(elevation_deg: &[f64], elev_min_deg: f64) -> Vec<bool> {
    elevation_deg.iter().map(|e| *e >= elev_min_deg).collect()
}

/// Aggregate visibility checks that need no ephemeris beyond the elevation series
pub fn screen_visibility(
    elevation_deg: &[f64],
    mask: &[bool],
    params: &Parameters,
) -> Option<RejectReason> {
    let visible: Vec<f64> = elevation_deg
        .iter()
        .zip(mask)
        .filter_map(|(e, v)| v.then_some(*e))
        .collect();

    let visible_s = visible.len() as f64 * params.step_s;
    if visible_s < params.min_visible_seconds {
        return Some(RejectReason::InsufficientVisibility { visible_s });
    }
    if visible.is_empty() {
        return Some(RejectReason::NeverVisible);
    }
    let mean_elevation_deg = mean(&visible);
    if mean_elevation_deg < params.min_avg_elev_deg {
        return Some(RejectReason::LowElevation { mean_elevation_deg });
    }
    None
}

/// Decide whether a satellite is relevant to the terminal at all.
///
/// Sub-points are only requested for visible instants.
pub fn filter_satellite<O: EphemerisOracle>(
    oracle: &O,
    satellite: &O::Satellite,
    station: &GroundStation,
    grid: &TimeGrid,
    elevation_deg: &[f64],
    mask: &[bool],
    params: &Parameters,
) -> Result<RegionDecision, PredictError> {
    if let Some(reason) = screen_visibility(elevation_deg, mask, params) {
        return Ok(RegionDecision::Rejected(reason));
    }

    let visible_times: Vec<_> = grid
        .instants()
        .iter()
        .zip(mask)
        .filter_map(|(t, v)| v.then_some(*t))
        .collect();
    let subpoints = oracle.subpoint(satellite, &visible_times)?;

    let min_distance_km = subpoints
        .iter()
        .map(|p| {
            great_circle_distance_km(
                station.latitude_deg,
                station.longitude_deg,
                p.latitude_deg,
                p.longitude_deg,
            )
        })
        .fold(f64::INFINITY, f64::min);

    if min_distance_km <= params.max_ground_distance_km {
        Ok(RegionDecision::Accepted {
            min_ground_distance_km: min_distance_km,
        })
    } else {
        Ok(RegionDecision::Rejected(RejectReason::OutOfRegion {
            min_distance_km,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::params::baseline_map;
    use crate::analysis::testing::{ScriptedOracle, ScriptedSatellite};
    use chrono::{TimeZone, Utc};

    fn params() -> Parameters {
        Parameters::from_map(&baseline_map()).unwrap()
    }

    fn grid(params: &Parameters) -> TimeGrid {
        TimeGrid::new(params, Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_visibility_mask() {
        assert_eq!(
            visibility_mask(&[-5.0, 10.0, 9.99, 45.0], 10.0),
            vec![false, true, false, true]
        );
    }

    #[test]
    fn test_screen_never_visible() {
        let mut params = params();
        params.min_visible_seconds = 0.0;
        let elevation = vec![-10.0; 20];
        let mask = visibility_mask(&elevation, params.elev_min_deg);
        assert_eq!(
            screen_visibility(&elevation, &mask, &params),
            Some(RejectReason::NeverVisible)
        );
    }

    #[test]
    fn test_screen_short_visibility() {
        let params = params();
        // 11 samples * 15 s = 165 s < 180 s
        let mut elevation = vec![-10.0; 40];
        elevation[5..16].fill(60.0);
        let mask = visibility_mask(&elevation, params.elev_min_deg);
        assert_eq!(
            screen_visibility(&elevation, &mask, &params),
            Some(RejectReason::InsufficientVisibility { visible_s: 165.0 })
        );
    }

    #[test]
    fn test_screen_low_elevation() {
        let params = params();
        let mut elevation = vec![-10.0; 40];
        elevation[5..25].fill(20.0);
        let mask = visibility_mask(&elevation, params.elev_min_deg);
        assert!(matches!(
            screen_visibility(&elevation, &mask, &params),
            Some(RejectReason::LowElevation { .. })
        ));
    }

    #[test]
    fn test_filter_accepts_nearby_satellite() {
        let params = params();
        let grid = grid(&params);
        let station = GroundStation::from_coordinates("16.5062, 80.6480", None).unwrap();
        let mut elevation = vec![-10.0; grid.len()];
        elevation[10..40].fill(50.0);
        let sat = ScriptedSatellite::new("NEAR", elevation.clone(), (17.0, 81.0));
        let mask = visibility_mask(&elevation, params.elev_min_deg);

        let decision =
            filter_satellite(&ScriptedOracle, &sat, &station, &grid, &elevation, &mask, &params)
                .unwrap();
        match decision {
            RegionDecision::Accepted {
                min_ground_distance_km,
            } => {
                let expected = great_circle_distance_km(16.5062, 80.6480, 17.0, 81.0);
                assert!((min_ground_distance_km - expected).abs() < 1e-9);
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_rejects_distant_satellite() {
        let params = params();
        let grid = grid(&params);
        let station = GroundStation::from_coordinates("16.5062, 80.6480", None).unwrap();
        let mut elevation = vec![-10.0; grid.len()];
        elevation[10..40].fill(50.0);
        let sat = ScriptedSatellite::new("FAR", elevation.clone(), (30.0, 80.6480));
        let mask = visibility_mask(&elevation, params.elev_min_deg);

        let decision =
            filter_satellite(&ScriptedOracle, &sat, &station, &grid, &elevation, &mask, &params)
                .unwrap();
        assert!(matches!(
            decision,
            RegionDecision::Rejected(RejectReason::OutOfRegion { .. })
        ));
    }
}

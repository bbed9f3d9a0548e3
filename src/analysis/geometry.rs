/// Mean Earth radius used for ground distances (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Time derivative of an elevation series in deg/s.
///
/// Central differences inside, one-sided differences at both ends. Fewer than
/// two samples yields all zeros.
pub fn angular_rate_deg_s(elevation_deg: &[f64], step_s: f64) -> Vec<f64> {
    let n = elevation_deg.len();
    if n < 2 {
        return vec![0.0; n];
    }

    (0..n)
        .map(|i| match i {
            0 => (elevation_deg[1] - elevation_deg[0]) / step_s,
            i if i == n - 1 => (elevation_deg[n - 1] - elevation_deg[n - 2]) / step_s,
            i => (elevation_deg[i + 1] - elevation_deg[i - 1]) / (2.0 * step_s),
        })
        .collect()
}

/// Haversine distance between two points in km
pub fn great_circle_distance_km(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let lat1 = lat1_deg.to_radians();
    let lat2 = lat2_deg.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (lon2_deg - lon1_deg).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angular_rate_linear_ramp() {
        let elevation: Vec<f64> = (0..6).map(|i| 10.0 + 3.0 * i as f64).collect();
        let rate = angular_rate_deg_s(&elevation, 15.0);
        assert_eq!(rate.len(), 6);
        for r in rate {
            assert!((r - 0.2).abs() < 1e-12);
        }
    }

    #[test]
    fn test_angular_rate_edges_are_one_sided() {
        let rate = angular_rate_deg_s(&[0.0, 10.0, 40.0], 10.0);
        assert_eq!(rate, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_angular_rate_short_series() {
        assert!(angular_rate_deg_s(&[], 15.0).is_empty());
        assert_eq!(angular_rate_deg_s(&[42.0], 15.0), vec![0.0]);
    }

    #[test]
    fn test_great_circle_distance() {
        assert!(great_circle_distance_km(16.5, 80.6, 16.5, 80.6).abs() < 1e-9);

        // One degree of arc along a meridian
        let d = great_circle_distance_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - EARTH_RADIUS_KM.to_radians()).abs() < 1e-6);

        // NYC to London: ~5,570 km
        let d = great_circle_distance_km(40.7128, -74.006, 51.5074, -0.1278);
        assert!((d - 5570.0).abs() < 50.0);
    }

    #[test]
    fn test_great_circle_distance_is_symmetric() {
        let a = great_circle_distance_km(16.5, 80.6, 18.2, 83.1);
        let b = great_circle_distance_km(18.2, 83.1, 16.5, 80.6);
        assert!((a - b).abs() < 1e-9);
    }
}

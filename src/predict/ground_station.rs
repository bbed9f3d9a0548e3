/// WGS-84 semi-major axis (km)
pub const WGS84_A_KM: f64 = 6378.137;
/// WGS-84 first eccentricity squared
pub const WGS84_E2: f64 = 0.00669437999014;

/// A fixed ground terminal on the WGS-84 ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundStation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl Default for GroundStation {
    fn default() -> Self {
        Self {
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            altitude_m: 0.0,
        }
    }
}

impl GroundStation {
    /// Parse a `"lat, lon"` pair. Returns `None` for malformed or out-of-range input.
    pub fn from_coordinates(coordinates: &str, altitude_m: Option<f64>) -> Option<Self> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return None;
        }
        let lat: f64 = parts[0].parse().ok()?;
        let lon: f64 = parts[1].parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(Self {
            latitude_deg: lat,
            longitude_deg: lon,
            altitude_m: altitude_m.unwrap_or(0.0),
        })
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        [
            (n + alt_km) * cos_lat * lon.cos(),
            (n + alt_km) * cos_lat * lon.sin(),
            (n * (1.0 - WGS84_E2) + alt_km) * sin_lat,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_coordinates() {
        let station = GroundStation::from_coordinates("16.5062, 80.6480", Some(25.0)).unwrap();
        assert_eq!(station.latitude_deg, 16.5062);
        assert_eq!(station.longitude_deg, 80.6480);
        assert_eq!(station.altitude_m, 25.0);

        let station = GroundStation::from_coordinates("-33.9,18.4", None).unwrap();
        assert_eq!(station.altitude_m, 0.0);
    }

    #[test]
    fn test_from_coordinates_rejects_garbage() {
        assert!(GroundStation::from_coordinates("16.5", None).is_none());
        assert!(GroundStation::from_coordinates("north, east", None).is_none());
        assert!(GroundStation::from_coordinates("95.0, 10.0", None).is_none());
        assert!(GroundStation::from_coordinates("1, 2, 3", None).is_none());
    }

    #[test]
    fn test_position_ecef() {
        let equator = GroundStation::default().position_ecef_km();
        assert!((equator[0] - WGS84_A_KM).abs() < 1e-9);
        assert!(equator[1].abs() < 1e-9);
        assert!(equator[2].abs() < 1e-9);

        let pole = GroundStation {
            latitude_deg: 90.0,
            ..Default::default()
        }
        .position_ecef_km();
        // Polar radius ~6356.752 km
        assert!((pole[2] - 6356.752).abs() < 0.01);
    }
}

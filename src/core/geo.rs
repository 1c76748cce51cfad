use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude.
///
/// Serialized the way Mapbox and GeoJSON expect positions: `[lng, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a coordinate from a GeoJSON-ordered `[lng, lat]` position
    pub fn from_lng_lat(position: [f64; 2]) -> Self {
        Self::new(position[1], position[0])
    }

    /// GeoJSON-ordered `[lng, lat]` position
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Parses a `"lat,lng"` string, the format polygon records use for their
    /// center. Out-of-range values are rejected.
    pub fn parse_lat_lng(text: &str) -> Result<Self> {
        let mut parts = text.split(',').map(str::trim);
        let (lat, lng) = match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lng), None) => (lat, lng),
            _ => {
                return Err(MapError::InvalidCoordinates(format!(
                    "expected \"lat,lng\", got {:?}",
                    text
                )))
            }
        };

        let parse = |value: &str| {
            value.parse::<f64>().map_err(|e| {
                MapError::InvalidCoordinates(format!("{:?} in {:?}: {}", value, text, e))
            })
        };

        let position = Self::new(parse(lat)?, parse(lng)?);
        if !position.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "{:?} is out of range",
                text
            )));
        }
        Ok(position)
    }

    /// Shifts `lng` by whole turns until it lies within 180° of `reference`.
    ///
    /// When the map is zoomed out far enough to show several copies of the
    /// world, this picks the copy of a feature the user actually clicked.
    pub fn wrap_toward(lng: f64, reference: f64) -> f64 {
        if !lng.is_finite() || !reference.is_finite() {
            return lng;
        }

        let delta = reference - lng;
        if delta.abs() <= 180.0 {
            return lng;
        }

        // Same result as stepping 360° at a time, without the loop.
        let turns = ((delta.abs() - 180.0) / 360.0).ceil();
        lng + turns * 360.0 * delta.signum()
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from(position: [f64; 2]) -> Self {
        Self::from_lng_lat(position)
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(value: LatLng) -> Self {
        value.to_lng_lat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(40.7128, -74.0060);
        assert_eq!(coord.lat, 40.7128);
        assert_eq!(coord.lng, -74.0060);
        assert!(coord.is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert_eq!(LatLng::parse_lat_lng("-90, 180").unwrap(), LatLng::new(-90.0, 180.0));
        assert!(matches!(
            LatLng::parse_lat_lng("121.5,25.0"),
            Err(MapError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_serializes_as_lng_lat() {
        let coord = LatLng::new(39.6699, 13.5917);
        assert_eq!(serde_json::to_string(&coord).unwrap(), "[13.5917,39.6699]");

        let parsed: LatLng = serde_json::from_str("[138.0,-28.0]").unwrap();
        assert_eq!(parsed, LatLng::new(-28.0, 138.0));
    }

    #[test]
    fn test_parse_center_string() {
        let center = LatLng::parse_lat_lng("45.899977, 6.172652").unwrap();
        assert_eq!(center, LatLng::new(45.899977, 6.172652));

        assert!(LatLng::parse_lat_lng("45.8").is_err());
        assert!(LatLng::parse_lat_lng("a,b").is_err());
        assert!(LatLng::parse_lat_lng("1,2,3").is_err());
    }

    #[test]
    fn test_wrap_toward_reference() {
        assert_eq!(LatLng::wrap_toward(-170.0, 170.0), 190.0);
        assert_eq!(LatLng::wrap_toward(170.0, -170.0), -190.0);
        assert_eq!(LatLng::wrap_toward(10.0, 20.0), 10.0);
        assert_eq!(LatLng::wrap_toward(-100.0, 700.0), 620.0);
    }

    #[test]
    fn test_wrap_toward_always_within_half_turn() {
        let references = [-900.0, -540.5, -180.0, -0.5, 0.0, 179.9, 360.0, 1234.5];
        let longitudes = [-720.0, -181.0, -45.0, 0.0, 90.0, 180.0, 540.0, 1000.0];

        for &reference in &references {
            for &lng in &longitudes {
                let wrapped = LatLng::wrap_toward(lng, reference);
                assert!(
                    (reference - wrapped).abs() <= 180.0,
                    "{} wrapped toward {} gave {}",
                    lng,
                    reference,
                    wrapped
                );
                assert_eq!((wrapped - lng) % 360.0, 0.0);
            }
        }
    }

    #[test]
    fn test_wrap_toward_non_finite_is_untouched() {
        assert!(LatLng::wrap_toward(f64::NAN, 10.0).is_nan());
        assert_eq!(LatLng::wrap_toward(10.0, f64::INFINITY), 10.0);
    }
}

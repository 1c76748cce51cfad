use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Where the camera should end up after a `fly_to`/`ease_to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    pub center: LatLng,
    pub zoom: f64,
}

impl CameraTarget {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Shorthand taking the `[lng, lat]` order Mapbox uses.
    pub fn lng_lat(lng: f64, lat: f64, zoom: f64) -> Self {
        Self::new(LatLng::new(lat, lng), zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_json_matches_mapbox_options() {
        let target = CameraTarget::lng_lat(-33.5917, 39.6699, 1.5);
        let json = serde_json::to_value(target).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "center": [-33.5917, 39.6699], "zoom": 1.5 })
        );
    }
}

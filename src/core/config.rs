//! Application configuration
//!
//! Every knob the page needs (map style, data locations, camera presets for
//! each visualization mode, choropleth and overlay styling) lives here.
//! All sections default to the values the page ships with, and any subset of
//! fields can be overridden from JSON.

use crate::{
    core::{camera::CameraTarget, constants, geo::LatLng},
    data::geojson::GeometryType,
    Result,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub map: MapConfig,
    pub data: DataConfig,
    pub modes: ModeConfig,
    pub highlight: HighlightConfig,
    pub overlay: OverlayConfig,
}

impl AppConfig {
    /// Parses a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Camera the overlay flies to is relative to the initial zoom.
    pub fn overlay_base_zoom(&self) -> f64 {
        self.map.zoom
    }
}

/// The map surface itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub container_id: String,
    pub style_url: String,
    pub access_token: Option<String>,
    pub center: LatLng,
    pub zoom: f64,
    pub show_compass: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_id: "map".to_string(),
            style_url: "mapbox://styles/mapbox/dark-v10".to_string(),
            access_token: None,
            // Australia
            center: LatLng::new(-28.0, 138.0),
            zoom: 3.5,
            show_compass: false,
        }
    }
}

/// Where the two static documents are fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Prefix joined with the document paths. Empty means "relative to the page".
    pub base_url: String,
    pub country_path: String,
    pub polygon_path: String,
}

impl DataConfig {
    pub fn country_url(&self) -> String {
        join_url(&self.base_url, &self.country_path)
    }

    pub fn polygon_url(&self) -> String {
        join_url(&self.base_url, &self.polygon_path)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            country_path: "/assets/jsons/country-codes.json".to_string(),
            polygon_path: "/assets/jsons/coordinates.json".to_string(),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Cluster and heat mode settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    /// Point dataset both modes render.
    pub points_url: String,
    pub marker_image_url: String,
    pub cluster_max_zoom: u8,
    pub cluster_radius: u32,
    pub cluster_overview: CameraTarget,
    pub heat_overview: CameraTarget,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            points_url: constants::EARTHQUAKES_URL.to_string(),
            marker_image_url: "assets/images/places-pin-green.png".to_string(),
            cluster_max_zoom: constants::CLUSTER_MAX_ZOOM,
            cluster_radius: constants::CLUSTER_RADIUS,
            cluster_overview: CameraTarget::lng_lat(13.5917, 39.6699, 2.0),
            heat_overview: CameraTarget::lng_lat(-33.5917, 39.6699, 1.5),
        }
    }
}

/// Country choropleth settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Style layer the choropleth sits under.
    pub before_layer: String,
    /// Move the camera after every selection toggle.
    pub recenter_on_selection: bool,
    pub recenter_target: CameraTarget,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            before_layer: constants::ADMIN_BOUNDARY_LAYER.to_string(),
            recenter_on_selection: false,
            recenter_target: CameraTarget::lng_lat(13.5917, 49.6699, 3.0),
        }
    }
}

/// Static polygon overlay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub geometry_type: GeometryType,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub zoom_offset: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            geometry_type: GeometryType::MultiPolygon,
            fill_color: "#0080ff".to_string(),
            fill_opacity: 0.5,
            zoom_offset: constants::OVERLAY_ZOOM_OFFSET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page() {
        let config = AppConfig::default();
        assert_eq!(config.map.container_id, "map");
        assert_eq!(config.map.center, LatLng::new(-28.0, 138.0));
        assert_eq!(config.modes.cluster_max_zoom, 14);
        assert_eq!(config.modes.cluster_radius, 50);
        assert!(!config.highlight.recenter_on_selection);
        assert_eq!(config.overlay_base_zoom() + config.overlay.zoom_offset, 7.5);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config = AppConfig::from_json(
            r#"{
                "map": { "zoom": 2.0 },
                "highlight": { "recenter_on_selection": true },
                "overlay": { "geometry_type": "Polygon" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.map.zoom, 2.0);
        assert_eq!(config.map.container_id, "map");
        assert!(config.highlight.recenter_on_selection);
        assert_eq!(config.highlight.before_layer, "admin-1-boundary-bg");
        assert_eq!(config.overlay.geometry_type, GeometryType::Polygon);
        assert_eq!(config.overlay.fill_color, "#0080ff");
    }

    #[test]
    fn test_data_urls() {
        let mut data = DataConfig::default();
        assert_eq!(data.country_url(), "/assets/jsons/country-codes.json");

        data.base_url = "http://localhost:4200/".to_string();
        assert_eq!(
            data.polygon_url(),
            "http://localhost:4200/assets/jsons/coordinates.json"
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(AppConfig::from_json("{ not json").is_err());
    }
}

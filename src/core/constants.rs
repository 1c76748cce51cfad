//! Identifiers and magic numbers shared by the map features.
//! The ids must match what the Mapbox style and the draw plugin expect, so
//! they live in one place instead of being repeated as string literals.

/// Remote point dataset shared by both visualization modes.
pub const EARTHQUAKES_URL: &str = "https://docs.mapbox.com/mapbox-gl-js/assets/earthquakes.geojson";

/// Cluster mode source id.
pub const CLUSTER_SOURCE: &str = "clustermap";
/// Aggregate cluster circles.
pub const CLUSTER_LAYER: &str = "clusters";
/// Abbreviated point counts drawn over clusters.
pub const CLUSTER_COUNT_LAYER: &str = "cluster-count";
/// Single points rendered with the custom marker icon.
pub const UNCLUSTERED_LAYER: &str = "unclustered-point";
/// Image name registered for the marker icon.
pub const MARKER_IMAGE: &str = "custom-marker";

/// Clustering stops expanding above this zoom.
pub const CLUSTER_MAX_ZOOM: u8 = 14;
/// Cluster radius in screen pixels.
pub const CLUSTER_RADIUS: u32 = 50;

/// Heat mode source id.
pub const HEAT_SOURCE: &str = "heatmap";
pub const HEAT_LAYER: &str = "earthquakes-heat";
pub const HEAT_POINT_LAYER: &str = "earthquakes-point";
/// Heat layers are slotted below the style's water labels.
pub const HEAT_BEFORE_LAYER: &str = "waterway-label";

/// Country boundaries vector tileset.
pub const COUNTRIES_SOURCE: &str = "countries";
pub const COUNTRIES_TILESET_URL: &str = "mapbox://mapbox.country-boundaries-v1";
pub const COUNTRIES_SOURCE_LAYER: &str = "country_boundaries";
/// Choropleth fill layer.
pub const COUNTRIES_JOIN_LAYER: &str = "countries-join";
/// Feature property carrying the ISO 3166-1 alpha-3 code.
pub const COUNTRY_CODE_PROPERTY: &str = "iso_3166_1_alpha_3";
/// Style layer the choropleth is inserted under, keeping borders on top.
pub const ADMIN_BOUNDARY_LAYER: &str = "admin-1-boundary-bg";
/// Fill for countries without a selection.
pub const TRANSPARENT: &str = "rgba(0,0,0,0)";

/// Static polygon overlay source and layer id.
pub const POLYGON_OVERLAY_ID: &str = "polygons";

/// Added to the base zoom when flying to the first overlay polygon.
pub const OVERLAY_ZOOM_OFFSET: f64 = 4.0;

/// DOM element receiving the drawn polygon area.
pub const AREA_ELEMENT_ID: &str = "calculated-area";
/// Alert raised when a draw event other than a delete leaves nothing drawn.
pub const DRAW_PROMPT: &str = "Click the map to draw a polygon.";

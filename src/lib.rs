//! # mapstage
//!
//! Orchestration layer for a browser map page built on Mapbox GL.
//!
//! The heavy lifting (tiling, rendering, clustering, drawing) belongs to the
//! mapping library and its draw plugin. This crate owns what sits on top:
//! a cluster/heat visualization state machine, a country choropleth driven by
//! user selection, live polygon area readout and a static polygon overlay.
//! Everything talks to the map through the [`surface::MapSurface`] trait, so
//! the same logic runs against Mapbox in the browser (feature `wasm`) and
//! against [`surface::memory::InMemorySurface`] natively.

pub mod app;
pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod plugins;
pub mod prelude;
pub mod surface;
pub mod ui;

#[cfg(feature = "wasm")]
pub mod web;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    camera::CameraTarget,
    config::AppConfig,
    geo::LatLng,
};

pub use app::App;

pub use data::{
    geojson::{FeatureCollection, GeoJsonFeature, GeoJsonGeometry, GeometryType},
    provider::{DataProvider, HttpDataProvider, StaticDataProvider},
    records::{CountryRecord, PolygonRecord},
};

pub use input::events::MapEvent;

pub use layers::{base::LayerSpec, source::SourceSpec};

pub use plugins::{
    base::{MapContext, MapPlugin},
    draw::PolygonDrawPlugin,
    highlight::{CountryHighlightPlugin, SelectedCountrySet},
    mode::{ModeController, VisualizationMode},
    overlay::PolygonOverlayPlugin,
};

pub use surface::{
    memory::{InMemoryDraw, InMemorySurface},
    Cursor, DrawControl, MapSurface,
};

pub use ui::{
    popup::Popup,
    view::{PageView, RecordingView},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Failed to load image '{name}': {reason}")]
    ImageLoad { name: String, reason: String },

    #[error("Element not found: #{0}")]
    MissingElement(String),

    #[error("JavaScript error: {0}")]
    Js(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;

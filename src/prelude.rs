//! Prelude module for common mapstage types and traits
//!
//! `use mapstage::prelude::*;` brings in the configuration, data model,
//! surface contract and feature plugins.

pub use crate::core::{
    camera::CameraTarget,
    config::{AppConfig, DataConfig, HighlightConfig, MapConfig, ModeConfig, OverlayConfig},
    geo::LatLng,
};

pub use crate::data::{
    geojson::{FeatureCollection, GeoJsonFeature, GeoJsonGeometry, GeometryType},
    provider::{DataProvider, HttpDataProvider, StaticDataProvider},
    records::{CountryRecord, PolygonRecord},
};

pub use crate::layers::{base::LayerSpec, manager::LayerManager, source::SourceSpec};

pub use crate::input::events::{DrawEventKind, MapEvent};

pub use crate::plugins::{
    base::{MapContext, MapPlugin},
    draw::PolygonDrawPlugin,
    highlight::{CountryHighlightPlugin, SelectedCountrySet},
    mode::{ModeController, VisualizationMode},
    overlay::PolygonOverlayPlugin,
};

pub use crate::surface::{memory::InMemorySurface, Cursor, DrawControl, MapSurface};

pub use crate::ui::{popup::Popup, view::PageView};

pub use crate::app::App;

pub use crate::{MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Everything the map (and the drawing plugin attached to it) reports back.
///
/// The browser glue turns Mapbox's untyped callback arguments into these
/// before handing them to [`App::handle_event`](crate::app::App::handle_event).
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// The style finished loading; sources and layers may now be added.
    Loaded,
    /// A feature of the `clusters` layer was clicked
    ClusterClick(ClusterClick),
    /// A feature of the `unclustered-point` layer was clicked
    PointClick(PointClick),
    /// The pointer entered a feature of `layer_id`
    PointerEnter { layer_id: String },
    /// The pointer left the features of `layer_id`
    PointerLeave { layer_id: String },
    /// A drawn shape was created, changed or removed
    Draw(DrawEventKind),
    /// A `load_image` request finished
    ImageLoaded(ImageLoaded),
    /// A `request_cluster_expansion_zoom` lookup finished
    ClusterExpansionZoom(ExpansionZoom),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterClick {
    pub cluster_id: u64,
    /// Centroid of the clicked cluster
    pub center: LatLng,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointClick {
    /// Where the user clicked
    pub click: LatLng,
    /// The point's own coordinates, possibly a world copy away from `click`
    pub position: LatLng,
    pub properties: QuakeProperties,
}

/// Properties of an earthquake feature that the popup shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuakeProperties {
    #[serde(default)]
    pub mag: Option<f64>,
    #[serde(default)]
    pub tsunami: Option<i64>,
}

impl QuakeProperties {
    pub fn had_tsunami(&self) -> bool {
        self.tsunami == Some(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawEventKind {
    Create,
    Update,
    Delete,
}

impl DrawEventKind {
    /// The drawing plugin's name for this event.
    pub fn event_name(&self) -> &'static str {
        match self {
            DrawEventKind::Create => "draw.create",
            DrawEventKind::Update => "draw.update",
            DrawEventKind::Delete => "draw.delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageLoaded {
    pub name: String,
    /// Request number passed to `load_image`
    pub request: u64,
    pub result: Result<(), String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionZoom {
    pub cluster_id: u64,
    pub center: LatLng,
    pub zoom: Result<f64, String>,
}

//! The contract this application relies on from the mapping library.
//!
//! Only the operations the features actually use are modelled. Implementors
//! behave like Mapbox GL: adding a duplicate id or removing a missing one is
//! an error, so callers guard with the `has_*` checks (or the `*_if_present`
//! helpers). Camera moves are fire-and-forget. The two asynchronous
//! operations, image loading and cluster expansion lookups, complete later
//! through [`MapEvent::ImageLoaded`](crate::input::events::MapEvent) and
//! [`MapEvent::ClusterExpansionZoom`](crate::input::events::MapEvent).

pub mod memory;

use crate::{
    core::{camera::CameraTarget, geo::LatLng},
    data::geojson::FeatureCollection,
    layers::{base::LayerSpec, source::SourceSpec},
    plugins::draw::DrawOptions,
    ui::popup::Popup,
    Result,
};

/// Mouse cursor over the map canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    /// Value for the canvas' CSS `cursor` property
    pub fn css(&self) -> &'static str {
        match self {
            Cursor::Default => "",
            Cursor::Pointer => "pointer",
        }
    }
}

pub trait MapSurface {
    fn add_source(&mut self, id: &str, source: &SourceSpec) -> Result<()>;
    fn remove_source(&mut self, id: &str) -> Result<()>;
    fn has_source(&self, id: &str) -> bool;

    /// Adds `layer` on top of the style, or directly beneath `before`.
    fn add_layer(&mut self, layer: &LayerSpec, before: Option<&str>) -> Result<()>;
    fn remove_layer(&mut self, id: &str) -> Result<()>;
    fn has_layer(&self, id: &str) -> bool;

    /// Starts fetching an image. Completion (or failure) is reported as
    /// `MapEvent::ImageLoaded` carrying `request`.
    fn load_image(&mut self, name: &str, url: &str, request: u64);
    /// Registers a previously loaded image under `name` for use by symbol layers.
    fn add_image(&mut self, name: &str) -> Result<()>;
    fn remove_image(&mut self, name: &str) -> Result<()>;
    fn has_image(&self, name: &str) -> bool;

    fn fly_to(&mut self, target: CameraTarget);
    fn ease_to(&mut self, target: CameraTarget);

    /// Asks the clustered source for the zoom at which `cluster_id` splits.
    /// Completion is reported as `MapEvent::ClusterExpansionZoom`.
    fn request_cluster_expansion_zoom(&mut self, source_id: &str, cluster_id: u64, center: LatLng);

    fn show_popup(&mut self, popup: &Popup) -> Result<()>;
    fn set_cursor(&mut self, cursor: Cursor);

    fn add_navigation_control(&mut self, show_compass: bool) -> Result<()>;

    fn remove_layer_if_present(&mut self, id: &str) -> Result<bool> {
        if !self.has_layer(id) {
            return Ok(false);
        }
        self.remove_layer(id)?;
        Ok(true)
    }

    fn remove_source_if_present(&mut self, id: &str) -> Result<bool> {
        if !self.has_source(id) {
            return Ok(false);
        }
        self.remove_source(id)?;
        Ok(true)
    }

    fn remove_image_if_present(&mut self, name: &str) -> Result<bool> {
        if !self.has_image(name) {
            return Ok(false);
        }
        self.remove_image(name)?;
        Ok(true)
    }
}

/// The interactive drawing plugin.
pub trait DrawControl {
    /// Adds the plugin's controls to the map.
    fn attach(&mut self, options: &DrawOptions) -> Result<()>;

    /// Everything currently drawn.
    fn get_all(&self) -> Result<FeatureCollection>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_css() {
        assert_eq!(Cursor::Pointer.css(), "pointer");
        assert_eq!(Cursor::default().css(), "");
    }
}

use crate::{
    core::{camera::CameraTarget, geo::LatLng},
    data::geojson::FeatureCollection,
    input::events::{ExpansionZoom, ImageLoaded, MapEvent},
    layers::{base::LayerSpec, manager::LayerManager, source::SourceSpec},
    plugins::draw::DrawOptions,
    prelude::{HashMap, HashSet},
    surface::{Cursor, DrawControl, MapSurface},
    ui::popup::Popup,
    MapError, Result,
};
use std::{cell::RefCell, rc::Rc};

/// A camera move as requested by the application
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMove {
    FlyTo(CameraTarget),
    EaseTo(CameraTarget),
}

impl CameraMove {
    pub fn target(&self) -> CameraTarget {
        match self {
            CameraMove::FlyTo(target) | CameraMove::EaseTo(target) => *target,
        }
    }
}

#[derive(Debug)]
struct PendingImage {
    name: String,
    url: String,
    request: u64,
}

#[derive(Debug)]
struct PendingExpansion {
    source_id: String,
    cluster_id: u64,
    center: LatLng,
}

#[derive(Debug, Default)]
struct SurfaceState {
    sources: HashMap<String, SourceSpec>,
    layers: LayerManager,
    /// Images registered with the style
    images: HashSet<String>,
    /// Images fetched but not yet registered
    fetched_images: HashSet<String>,
    pending_images: Vec<PendingImage>,
    broken_image_urls: HashSet<String>,
    pending_expansions: Vec<PendingExpansion>,
    expansion_zooms: HashMap<u64, f64>,
    camera_moves: Vec<CameraMove>,
    popups: Vec<Popup>,
    cursor: Cursor,
    navigation_controls: usize,
}

/// A [`MapSurface`] that keeps the style in memory.
///
/// It enforces the same id rules as Mapbox GL (duplicate adds, missing
/// removals, removing a source still in use, and inserting before a missing
/// layer all fail) and queues the asynchronous operations until the caller
/// resolves them, so completions can be delivered in any order.
///
/// Clones share state: keep one handle for inspection and pass the other to
/// the application.
#[derive(Debug, Clone, Default)]
pub struct InMemorySurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl InMemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose style already contains the given layers, the way a
    /// loaded basemap style does.
    pub fn with_base_layers(layer_ids: &[&str]) -> Self {
        let surface = Self::new();
        {
            let mut state = surface.state.borrow_mut();
            for id in layer_ids {
                let layer = LayerSpec::new(*id, crate::layers::base::LayerType::Symbol, "composite");
                // ids are unique here, so the add cannot fail
                let _ = state.layers.add_layer(layer, None);
            }
        }
        surface
    }

    /// Makes every load of `url` fail.
    pub fn fail_images_from(&self, url: &str) {
        self.state.borrow_mut().broken_image_urls.insert(url.to_string());
    }

    /// Sets the answer for future expansion lookups of `cluster_id`.
    pub fn set_expansion_zoom(&self, cluster_id: u64, zoom: f64) {
        self.state.borrow_mut().expansion_zooms.insert(cluster_id, zoom);
    }

    /// Completes every queued image load, oldest first.
    pub fn resolve_images(&self) -> Vec<MapEvent> {
        let mut state = self.state.borrow_mut();
        let pending = std::mem::take(&mut state.pending_images);
        pending
            .into_iter()
            .map(|image| {
                let result = if state.broken_image_urls.contains(&image.url) {
                    Err(format!("404 Not Found: {}", image.url))
                } else {
                    state.fetched_images.insert(image.name.clone());
                    Ok(())
                };
                MapEvent::ImageLoaded(ImageLoaded {
                    name: image.name,
                    request: image.request,
                    result,
                })
            })
            .collect()
    }

    /// Completes every queued expansion lookup, oldest first.
    pub fn resolve_expansions(&self) -> Vec<MapEvent> {
        let mut state = self.state.borrow_mut();
        let pending = std::mem::take(&mut state.pending_expansions);
        pending
            .into_iter()
            .map(|lookup| {
                let zoom = if !state.sources.contains_key(&lookup.source_id) {
                    Err(format!("source \"{}\" is gone", lookup.source_id))
                } else {
                    state
                        .expansion_zooms
                        .get(&lookup.cluster_id)
                        .copied()
                        .ok_or_else(|| format!("No cluster with the specified id {}", lookup.cluster_id))
                };
                MapEvent::ClusterExpansionZoom(ExpansionZoom {
                    cluster_id: lookup.cluster_id,
                    center: lookup.center,
                    zoom,
                })
            })
            .collect()
    }

    pub fn pending_image_count(&self) -> usize {
        self.state.borrow().pending_images.len()
    }

    pub fn layer_ids(&self) -> Vec<String> {
        self.state.borrow().layers.render_order().to_vec()
    }

    pub fn layer(&self, id: &str) -> Option<LayerSpec> {
        self.state.borrow().layers.get_layer(id).cloned()
    }

    pub fn source(&self, id: &str) -> Option<SourceSpec> {
        self.state.borrow().sources.get(id).cloned()
    }

    pub fn source_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state.borrow().sources.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn camera_moves(&self) -> Vec<CameraMove> {
        self.state.borrow().camera_moves.clone()
    }

    pub fn last_camera_move(&self) -> Option<CameraMove> {
        self.state.borrow().camera_moves.last().copied()
    }

    pub fn popups(&self) -> Vec<Popup> {
        self.state.borrow().popups.clone()
    }

    pub fn cursor(&self) -> Cursor {
        self.state.borrow().cursor
    }

    pub fn navigation_controls(&self) -> usize {
        self.state.borrow().navigation_controls
    }
}

impl MapSurface for InMemorySurface {
    fn add_source(&mut self, id: &str, source: &SourceSpec) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.sources.contains_key(id) {
            return Err(MapError::Source(format!(
                "There is already a source with ID \"{}\"",
                id
            )));
        }
        log::debug!("add source {}", id);
        state.sources.insert(id.to_string(), source.clone());
        Ok(())
    }

    fn remove_source(&mut self, id: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.sources.contains_key(id) {
            return Err(MapError::Source(format!(
                "There is no source with ID \"{}\"",
                id
            )));
        }
        if state.layers.uses_source(id) {
            return Err(MapError::Source(format!(
                "Source \"{}\" cannot be removed while a layer is using it",
                id
            )));
        }
        log::debug!("remove source {}", id);
        state.sources.remove(id);
        Ok(())
    }

    fn has_source(&self, id: &str) -> bool {
        self.state.borrow().sources.contains_key(id)
    }

    fn add_layer(&mut self, layer: &LayerSpec, before: Option<&str>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.sources.contains_key(&layer.source) {
            return Err(MapError::Layer(format!(
                "Source \"{}\" not found for layer \"{}\"",
                layer.source, layer.id
            )));
        }
        log::debug!("add layer {} (before {:?})", layer.id, before);
        state.layers.add_layer(layer.clone(), before)
    }

    fn remove_layer(&mut self, id: &str) -> Result<()> {
        log::debug!("remove layer {}", id);
        self.state.borrow_mut().layers.remove_layer(id).map(|_| ())
    }

    fn has_layer(&self, id: &str) -> bool {
        self.state.borrow().layers.contains(id)
    }

    fn load_image(&mut self, name: &str, url: &str, request: u64) {
        log::debug!("load image {} from {} (request {})", name, url, request);
        self.state.borrow_mut().pending_images.push(PendingImage {
            name: name.to_string(),
            url: url.to_string(),
            request,
        });
    }

    fn add_image(&mut self, name: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.images.contains(name) {
            return Err(MapError::Image(format!(
                "An image named \"{}\" already exists.",
                name
            )));
        }
        if !state.fetched_images.contains(name) {
            return Err(MapError::Image(format!(
                "Image \"{}\" has not been loaded",
                name
            )));
        }
        state.images.insert(name.to_string());
        Ok(())
    }

    fn remove_image(&mut self, name: &str) -> Result<()> {
        if !self.state.borrow_mut().images.remove(name) {
            return Err(MapError::Image(format!(
                "An image named \"{}\" does not exist.",
                name
            )));
        }
        Ok(())
    }

    fn has_image(&self, name: &str) -> bool {
        self.state.borrow().images.contains(name)
    }

    fn fly_to(&mut self, target: CameraTarget) {
        self.state.borrow_mut().camera_moves.push(CameraMove::FlyTo(target));
    }

    fn ease_to(&mut self, target: CameraTarget) {
        self.state.borrow_mut().camera_moves.push(CameraMove::EaseTo(target));
    }

    fn request_cluster_expansion_zoom(&mut self, source_id: &str, cluster_id: u64, center: LatLng) {
        self.state.borrow_mut().pending_expansions.push(PendingExpansion {
            source_id: source_id.to_string(),
            cluster_id,
            center,
        });
    }

    fn show_popup(&mut self, popup: &Popup) -> Result<()> {
        self.state.borrow_mut().popups.push(popup.clone());
        Ok(())
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.state.borrow_mut().cursor = cursor;
    }

    fn add_navigation_control(&mut self, _show_compass: bool) -> Result<()> {
        self.state.borrow_mut().navigation_controls += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct DrawState {
    options: Option<DrawOptions>,
    features: FeatureCollection,
}

/// A [`DrawControl`] whose drawn features are set by the caller.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDraw {
    state: Rc<RefCell<DrawState>>,
}

impl InMemoryDraw {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces what is "drawn on the map".
    pub fn set_features(&self, features: FeatureCollection) {
        self.state.borrow_mut().features = features;
    }

    pub fn options(&self) -> Option<DrawOptions> {
        self.state.borrow().options.clone()
    }
}

impl DrawControl for InMemoryDraw {
    fn attach(&mut self, options: &DrawOptions) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.options.is_some() {
            return Err(MapError::Js("draw control is already attached".to_string()));
        }
        state.options = Some(options.clone());
        Ok(())
    }

    fn get_all(&self) -> Result<FeatureCollection> {
        Ok(self.state.borrow().features.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::base::LayerType;

    fn points() -> SourceSpec {
        SourceSpec::geojson_url("points.geojson")
    }

    #[test]
    fn test_source_in_use_cannot_be_removed() {
        let mut surface = InMemorySurface::new();
        surface.add_source("s", &points()).unwrap();
        surface
            .add_layer(&LayerSpec::new("l", LayerType::Circle, "s"), None)
            .unwrap();

        assert!(matches!(surface.remove_source("s"), Err(MapError::Source(_))));
        surface.remove_layer("l").unwrap();
        surface.remove_source("s").unwrap();
        assert!(surface.source_ids().is_empty());
    }

    #[test]
    fn test_layer_needs_source_and_anchor() {
        let mut surface = InMemorySurface::with_base_layers(&["waterway-label"]);
        let layer = LayerSpec::new("heat", LayerType::Heatmap, "s");

        assert!(surface.add_layer(&layer, None).is_err());
        surface.add_source("s", &points()).unwrap();
        assert!(surface.add_layer(&layer, Some("missing")).is_err());
        surface.add_layer(&layer, Some("waterway-label")).unwrap();

        assert_eq!(surface.layer_ids(), vec!["heat", "waterway-label"]);
    }

    #[test]
    fn test_image_lifecycle() {
        let mut surface = InMemorySurface::new();
        assert!(surface.add_image("pin").is_err());

        surface.load_image("pin", "pin.png", 1);
        assert_eq!(surface.pending_image_count(), 1);
        let events = surface.resolve_images();
        assert_eq!(
            events,
            vec![MapEvent::ImageLoaded(ImageLoaded {
                name: "pin".to_string(),
                request: 1,
                result: Ok(()),
            })]
        );

        surface.add_image("pin").unwrap();
        assert!(surface.add_image("pin").is_err());
        assert!(surface.remove_image_if_present("pin").unwrap());
        assert!(!surface.remove_image_if_present("pin").unwrap());
    }

    #[test]
    fn test_broken_image_url() {
        let mut surface = InMemorySurface::new();
        surface.fail_images_from("missing.png");
        surface.load_image("pin", "missing.png", 7);

        match surface.resolve_images().as_slice() {
            [MapEvent::ImageLoaded(loaded)] => {
                assert_eq!(loaded.request, 7);
                assert!(loaded.result.is_err());
            }
            other => panic!("unexpected events {:?}", other),
        }
        assert!(surface.add_image("pin").is_err());
    }

    #[test]
    fn test_expansion_lookup() {
        let mut surface = InMemorySurface::new();
        surface.add_source("clustermap", &points()).unwrap();
        surface.set_expansion_zoom(3, 6.0);

        let center = LatLng::new(10.0, 20.0);
        surface.request_cluster_expansion_zoom("clustermap", 3, center);
        surface.request_cluster_expansion_zoom("clustermap", 4, center);

        let events = surface.resolve_expansions();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            MapEvent::ClusterExpansionZoom(ExpansionZoom { zoom: Ok(z), .. }) if *z == 6.0
        ));
        assert!(matches!(
            &events[1],
            MapEvent::ClusterExpansionZoom(ExpansionZoom { zoom: Err(_), .. })
        ));
    }

    #[test]
    fn test_clones_share_state() {
        let surface = InMemorySurface::new();
        let mut handle = surface.clone();
        handle.fly_to(CameraTarget::lng_lat(1.0, 2.0, 3.0));
        handle.set_cursor(Cursor::Pointer);

        assert_eq!(
            surface.last_camera_move(),
            Some(CameraMove::FlyTo(CameraTarget::lng_lat(1.0, 2.0, 3.0)))
        );
        assert_eq!(surface.cursor(), Cursor::Pointer);
    }
}

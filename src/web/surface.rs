use super::{
    bindings::{GeoJsonSource, MapboxDraw, MapboxMap, MapboxPopup, NavigationControl},
    from_js, js_error, to_js, EventSink,
};
use crate::{
    core::{camera::CameraTarget, config::MapConfig, geo::LatLng},
    data::geojson::FeatureCollection,
    input::events::{ExpansionZoom, ImageLoaded, MapEvent},
    layers::{base::LayerSpec, source::SourceSpec},
    plugins::draw::DrawOptions,
    prelude::HashMap,
    surface::{Cursor, DrawControl, MapSurface},
    ui::popup::Popup,
    MapError, Result,
};
use serde_json::json;
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{prelude::*, JsCast};

/// [`MapSurface`] backed by a `mapboxgl.Map`.
///
/// Clones share the underlying map.
#[derive(Clone)]
pub struct MapboxSurface {
    map: Rc<MapboxMap>,
    sink: EventSink,
    /// Images fetched by `load_image`, waiting for `add_image`
    fetched: Rc<RefCell<HashMap<String, JsValue>>>,
}

impl MapboxSurface {
    /// Creates the map in the element with id `config.container_id`.
    pub fn initialize(config: &MapConfig, sink: EventSink) -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| MapError::Js("no document".to_string()))?;
        if document.get_element_by_id(&config.container_id).is_none() {
            return Err(MapError::MissingElement(config.container_id.clone()));
        }

        if let Some(token) = &config.access_token {
            let namespace = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("mapboxgl"))
                .map_err(js_error)?;
            js_sys::Reflect::set(
                &namespace,
                &JsValue::from_str("accessToken"),
                &JsValue::from_str(token),
            )
            .map_err(js_error)?;
        }

        let options = to_js(&json!({
            "container": config.container_id,
            "style": config.style_url,
            "center": config.center,
            "zoom": config.zoom,
        }))?;
        let map = MapboxMap::new(&options).map_err(js_error)?;
        log::debug!("map created in #{}", config.container_id);

        Ok(Self {
            map: Rc::new(map),
            sink,
            fetched: Rc::default(),
        })
    }

    pub fn map(&self) -> &MapboxMap {
        &self.map
    }

    fn move_options(target: CameraTarget) -> Result<JsValue> {
        to_js(&target)
    }
}

impl MapSurface for MapboxSurface {
    fn add_source(&mut self, id: &str, source: &SourceSpec) -> Result<()> {
        log::debug!("add source {}", id);
        self.map
            .add_source(id, &to_js(source)?)
            .map_err(|e| MapError::Source(js_message(&e)))
    }

    fn remove_source(&mut self, id: &str) -> Result<()> {
        log::debug!("remove source {}", id);
        self.map
            .remove_source(id)
            .map_err(|e| MapError::Source(js_message(&e)))
    }

    fn has_source(&self, id: &str) -> bool {
        !self.map.get_source(id).is_undefined()
    }

    fn add_layer(&mut self, layer: &LayerSpec, before: Option<&str>) -> Result<()> {
        log::debug!("add layer {} (before {:?})", layer.id, before);
        self.map
            .add_layer(&to_js(layer)?, before.map(str::to_string))
            .map_err(|e| MapError::Layer(js_message(&e)))
    }

    fn remove_layer(&mut self, id: &str) -> Result<()> {
        log::debug!("remove layer {}", id);
        self.map
            .remove_layer(id)
            .map_err(|e| MapError::Layer(js_message(&e)))
    }

    fn has_layer(&self, id: &str) -> bool {
        !self.map.get_layer(id).is_undefined()
    }

    fn load_image(&mut self, name: &str, url: &str, request: u64) {
        log::debug!("load image {} from {} (request {})", name, url, request);
        let name = name.to_string();
        let fetched = Rc::clone(&self.fetched);
        let sink = self.sink.clone();

        let callback = Closure::once_into_js(move |error: JsValue, image: JsValue| {
            let result = if error.is_null() || error.is_undefined() {
                fetched.borrow_mut().insert(name.clone(), image);
                Ok(())
            } else {
                Err(js_message(&error))
            };
            sink.emit(MapEvent::ImageLoaded(ImageLoaded {
                name,
                request,
                result,
            }));
        });
        self.map.load_image(url, &callback);
    }

    fn add_image(&mut self, name: &str) -> Result<()> {
        let image = self
            .fetched
            .borrow_mut()
            .remove(name)
            .ok_or_else(|| MapError::Image(format!("image \"{}\" has not been loaded", name)))?;
        self.map
            .add_image(name, &image)
            .map_err(|e| MapError::Image(js_message(&e)))
    }

    fn remove_image(&mut self, name: &str) -> Result<()> {
        self.map
            .remove_image(name)
            .map_err(|e| MapError::Image(js_message(&e)))
    }

    fn has_image(&self, name: &str) -> bool {
        self.map.has_image(name)
    }

    fn fly_to(&mut self, target: CameraTarget) {
        match Self::move_options(target) {
            Ok(options) => self.map.fly_to(&options),
            Err(e) => log::error!("flyTo: {}", e),
        }
    }

    fn ease_to(&mut self, target: CameraTarget) {
        match Self::move_options(target) {
            Ok(options) => self.map.ease_to(&options),
            Err(e) => log::error!("easeTo: {}", e),
        }
    }

    fn request_cluster_expansion_zoom(&mut self, source_id: &str, cluster_id: u64, center: LatLng) {
        let source = self.map.get_source(source_id);
        if source.is_undefined() {
            log::debug!("source {} is gone; not expanding cluster {}", source_id, cluster_id);
            return;
        }

        let sink = self.sink.clone();
        let callback = Closure::once_into_js(move |error: JsValue, zoom: JsValue| {
            let zoom = if error.is_null() || error.is_undefined() {
                zoom.as_f64()
                    .ok_or_else(|| "expansion zoom is not a number".to_string())
            } else {
                Err(js_message(&error))
            };
            sink.emit(MapEvent::ClusterExpansionZoom(ExpansionZoom {
                cluster_id,
                center,
                zoom,
            }));
        });
        source
            .unchecked_into::<GeoJsonSource>()
            .get_cluster_expansion_zoom(cluster_id as f64, &callback);
    }

    fn show_popup(&mut self, popup: &Popup) -> Result<()> {
        let lng_lat = to_js(&popup.position)?;
        MapboxPopup::new()
            .set_lng_lat(&lng_lat)
            .set_html(&popup.html)
            .add_to(&self.map);
        Ok(())
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        if let Err(e) = self.map.get_canvas().style().set_property("cursor", cursor.css()) {
            log::warn!("cannot set cursor: {}", js_message(&e));
        }
    }

    fn add_navigation_control(&mut self, show_compass: bool) -> Result<()> {
        let control = NavigationControl::new(&to_js(&json!({ "showCompass": show_compass }))?);
        self.map.add_control(&control, "bottom-right");
        Ok(())
    }
}

/// [`DrawControl`] backed by a `MapboxDraw` instance.
pub struct MapboxDrawControl {
    map: Rc<MapboxMap>,
    draw: Option<MapboxDraw>,
}

impl MapboxDrawControl {
    pub fn new(surface: &MapboxSurface) -> Self {
        Self {
            map: Rc::clone(&surface.map),
            draw: None,
        }
    }
}

impl DrawControl for MapboxDrawControl {
    fn attach(&mut self, options: &DrawOptions) -> Result<()> {
        if self.draw.is_some() {
            return Err(MapError::Js("draw control is already attached".to_string()));
        }
        let draw = MapboxDraw::new(&to_js(options)?).map_err(js_error)?;
        self.map.add_control(&draw, "top-left");
        self.draw = Some(draw);
        Ok(())
    }

    fn get_all(&self) -> Result<FeatureCollection> {
        match &self.draw {
            Some(draw) => from_js(&draw.get_all()),
            None => Ok(FeatureCollection::default()),
        }
    }
}

/// Best-effort text of a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    if let Some(message) = js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
    {
        return message;
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

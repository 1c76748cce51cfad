//! Browser glue: Mapbox GL JS bindings, the DOM page view, console logging
//! and the startup sequence.

pub mod bindings;
pub mod dom;
pub mod logger;
pub mod surface;

use crate::{
    app::{try_with_app, App},
    core::{config::AppConfig, constants, geo::LatLng},
    data::{
        geojson::{GeoJsonFeature, GeoJsonGeometry},
        provider::{DataProvider, HttpDataProvider},
    },
    input::events::{ClusterClick, DrawEventKind, MapEvent, PointClick, QuakeProperties},
    MapError, Result,
};
use bindings::MapboxMap;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};
use wasm_bindgen::{prelude::*, JsCast};

pub use dom::DomView;
pub use surface::{MapboxDrawControl, MapboxSurface};

/// Serializes through JSON into a plain JS object.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    let json = serde_json::to_string(value)?;
    js_sys::JSON::parse(&json).map_err(js_error)
}

/// Reads a JS value back through `JSON.stringify`.
pub(crate) fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<T> {
    let json = js_sys::JSON::stringify(value).map_err(js_error)?;
    Ok(serde_json::from_str(&String::from(json))?)
}

pub(crate) fn js_error(value: JsValue) -> MapError {
    MapError::Js(surface::js_message(&value))
}

/// Delivers asynchronous map callbacks to the running [`App`].
#[derive(Clone, Default)]
pub struct EventSink {
    app: Rc<RefCell<Option<Weak<RefCell<App>>>>>,
}

impl EventSink {
    pub fn connect(&self, app: &Rc<RefCell<App>>) {
        *self.app.borrow_mut() = Some(Rc::downgrade(app));
    }

    pub fn emit(&self, event: MapEvent) {
        let app = self.app.borrow().as_ref().and_then(Weak::upgrade);
        let Some(app) = app else {
            log::warn!("no application to receive {:?}", event);
            return;
        };
        let input = format!("{:?}", event);
        // failures are logged by the app
        try_with_app(&app, &input, |app| {
            let _ = app.handle_event(event);
        });
    }
}

#[derive(Debug, Deserialize)]
struct JsLngLat {
    lng: f64,
    lat: f64,
}

fn event_lng_lat(event: &JsValue) -> Result<LatLng> {
    let value = js_sys::Reflect::get(event, &JsValue::from_str("lngLat")).map_err(js_error)?;
    let JsLngLat { lng, lat } = from_js(&value)?;
    Ok(LatLng::new(lat, lng))
}

fn event_first_feature(event: &JsValue) -> Result<GeoJsonFeature> {
    let value = js_sys::Reflect::get(event, &JsValue::from_str("features")).map_err(js_error)?;
    let features: Vec<GeoJsonFeature> = from_js(&value)?;
    features
        .into_iter()
        .next()
        .ok_or_else(|| MapError::Js("click event without features".to_string()))
}

fn point_position(feature: &GeoJsonFeature) -> Result<LatLng> {
    match &feature.geometry {
        Some(GeoJsonGeometry::Point { coordinates }) => Ok(LatLng::from_lng_lat(*coordinates)),
        other => Err(MapError::InvalidCoordinates(format!(
            "expected a point feature, got {:?}",
            other
        ))),
    }
}

fn cluster_click(event: &JsValue) -> Result<ClusterClick> {
    let feature = event_first_feature(event)?;
    let cluster_id = feature
        .property("cluster_id")
        .and_then(|id| id.as_u64())
        .ok_or_else(|| MapError::Js("cluster feature without cluster_id".to_string()))?;
    Ok(ClusterClick {
        cluster_id,
        center: point_position(&feature)?,
    })
}

fn point_click(event: &JsValue) -> Result<PointClick> {
    let feature = event_first_feature(event)?;
    let properties: QuakeProperties = match &feature.properties {
        Some(properties) => serde_json::from_value(serde_json::to_value(properties)?)?,
        None => QuakeProperties::default(),
    };
    Ok(PointClick {
        click: event_lng_lat(event)?,
        position: point_position(&feature)?,
        properties,
    })
}

fn listen(map: &MapboxMap, event: &str, layer: Option<&str>, handler: impl FnMut(JsValue) + 'static) {
    let closure = Closure::<dyn FnMut(JsValue)>::new(handler);
    match layer {
        Some(layer) => map.on_layer(event, layer, closure.as_ref()),
        None => map.on(event, closure.as_ref()),
    }
    // listeners live as long as the page
    closure.forget();
}

/// Subscribes to the map events the features consume.
fn wire_map_events(map: &MapboxMap, sink: &EventSink) {
    let s = sink.clone();
    listen(map, "load", None, move |_| s.emit(MapEvent::Loaded));

    let s = sink.clone();
    listen(map, "click", Some(constants::CLUSTER_LAYER), move |e| {
        match cluster_click(&e) {
            Ok(click) => s.emit(MapEvent::ClusterClick(click)),
            Err(err) => log::warn!("cluster click: {}", err),
        }
    });

    let s = sink.clone();
    listen(map, "click", Some(constants::UNCLUSTERED_LAYER), move |e| {
        match point_click(&e) {
            Ok(click) => s.emit(MapEvent::PointClick(click)),
            Err(err) => log::warn!("point click: {}", err),
        }
    });

    for layer in [constants::CLUSTER_LAYER, constants::UNCLUSTERED_LAYER] {
        let s = sink.clone();
        listen(map, "mouseenter", Some(layer), move |_| {
            s.emit(MapEvent::PointerEnter {
                layer_id: layer.to_string(),
            })
        });
        let s = sink.clone();
        listen(map, "mouseleave", Some(layer), move |_| {
            s.emit(MapEvent::PointerLeave {
                layer_id: layer.to_string(),
            })
        });
    }

    for kind in [
        DrawEventKind::Create,
        DrawEventKind::Update,
        DrawEventKind::Delete,
    ] {
        let s = sink.clone();
        listen(map, kind.event_name(), None, move |_| s.emit(MapEvent::Draw(kind)));
    }
}

/// Hooks the country list and the mode button, when the page has them.
fn wire_page(app: &Rc<RefCell<App>>) -> Result<()> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| MapError::Js("no document".to_string()))?;

    if let Some(list) = document.get_element_by_id(dom::COUNTRY_LIST_ID) {
        let app = Rc::downgrade(app);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let (Some(code), Some(app)) = (dom::clicked_country_code(&event), app.upgrade()) else {
                return;
            };
            try_with_app(&app, &format_args!("click on {}", code), |app| {
                let _ = app.toggle_country(&code);
            });
        });
        list.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        closure.forget();
    }

    if let Some(button) = document.get_element_by_id(dom::MODE_TOGGLE_ID) {
        let app = Rc::downgrade(app);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            let Some(app) = app.upgrade() else {
                return;
            };
            try_with_app(&app, &"mode toggle", |app| {
                let _ = app.toggle_mode();
            });
        });
        button
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        closure.forget();
    }
    Ok(())
}

/// Starts both document fetches; each result is applied as soon as it lands.
fn spawn_fetches(app: &Rc<RefCell<App>>, provider: HttpDataProvider) {
    let countries_app = Rc::clone(app);
    let countries_provider = provider.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let result = countries_provider.fetch_country_data().await;
        let _ = countries_app.borrow_mut().on_countries(result);
    });

    let polygons_app = Rc::clone(app);
    wasm_bindgen_futures::spawn_local(async move {
        let result = provider.fetch_polygon_data().await;
        let _ = polygons_app.borrow_mut().on_polygons(result);
    });
}

/// Builds the page: map, draw control, DOM view, event wiring and data
/// fetches. Returns the running application.
pub fn start(mut config: AppConfig) -> Result<Rc<RefCell<App>>> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);

    if config.data.base_url.is_empty() {
        // fetch() needs absolute URLs
        if let Some(origin) = web_sys::window().and_then(|w| w.location().origin().ok()) {
            config.data.base_url = origin;
        }
    }

    let sink = EventSink::default();
    let surface = MapboxSurface::initialize(&config.map, sink.clone())?;
    let draw = MapboxDrawControl::new(&surface);
    let view = DomView::new()?;
    let provider = HttpDataProvider::new(config.data.clone());

    let map = surface.clone();
    let app = Rc::new(RefCell::new(App::with_parts(surface, draw, view, config)?));
    sink.connect(&app);

    wire_map_events(map.map(), &sink);
    wire_page(&app)?;
    spawn_fetches(&app, provider);

    log::info!("mapstage started");
    Ok(app)
}

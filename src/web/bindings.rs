//! `wasm-bindgen` declarations for the parts of Mapbox GL JS and Mapbox GL
//! Draw this crate uses. Both libraries are expected as page globals
//! (`mapboxgl`, `MapboxDraw`).

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Map)]
    pub type MapboxMap;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Map", catch)]
    pub fn new(options: &JsValue) -> Result<MapboxMap, JsValue>;

    #[wasm_bindgen(method, js_name = addSource, catch)]
    pub fn add_source(this: &MapboxMap, id: &str, source: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = removeSource, catch)]
    pub fn remove_source(this: &MapboxMap, id: &str) -> Result<(), JsValue>;

    /// `undefined` when there is no such source
    #[wasm_bindgen(method, js_name = getSource)]
    pub fn get_source(this: &MapboxMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = addLayer, catch)]
    pub fn add_layer(this: &MapboxMap, layer: &JsValue, before: Option<String>) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = removeLayer, catch)]
    pub fn remove_layer(this: &MapboxMap, id: &str) -> Result<(), JsValue>;

    /// `undefined` when there is no such layer
    #[wasm_bindgen(method, js_name = getLayer)]
    pub fn get_layer(this: &MapboxMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = loadImage)]
    pub fn load_image(this: &MapboxMap, url: &str, callback: &JsValue);

    #[wasm_bindgen(method, js_name = addImage, catch)]
    pub fn add_image(this: &MapboxMap, name: &str, image: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = removeImage, catch)]
    pub fn remove_image(this: &MapboxMap, name: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = hasImage)]
    pub fn has_image(this: &MapboxMap, name: &str) -> bool;

    #[wasm_bindgen(method, js_name = flyTo)]
    pub fn fly_to(this: &MapboxMap, options: &JsValue);

    #[wasm_bindgen(method, js_name = easeTo)]
    pub fn ease_to(this: &MapboxMap, options: &JsValue);

    #[wasm_bindgen(method, js_name = addControl)]
    pub fn add_control(this: &MapboxMap, control: &JsValue, position: &str);

    #[wasm_bindgen(method, js_name = getCanvas)]
    pub fn get_canvas(this: &MapboxMap) -> web_sys::HtmlCanvasElement;

    #[wasm_bindgen(method, js_name = on)]
    pub fn on(this: &MapboxMap, event: &str, handler: &JsValue);

    #[wasm_bindgen(method, js_name = on)]
    pub fn on_layer(this: &MapboxMap, event: &str, layer_id: &str, handler: &JsValue);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = GeoJSONSource)]
    pub type GeoJsonSource;

    #[wasm_bindgen(method, js_name = getClusterExpansionZoom)]
    pub fn get_cluster_expansion_zoom(this: &GeoJsonSource, cluster_id: f64, callback: &JsValue);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = NavigationControl)]
    pub type NavigationControl;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "NavigationControl")]
    pub fn new(options: &JsValue) -> NavigationControl;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Popup)]
    pub type MapboxPopup;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Popup")]
    pub fn new() -> MapboxPopup;

    #[wasm_bindgen(method, js_name = setLngLat)]
    pub fn set_lng_lat(this: &MapboxPopup, lng_lat: &JsValue) -> MapboxPopup;

    #[wasm_bindgen(method, js_name = setHTML)]
    pub fn set_html(this: &MapboxPopup, html: &str) -> MapboxPopup;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &MapboxPopup, map: &MapboxMap) -> MapboxPopup;
}

#[wasm_bindgen]
extern "C" {
    pub type MapboxDraw;

    #[wasm_bindgen(constructor, catch)]
    pub fn new(options: &JsValue) -> Result<MapboxDraw, JsValue>;

    #[wasm_bindgen(method, js_name = getAll)]
    pub fn get_all(this: &MapboxDraw) -> JsValue;
}

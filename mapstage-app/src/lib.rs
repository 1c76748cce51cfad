//! WebAssembly entry point.
//!
//! Build with `wasm-pack build mapstage-app --target web` and serve
//! `static/index.html`. The page may define `window.MAPSTAGE_CONFIG` (any
//! subset of `AppConfig` as JSON) before the module loads.

#[cfg(target_arch = "wasm32")]
mod browser {
    use mapstage::{App, AppConfig};
    use std::{cell::RefCell, rc::Rc};
    use wasm_bindgen::prelude::*;

    thread_local! {
        static APP: RefCell<Option<Rc<RefCell<App>>>> = RefCell::new(None);
    }

    fn to_js_error(e: mapstage::MapError) -> JsValue {
        JsValue::from(js_sys::Error::new(&e.to_string()))
    }

    fn page_config() -> Result<AppConfig, JsValue> {
        let value = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("MAPSTAGE_CONFIG"))?;
        if value.is_undefined() || value.is_null() {
            return Ok(AppConfig::default());
        }
        let json = String::from(js_sys::JSON::stringify(&value)?);
        AppConfig::from_json(&json).map_err(to_js_error)
    }

    fn with_app<T>(f: impl FnOnce(&mut App) -> Result<T, JsValue>) -> Result<T, JsValue> {
        let app = APP
            .with(|slot| slot.borrow().clone())
            .ok_or_else(|| JsValue::from_str("mapstage is not running"))?;
        let mut app = app
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("mapstage is busy"))?;
        f(&mut app)
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        let config = page_config()?;
        let app = mapstage::web::start(config).map_err(to_js_error)?;
        APP.with(|slot| *slot.borrow_mut() = Some(app));
        Ok(())
    }

    /// Switches between cluster and heat mode; returns the new mode.
    #[wasm_bindgen(js_name = toggleMode)]
    pub fn toggle_mode() -> Result<String, JsValue> {
        with_app(|app| {
            app.toggle_mode()
                .map(|mode| mode.to_string())
                .map_err(to_js_error)
        })
    }

    /// Toggles a country by ISO alpha-3 code; returns whether it is now
    /// selected, or `undefined` for an unknown code.
    #[wasm_bindgen(js_name = toggleCountry)]
    pub fn toggle_country(code: &str) -> Result<Option<bool>, JsValue> {
        with_app(|app| app.toggle_country(code).map_err(to_js_error))
    }
}

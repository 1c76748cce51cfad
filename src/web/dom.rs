use crate::{
    core::constants::AREA_ELEMENT_ID, data::records::CountryRecord, ui::view::PageView,
    web::surface::js_message, MapError, Result,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

/// `<ul>` receiving one `<li data-code="...">` per country.
pub const COUNTRY_LIST_ID: &str = "country-list";
/// Button switching between cluster and heat mode.
pub const MODE_TOGGLE_ID: &str = "mode-toggle";

const SELECTED_CLASS: &str = "selected";

/// [`PageView`] over the live document. Elements that aren't on the page are
/// skipped.
pub struct DomView {
    window: Window,
    document: Document,
}

impl DomView {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| MapError::Js("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| MapError::Js("no document".to_string()))?;
        Ok(Self { window, document })
    }

    fn area_element(&self) -> Option<Element> {
        self.document.get_element_by_id(AREA_ELEMENT_ID)
    }

    fn country_item(&self, code: &str) -> Option<Element> {
        let list = self.document.get_element_by_id(COUNTRY_LIST_ID)?;
        list.query_selector(&format!("[data-code=\"{}\"]", escape(code)))
            .ok()
            .flatten()
    }
}

impl PageView for DomView {
    fn show_area(&mut self, html: &str) {
        if let Some(element) = self.area_element() {
            element.set_inner_html(html);
        }
    }

    fn clear_area(&mut self) {
        if let Some(element) = self.area_element() {
            element.set_inner_html("");
        }
    }

    fn alert(&mut self, message: &str) {
        if self.window.alert_with_message(message).is_err() {
            log::warn!("alert blocked: {}", message);
        }
    }

    fn render_country_list(&mut self, countries: &[CountryRecord]) {
        let Some(list) = self.document.get_element_by_id(COUNTRY_LIST_ID) else {
            log::debug!("no #{} on the page", COUNTRY_LIST_ID);
            return;
        };
        let items: String = countries
            .iter()
            .map(|c| format!("<li data-code=\"{}\">{}</li>", escape(&c.code), escape(&c.name)))
            .collect();
        list.set_inner_html(&items);
    }

    fn set_country_selected(&mut self, code: &str, selected: bool) {
        if let Some(item) = self.country_item(code) {
            if let Err(e) = item.class_list().toggle_with_force(SELECTED_CLASS, selected) {
                log::warn!("cannot mark {} selected: {}", code, js_message(&e));
            }
        }
    }
}

/// Country code carried by the list item under a click, if any.
pub fn clicked_country_code(event: &web_sys::Event) -> Option<String> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let item = target.closest("[data-code]").ok().flatten()?;
    item.get_attribute("data-code")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

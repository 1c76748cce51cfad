use crate::data::records::CountryRecord;
use std::{cell::RefCell, rc::Rc};

/// The page around the map: the area readout, the country list and alerts.
pub trait PageView {
    /// Replaces the contents of the area readout element.
    fn show_area(&mut self, html: &str);
    fn clear_area(&mut self);
    fn alert(&mut self, message: &str);
    /// Renders the selectable country list.
    fn render_country_list(&mut self, countries: &[CountryRecord]);
    /// Marks the list entry for `code` as selected or not.
    fn set_country_selected(&mut self, code: &str, selected: bool);
}

#[derive(Debug, Default)]
struct ViewState {
    area_html: Option<String>,
    alerts: Vec<String>,
    countries: Vec<String>,
    selected: Vec<String>,
}

/// Headless [`PageView`] that records what would have been shown.
///
/// Clones share state, so a test can keep one handle and give the other to
/// the application.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    state: Rc<RefCell<ViewState>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn area_html(&self) -> Option<String> {
        self.state.borrow().area_html.clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state.borrow().alerts.clone()
    }

    /// Codes of the rendered country list, in order
    pub fn countries(&self) -> Vec<String> {
        self.state.borrow().countries.clone()
    }

    /// Codes currently marked selected, in marking order
    pub fn selected(&self) -> Vec<String> {
        self.state.borrow().selected.clone()
    }
}

impl PageView for RecordingView {
    fn show_area(&mut self, html: &str) {
        self.state.borrow_mut().area_html = Some(html.to_string());
    }

    fn clear_area(&mut self) {
        self.state.borrow_mut().area_html = Some(String::new());
    }

    fn alert(&mut self, message: &str) {
        self.state.borrow_mut().alerts.push(message.to_string());
    }

    fn render_country_list(&mut self, countries: &[CountryRecord]) {
        self.state.borrow_mut().countries = countries.iter().map(|c| c.code.clone()).collect();
    }

    fn set_country_selected(&mut self, code: &str, selected: bool) {
        let mut state = self.state.borrow_mut();
        state.selected.retain(|c| c != code);
        if selected {
            state.selected.push(code.to_string());
        }
    }
}

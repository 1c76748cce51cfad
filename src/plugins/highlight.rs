use crate::{
    core::constants::{
        COUNTRIES_JOIN_LAYER, COUNTRIES_SOURCE, COUNTRIES_SOURCE_LAYER, COUNTRIES_TILESET_URL,
        COUNTRY_CODE_PROPERTY, TRANSPARENT,
    },
    data::records::CountryRecord,
    layers::{
        base::{LayerSpec, LayerType},
        expression::{get, match_labels},
        source::SourceSpec,
    },
    plugins::base::{MapContext, MapPlugin},
    Result,
};
use serde_json::Value;

/// Countries the user picked, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedCountrySet {
    records: Vec<CountryRecord>,
}

impl SelectedCountrySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `record` if its code isn't selected yet, removes it otherwise.
    /// Returns whether it is selected afterwards.
    pub fn toggle(&mut self, record: &CountryRecord) -> bool {
        match self.records.iter().position(|r| r.code == record.code) {
            Some(index) => {
                self.records.remove(index);
                false
            }
            None => {
                self.records.push(record.clone());
                true
            }
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.records.iter().any(|r| r.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Green channel scaled by HDI: `rgb(0,{hdi*255},0)`, left unrounded
/// (`0.94` gives `rgb(0,239.7,0)`).
pub fn hdi_color(hdi: f64) -> String {
    let green = (hdi * 255.0).clamp(0.0, 255.0);
    format!("rgb(0,{},0)", green)
}

/// Fill color per country code, transparent for everything not selected.
pub fn color_expression(selected: &SelectedCountrySet) -> Value {
    if selected.is_empty() {
        // `match` needs at least one label
        return Value::String(TRANSPARENT.to_string());
    }
    match_labels(
        get(COUNTRY_CODE_PROPERTY),
        selected
            .iter()
            .map(|r| (r.code.clone(), Value::String(hdi_color(r.hdi)))),
        TRANSPARENT,
    )
}

pub fn choropleth_layer(selected: &SelectedCountrySet) -> LayerSpec {
    LayerSpec::new(COUNTRIES_JOIN_LAYER, LayerType::Fill, COUNTRIES_SOURCE)
        .source_layer(COUNTRIES_SOURCE_LAYER)
        .paint("fill-color", color_expression(selected))
}

/// Colors the selected countries by HDI on a choropleth layer.
#[derive(Debug, Default)]
pub struct CountryHighlightPlugin {
    selected: SelectedCountrySet,
}

impl CountryHighlightPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &SelectedCountrySet {
        &self.selected
    }

    /// Replaces the choropleth layer with one built from the current selection.
    pub fn highlight(&self, ctx: &mut MapContext) -> Result<()> {
        let surface = ctx.surface.as_mut();
        surface.remove_layer_if_present(COUNTRIES_JOIN_LAYER)?;
        surface.add_layer(
            &choropleth_layer(&self.selected),
            Some(ctx.config.highlight.before_layer.as_str()),
        )
    }

    /// Updates the selection and the list entry without touching the map.
    /// Used before the style has loaded; `on_load` draws what was picked.
    pub fn toggle_offline(&mut self, ctx: &mut MapContext, record: &CountryRecord) -> bool {
        let selected = self.selected.toggle(record);
        ctx.view.set_country_selected(&record.code, selected);
        log::info!(
            "{} {} ({} selected)",
            if selected { "selected" } else { "deselected" },
            record.code,
            self.selected.len()
        );
        selected
    }

    /// Selects or deselects `record` and redraws. Returns whether it is
    /// selected afterwards.
    pub fn toggle_selection(&mut self, ctx: &mut MapContext, record: &CountryRecord) -> Result<bool> {
        let selected = self.toggle_offline(ctx, record);

        if self.selected.is_empty() {
            ctx.surface.remove_layer_if_present(COUNTRIES_JOIN_LAYER)?;
        } else {
            self.highlight(ctx)?;
        }

        if ctx.config.highlight.recenter_on_selection {
            ctx.surface.fly_to(ctx.config.highlight.recenter_target);
        }
        Ok(selected)
    }
}

impl MapPlugin for CountryHighlightPlugin {
    fn name(&self) -> &str {
        "country-highlight"
    }

    fn on_load(&mut self, ctx: &mut MapContext) -> Result<()> {
        if !ctx.surface.has_source(COUNTRIES_SOURCE) {
            ctx.surface
                .add_source(COUNTRIES_SOURCE, &SourceSpec::vector(COUNTRIES_TILESET_URL))?;
        }
        // Selections made before the style loaded
        if !self.selected.is_empty() {
            self.highlight(ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::constants::ADMIN_BOUNDARY_LAYER, plugins::base::test_support::context,
        surface::MapSurface,
    };
    use serde_json::json;

    fn australia() -> CountryRecord {
        CountryRecord::new("AUS", "Australia", 0.94)
    }

    #[test]
    fn test_hdi_color_keeps_fraction() {
        assert_eq!(hdi_color(0.94), "rgb(0,239.7,0)");
        assert_eq!(hdi_color(0.5), "rgb(0,127.5,0)");
        assert_eq!(hdi_color(1.2), "rgb(0,255,0)");
        assert_eq!(hdi_color(0.0), "rgb(0,0,0)");
        assert_eq!(hdi_color(1.0), "rgb(0,255,0)");
    }

    #[test]
    fn test_expression_follows_selection_order() {
        let mut set = SelectedCountrySet::new();
        set.toggle(&CountryRecord::new("NZL", "New Zealand", 0.5));
        set.toggle(&australia());

        assert_eq!(
            color_expression(&set),
            json!([
                "match", ["get", "iso_3166_1_alpha_3"],
                "NZL", "rgb(0,127.5,0)",
                "AUS", "rgb(0,239.7,0)",
                "rgba(0,0,0,0)"
            ])
        );
    }

    #[test]
    fn test_odd_toggles_select() {
        let mut set = SelectedCountrySet::new();
        for toggles in 1..=5 {
            set.toggle(&australia());
            assert_eq!(set.contains("AUS"), toggles % 2 == 1);
            assert!(set.len() <= 1);
        }
    }

    #[test]
    fn test_toggle_selection_scenario() {
        let (mut ctx, surface, _, view) = context();
        let mut plugin = CountryHighlightPlugin::new();
        plugin.on_load(&mut ctx).unwrap();

        assert!(plugin.toggle_selection(&mut ctx, &australia()).unwrap());
        let layer = surface.layer(COUNTRIES_JOIN_LAYER).unwrap();
        assert_eq!(
            layer.paint["fill-color"],
            json!(["match", ["get", "iso_3166_1_alpha_3"], "AUS", "rgb(0,239.7,0)", "rgba(0,0,0,0)"])
        );
        assert_eq!(layer.source_layer.as_deref(), Some(COUNTRIES_SOURCE_LAYER));
        let order = surface.layer_ids();
        let join = order.iter().position(|id| id == COUNTRIES_JOIN_LAYER).unwrap();
        let admin = order.iter().position(|id| id == ADMIN_BOUNDARY_LAYER).unwrap();
        assert_eq!(join + 1, admin);
        assert_eq!(view.selected(), vec!["AUS".to_string()]);

        assert!(!plugin.toggle_selection(&mut ctx, &australia()).unwrap());
        assert!(!surface.has_layer(COUNTRIES_JOIN_LAYER));
        assert!(view.selected().is_empty());
        assert!(surface.camera_moves().is_empty());
    }

    #[test]
    fn test_recenter_when_enabled() {
        let (mut ctx, surface, _, _) = context();
        ctx.config.highlight.recenter_on_selection = true;
        let mut plugin = CountryHighlightPlugin::new();
        plugin.on_load(&mut ctx).unwrap();

        plugin.toggle_selection(&mut ctx, &australia()).unwrap();
        assert_eq!(
            surface.last_camera_move().map(|m| m.target()),
            Some(ctx.config.highlight.recenter_target)
        );
    }
}

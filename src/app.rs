//! Wires the features to the map and routes events between them.

use crate::{
    core::config::AppConfig,
    data::{
        provider::DataProvider,
        records::{CountryRecord, PolygonRecord},
    },
    input::events::MapEvent,
    plugins::{
        base::{MapContext, MapPlugin},
        draw::PolygonDrawPlugin,
        highlight::{CountryHighlightPlugin, SelectedCountrySet},
        mode::{ModeController, VisualizationMode},
        overlay::PolygonOverlayPlugin,
    },
    surface::{DrawControl, MapSurface},
    ui::view::PageView,
    Result,
};
use std::{cell::RefCell, fmt};

/// The map page: one context, four features.
///
/// Nothing touches the style before [`MapEvent::Loaded`]; events that arrive
/// earlier are dropped, and data or selections that arrive earlier are kept
/// and applied on load. Every failure is logged here with the feature that
/// raised it; the first one is also returned.
#[derive(Debug)]
pub struct App {
    ctx: MapContext,
    highlight: CountryHighlightPlugin,
    modes: ModeController,
    overlay: PolygonOverlayPlugin,
    draw: PolygonDrawPlugin,
    countries: Vec<CountryRecord>,
    loaded: bool,
}

impl App {
    pub fn new(ctx: MapContext) -> Self {
        Self {
            ctx,
            highlight: CountryHighlightPlugin::new(),
            modes: ModeController::new(),
            overlay: PolygonOverlayPlugin::new(),
            draw: PolygonDrawPlugin::new(),
            countries: Vec::new(),
            loaded: false,
        }
    }

    /// Builds the context and adds the navigation control.
    pub fn with_parts(
        surface: impl MapSurface + 'static,
        draw: impl DrawControl + 'static,
        view: impl PageView + 'static,
        config: AppConfig,
    ) -> Result<Self> {
        let mut ctx = MapContext::new(surface, draw, view, config);
        let show_compass = ctx.config.map.show_compass;
        ctx.surface.add_navigation_control(show_compass)?;
        Ok(Self::new(ctx))
    }

    pub fn context(&self) -> &MapContext {
        &self.ctx
    }

    pub fn config(&self) -> &AppConfig {
        &self.ctx.config
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn mode(&self) -> VisualizationMode {
        self.modes.mode()
    }

    pub fn selected(&self) -> &SelectedCountrySet {
        self.highlight.selected()
    }

    pub fn countries(&self) -> &[CountryRecord] {
        &self.countries
    }

    pub fn overlay_attached(&self) -> bool {
        self.overlay.is_attached()
    }

    /// Runs `f` for every feature in attach order, continuing past failures.
    fn dispatch<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut dyn MapPlugin, &mut MapContext) -> Result<()>,
    {
        let Self {
            ctx,
            highlight,
            modes,
            overlay,
            draw,
            ..
        } = self;
        let plugins: [&mut dyn MapPlugin; 4] = [highlight, modes, overlay, draw];

        let mut first_error = None;
        for plugin in plugins {
            if let Err(e) = f(&mut *plugin, &mut *ctx) {
                log::error!("{}: {}", plugin.name(), e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn handle_event(&mut self, event: MapEvent) -> Result<()> {
        if let MapEvent::Loaded = event {
            if self.loaded {
                log::warn!("map reported loaded twice; ignoring");
                return Ok(());
            }
            self.loaded = true;
            log::info!("map loaded");
            return self.dispatch(|plugin, ctx| plugin.on_load(ctx));
        }

        if !self.loaded {
            log::debug!("dropping {:?} received before load", event);
            return Ok(());
        }
        self.dispatch(|plugin, ctx| plugin.handle_event(ctx, &event))
    }

    /// Result of the country document fetch.
    pub fn on_countries(&mut self, result: Result<Vec<CountryRecord>>) -> Result<()> {
        match result {
            Ok(countries) => {
                log::info!("received {} countries", countries.len());
                self.ctx.view.render_country_list(&countries);
                self.countries = countries;
                Ok(())
            }
            Err(e) => {
                log::error!("failed to fetch country data: {}", e);
                Err(e)
            }
        }
    }

    /// Result of the polygon document fetch.
    pub fn on_polygons(&mut self, result: Result<Vec<PolygonRecord>>) -> Result<()> {
        let outcome = result.and_then(|records| self.overlay.set_records(&mut self.ctx, records));
        if let Err(e) = &outcome {
            log::error!("polygon overlay: {}", e);
        }
        outcome
    }

    /// Fetches both documents concurrently and applies them as they resolve.
    pub async fn load_data(&mut self, provider: &dyn DataProvider) {
        let (countries, polygons) = futures::join!(
            provider.fetch_country_data(),
            provider.fetch_polygon_data()
        );
        // failures are already logged
        let _ = self.on_countries(countries);
        let _ = self.on_polygons(polygons);
    }

    /// Switches between cluster and heat rendering.
    pub fn toggle_mode(&mut self) -> Result<VisualizationMode> {
        if !self.loaded {
            log::warn!("mode toggle before the map loaded; ignoring");
            return Ok(self.modes.mode());
        }
        self.modes.toggle(&mut self.ctx).map_err(|e| {
            log::error!("{}: {}", self.modes.name(), e);
            e
        })
    }

    /// Toggles the country with `code`. `None` if no such country was fetched.
    pub fn toggle_country(&mut self, code: &str) -> Result<Option<bool>> {
        let Some(record) = self.countries.iter().find(|c| c.code == code).cloned() else {
            log::warn!("unknown country code {}", code);
            return Ok(None);
        };

        if !self.loaded {
            return Ok(Some(self.highlight.toggle_offline(&mut self.ctx, &record)));
        }
        self.highlight
            .toggle_selection(&mut self.ctx, &record)
            .map(Some)
            .map_err(|e| {
                log::error!("{}: {}", self.highlight.name(), e);
                e
            })
    }
}

/// Runs `f` on a shared app unless it is already borrowed (a handler further
/// up the stack is still running), in which case `input` is dropped with a
/// warning. Returns whether `f` ran.
pub fn try_with_app(app: &RefCell<App>, input: &dyn fmt::Display, f: impl FnOnce(&mut App)) -> bool {
    match app.try_borrow_mut() {
        Ok(mut app) => {
            f(&mut app);
            true
        }
        Err(_) => {
            log::warn!("application busy; dropped {}", input);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::constants,
        data::provider::StaticDataProvider,
        surface::memory::{InMemoryDraw, InMemorySurface},
        ui::view::RecordingView,
    };

    fn app() -> (App, InMemorySurface, RecordingView) {
        let surface = InMemorySurface::with_base_layers(&[
            constants::HEAT_BEFORE_LAYER,
            constants::ADMIN_BOUNDARY_LAYER,
        ]);
        let view = RecordingView::new();
        let app = App::with_parts(
            surface.clone(),
            InMemoryDraw::new(),
            view.clone(),
            AppConfig::default(),
        )
        .unwrap();
        (app, surface, view)
    }

    #[test]
    fn test_nothing_added_before_load() {
        let (mut app, surface, _) = app();
        app.handle_event(MapEvent::PointerEnter {
            layer_id: constants::CLUSTER_LAYER.to_string(),
        })
        .unwrap();
        assert_eq!(app.toggle_mode().unwrap(), VisualizationMode::Cluster);

        assert!(surface.source_ids().is_empty());
        assert_eq!(surface.navigation_controls(), 1);
    }

    #[test]
    fn test_load_attaches_features_once() {
        let (mut app, surface, _) = app();
        app.handle_event(MapEvent::Loaded).unwrap();
        app.handle_event(MapEvent::Loaded).unwrap();

        assert!(surface.has_source(constants::COUNTRIES_SOURCE));
        assert!(surface.has_source(constants::CLUSTER_SOURCE));
        assert!(!surface.has_source(constants::POLYGON_OVERLAY_ID));
        assert_eq!(surface.pending_image_count(), 1);
    }

    #[tokio::test]
    async fn test_data_before_load() {
        let (mut app, surface, view) = app();
        let provider = StaticDataProvider::new(
            r#"{"data": [{"code": "AUS", "name": "Australia", "hdi": 0.94}]}"#,
            r#"[{"type": "MultiPolygon", "coordinates": [[[[140, -30], [141, -30], [141, -29], [140, -30]]]]}]"#,
        );
        app.load_data(&provider).await;

        assert_eq!(view.countries(), vec!["AUS".to_string()]);
        assert_eq!(app.toggle_country("AUS").unwrap(), Some(true));
        assert!(!surface.has_layer(constants::COUNTRIES_JOIN_LAYER));
        assert!(!app.overlay_attached());

        app.handle_event(MapEvent::Loaded).unwrap();
        assert!(app.overlay_attached());
        assert!(surface.has_layer(constants::COUNTRIES_JOIN_LAYER));
    }

    #[test]
    fn test_unknown_country_code() {
        let (mut app, _, _) = app();
        assert_eq!(app.toggle_country("XXX").unwrap(), None);
    }

    #[test]
    fn test_failed_fetch_keeps_app_running() {
        let (mut app, _, view) = app();
        let result = app.on_countries(crate::data::records::parse_country_document("{"));
        assert!(result.is_err());
        assert!(view.countries().is_empty());

        app.handle_event(MapEvent::Loaded).unwrap();
        assert_eq!(app.toggle_mode().unwrap(), VisualizationMode::Heat);
    }

    #[test]
    fn test_busy_app_drops_input() {
        let (app, _, view) = app();
        let app = RefCell::new(app);

        let ran = {
            let _held = app.borrow();
            try_with_app(&app, &"click", |app| {
                let _ = app.on_countries(Ok(vec![CountryRecord::new("AUS", "Australia", 0.94)]));
            })
        };
        assert!(!ran);
        assert!(view.countries().is_empty());

        assert!(try_with_app(&app, &"click", |app| {
            let _ = app.on_countries(Ok(vec![CountryRecord::new("AUS", "Australia", 0.94)]));
        }));
        assert_eq!(view.countries(), vec!["AUS".to_string()]);
    }
}

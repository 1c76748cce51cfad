use crate::{
    core::config::AppConfig,
    input::events::MapEvent,
    surface::{DrawControl, MapSurface},
    ui::view::PageView,
    Result,
};

/// Everything a feature may touch: the map, the draw plugin, the page around
/// them and the configuration. Built once at startup and handed to every
/// plugin call.
pub struct MapContext {
    pub surface: Box<dyn MapSurface>,
    pub draw: Box<dyn DrawControl>,
    pub view: Box<dyn PageView>,
    pub config: AppConfig,
}

impl MapContext {
    pub fn new(
        surface: impl MapSurface + 'static,
        draw: impl DrawControl + 'static,
        view: impl PageView + 'static,
        config: AppConfig,
    ) -> Self {
        Self {
            surface: Box::new(surface),
            draw: Box::new(draw),
            view: Box::new(view),
            config,
        }
    }
}

impl std::fmt::Debug for MapContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A map feature driven by the application.
pub trait MapPlugin {
    fn name(&self) -> &str;

    /// Called once, when the style has loaded.
    fn on_load(&mut self, _ctx: &mut MapContext) -> Result<()> {
        Ok(())
    }

    /// Called for every event after load. Plugins ignore what isn't theirs.
    fn handle_event(&mut self, _ctx: &mut MapContext, _event: &MapEvent) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::{
        core::constants,
        surface::memory::{InMemoryDraw, InMemorySurface},
        ui::view::RecordingView,
    };

    /// A context over in-memory fakes, plus handles to inspect them.
    pub(crate) fn context() -> (MapContext, InMemorySurface, InMemoryDraw, RecordingView) {
        context_with_style(&[constants::HEAT_BEFORE_LAYER, constants::ADMIN_BOUNDARY_LAYER])
    }

    /// A context whose style starts out with exactly `base_layers`.
    pub(crate) fn context_with_style(
        base_layers: &[&str],
    ) -> (MapContext, InMemorySurface, InMemoryDraw, RecordingView) {
        let surface = InMemorySurface::with_base_layers(base_layers);
        let draw = InMemoryDraw::new();
        let view = RecordingView::new();
        let ctx = MapContext::new(
            surface.clone(),
            draw.clone(),
            view.clone(),
            AppConfig::default(),
        );
        (ctx, surface, draw, view)
    }
}

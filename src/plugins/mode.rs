use crate::{
    core::constants::MARKER_IMAGE,
    input::events::{ImageLoaded, MapEvent},
    plugins::{
        base::{MapContext, MapPlugin},
        cluster, heatmap,
    },
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// Which rendering of the earthquake points is on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationMode {
    #[default]
    Cluster,
    Heat,
}

impl VisualizationMode {
    pub fn opposite(self) -> Self {
        match self {
            VisualizationMode::Cluster => VisualizationMode::Heat,
            VisualizationMode::Heat => VisualizationMode::Cluster,
        }
    }
}

impl std::fmt::Display for VisualizationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisualizationMode::Cluster => write!(f, "cluster"),
            VisualizationMode::Heat => write!(f, "heat"),
        }
    }
}

/// Switches the earthquake points between cluster and heat rendering.
///
/// Only one mode's sources, layers and marker image are ever on the map. The
/// marker image loads asynchronously, so each load carries a request number
/// and only the most recent one, arriving while cluster mode is still
/// active, is allowed to add the single-point layer.
#[derive(Debug, Default)]
pub struct ModeController {
    mode: VisualizationMode,
    next_request: u64,
    pending_marker: Option<u64>,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> VisualizationMode {
        self.mode
    }

    /// Request number of the marker load still outstanding, if any
    pub fn pending_marker(&self) -> Option<u64> {
        self.pending_marker
    }

    /// Flips to the other mode and flies to its overview. If the other mode
    /// can't be attached, the current one is rebuilt and the error returned.
    pub fn toggle(&mut self, ctx: &mut MapContext) -> Result<VisualizationMode> {
        let target = self.mode.opposite();
        if let Err(e) = self.transition(ctx, target) {
            log::warn!("{} mode unavailable, restoring {}: {}", target, self.mode, e);
            if let Err(restore) = self.transition(ctx, self.mode) {
                log::error!("failed to restore {} mode: {}", self.mode, restore);
            }
            return Err(e);
        }

        let overview = match target {
            VisualizationMode::Cluster => ctx.config.modes.cluster_overview,
            VisualizationMode::Heat => ctx.config.modes.heat_overview,
        };
        ctx.surface.fly_to(overview);

        log::info!("visualization mode: {} -> {}", self.mode, target);
        self.mode = target;
        Ok(target)
    }

    fn transition(&mut self, ctx: &mut MapContext, target: VisualizationMode) -> Result<()> {
        let surface = ctx.surface.as_mut();
        match target {
            VisualizationMode::Cluster => {
                if heatmap::is_attached(surface) {
                    heatmap::detach(surface)?;
                }
                if !cluster::is_complete(surface) {
                    cluster::detach(surface)?;
                    self.attach_cluster(ctx)?;
                }
            }
            VisualizationMode::Heat => {
                // Any outstanding marker load is now stale.
                self.pending_marker = None;
                cluster::detach(surface)?;
                if !heatmap::is_complete(surface) {
                    heatmap::detach(surface)?;
                    heatmap::attach(surface, &ctx.config.modes)?;
                }
            }
        }
        Ok(())
    }

    fn attach_cluster(&mut self, ctx: &mut MapContext) -> Result<()> {
        self.next_request += 1;
        let request = self.next_request;
        let started = cluster::attach(ctx.surface.as_mut(), &ctx.config.modes, request)?;
        self.pending_marker = started.then_some(request);
        Ok(())
    }

    fn on_image_loaded(&mut self, ctx: &mut MapContext, loaded: &ImageLoaded) -> Result<()> {
        if loaded.name != MARKER_IMAGE {
            return Ok(());
        }
        if self.mode != VisualizationMode::Cluster || self.pending_marker != Some(loaded.request) {
            log::warn!(
                "ignoring stale marker image load (request {}, mode {})",
                loaded.request,
                self.mode
            );
            return Ok(());
        }
        self.pending_marker = None;

        match &loaded.result {
            Ok(()) => cluster::finish_marker(ctx.surface.as_mut()),
            Err(reason) => {
                log::error!("marker image failed to load: {}", reason);
                Err(MapError::ImageLoad {
                    name: loaded.name.clone(),
                    reason: reason.clone(),
                })
            }
        }
    }
}

impl MapPlugin for ModeController {
    fn name(&self) -> &str {
        "visualization-mode"
    }

    fn on_load(&mut self, ctx: &mut MapContext) -> Result<()> {
        log::info!("attaching default visualization mode: {}", self.mode);
        match self.mode {
            VisualizationMode::Cluster => self.attach_cluster(ctx),
            VisualizationMode::Heat => heatmap::attach(ctx.surface.as_mut(), &ctx.config.modes),
        }
    }

    fn handle_event(&mut self, ctx: &mut MapContext, event: &MapEvent) -> Result<()> {
        match event {
            MapEvent::ImageLoaded(loaded) => self.on_image_loaded(ctx, loaded)?,
            MapEvent::ClusterClick(click) if self.mode == VisualizationMode::Cluster => {
                cluster::expand_cluster(ctx.surface.as_mut(), click)
            }
            MapEvent::ClusterExpansionZoom(expansion) => {
                if self.mode == VisualizationMode::Cluster {
                    cluster::finish_expansion(ctx.surface.as_mut(), expansion);
                }
            }
            MapEvent::PointClick(click) if self.mode == VisualizationMode::Cluster => {
                ctx.surface.show_popup(&cluster::point_popup(click))?
            }
            _ => {}
        }
        Ok(())
    }
}

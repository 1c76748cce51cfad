//! Cluster mode: aggregated earthquake circles with counts, and a marker icon
//! for single points.

use crate::{
    core::{
        camera::CameraTarget,
        config::ModeConfig,
        constants::{
            CLUSTER_COUNT_LAYER, CLUSTER_LAYER, CLUSTER_SOURCE, MARKER_IMAGE, UNCLUSTERED_LAYER,
        },
        geo::LatLng,
    },
    input::events::{ClusterClick, ExpansionZoom, PointClick},
    layers::{
        base::{LayerSpec, LayerType},
        expression::{get, has, not, step},
        source::SourceSpec,
    },
    surface::MapSurface,
    ui::popup::Popup,
    Result,
};
use serde_json::json;

const CLUSTER_COLOR: &str = "#31bc73";

pub fn source(config: &ModeConfig) -> SourceSpec {
    SourceSpec::clustered(
        config.points_url.clone(),
        config.cluster_max_zoom,
        config.cluster_radius,
    )
}

pub fn circle_layer() -> LayerSpec {
    LayerSpec::new(CLUSTER_LAYER, LayerType::Circle, CLUSTER_SOURCE)
        .filter(has("point_count"))
        .paint("circle-color", CLUSTER_COLOR)
        .paint(
            "circle-radius",
            step(
                get("point_count"),
                20,
                &[(1.0, json!(40)), (2.0, json!(60)), (3.0, json!(80))],
            ),
        )
        .paint("circle-opacity", 0.15)
        .paint("circle-stroke-width", 2)
        .paint("circle-stroke-color", CLUSTER_COLOR)
}

pub fn count_layer() -> LayerSpec {
    LayerSpec::new(CLUSTER_COUNT_LAYER, LayerType::Symbol, CLUSTER_SOURCE)
        .filter(has("point_count"))
        .layout("text-field", "{point_count_abbreviated}")
        .layout(
            "text-font",
            json!(["DIN Offc Pro Medium", "Arial Unicode MS Bold"]),
        )
        .layout("text-size", 12)
}

pub fn unclustered_layer() -> LayerSpec {
    LayerSpec::new(UNCLUSTERED_LAYER, LayerType::Symbol, CLUSTER_SOURCE)
        .filter(not(has("point_count")))
        .layout("icon-image", MARKER_IMAGE)
        .layout("icon-size", 0.8)
        .layout("icon-allow-overlap", true)
}

/// Adds the clustered source and the two aggregate layers, then either adds
/// the single-point layer right away (marker already registered) or starts
/// loading the marker. Returns whether a load was started. On failure
/// whatever was added is removed again.
pub fn attach(surface: &mut dyn MapSurface, config: &ModeConfig, request: u64) -> Result<bool> {
    let added = add_resources(surface, config, request);
    if added.is_err() {
        if let Err(e) = detach(surface) {
            log::warn!("cluster rollback incomplete: {}", e);
        }
    }
    added
}

fn add_resources(surface: &mut dyn MapSurface, config: &ModeConfig, request: u64) -> Result<bool> {
    surface.add_source(CLUSTER_SOURCE, &source(config))?;
    surface.add_layer(&circle_layer(), None)?;
    surface.add_layer(&count_layer(), None)?;

    if surface.has_image(MARKER_IMAGE) {
        surface.add_layer(&unclustered_layer(), None)?;
        return Ok(false);
    }
    surface.load_image(MARKER_IMAGE, &config.marker_image_url, request);
    Ok(true)
}

/// Registers the loaded marker and adds the single-point layer.
pub fn finish_marker(surface: &mut dyn MapSurface) -> Result<()> {
    if !surface.has_image(MARKER_IMAGE) {
        surface.add_image(MARKER_IMAGE)?;
    }
    if !surface.has_layer(UNCLUSTERED_LAYER) {
        surface.add_layer(&unclustered_layer(), None)?;
    }
    Ok(())
}

/// Removes whatever cluster resources exist, layers before the source.
pub fn detach(surface: &mut dyn MapSurface) -> Result<()> {
    for layer in [CLUSTER_LAYER, CLUSTER_COUNT_LAYER, UNCLUSTERED_LAYER] {
        surface.remove_layer_if_present(layer)?;
    }
    surface.remove_source_if_present(CLUSTER_SOURCE)?;
    surface.remove_image_if_present(MARKER_IMAGE)?;
    Ok(())
}

/// Any cluster resource present.
pub fn is_attached(surface: &dyn MapSurface) -> bool {
    surface.has_source(CLUSTER_SOURCE)
        || [CLUSTER_LAYER, CLUSTER_COUNT_LAYER, UNCLUSTERED_LAYER]
            .iter()
            .any(|layer| surface.has_layer(layer))
}

/// Source and both aggregate layers present. The single-point layer may
/// still be waiting on the marker image.
pub fn is_complete(surface: &dyn MapSurface) -> bool {
    surface.has_source(CLUSTER_SOURCE)
        && surface.has_layer(CLUSTER_LAYER)
        && surface.has_layer(CLUSTER_COUNT_LAYER)
}

/// Starts the lookup that zooms into a clicked cluster.
pub fn expand_cluster(surface: &mut dyn MapSurface, click: &ClusterClick) {
    surface.request_cluster_expansion_zoom(CLUSTER_SOURCE, click.cluster_id, click.center);
}

/// Eases to the cluster once its expansion zoom is known. Failed lookups
/// (the source went away, the cluster no longer exists) are dropped.
pub fn finish_expansion(surface: &mut dyn MapSurface, expansion: &ExpansionZoom) {
    match &expansion.zoom {
        Ok(zoom) => surface.ease_to(CameraTarget::new(expansion.center, *zoom)),
        Err(reason) => log::debug!(
            "expansion zoom for cluster {} unavailable: {}",
            expansion.cluster_id,
            reason
        ),
    }
}

/// The popup for a clicked earthquake, placed over the world copy the user
/// actually clicked.
pub fn point_popup(click: &PointClick) -> Popup {
    let lng = LatLng::wrap_toward(click.position.lng, click.click.lng);
    let magnitude = match click.properties.mag {
        Some(mag) => mag.to_string(),
        None => "unknown".to_string(),
    };
    let tsunami = if click.properties.had_tsunami() { "yes" } else { "no" };

    Popup::new(LatLng::new(click.position.lat, lng), "")
        .line("magnitude", magnitude)
        .line("Was there a tsunami?", tsunami)
}

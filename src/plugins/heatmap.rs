//! Heat mode: a density heatmap that hands over to magnitude-sized circles
//! between zoom 7 and 9.

use crate::{
    core::{
        config::ModeConfig,
        constants::{HEAT_BEFORE_LAYER, HEAT_LAYER, HEAT_POINT_LAYER, HEAT_SOURCE, MARKER_IMAGE},
    },
    layers::{
        base::{LayerSpec, LayerType},
        expression::{get, heatmap_density, interpolate_linear, zoom},
        source::SourceSpec,
    },
    surface::MapSurface,
    Result,
};
use serde_json::{json, Value};

/// Low to high; the first stop is transparent so sparse areas fade out.
const RAMP: [&str; 6] = [
    "rgba(33,102,172,0)",
    "rgb(103,169,207)",
    "rgb(209,229,240)",
    "rgb(253,219,199)",
    "rgb(239,138,98)",
    "rgb(178,24,43)",
];

fn ramp_over(input: Value, stops: [f64; 6]) -> Value {
    let stops: Vec<(f64, Value)> = stops
        .into_iter()
        .zip(RAMP)
        .map(|(stop, color)| (stop, json!(color)))
        .collect();
    interpolate_linear(input, &stops)
}

pub fn source(config: &ModeConfig) -> SourceSpec {
    SourceSpec::geojson_url(config.points_url.clone())
}

pub fn heat_layer() -> LayerSpec {
    LayerSpec::new(HEAT_LAYER, LayerType::Heatmap, HEAT_SOURCE)
        .max_zoom(9.0)
        .paint(
            "heatmap-weight",
            interpolate_linear(get("mag"), &[(0.0, json!(0)), (6.0, json!(1))]),
        )
        .paint(
            "heatmap-intensity",
            interpolate_linear(zoom(), &[(0.0, json!(1)), (9.0, json!(3))]),
        )
        .paint("heatmap-color", ramp_over(heatmap_density(), [0.0, 0.2, 0.4, 0.6, 0.8, 1.0]))
        .paint(
            "heatmap-radius",
            interpolate_linear(zoom(), &[(0.0, json!(2)), (9.0, json!(20))]),
        )
        .paint(
            "heatmap-opacity",
            interpolate_linear(zoom(), &[(7.0, json!(1)), (9.0, json!(0))]),
        )
}

pub fn point_layer() -> LayerSpec {
    let low_zoom_radius = interpolate_linear(get("mag"), &[(1.0, json!(1)), (6.0, json!(4))]);
    let high_zoom_radius = interpolate_linear(get("mag"), &[(1.0, json!(5)), (6.0, json!(50))]);

    LayerSpec::new(HEAT_POINT_LAYER, LayerType::Circle, HEAT_SOURCE)
        .min_zoom(7.0)
        .paint(
            "circle-radius",
            interpolate_linear(zoom(), &[(7.0, low_zoom_radius), (16.0, high_zoom_radius)]),
        )
        .paint("circle-color", ramp_over(get("mag"), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]))
        .paint("circle-stroke-color", "white")
        .paint("circle-stroke-width", 1)
        .paint(
            "circle-opacity",
            interpolate_linear(zoom(), &[(7.0, json!(0)), (8.0, json!(1))]),
        )
}

/// Adds the heat source and both layers. On failure whatever was added is
/// removed again, so heat mode is either complete or absent.
pub fn attach(surface: &mut dyn MapSurface, config: &ModeConfig) -> Result<()> {
    let added = add_resources(surface, config);
    if added.is_err() {
        if let Err(e) = detach(surface) {
            log::warn!("heat rollback incomplete: {}", e);
        }
    }
    added
}

fn add_resources(surface: &mut dyn MapSurface, config: &ModeConfig) -> Result<()> {
    surface.add_source(HEAT_SOURCE, &source(config))?;
    surface.add_layer(&heat_layer(), Some(HEAT_BEFORE_LAYER))?;
    surface.add_layer(&point_layer(), Some(HEAT_BEFORE_LAYER))?;
    Ok(())
}

/// Removes whatever heat resources exist. A marker image left behind by an
/// interrupted cluster attach goes too.
pub fn detach(surface: &mut dyn MapSurface) -> Result<()> {
    for layer in [HEAT_LAYER, HEAT_POINT_LAYER] {
        surface.remove_layer_if_present(layer)?;
    }
    surface.remove_source_if_present(HEAT_SOURCE)?;
    surface.remove_image_if_present(MARKER_IMAGE)?;
    Ok(())
}

/// Any heat resource present.
pub fn is_attached(surface: &dyn MapSurface) -> bool {
    surface.has_source(HEAT_SOURCE)
        || surface.has_layer(HEAT_LAYER)
        || surface.has_layer(HEAT_POINT_LAYER)
}

/// Source and both layers present.
pub fn is_complete(surface: &dyn MapSurface) -> bool {
    surface.has_source(HEAT_SOURCE)
        && surface.has_layer(HEAT_LAYER)
        && surface.has_layer(HEAT_POINT_LAYER)
}

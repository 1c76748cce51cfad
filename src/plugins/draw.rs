use crate::{
    core::constants::{CLUSTER_LAYER, DRAW_PROMPT, UNCLUSTERED_LAYER},
    input::events::{DrawEventKind, MapEvent},
    plugins::{
        base::{MapContext, MapPlugin},
        measure::AreaReadout,
    },
    surface::Cursor,
    Result,
};
use serde::{Deserialize, Serialize};

/// Which of the draw plugin's buttons are shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawControls {
    #[serde(default)]
    pub polygon: bool,
    #[serde(default)]
    pub trash: bool,
}

/// Options handed to the draw plugin's constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawOptions {
    pub display_controls_default: bool,
    pub controls: DrawControls,
}

impl Default for DrawOptions {
    /// Polygon and trash buttons only.
    fn default() -> Self {
        Self {
            display_controls_default: false,
            controls: DrawControls {
                polygon: true,
                trash: true,
            },
        }
    }
}

/// Polygon drawing with a live area readout.
///
/// Also owns the pointer cursor over the clickable earthquake layers.
#[derive(Debug, Default)]
pub struct PolygonDrawPlugin {
    options: DrawOptions,
    last_readout: Option<AreaReadout>,
}

impl PolygonDrawPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DrawOptions) -> Self {
        Self {
            options,
            last_readout: None,
        }
    }

    pub fn last_readout(&self) -> Option<AreaReadout> {
        self.last_readout
    }

    /// Recomputes the readout from everything drawn.
    pub fn update_area(&mut self, ctx: &mut MapContext, kind: DrawEventKind) -> Result<AreaReadout> {
        let drawn = ctx.draw.get_all()?;
        let readout = AreaReadout::for_features(&drawn);

        match readout {
            AreaReadout::Area(area) => {
                log::debug!("{} drawn feature(s), {} m²", drawn.len(), area);
                ctx.view.show_area(&readout.html());
            }
            AreaReadout::Cleared => {
                ctx.view.clear_area();
                if kind != DrawEventKind::Delete {
                    ctx.view.alert(DRAW_PROMPT);
                }
            }
        }

        self.last_readout = Some(readout);
        Ok(readout)
    }
}

fn is_clickable_layer(layer_id: &str) -> bool {
    layer_id == CLUSTER_LAYER || layer_id == UNCLUSTERED_LAYER
}

impl MapPlugin for PolygonDrawPlugin {
    fn name(&self) -> &str {
        "polygon-draw"
    }

    fn on_load(&mut self, ctx: &mut MapContext) -> Result<()> {
        ctx.draw.attach(&self.options)
    }

    fn handle_event(&mut self, ctx: &mut MapContext, event: &MapEvent) -> Result<()> {
        match event {
            MapEvent::Draw(kind) => {
                self.update_area(ctx, *kind)?;
            }
            MapEvent::PointerEnter { layer_id } if is_clickable_layer(layer_id) => {
                ctx.surface.set_cursor(Cursor::Pointer)
            }
            MapEvent::PointerLeave { layer_id } if is_clickable_layer(layer_id) => {
                ctx.surface.set_cursor(Cursor::Default)
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::geojson::{FeatureCollection, GeoJsonFeature, GeoJsonGeometry},
        plugins::base::test_support::context,
    };
    use serde_json::json;

    fn triangle() -> FeatureCollection {
        FeatureCollection::new(vec![GeoJsonFeature::from_geometry(GeoJsonGeometry::Polygon {
            coordinates: vec![vec![[0.0, 0.0], [0.01, 0.0], [0.0, 0.01], [0.0, 0.0]]],
        })])
    }

    #[test]
    fn test_options_json() {
        assert_eq!(
            serde_json::to_value(DrawOptions::default()).unwrap(),
            json!({
                "displayControlsDefault": false,
                "controls": { "polygon": true, "trash": true }
            })
        );
    }

    #[test]
    fn test_create_shows_rounded_area() {
        let (mut ctx, _, draw, view) = context();
        let mut plugin = PolygonDrawPlugin::new();
        plugin.on_load(&mut ctx).unwrap();
        assert_eq!(draw.options(), Some(DrawOptions::default()));

        draw.set_features(triangle());
        plugin
            .handle_event(&mut ctx, &MapEvent::Draw(DrawEventKind::Create))
            .unwrap();

        let area = match plugin.last_readout() {
            Some(AreaReadout::Area(area)) => area,
            other => panic!("unexpected readout {:?}", other),
        };
        assert_eq!(area, (area * 100.0).round() / 100.0);
        assert!(area > 0.0);
        assert_eq!(view.area_html(), Some(AreaReadout::Area(area).html()));
        assert!(view.alerts().is_empty());
    }

    #[test]
    fn test_empty_delete_clears_silently() {
        let (mut ctx, _, draw, view) = context();
        let mut plugin = PolygonDrawPlugin::new();

        draw.set_features(triangle());
        plugin.update_area(&mut ctx, DrawEventKind::Create).unwrap();
        draw.set_features(FeatureCollection::default());
        let readout = plugin.update_area(&mut ctx, DrawEventKind::Delete).unwrap();

        assert_eq!(readout, AreaReadout::Cleared);
        assert_eq!(view.area_html().as_deref(), Some(""));
        assert!(view.alerts().is_empty());
    }

    #[test]
    fn test_empty_update_prompts() {
        let (mut ctx, _, _, view) = context();
        let mut plugin = PolygonDrawPlugin::new();
        plugin.update_area(&mut ctx, DrawEventKind::Update).unwrap();
        assert_eq!(view.alerts(), vec![DRAW_PROMPT.to_string()]);
    }

    #[test]
    fn test_pointer_cursor_over_clickable_layers() {
        let (mut ctx, surface, _, _) = context();
        let mut plugin = PolygonDrawPlugin::new();

        let enter = |layer: &str| MapEvent::PointerEnter {
            layer_id: layer.to_string(),
        };
        plugin.handle_event(&mut ctx, &enter("countries-join")).unwrap();
        assert_eq!(surface.cursor(), Cursor::Default);

        plugin.handle_event(&mut ctx, &enter(UNCLUSTERED_LAYER)).unwrap();
        assert_eq!(surface.cursor(), Cursor::Pointer);

        plugin
            .handle_event(
                &mut ctx,
                &MapEvent::PointerLeave {
                    layer_id: UNCLUSTERED_LAYER.to_string(),
                },
            )
            .unwrap();
        assert_eq!(surface.cursor(), Cursor::Default);
    }
}

use crate::{
    core::{camera::CameraTarget, config::OverlayConfig, constants::POLYGON_OVERLAY_ID, geo::LatLng},
    data::{
        geojson::{FeatureCollection, GeoJsonFeature, GeometryType},
        records::PolygonRecord,
    },
    layers::{
        base::{LayerSpec, LayerType},
        source::SourceSpec,
    },
    plugins::base::{MapContext, MapPlugin},
    Result,
};

/// One feature per record, each geometry read as `geometry_type`.
///
/// Records whose coordinates don't fit `geometry_type` are skipped with a
/// warning; the rest still render.
pub fn build_feature_collection(
    records: &[PolygonRecord],
    geometry_type: GeometryType,
) -> FeatureCollection {
    let features = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match record.geometry_as(geometry_type) {
            Ok(geometry) => Some(GeoJsonFeature::from_geometry(geometry)),
            Err(e) => {
                log::warn!("skipping polygon record {}: {}", index, e);
                None
            }
        })
        .collect();
    FeatureCollection::new(features)
}

/// Where to fly once the overlay is on the map.
///
/// The first record decides: its `center` hint if it has a usable one,
/// otherwise the first position of its own geometry. `None` when there is
/// nothing to look at.
pub fn compute_initial_camera(
    records: &[PolygonRecord],
    base_zoom: f64,
    config: &OverlayConfig,
) -> Option<CameraTarget> {
    let first = records.first()?;

    let hinted = first.center().unwrap_or_else(|e| {
        log::warn!("ignoring polygon center hint: {}", e);
        None
    });
    let center = hinted.or_else(|| {
        first
            .geometry()
            .or_else(|_| first.geometry_as(config.geometry_type))
            .ok()
            .and_then(|geometry| geometry.first_position())
            .map(LatLng::from_lng_lat)
    })?;

    Some(CameraTarget::new(center, base_zoom + config.zoom_offset))
}

pub fn fill_layer(config: &OverlayConfig) -> LayerSpec {
    LayerSpec::new(POLYGON_OVERLAY_ID, LayerType::Fill, POLYGON_OVERLAY_ID)
        .paint("fill-color", config.fill_color.as_str())
        .paint("fill-opacity", config.fill_opacity)
}

/// Fixed polygons loaded from the polygon document.
///
/// They are added once both the style has loaded and the document arrived,
/// whichever comes last.
#[derive(Debug, Default)]
pub struct PolygonOverlayPlugin {
    records: Option<Vec<PolygonRecord>>,
    loaded: bool,
    attached: bool,
}

impl PolygonOverlayPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Hands over the fetched records; attaches right away if the style is
    /// already loaded.
    pub fn set_records(&mut self, ctx: &mut MapContext, records: Vec<PolygonRecord>) -> Result<()> {
        log::info!("received {} overlay polygon(s)", records.len());
        self.records = Some(records);
        self.try_attach(ctx)
    }

    fn try_attach(&mut self, ctx: &mut MapContext) -> Result<()> {
        if self.attached || !self.loaded {
            return Ok(());
        }
        let Some(records) = self.records.as_deref() else {
            return Ok(());
        };

        let config = &ctx.config.overlay;
        let collection = build_feature_collection(records, config.geometry_type);
        let camera = compute_initial_camera(records, ctx.config.overlay_base_zoom(), config);

        let surface = ctx.surface.as_mut();
        surface.add_source(POLYGON_OVERLAY_ID, &SourceSpec::geojson_inline(collection))?;
        surface.add_layer(&fill_layer(config), None)?;
        self.attached = true;

        if let Some(camera) = camera {
            surface.fly_to(camera);
        }
        Ok(())
    }
}

impl MapPlugin for PolygonOverlayPlugin {
    fn name(&self) -> &str {
        "polygon-overlay"
    }

    fn on_load(&mut self, ctx: &mut MapContext) -> Result<()> {
        self.loaded = true;
        self.try_attach(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::records::parse_polygon_document, plugins::base::test_support::context,
        surface::MapSurface,
    };

    const DOCUMENT: &str = r#"[
        {"type": "MultiPolygon", "coordinates": [[[[-67.1, 45.1], [-66.9, 44.8], [-68.0, 44.3], [-67.1, 45.1]]]]},
        {"type": "MultiPolygon", "coordinates": [[[[10, 10], [11, 10], [11, 11], [10, 10]]]], "center": "10.5,10.5"}
    ]"#;

    #[test]
    fn test_feature_per_record() {
        let records = parse_polygon_document(DOCUMENT).unwrap();
        let collection = build_feature_collection(&records, GeometryType::MultiPolygon);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_mismatched_record_is_skipped() {
        let mut records = parse_polygon_document(DOCUMENT).unwrap();
        records[0].coordinates = serde_json::json!([1, 2]);
        let collection = build_feature_collection(&records, GeometryType::MultiPolygon);
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_camera_from_first_position() {
        let records = parse_polygon_document(DOCUMENT).unwrap();
        let camera = compute_initial_camera(&records, 3.5, &OverlayConfig::default()).unwrap();
        assert_eq!(camera, CameraTarget::lng_lat(-67.1, 45.1, 7.5));
    }

    #[test]
    fn test_camera_from_center_hint() {
        let records = parse_polygon_document(DOCUMENT).unwrap();
        let camera = compute_initial_camera(&records[1..], 3.5, &OverlayConfig::default()).unwrap();
        assert_eq!(camera.center, LatLng::new(10.5, 10.5));
    }

    #[test]
    fn test_swapped_center_hint_falls_back_to_geometry() {
        let mut records = parse_polygon_document(DOCUMENT).unwrap();
        // lng,lat instead of lat,lng
        records[0].center = Some("121.51,25.04".to_string());
        let camera = compute_initial_camera(&records, 3.5, &OverlayConfig::default()).unwrap();
        assert_eq!(camera.center, LatLng::new(45.1, -67.1));
    }

    #[test]
    fn test_empty_overlay_leaves_camera_alone() {
        let (mut ctx, surface, _, _) = context();
        let mut plugin = PolygonOverlayPlugin::new();
        plugin.on_load(&mut ctx).unwrap();
        plugin.set_records(&mut ctx, Vec::new()).unwrap();

        assert!(plugin.is_attached());
        assert!(surface.has_layer(POLYGON_OVERLAY_ID));
        assert!(surface.camera_moves().is_empty());
        assert_eq!(compute_initial_camera(&[], 3.5, &OverlayConfig::default()), None);
    }

    #[test]
    fn test_attach_waits_for_load() {
        let (mut ctx, surface, _, _) = context();
        let mut plugin = PolygonOverlayPlugin::new();
        plugin
            .set_records(&mut ctx, parse_polygon_document(DOCUMENT).unwrap())
            .unwrap();
        assert!(!surface.has_source(POLYGON_OVERLAY_ID));

        plugin.on_load(&mut ctx).unwrap();
        let layer = surface.layer(POLYGON_OVERLAY_ID).unwrap();
        assert_eq!(layer.paint["fill-color"], "#0080ff");
        assert_eq!(layer.paint["fill-opacity"], 0.5);
        assert_eq!(surface.camera_moves().len(), 1);
    }
}

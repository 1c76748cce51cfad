//! Geodesic area of drawn shapes.

use crate::data::geojson::FeatureCollection;
use geo::ChamberlainDuquetteArea;
use geo_types::Geometry;

/// Area in square meters of everything polygonal in `collection`.
///
/// Uses the Chamberlain–Duquette spherical approximation on the equatorial
/// radius, matching what turf.js reports. Points and lines add nothing.
pub fn polygon_area(collection: &FeatureCollection) -> f64 {
    collection
        .features
        .iter()
        .filter_map(|feature| feature.geometry.as_ref())
        .map(|geometry| geometry_area(&geometry.to_geo()))
        .sum()
}

fn geometry_area(geometry: &Geometry<f64>) -> f64 {
    match geometry {
        Geometry::Polygon(polygon) => polygon.chamberlain_duquette_unsigned_area(),
        Geometry::MultiPolygon(polygons) => polygons.chamberlain_duquette_unsigned_area(),
        Geometry::Rect(rect) => rect.to_polygon().chamberlain_duquette_unsigned_area(),
        Geometry::Triangle(triangle) => triangle.to_polygon().chamberlain_duquette_unsigned_area(),
        Geometry::GeometryCollection(collection) => collection.iter().map(geometry_area).sum(),
        _ => 0.0,
    }
}

/// Rounds to two decimal places, half away from zero.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// What the area readout should show after a draw event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AreaReadout {
    /// Rounded area in square meters
    Area(f64),
    /// Nothing drawn
    Cleared,
}

impl AreaReadout {
    pub fn for_features(collection: &FeatureCollection) -> Self {
        if collection.is_empty() {
            AreaReadout::Cleared
        } else {
            AreaReadout::Area(round_to_hundredths(polygon_area(collection)))
        }
    }

    pub fn html(&self) -> String {
        match self {
            AreaReadout::Area(area) => {
                format!("<p><strong>{}</strong></p><p>square meters</p>", area)
            }
            AreaReadout::Cleared => String::new(),
        }
    }
}

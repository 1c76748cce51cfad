use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// GeoJSON position, `[lng, lat]`
pub type Position = [f64; 2];

/// GeoJSON geometry kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl GeometryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
        }
    }
}

impl std::fmt::Display for GeometryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GeometryType {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| MapError::ParseError(format!("unknown geometry type {:?}", s)))
    }
}

/// GeoJSON geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

impl GeoJsonGeometry {
    /// Builds a geometry of `kind` from a raw coordinate payload.
    ///
    /// The nesting depth of `coordinates` must match `kind`, e.g. three
    /// levels of arrays around each position for a `MultiPolygon`.
    pub fn from_coordinates(kind: GeometryType, coordinates: &serde_json::Value) -> Result<Self> {
        let tagged = serde_json::json!({
            "type": kind.as_str(),
            "coordinates": coordinates,
        });

        serde_json::from_value(tagged).map_err(|e| {
            MapError::InvalidCoordinates(format!("coordinates do not form a {}: {}", kind, e))
        })
    }

    /// First position of the first ring/line/point, if any.
    pub fn first_position(&self) -> Option<Position> {
        match self {
            GeoJsonGeometry::Point { coordinates } => Some(*coordinates),
            GeoJsonGeometry::LineString { coordinates }
            | GeoJsonGeometry::MultiPoint { coordinates } => coordinates.first().copied(),
            GeoJsonGeometry::Polygon { coordinates }
            | GeoJsonGeometry::MultiLineString { coordinates } => {
                coordinates.first().and_then(|ring| ring.first()).copied()
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => coordinates
                .first()
                .and_then(|polygon| polygon.first())
                .and_then(|ring| ring.first())
                .copied(),
            GeoJsonGeometry::GeometryCollection { geometries } => {
                geometries.iter().find_map(|g| g.first_position())
            }
        }
    }

    /// Converts into the `geo` crate's geometry model.
    pub fn to_geo(&self) -> geo_types::Geometry<f64> {
        use geo_types::{
            Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
            Point,
        };

        match self {
            GeoJsonGeometry::Point { coordinates } => {
                Geometry::Point(Point::new(coordinates[0], coordinates[1]))
            }
            GeoJsonGeometry::LineString { coordinates } => {
                Geometry::LineString(to_line_string(coordinates))
            }
            GeoJsonGeometry::Polygon { coordinates } => Geometry::Polygon(to_polygon(coordinates)),
            GeoJsonGeometry::MultiPoint { coordinates } => Geometry::MultiPoint(MultiPoint::new(
                coordinates.iter().map(|c| Point::new(c[0], c[1])).collect(),
            )),
            GeoJsonGeometry::MultiLineString { coordinates } => Geometry::MultiLineString(
                MultiLineString::new(coordinates.iter().map(|l| to_line_string(l)).collect()),
            ),
            GeoJsonGeometry::MultiPolygon { coordinates } => Geometry::MultiPolygon(
                MultiPolygon::new(coordinates.iter().map(|p| to_polygon(p)).collect()),
            ),
            GeoJsonGeometry::GeometryCollection { geometries } => Geometry::GeometryCollection(
                GeometryCollection(geometries.iter().map(|g| g.to_geo()).collect()),
            ),
        }
    }
}

fn to_line_string(positions: &[Position]) -> geo_types::LineString<f64> {
    geo_types::LineString::from(positions.iter().map(|c| (c[0], c[1])).collect::<Vec<_>>())
}

fn to_polygon(rings: &[Vec<Position>]) -> geo_types::Polygon<f64> {
    let mut rings = rings.iter().map(|r| to_line_string(r));
    let exterior = rings
        .next()
        .unwrap_or_else(|| geo_types::LineString::new(Vec::new()));
    geo_types::Polygon::new(exterior, rings.collect())
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct GeoJsonFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<HashMap<String, serde_json::Value>>,
}

impl GeoJsonFeature {
    pub fn from_geometry(geometry: GeoJsonGeometry) -> Self {
        Self {
            id: None,
            geometry: Some(geometry),
            properties: None,
        }
    }

    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }
}

/// A GeoJSON `FeatureCollection`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<GeoJsonFeature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<GeoJsonFeature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feature_collection_parsing() {
        let geojson_str = r#"
        {
            "type": "FeatureCollection",
            "features": [
                {
                    "id": "6b1f4c",
                    "type": "Feature",
                    "properties": {},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]
                    }
                }
            ]
        }
        "#;

        let collection: FeatureCollection = serde_json::from_str(geojson_str).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.features[0].id, Some(json!("6b1f4c")));
    }

    #[test]
    fn test_collection_serializes_with_type_tags() {
        let collection = FeatureCollection::new(vec![GeoJsonFeature::from_geometry(
            GeoJsonGeometry::Point {
                coordinates: [-74.006, 40.7128],
            },
        )]);

        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["type"], "Feature");
        assert_eq!(value["features"][0]["geometry"]["type"], "Point");
        assert_eq!(
            value["features"][0]["geometry"]["coordinates"],
            json!([-74.006, 40.7128])
        );
    }

    #[test]
    fn test_from_coordinates_checks_nesting() {
        let polygon = json!([[[-67.13, 45.13], [-66.96, 44.80], [-68.03, 44.32], [-67.13, 45.13]]]);

        let geometry = GeoJsonGeometry::from_coordinates(GeometryType::Polygon, &polygon).unwrap();
        assert_eq!(geometry.first_position(), Some([-67.13, 45.13]));

        let err = GeoJsonGeometry::from_coordinates(GeometryType::MultiPolygon, &polygon);
        assert!(matches!(err, Err(MapError::InvalidCoordinates(_))));
    }

    #[test]
    fn test_first_position_of_multipolygon() {
        let coordinates = json!([[[[10.0, 20.0], [11.0, 20.0], [11.0, 21.0], [10.0, 20.0]]]]);
        let geometry =
            GeoJsonGeometry::from_coordinates(GeometryType::MultiPolygon, &coordinates).unwrap();
        assert_eq!(geometry.first_position(), Some([10.0, 20.0]));

        let empty = GeoJsonGeometry::MultiPolygon {
            coordinates: Vec::new(),
        };
        assert_eq!(empty.first_position(), None);
    }

    #[test]
    fn test_geometry_type_from_str() {
        assert_eq!(
            "MultiPolygon".parse::<GeometryType>().unwrap(),
            GeometryType::MultiPolygon
        );
        assert!("Circle".parse::<GeometryType>().is_err());
    }
}

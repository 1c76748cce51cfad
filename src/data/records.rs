use crate::{
    core::geo::LatLng,
    data::geojson::{GeoJsonGeometry, GeometryType},
    Result,
};
use serde::{Deserialize, Serialize};

/// One entry of the country metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// ISO 3166-1 alpha-3 code, the join key into the country boundaries tileset
    pub code: String,
    pub name: String,
    /// Human Development Index, 0.0 to 1.0
    pub hdi: f64,
}

impl CountryRecord {
    pub fn new(code: impl Into<String>, name: impl Into<String>, hdi: f64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            hdi,
        }
    }
}

/// The country document is either a bare array or wrapped in `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CountryDocument {
    Wrapped { data: Vec<CountryRecord> },
    Bare(Vec<CountryRecord>),
}

impl From<CountryDocument> for Vec<CountryRecord> {
    fn from(document: CountryDocument) -> Self {
        match document {
            CountryDocument::Wrapped { data } => data,
            CountryDocument::Bare(records) => records,
        }
    }
}

/// Parses the country metadata document.
pub fn parse_country_document(json: &str) -> Result<Vec<CountryRecord>> {
    let document: CountryDocument = serde_json::from_str(json)?;
    Ok(document.into())
}

/// One entry of the polygon document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonRecord {
    /// Geometry kind of `coordinates`, e.g. `"MultiPolygon"`
    #[serde(rename = "type")]
    pub geometry_type: String,
    /// Raw nested coordinate arrays
    pub coordinates: serde_json::Value,
    /// Optional `"lat,lng"` camera hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<String>,
}

impl PolygonRecord {
    /// Geometry built from the record's own declared type.
    pub fn geometry(&self) -> Result<GeoJsonGeometry> {
        let kind: GeometryType = self.geometry_type.parse()?;
        self.geometry_as(kind)
    }

    /// Geometry built from the coordinates, interpreted as `kind`.
    pub fn geometry_as(&self, kind: GeometryType) -> Result<GeoJsonGeometry> {
        GeoJsonGeometry::from_coordinates(kind, &self.coordinates)
    }

    /// Parsed `center` hint, if the record has one.
    pub fn center(&self) -> Result<Option<LatLng>> {
        self.center
            .as_deref()
            .map(LatLng::parse_lat_lng)
            .transpose()
    }
}

/// Parses the polygon document.
pub fn parse_polygon_document(json: &str) -> Result<Vec<PolygonRecord>> {
    Ok(serde_json::from_str(json)?)
}

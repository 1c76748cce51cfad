use crate::data::geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

/// Payload of a GeoJSON source: a URL the map fetches itself, or inline data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeoJsonData {
    Url(String),
    Inline(FeatureCollection),
}

/// A style source, serialized exactly as `map.addSource` expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceSpec {
    Geojson {
        data: GeoJsonData,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        cluster: bool,
        #[serde(
            rename = "clusterMaxZoom",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        cluster_max_zoom: Option<u8>,
        #[serde(
            rename = "clusterRadius",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        cluster_radius: Option<u32>,
    },
    Vector {
        url: String,
    },
}

impl SourceSpec {
    /// GeoJSON source the map fetches from `url`
    pub fn geojson_url(url: impl Into<String>) -> Self {
        SourceSpec::Geojson {
            data: GeoJsonData::Url(url.into()),
            cluster: false,
            cluster_max_zoom: None,
            cluster_radius: None,
        }
    }

    /// GeoJSON source with client-side point clustering
    pub fn clustered(url: impl Into<String>, max_zoom: u8, radius: u32) -> Self {
        SourceSpec::Geojson {
            data: GeoJsonData::Url(url.into()),
            cluster: true,
            cluster_max_zoom: Some(max_zoom),
            cluster_radius: Some(radius),
        }
    }

    /// GeoJSON source with data supplied inline
    pub fn geojson_inline(collection: FeatureCollection) -> Self {
        SourceSpec::Geojson {
            data: GeoJsonData::Inline(collection),
            cluster: false,
            cluster_max_zoom: None,
            cluster_radius: None,
        }
    }

    /// Vector tileset source
    pub fn vector(url: impl Into<String>) -> Self {
        SourceSpec::Vector { url: url.into() }
    }

    pub fn is_clustered(&self) -> bool {
        matches!(self, SourceSpec::Geojson { cluster: true, .. })
    }
}

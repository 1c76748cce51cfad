use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mapbox style layer types this application renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Fill,
    Circle,
    Symbol,
    Heatmap,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Fill => write!(f, "fill"),
            LayerType::Circle => write!(f, "circle"),
            LayerType::Symbol => write!(f, "symbol"),
            LayerType::Heatmap => write!(f, "heatmap"),
        }
    }
}

/// A style layer, serialized exactly as `map.addLayer` expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    pub source: String,
    #[serde(
        rename = "source-layer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,
    #[serde(default)]
    pub layout: Map<String, Value>,
    #[serde(default)]
    pub paint: Map<String, Value>,
}

impl LayerSpec {
    pub fn new(id: impl Into<String>, layer_type: LayerType, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layer_type,
            source: source.into(),
            source_layer: None,
            filter: None,
            minzoom: None,
            maxzoom: None,
            layout: Map::new(),
            paint: Map::new(),
        }
    }

    pub fn source_layer(mut self, source_layer: impl Into<String>) -> Self {
        self.source_layer = Some(source_layer.into());
        self
    }

    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn min_zoom(mut self, zoom: f64) -> Self {
        self.minzoom = Some(zoom);
        self
    }

    pub fn max_zoom(mut self, zoom: f64) -> Self {
        self.maxzoom = Some(zoom);
        self
    }

    pub fn layout(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.layout.insert(property.to_string(), value.into());
        self
    }

    pub fn paint(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.paint.insert(property.to_string(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layer_spec_json() {
        let spec = LayerSpec::new("countries-join", LayerType::Fill, "countries")
            .source_layer("country_boundaries")
            .paint("fill-color", json!(["match", ["get", "iso"], "rgba(0,0,0,0)"]));

        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({
                "id": "countries-join",
                "type": "fill",
                "source": "countries",
                "source-layer": "country_boundaries",
                "layout": {},
                "paint": { "fill-color": ["match", ["get", "iso"], "rgba(0,0,0,0)"] }
            })
        );
    }

    #[test]
    fn test_zoom_bounds_serialize_lowercase() {
        let spec = LayerSpec::new("p", LayerType::Circle, "s")
            .min_zoom(7.0)
            .max_zoom(9.0);
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["minzoom"], 7.0);
        assert_eq!(json["maxzoom"], 9.0);
        assert!(json.get("filter").is_none());
    }

    #[test]
    fn test_layer_type_display() {
        assert_eq!(LayerType::Heatmap.to_string(), "heatmap");
        assert_eq!(LayerType::Symbol.to_string(), "symbol");
    }
}

use crate::{layers::base::LayerSpec, prelude::HashMap, MapError, Result};

/// Ordered set of style layers, bottom to top.
///
/// Mirrors how the mapping library keeps its style: ids are unique, adding a
/// duplicate or removing an unknown id fails, and a layer can be slotted in
/// directly beneath an existing one.
#[derive(Debug, Default, Clone)]
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, LayerSpec>,
    /// Layer IDs in draw order
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer on top, or directly beneath `before` when given.
    pub fn add_layer(&mut self, layer: LayerSpec, before: Option<&str>) -> Result<()> {
        if self.layers.contains_key(&layer.id) {
            return Err(MapError::Layer(format!(
                "Layer with id \"{}\" already exists on this map",
                layer.id
            )));
        }

        let insert_pos = match before {
            Some(before_id) => self
                .render_order
                .iter()
                .position(|id| id == before_id)
                .ok_or_else(|| {
                    MapError::Layer(format!(
                        "Cannot add layer \"{}\" before non-existing layer \"{}\"",
                        layer.id, before_id
                    ))
                })?,
            None => self.render_order.len(),
        };

        self.render_order.insert(insert_pos, layer.id.clone());
        self.layers.insert(layer.id.clone(), layer);
        Ok(())
    }

    /// Removes a layer, failing if it does not exist.
    pub fn remove_layer(&mut self, layer_id: &str) -> Result<LayerSpec> {
        let layer = self.layers.remove(layer_id).ok_or_else(|| {
            MapError::Layer(format!(
                "Cannot remove non-existing layer \"{}\"",
                layer_id
            ))
        })?;
        self.render_order.retain(|id| id != layer_id);
        Ok(layer)
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&LayerSpec> {
        self.layers.get(layer_id)
    }

    pub fn contains(&self, layer_id: &str) -> bool {
        self.layers.contains_key(layer_id)
    }

    /// Layer IDs in draw order
    pub fn render_order(&self) -> &[String] {
        &self.render_order
    }

    /// Whether any layer still draws from `source_id`
    pub fn uses_source(&self, source_id: &str) -> bool {
        self.layers.values().any(|layer| layer.source == source_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::base::LayerType;

    fn layer(id: &str) -> LayerSpec {
        LayerSpec::new(id, LayerType::Fill, "src")
    }

    #[test]
    fn test_insert_before() {
        let mut manager = LayerManager::new();
        manager.add_layer(layer("water"), None).unwrap();
        manager.add_layer(layer("labels"), None).unwrap();
        manager.add_layer(layer("choropleth"), Some("labels")).unwrap();

        assert_eq!(manager.render_order(), ["water", "choropleth", "labels"]);
    }

    #[test]
    fn test_duplicate_and_missing_ids_fail() {
        let mut manager = LayerManager::new();
        manager.add_layer(layer("a"), None).unwrap();

        assert!(manager.add_layer(layer("a"), None).is_err());
        assert!(manager.add_layer(layer("b"), Some("missing")).is_err());
        assert!(manager.remove_layer("missing").is_err());
        assert_eq!(manager.render_order(), ["a".to_string()]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut manager = LayerManager::new();
        for id in ["a", "b", "c"] {
            manager.add_layer(layer(id), None).unwrap();
        }
        manager.remove_layer("b").unwrap();

        assert_eq!(manager.render_order(), ["a", "c"]);
        assert!(!manager.contains("b"));
        assert!(manager.uses_source("src"));
    }
}

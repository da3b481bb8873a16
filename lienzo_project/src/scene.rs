use serde::{Deserialize, Serialize};

use lienzo_events::EventTree;
use lienzo_variant::VariableStore;

use crate::{
    Color, DocumentError, InstanceContainer, Layer, ObjectContainer, Result,
};

/// One level/screen of the project: objects, instances, variables, layers,
/// and one event tree. Owned exclusively by the project document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,

    #[serde(default)]
    pub background_color: Color,

    #[serde(default, skip_serializing_if = "ObjectContainer::is_empty")]
    pub objects: ObjectContainer,

    #[serde(default, skip_serializing_if = "InstanceContainer::is_empty")]
    pub instances: InstanceContainer,

    #[serde(default, skip_serializing_if = "VariableStore::is_empty")]
    pub variables: VariableStore,

    #[serde(default = "default_layers")]
    pub layers: Vec<Layer>,

    #[serde(default, skip_serializing_if = "EventTree::is_empty")]
    pub events: EventTree,
}

fn default_layers() -> Vec<Layer> {
    vec![Layer::base()]
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background_color: Color::new(209, 209, 209),
            objects: ObjectContainer::new(),
            instances: InstanceContainer::new(),
            variables: VariableStore::new(),
            layers: default_layers(),
            events: EventTree::new(),
        }
    }

    // ======================================================
    // ===================== Layers =========================
    // ======================================================

    #[inline]
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l.name == name)
    }

    #[inline]
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Result<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|l| l.name == name)
            .ok_or_else(|| DocumentError::not_found("layer", name))
    }

    /// Add a layer, appending or inserting at `index`.
    pub fn add_layer(&mut self, layer: Layer, index: Option<usize>) -> Result<()> {
        if self.has_layer(&layer.name) {
            return Err(DocumentError::duplicate("layer", layer.name));
        }
        match index {
            Some(i) if i > self.layers.len() => Err(DocumentError::IndexOutOfRange {
                index: i,
                len: self.layers.len(),
            }),
            Some(i) => {
                self.layers.insert(i, layer);
                Ok(())
            }
            None => {
                self.layers.push(layer);
                Ok(())
            }
        }
    }

    /// Remove a layer, optionally moving its instances to another layer
    /// first. Without a move target the instances keep their now-dangling
    /// layer reference. Returns how many instances were moved.
    pub fn remove_layer(&mut self, name: &str, move_instances_to: Option<&str>) -> Result<usize> {
        let position = self
            .layers
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| DocumentError::not_found("layer", name))?;

        let moved = match move_instances_to {
            Some(target) => {
                if !self.has_layer(target) {
                    return Err(DocumentError::not_found("layer", target));
                }
                self.instances.move_to_layer(name, target)
            }
            None => 0,
        };

        self.layers.remove(position);
        Ok(moved)
    }

    pub fn move_layer(&mut self, name: &str, to_index: usize) -> Result<()> {
        let from = self
            .layers
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| DocumentError::not_found("layer", name))?;
        if to_index >= self.layers.len() {
            return Err(DocumentError::IndexOutOfRange {
                index: to_index,
                len: self.layers.len(),
            });
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to_index, layer);
        Ok(())
    }
}

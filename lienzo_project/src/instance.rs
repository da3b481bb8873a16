use serde::{Deserialize, Serialize};

use lienzo_variant::VariableStore;

use crate::{DocumentError, Result};

/// Optional size override for a placed instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomSize {
    pub width: f64,
    pub height: f64,
}

/// A placed, positioned reference to an object within a scene. The object
/// is referenced by name only and resolved by lookup at use time; the
/// reference may dangle if the object is later deleted without cleanup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub object_name: String,

    pub x: f64,
    pub y: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,

    #[serde(default)]
    pub angle: f64,

    #[serde(default)]
    pub z_order: i32,

    /// Empty string targets the scene's base layer.
    #[serde(default)]
    pub layer: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_size: Option<CustomSize>,

    #[serde(default)]
    pub locked: bool,

    #[serde(default)]
    pub flipped_x: bool,

    #[serde(default)]
    pub flipped_y: bool,

    #[serde(default, skip_serializing_if = "VariableStore::is_empty")]
    pub variables: VariableStore,
}

impl Instance {
    pub fn new(object_name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            object_name: object_name.into(),
            x,
            y,
            z: None,
            angle: 0.0,
            z_order: 0,
            layer: String::new(),
            custom_size: None,
            locked: false,
            flipped_x: false,
            flipped_y: false,
            variables: VariableStore::new(),
        }
    }

    pub fn on_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }
}

/// All instances placed in one scene, in placement order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceContainer {
    instances: Vec<Instance>,
}

impl InstanceContainer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Instance> {
        self.instances.iter()
    }

    #[inline]
    pub fn push(&mut self, instance: Instance) {
        self.instances.push(instance);
    }

    pub fn get(&self, index: usize) -> Result<&Instance> {
        self.instances
            .get(index)
            .ok_or(DocumentError::IndexOutOfRange {
                index,
                len: self.instances.len(),
            })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Instance> {
        let len = self.instances.len();
        self.instances
            .get_mut(index)
            .ok_or(DocumentError::IndexOutOfRange { index, len })
    }

    pub fn remove(&mut self, index: usize) -> Result<Instance> {
        if index >= self.instances.len() {
            return Err(DocumentError::IndexOutOfRange {
                index,
                len: self.instances.len(),
            });
        }
        Ok(self.instances.remove(index))
    }

    #[inline]
    pub fn count_for_object(&self, object_name: &str) -> usize {
        self.instances
            .iter()
            .filter(|i| i.object_name == object_name)
            .count()
    }

    /// Bulk delete by referenced object name; returns how many went away.
    pub fn remove_by_object(&mut self, object_name: &str) -> usize {
        let before = self.instances.len();
        self.instances.retain(|i| i.object_name != object_name);
        before - self.instances.len()
    }

    /// Bulk delete by layer name; returns how many went away.
    pub fn remove_by_layer(&mut self, layer: &str) -> usize {
        let before = self.instances.len();
        self.instances.retain(|i| i.layer != layer);
        before - self.instances.len()
    }

    /// Rewrite object references, used by the object-rename cascade.
    pub fn retarget_object(&mut self, old: &str, new: &str) -> usize {
        let mut rewritten = 0;
        for instance in &mut self.instances {
            if instance.object_name == old {
                instance.object_name = new.to_string();
                rewritten += 1;
            }
        }
        rewritten
    }

    /// Move every instance on `from` to the layer `to`.
    pub fn move_to_layer(&mut self, from: &str, to: &str) -> usize {
        let mut moved = 0;
        for instance in &mut self.instances {
            if instance.layer == from {
                instance.layer = to.to_string();
                moved += 1;
            }
        }
        moved
    }
}

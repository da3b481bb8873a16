use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use lienzo_variant::VariableStore;

use crate::{DocumentError, Result};

/// A typed configuration block attached to exactly one object. The set of
/// declared properties defines which keys `configure` recognizes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub behavior_type: String,

    #[serde(default)]
    pub properties: IndexMap<String, String>,
}

impl Behavior {
    pub fn new(behavior_type: impl Into<String>) -> Self {
        Self {
            behavior_type: behavior_type.into(),
            properties: IndexMap::new(),
        }
    }

    pub fn with_properties(
        behavior_type: impl Into<String>,
        properties: IndexMap<String, String>,
    ) -> Self {
        Self {
            behavior_type: behavior_type.into(),
            properties,
        }
    }

    /// Apply known property values, skipping keys the behavior does not
    /// declare. Returns the keys that were actually applied.
    pub fn configure<I, K, V>(&mut self, updates: I) -> Vec<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut applied = Vec::new();
        for (key, value) in updates {
            if let Some(slot) = self.properties.get_mut(key.as_ref()) {
                *slot = value.into();
                applied.push(key.as_ref().to_string());
            }
        }
        applied
    }
}

/// A visual effect entry on an object; parameters are opaque strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub name: String,
    pub effect_type: String,

    #[serde(default)]
    pub parameters: IndexMap<String, String>,
}

/// An object definition, owned by a global or scene-local container.
/// Instances reference it by name only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    pub name: String,
    pub object_type: String,

    #[serde(default, skip_serializing_if = "VariableStore::is_empty")]
    pub variables: VariableStore,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub behaviors: IndexMap<String, Behavior>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
}

impl GameObject {
    pub fn new(name: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            object_type: object_type.into(),
            variables: VariableStore::new(),
            behaviors: IndexMap::new(),
            effects: Vec::new(),
        }
    }

    pub fn add_behavior(&mut self, name: impl Into<String>, behavior: Behavior) -> Result<()> {
        let name = name.into();
        if self.behaviors.contains_key(&name) {
            return Err(DocumentError::duplicate("behavior", name));
        }
        self.behaviors.insert(name, behavior);
        Ok(())
    }

    pub fn remove_behavior(&mut self, name: &str) -> Result<Behavior> {
        self.behaviors
            .shift_remove(name)
            .ok_or_else(|| DocumentError::not_found("behavior", name))
    }

    #[inline]
    pub fn behavior(&self, name: &str) -> Option<&Behavior> {
        self.behaviors.get(name)
    }

    /// Configure one behavior; returns the recognized-and-applied keys.
    pub fn configure_behavior<I, K, V>(&mut self, name: &str, updates: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let behavior = self
            .behaviors
            .get_mut(name)
            .ok_or_else(|| DocumentError::not_found("behavior", name))?;
        Ok(behavior.configure(updates))
    }

    pub fn add_effect(&mut self, effect: Effect) -> Result<()> {
        if self.effects.iter().any(|e| e.name == effect.name) {
            return Err(DocumentError::duplicate("effect", effect.name));
        }
        self.effects.push(effect);
        Ok(())
    }

    pub fn remove_effect(&mut self, name: &str) -> Result<Effect> {
        match self.effects.iter().position(|e| e.name == name) {
            Some(i) => Ok(self.effects.remove(i)),
            None => Err(DocumentError::not_found("effect", name)),
        }
    }
}

/// Ordered, name-unique set of object definitions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectContainer {
    objects: Vec<GameObject>,
}

impl ObjectContainer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.objects.iter().any(|o| o.name == name)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    #[inline]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|o| o.name == name)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.iter()
    }

    #[inline]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(|o| o.name.as_str())
    }

    pub fn insert(&mut self, object: GameObject) -> Result<()> {
        if self.contains(&object.name) {
            return Err(DocumentError::duplicate("object", object.name));
        }
        self.objects.push(object);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<GameObject> {
        match self.objects.iter().position(|o| o.name == name) {
            Some(i) => Ok(self.objects.remove(i)),
            None => Err(DocumentError::not_found("object", name)),
        }
    }

    /// Rename in place, keeping the object's position in the container.
    /// Instance references are rewritten by the caller's cascade.
    pub fn rename(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        if old != new && self.contains(&new) {
            return Err(DocumentError::duplicate("object", new));
        }
        let object = self
            .get_mut(old)
            .ok_or_else(|| DocumentError::not_found("object", old))?;
        object.name = new;
        Ok(())
    }
}

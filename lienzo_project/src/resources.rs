use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{DocumentError, Result};

/// One registered project resource: an image, audio file, font, and so on.
/// The kind is an opaque tag; the file path is relative to the project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: String,
    pub file: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: IndexMap<String, String>,
}

impl Resource {
    pub fn new(kind: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            file: file.into(),
            metadata: IndexMap::new(),
        }
    }
}

/// Name-keyed resource registry, insertion ordered.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceManager {
    resources: IndexMap<String, Resource>,
}

impl ResourceManager {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.resources.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn add(&mut self, name: impl Into<String>, resource: Resource) -> Result<()> {
        let name = name.into();
        if self.resources.contains_key(&name) {
            return Err(DocumentError::duplicate("resource", name));
        }
        self.resources.insert(name, resource);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Resource> {
        self.resources
            .shift_remove(name)
            .ok_or_else(|| DocumentError::not_found("resource", name))
    }
}

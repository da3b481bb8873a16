use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Result, Variable, VariableError};

/// Ordered, name-unique collection of variables. Attached to a project,
/// a scene, an object, or a single placed instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableStore {
    vars: IndexMap<String, Variable>,
}

impl VariableStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    #[inline]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.vars.get_mut(name)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Insert a new variable, appending at the end of the store.
    pub fn insert(&mut self, name: impl Into<String>, value: Variable) -> Result<()> {
        let name = name.into();
        if self.vars.contains_key(&name) {
            return Err(VariableError::DuplicateName(name));
        }
        self.vars.insert(name, value);
        Ok(())
    }

    /// Overwrite an existing variable's value, keeping its position.
    pub fn update(&mut self, name: &str, value: Variable) -> Result<()> {
        match self.vars.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(VariableError::NotFound(name.to_string())),
        }
    }

    /// Remove a variable, preserving the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Result<Variable> {
        self.vars
            .shift_remove(name)
            .ok_or_else(|| VariableError::NotFound(name.to_string()))
    }

    /// Fetch a variable or fail; `get` for callers that want the error kind.
    pub fn require(&self, name: &str) -> Result<&Variable> {
        self.vars
            .get(name)
            .ok_or_else(|| VariableError::NotFound(name.to_string()))
    }
}

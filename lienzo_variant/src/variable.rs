use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Result, VariableError};

/// A tagged project value. Structures and arrays own their children, so
/// containment is always tree-shaped and cycles cannot be built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Variable {
    Number(f64),
    String(String),
    Boolean(bool),
    Structure(IndexMap<String, Variable>),
    Array(Vec<Variable>),
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Number(v) => write!(f, "{v}"),
            Variable::String(v) => write!(f, "{v:?}"),
            Variable::Boolean(v) => write!(f, "{v}"),
            Variable::Structure(children) => {
                write!(f, "{{")?;
                for (i, (name, child)) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name:?}: {child}")?;
                }
                write!(f, "}}")
            }
            Variable::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

// -------------------- Constructors --------------------

impl Variable {
    #[inline]
    pub fn structure() -> Self {
        Variable::Structure(IndexMap::new())
    }

    #[inline]
    pub fn array() -> Self {
        Variable::Array(Vec::new())
    }

    #[inline]
    pub const fn kind(&self) -> &'static str {
        match self {
            Variable::Number(_) => "number",
            Variable::String(_) => "string",
            Variable::Boolean(_) => "boolean",
            Variable::Structure(_) => "structure",
            Variable::Array(_) => "array",
        }
    }

    #[inline]
    pub const fn is_container(&self) -> bool {
        matches!(self, Variable::Structure(_) | Variable::Array(_))
    }
}

// -------------------- Accessors --------------------

impl Variable {
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Variable::Number(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variable::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Variable::Boolean(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_structure(&self) -> Option<&IndexMap<String, Variable>> {
        match self {
            Variable::Structure(m) => Some(m),
            _ => None,
        }
    }

    #[inline]
    pub fn as_structure_mut(&mut self) -> Option<&mut IndexMap<String, Variable>> {
        match self {
            Variable::Structure(m) => Some(m),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Variable]> {
        match self {
            Variable::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Variable>> {
        match self {
            Variable::Array(v) => Some(v),
            _ => None,
        }
    }
}

// -------------------- Child access (structures and arrays) --------------------

impl Variable {
    /// Insert a named child into a structure. Non-structures report the
    /// name as not found, matching lookup behavior.
    pub fn insert_child(&mut self, name: impl Into<String>, child: Variable) -> Result<()> {
        let name = name.into();
        let Some(children) = self.as_structure_mut() else {
            return Err(VariableError::NotFound(name));
        };
        if children.contains_key(&name) {
            return Err(VariableError::DuplicateName(name));
        }
        children.insert(name, child);
        Ok(())
    }

    pub fn remove_child(&mut self, name: &str) -> Result<Variable> {
        self.as_structure_mut()
            .and_then(|children| children.shift_remove(name))
            .ok_or_else(|| VariableError::NotFound(name.to_string()))
    }

    #[inline]
    pub fn child(&self, name: &str) -> Option<&Variable> {
        self.as_structure().and_then(|children| children.get(name))
    }

    #[inline]
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.as_structure_mut()
            .and_then(|children| children.get_mut(name))
    }

    /// Insert into an array at `index` (appending when `index == len`).
    pub fn insert_at(&mut self, index: usize, item: Variable) -> Result<()> {
        let Some(items) = self.as_array_mut() else {
            return Err(VariableError::IndexOutOfRange { index, len: 0 });
        };
        if index > items.len() {
            return Err(VariableError::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }
        items.insert(index, item);
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Variable> {
        let Some(items) = self.as_array_mut() else {
            return Err(VariableError::IndexOutOfRange { index, len: 0 });
        };
        if index >= items.len() {
            return Err(VariableError::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }
        Ok(items.remove(index))
    }

    #[inline]
    pub fn item(&self, index: usize) -> Option<&Variable> {
        self.as_array().and_then(|items| items.get(index))
    }
}

// -------------------- From impls --------------------

impl From<f64> for Variable {
    #[inline]
    fn from(v: f64) -> Self {
        Variable::Number(v)
    }
}

impl From<bool> for Variable {
    #[inline]
    fn from(v: bool) -> Self {
        Variable::Boolean(v)
    }
}

impl From<&str> for Variable {
    #[inline]
    fn from(v: &str) -> Self {
        Variable::String(v.to_string())
    }
}

impl From<String> for Variable {
    #[inline]
    fn from(v: String) -> Self {
        Variable::String(v)
    }
}

impl From<Vec<Variable>> for Variable {
    #[inline]
    fn from(v: Vec<Variable>) -> Self {
        Variable::Array(v)
    }
}

impl From<IndexMap<String, Variable>> for Variable {
    #[inline]
    fn from(v: IndexMap<String, Variable>) -> Self {
        Variable::Structure(v)
    }
}

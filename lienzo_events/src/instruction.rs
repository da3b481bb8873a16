use serde::{Deserialize, Serialize};

use crate::{EventError, Result};

/// One condition or action entry. The type identifier and parameters are
/// opaque strings; nothing here interprets what a given type requires.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub instruction_type: String,

    /// Condition semantics only; ignored for actions.
    #[serde(default)]
    pub inverted: bool,

    #[serde(default)]
    pub parameters: Vec<String>,

    /// Nested list for instructions that branch on compound conditions.
    #[serde(default, skip_serializing_if = "InstructionList::is_empty")]
    pub sub_instructions: InstructionList,
}

impl Instruction {
    pub fn action(instruction_type: impl Into<String>, parameters: Vec<String>) -> Self {
        Self {
            instruction_type: instruction_type.into(),
            inverted: false,
            parameters,
            sub_instructions: InstructionList::default(),
        }
    }

    pub fn condition(
        instruction_type: impl Into<String>,
        parameters: Vec<String>,
        inverted: bool,
    ) -> Self {
        Self {
            inverted,
            ..Self::action(instruction_type, parameters)
        }
    }

    #[inline]
    pub fn parameter(&self, index: usize) -> Option<&str> {
        self.parameters.get(index).map(String::as_str)
    }

    /// Overwrite one parameter in place.
    pub fn set_parameter(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        let len = self.parameters.len();
        match self.parameters.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(EventError::IndexOutOfRange { index, len }),
        }
    }
}

/// Ordered list of instructions, used for conditions, actions, and
/// sub-instructions alike.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstructionList {
    items: Vec<Instruction>,
}

impl InstructionList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Instruction> {
        self.items.get_mut(index)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.items.iter()
    }

    #[inline]
    pub fn push(&mut self, instruction: Instruction) {
        self.items.push(instruction);
    }

    /// Insert at `index`, appending when `index == len`.
    pub fn insert(&mut self, index: usize, instruction: Instruction) -> Result<()> {
        if index > self.items.len() {
            return Err(EventError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, instruction);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Instruction> {
        if index >= self.items.len() {
            return Err(EventError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EventError, Instruction, InstructionList, Result, tree::EventTree};

/// The closed set of event node variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Standard,
    Comment,
    Group,
    ForEach,
    Repeat,
    While,
    Link,
}

impl EventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Standard => "standard",
            EventKind::Comment => "comment",
            EventKind::Group => "group",
            EventKind::ForEach => "for_each",
            EventKind::Repeat => "repeat",
            EventKind::While => "while",
            EventKind::Link => "link",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "standard" => Some(EventKind::Standard),
            "comment" => Some(EventKind::Comment),
            "group" => Some(EventKind::Group),
            "for_each" => Some(EventKind::ForEach),
            "repeat" => Some(EventKind::Repeat),
            "while" => Some(EventKind::While),
            "link" => Some(EventKind::Link),
            _ => None,
        }
    }

    /// Comments and groups carry no condition/action lists.
    #[inline]
    pub const fn supports_instructions(self) -> bool {
        !matches!(self, EventKind::Comment | EventKind::Group)
    }

    /// Comments and links cannot nest sub-events.
    #[inline]
    pub const fn supports_sub_events(self) -> bool {
        !matches!(self, EventKind::Comment | EventKind::Link)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of an event tree. Owns its condition/action lists and its
/// nested sub-tree; node identity is positional, not a durable handle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventNode {
    pub kind: EventKind,

    #[serde(default)]
    pub disabled: bool,

    /// Collapsed-for-display flag; purely presentational.
    #[serde(default)]
    pub folded: bool,

    #[serde(default, skip_serializing_if = "InstructionList::is_empty")]
    pub conditions: InstructionList,

    #[serde(default, skip_serializing_if = "InstructionList::is_empty")]
    pub actions: InstructionList,

    #[serde(default, skip_serializing_if = "EventTree::is_empty")]
    pub sub_events: EventTree,
}

impl EventNode {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            disabled: false,
            folded: false,
            conditions: InstructionList::new(),
            actions: InstructionList::new(),
            sub_events: EventTree::new(),
        }
    }

    /// Build a Standard event pre-filled with literal conditions and
    /// actions, in the order given.
    pub fn standard(conditions: Vec<Instruction>, actions: Vec<Instruction>) -> Self {
        let mut node = Self::new(EventKind::Standard);
        for instruction in conditions {
            node.conditions.push(instruction);
        }
        for instruction in actions {
            node.actions.push(instruction);
        }
        node
    }

    /// Returns whether the flag actually changed.
    pub fn set_disabled(&mut self, disabled: bool) -> bool {
        let changed = self.disabled != disabled;
        self.disabled = disabled;
        changed
    }

    pub fn set_folded(&mut self, folded: bool) -> bool {
        let changed = self.folded != folded;
        self.folded = folded;
        changed
    }

    /// Append a condition, or insert at `index` when supplied.
    pub fn add_condition(&mut self, instruction: Instruction, index: Option<usize>) -> Result<()> {
        self.ensure_instructions()?;
        match index {
            Some(i) => self.conditions.insert(i, instruction),
            None => {
                self.conditions.push(instruction);
                Ok(())
            }
        }
    }

    pub fn add_action(&mut self, instruction: Instruction, index: Option<usize>) -> Result<()> {
        self.ensure_instructions()?;
        match index {
            Some(i) => self.actions.insert(i, instruction),
            None => {
                self.actions.push(instruction);
                Ok(())
            }
        }
    }

    fn ensure_instructions(&self) -> Result<()> {
        if self.kind.supports_instructions() {
            Ok(())
        } else {
            Err(EventError::Unsupported {
                kind: self.kind,
                what: "instructions",
            })
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::{EventError, EventKind, EventNode, Result};

/// A strict, finite forest of event nodes. Nested trees are addressed by
/// index paths from the root; any structural mutation invalidates paths
/// captured before it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventTree {
    events: Vec<EventNode>,
}

/// Plain snapshot of one node for callers that list a tree. Nested
/// summaries stop at the requested depth.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventSummary {
    pub kind: EventKind,
    pub disabled: bool,
    pub folded: bool,
    pub condition_count: usize,
    pub action_count: usize,
    pub sub_event_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_events: Option<Vec<EventSummary>>,
}

impl EventTree {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&EventNode> {
        self.events.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut EventNode> {
        self.events.get_mut(index)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &EventNode> {
        self.events.iter()
    }

    #[inline]
    pub fn push(&mut self, node: EventNode) {
        self.events.push(node);
    }

    /// Insert at `index`, appending when `index == len`.
    pub fn insert(&mut self, index: usize, node: EventNode) -> Result<()> {
        if index > self.events.len() {
            return Err(EventError::IndexOutOfRange {
                index,
                len: self.events.len(),
            });
        }
        self.events.insert(index, node);
        Ok(())
    }

    /// Remove the node at `index`. Its entire sub-tree goes with it; the
    /// children are not promoted.
    pub fn remove(&mut self, index: usize) -> Result<EventNode> {
        if index >= self.events.len() {
            return Err(EventError::IndexOutOfRange {
                index,
                len: self.events.len(),
            });
        }
        Ok(self.events.remove(index))
    }

    /// Resolve the node at an index path rooted at this tree. The path
    /// must contain at least one index; an empty path names no node.
    pub fn node_at_path(&self, path: &[usize]) -> Result<&EventNode> {
        let Some((&last, rest)) = path.split_last() else {
            return Err(EventError::EmptyPath);
        };
        let tree = self.descend(rest)?;
        tree.events.get(last).ok_or(EventError::IndexOutOfRange {
            index: last,
            len: tree.events.len(),
        })
    }

    pub fn node_at_path_mut(&mut self, path: &[usize]) -> Result<&mut EventNode> {
        let Some((&last, rest)) = path.split_last() else {
            return Err(EventError::EmptyPath);
        };
        let tree = self.descend_mut(rest)?;
        let len = tree.events.len();
        tree.events
            .get_mut(last)
            .ok_or(EventError::IndexOutOfRange { index: last, len })
    }

    /// Resolve the sub-tree at a path; an empty path is this tree itself.
    /// Descending through a variant that cannot nest sub-events fails.
    pub fn tree_at_path_mut(&mut self, path: &[usize]) -> Result<&mut EventTree> {
        self.descend_mut(path)
    }

    pub fn tree_at_path(&self, path: &[usize]) -> Result<&EventTree> {
        self.descend(path)
    }

    fn descend(&self, path: &[usize]) -> Result<&EventTree> {
        let mut tree = self;
        for &index in path {
            let node = tree.events.get(index).ok_or(EventError::IndexOutOfRange {
                index,
                len: tree.events.len(),
            })?;
            if !node.kind.supports_sub_events() {
                return Err(EventError::Unsupported {
                    kind: node.kind,
                    what: "sub-events",
                });
            }
            tree = &node.sub_events;
        }
        Ok(tree)
    }

    fn descend_mut(&mut self, path: &[usize]) -> Result<&mut EventTree> {
        let mut tree = self;
        for &index in path {
            let len = tree.events.len();
            let node = tree
                .events
                .get_mut(index)
                .ok_or(EventError::IndexOutOfRange { index, len })?;
            if !node.kind.supports_sub_events() {
                return Err(EventError::Unsupported {
                    kind: node.kind,
                    what: "sub-events",
                });
            }
            tree = &mut node.sub_events;
        }
        Ok(tree)
    }

    /// Summarize every node, descending at most `depth` levels into nested
    /// trees. At depth 0 only the nodes' own counts are reported, even for
    /// nodes whose sub-trees are non-empty.
    pub fn summarize(&self, depth: usize) -> Vec<EventSummary> {
        self.events
            .iter()
            .map(|node| {
                let sub_events = if depth == 0 {
                    None
                } else {
                    Some(node.sub_events.summarize(depth - 1))
                };
                EventSummary {
                    kind: node.kind,
                    disabled: node.disabled,
                    folded: node.folded,
                    condition_count: node.conditions.len(),
                    action_count: node.actions.len(),
                    sub_event_count: node.sub_events.len(),
                    sub_events,
                }
            })
            .collect()
    }
}

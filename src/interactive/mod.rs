//! Engines that hold live state between operations
//!
//! The BFS editor advances one transition per call. The tree structures
//! (B-Tree, heap, trie) run each operation to completion and return an
//! [`OperationLog`]: a list of frames, each a persistent snapshot of the
//! structure plus the nodes the operation touched at that moment.
//!
//! Tree nodes are shared through `Rc` and updated with `Rc::make_mut`, so a
//! frame keeps its snapshot alive while later edits copy only the path they
//! change. Highlights are keyed by [`NodeId`], which survives those copies.

pub mod bfs;
pub mod btree;
pub mod heap;
pub mod trie;

use crate::snapshot::{ArrayElement, Step};
use rustc_hash::FxHashMap;
use std::rc::Rc;
use thiserror::Error;

/// Identity of a tree node, stable across copy-on-write clones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// Transient role of a node within one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    Search,
    Insert,
    Split,
    Delete,
    Merge,
}

impl Highlight {
    fn apply(self, slot: &mut ArrayElement) {
        match self {
            Highlight::Search => slot.is_comparing = true,
            Highlight::Insert => slot.is_selected = true,
            Highlight::Split | Highlight::Merge => slot.is_pivot = true,
            Highlight::Delete => slot.is_swapping = true,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("key {0} is already in the tree")]
    DuplicateKey(i64),

    #[error("key {0} is not in the tree")]
    KeyNotFound(i64),

    #[error("the structure is empty")]
    Empty,

    #[error("minimum degree must be at least 2, got {0}")]
    InvalidDegree(usize),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("words must not be empty")]
    EmptyWord,

    #[error("'{0}' is already stored")]
    DuplicateWord(String),

    #[error("'{0}' is not stored")]
    WordNotFound(String),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

/// How a structure lays itself out for the player
pub trait TreeShape {
    /// Keys in display order, each with the node that holds it
    fn slots(&self) -> Vec<(NodeId, i64)>;

    /// Text drawing of the structure, one line per row
    fn outline(&self) -> Vec<String>;
}

impl<T: TreeShape> TreeShape for Rc<T> {
    fn slots(&self) -> Vec<(NodeId, i64)> {
        self.as_ref().slots()
    }

    fn outline(&self) -> Vec<String> {
        self.as_ref().outline()
    }
}

/// One moment of an animated operation
#[derive(Debug, Clone)]
pub struct Frame<S> {
    pub state: S,
    pub highlights: FxHashMap<NodeId, Highlight>,
    pub description: String,
    pub code_line: usize,
}

/// Frames recorded by a single operation, last frame free of highlights
#[derive(Debug, Clone)]
pub struct OperationLog<S> {
    frames: Vec<Frame<S>>,
}

impl<S> Default for OperationLog<S> {
    fn default() -> Self {
        OperationLog { frames: Vec::new() }
    }
}

impl<S> OperationLog<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        state: S,
        highlights: impl IntoIterator<Item = (NodeId, Highlight)>,
        description: impl Into<String>,
        code_line: usize,
    ) {
        self.frames.push(Frame {
            state,
            highlights: highlights.into_iter().collect(),
            description: description.into(),
            code_line,
        });
    }

    /// Frame with nothing highlighted
    pub fn note(&mut self, state: S, description: impl Into<String>, code_line: usize) {
        self.push(state, std::iter::empty::<(NodeId, Highlight)>(), description, code_line);
    }

    /// Close the log with the settled state
    pub fn finish(&mut self, state: S, description: impl Into<String>, code_line: usize) {
        self.note(state, description, code_line);
    }

    pub fn frames(&self) -> &[Frame<S>] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn last(&self) -> Option<&Frame<S>> {
        self.frames.last()
    }
}

impl<S: TreeShape> OperationLog<S> {
    /// Render every frame as a step for the trace player
    pub fn to_steps(&self) -> Vec<Step> {
        self.frames.iter().map(frame_step).collect()
    }
}

/// Render a frame: slots become the array, highlights become flags
pub fn frame_step<S: TreeShape>(frame: &Frame<S>) -> Step {
    let array = frame
        .state
        .slots()
        .into_iter()
        .enumerate()
        .map(|(k, (id, value))| {
            let mut slot = ArrayElement::new(value, k);
            if let Some(role) = frame.highlights.get(&id) {
                role.apply(&mut slot);
            }
            slot
        })
        .collect();
    Step::new(array, frame.description.clone(), frame.code_line)
        .with_info("tree", frame.state.outline().join("\n"))
        .with_info("highlighted", frame.highlights.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair([(NodeId, i64); 2]);

    impl TreeShape for Pair {
        fn slots(&self) -> Vec<(NodeId, i64)> {
            self.0.to_vec()
        }

        fn outline(&self) -> Vec<String> {
            vec![format!("{} {}", self.0[0].1, self.0[1].1)]
        }
    }

    #[test]
    fn highlights_follow_node_ids() {
        let mut ids = IdAllocator::default();
        let (a, b) = (ids.next_id(), ids.next_id());
        let mut log = OperationLog::new();
        log.push(Pair([(a, 1), (b, 2)]), [(b, Highlight::Delete)], "drop b", 3);
        log.finish(Pair([(a, 1), (b, 2)]), "done", 0);

        let steps = log.to_steps();
        assert_eq!(steps.len(), 2);
        assert!(steps[0].array[1].is_swapping);
        assert!(!steps[0].array[0].is_swapping);
        assert!(steps[1].array.iter().all(|e| !e.is_swapping));
        assert_eq!(steps[0].info["tree"].as_text(), Some("1 2"));
    }
}

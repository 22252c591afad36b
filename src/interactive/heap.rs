//! Array-backed binary heap with animated sift-up and sift-down
//!
//! Entries keep their [`NodeId`] while they move, so a highlight follows the
//! value being sifted rather than the slot.

use super::{Highlight, IdAllocator, NodeId, OperationLog, TreeError, TreeShape};

pub const PSEUDOCODE: &[&str] = &[
    "insert(x)",
    "  append x as the last leaf",
    "  while x beats its parent: swap them",
    "extract()",
    "  take the root; move the last leaf to the root",
    "  while a child beats the node: swap with the better child",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeapKind {
    #[default]
    Min,
    Max,
}

impl HeapKind {
    /// Whether `a` belongs above `b`
    fn before(self, a: i64, b: i64) -> bool {
        match self {
            HeapKind::Min => a < b,
            HeapKind::Max => a > b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapEntry {
    pub id: NodeId,
    pub value: i64,
}

impl TreeShape for Vec<HeapEntry> {
    fn slots(&self) -> Vec<(NodeId, i64)> {
        self.iter().map(|e| (e.id, e.value)).collect()
    }

    fn outline(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut start = 0;
        let mut width = 1;
        while start < self.len() {
            let end = (start + width).min(self.len());
            let row: Vec<String> = self[start..end].iter().map(|e| e.value.to_string()).collect();
            lines.push(row.join(" "));
            start = end;
            width *= 2;
        }
        lines
    }
}

pub type HeapLog = OperationLog<Vec<HeapEntry>>;

#[derive(Debug, Clone, Default)]
pub struct Heap {
    kind: HeapKind,
    items: Vec<HeapEntry>,
    ids: IdAllocator,
    history: Vec<Vec<HeapEntry>>,
}

impl Heap {
    pub fn new(kind: HeapKind) -> Self {
        Heap {
            kind,
            ..Heap::default()
        }
    }

    pub fn kind(&self) -> HeapKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn peek(&self) -> Option<i64> {
        self.items.first().map(|e| e.value)
    }

    pub fn values(&self) -> Vec<i64> {
        self.items.iter().map(|e| e.value).collect()
    }

    pub fn insert(&mut self, value: i64) -> HeapLog {
        let mut items = self.items.clone();
        let mut log = OperationLog::new();
        let entry = HeapEntry {
            id: self.ids.next_id(),
            value,
        };
        items.push(entry);
        log.push(items.clone(), [(entry.id, Highlight::Insert)], format!("Append {} as the last leaf", value), 1);

        let mut i = items.len() - 1;
        while i > 0 {
            let parent = (i - 1) / 2;
            let (child, up) = (items[i], items[parent]);
            log.push(
                items.clone(),
                [(child.id, Highlight::Search), (up.id, Highlight::Search)],
                format!("Compare {} with its parent {}", child.value, up.value),
                2,
            );
            if !self.kind.before(child.value, up.value) {
                break;
            }
            items.swap(i, parent);
            log.push(
                items.clone(),
                [(child.id, Highlight::Insert)],
                format!("Swap {} above {}", child.value, up.value),
                2,
            );
            i = parent;
        }

        log.finish(items.clone(), format!("Inserted {}", value), 0);
        self.history.push(std::mem::replace(&mut self.items, items));
        log
    }

    /// Remove the root, returning its value and the animation
    pub fn extract(&mut self) -> Result<(i64, HeapLog), TreeError> {
        let Some(&top) = self.items.first() else {
            tracing::warn!("extract from an empty heap");
            return Err(TreeError::Empty);
        };
        let mut items = self.items.clone();
        let mut log = OperationLog::new();
        log.push(items.clone(), [(top.id, Highlight::Delete)], format!("Take the root {}", top.value), 4);

        items.swap_remove(0);
        if items.is_empty() {
            log.finish(items.clone(), format!("Extracted {}", top.value), 3);
            self.history.push(std::mem::replace(&mut self.items, items));
            return Ok((top.value, log));
        }
        let moved = items[0];
        log.push(
            items.clone(),
            [(moved.id, Highlight::Insert)],
            format!("Move the last leaf {} to the root", moved.value),
            4,
        );

        let mut i = 0;
        loop {
            let (l, r) = (2 * i + 1, 2 * i + 2);
            if l >= items.len() {
                break;
            }
            let better = if r < items.len() && self.kind.before(items[r].value, items[l].value) {
                r
            } else {
                l
            };
            let (node, child) = (items[i], items[better]);
            log.push(
                items.clone(),
                [(node.id, Highlight::Search), (child.id, Highlight::Search)],
                format!("Compare {} with its better child {}", node.value, child.value),
                5,
            );
            if !self.kind.before(child.value, node.value) {
                break;
            }
            items.swap(i, better);
            log.push(
                items.clone(),
                [(node.id, Highlight::Insert)],
                format!("Swap {} below {}", node.value, child.value),
                5,
            );
            i = better;
        }

        log.finish(items.clone(), format!("Extracted {}", top.value), 3);
        self.history.push(std::mem::replace(&mut self.items, items));
        Ok((top.value, log))
    }

    pub fn undo(&mut self) -> Result<(), TreeError> {
        self.items = self.history.pop().ok_or(TreeError::NothingToUndo)?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.history.clear();
    }

    pub fn snapshot(&self) -> HeapLog {
        let mut log = OperationLog::new();
        let label = match self.kind {
            HeapKind::Min => "Min-heap",
            HeapKind::Max => "Max-heap",
        };
        log.finish(self.items.clone(), format!("{} of {} values", label, self.items.len()), 0);
        log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn heap_of(kind: HeapKind, values: &[i64]) -> Heap {
        let mut heap = Heap::new(kind);
        for &v in values {
            heap.insert(v);
        }
        heap
    }

    #[test]
    fn insert_sifts_to_the_root() {
        let mut heap = heap_of(HeapKind::Min, &[5, 8, 9]);
        let log = heap.insert(1);
        assert_eq!(heap.peek(), Some(1));
        assert_eq!(log.frames().iter().filter(|f| f.description.starts_with("Swap")).count(), 2);
        assert!(log.last().unwrap().highlights.is_empty());
    }

    #[test]
    fn max_heap_extracts_descending() {
        let mut heap = heap_of(HeapKind::Max, &[3, 9, 1, 7, 7, 2]);
        let mut out = Vec::new();
        while let Ok((v, _)) = heap.extract() {
            out.push(v);
        }
        assert_eq!(out, vec![9, 7, 7, 3, 2, 1]);
        assert_eq!(heap.extract().unwrap_err(), TreeError::Empty);
    }

    #[test]
    fn highlight_follows_the_moving_value() {
        let mut heap = heap_of(HeapKind::Min, &[2, 4, 6]);
        let log = heap.insert(1);
        let inserted = log.frames()[0].highlights.keys().next().copied().unwrap();
        let swap = log
            .frames()
            .iter()
            .find(|f| f.description.starts_with("Swap"))
            .unwrap();
        let pos = swap.state.iter().position(|e| e.id == inserted).unwrap();
        assert_eq!(swap.state[pos].value, 1);
        assert_eq!(swap.highlights.get(&inserted), Some(&Highlight::Insert));
    }

    #[test]
    fn undo_and_reset() {
        let mut heap = heap_of(HeapKind::Min, &[4, 2]);
        heap.extract().unwrap();
        assert_eq!(heap.values(), vec![4]);
        heap.undo().unwrap();
        assert_eq!(heap.peek(), Some(2));
        heap.reset();
        assert!(heap.is_empty());
        assert_eq!(heap.undo(), Err(TreeError::NothingToUndo));
    }

    proptest! {
        #[test]
        fn extraction_order_is_sorted(values in proptest::collection::vec(-50i64..50, 0..40)) {
            let mut heap = heap_of(HeapKind::Min, &values);
            let mut out = Vec::new();
            while let Ok((v, _)) = heap.extract() {
                out.push(v);
            }
            let mut expected = values.clone();
            expected.sort_unstable();
            prop_assert_eq!(out, expected);
        }
    }
}

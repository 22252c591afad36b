//! B-Tree of minimum degree `t` with animated insert, search and delete
//!
//! Insert splits full nodes on the way down, so the leaf that receives the key
//! always has room. Delete makes sure every node it descends into has at least
//! `t` keys, borrowing from a sibling or merging when it does not.

use super::{Highlight, IdAllocator, NodeId, OperationLog, TreeError, TreeShape};
use crate::config::DEFAULT_BTREE_DEGREE;
use std::collections::VecDeque;
use std::rc::Rc;

pub const PSEUDOCODE: &[&str] = &[
    "insert(k)",
    "  if the root is full",
    "    split it under a new root",
    "  node = root",
    "  while node is internal: pick the child for k",
    "    if that child is full: split it before descending",
    "  insert k into the leaf in order",
    "delete(k)",
    "  if k is in a leaf: remove it",
    "  if k is in an internal node: use predecessor, successor or merge",
    "  before entering a child with t - 1 keys: borrow from a sibling or merge",
    "  if the root is left empty, its only child becomes the root",
    "search(k)",
    "  compare k with the node's keys and descend",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BNode {
    pub id: NodeId,
    pub keys: Vec<i64>,
    pub children: Vec<Rc<BNode>>,
}

impl BNode {
    fn leaf(id: NodeId) -> Self {
        BNode {
            id,
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn collect_keys(&self, out: &mut Vec<(NodeId, i64)>) {
        for (k, &key) in self.keys.iter().enumerate() {
            if let Some(child) = self.children.get(k) {
                child.collect_keys(out);
            }
            out.push((self.id, key));
        }
        if let Some(last) = self.children.get(self.keys.len()) {
            last.collect_keys(out);
        }
    }
}

impl TreeShape for BNode {
    fn slots(&self) -> Vec<(NodeId, i64)> {
        let mut out = Vec::new();
        self.collect_keys(&mut out);
        out
    }

    fn outline(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut level: Vec<&BNode> = vec![self];
        while !level.is_empty() {
            let row: Vec<String> = level
                .iter()
                .map(|n| {
                    let keys: Vec<String> = n.keys.iter().map(|k| k.to_string()).collect();
                    format!("[{}]", keys.join(" "))
                })
                .collect();
            lines.push(row.join(" "));
            level = level.iter().flat_map(|n| n.children.iter().map(Rc::as_ref)).collect();
        }
        lines
    }
}

fn node_at<'a>(root: &'a Rc<BNode>, path: &[usize]) -> &'a BNode {
    let mut node: &BNode = root;
    for &i in path {
        node = &node.children[i];
    }
    node
}

/// Mutable access along `path`, copying every shared node on the way
fn node_mut<'a>(root: &'a mut Rc<BNode>, path: &[usize]) -> &'a mut BNode {
    let mut node = Rc::make_mut(root);
    for &i in path {
        node = Rc::make_mut(&mut node.children[i]);
    }
    node
}

/// Split the full child at `index`, moving its median into `parent`.
/// Returns the ids of the two halves.
fn split_child(parent: &mut BNode, index: usize, t: usize, right_id: NodeId) -> (NodeId, NodeId) {
    let child = Rc::make_mut(&mut parent.children[index]);
    let mut upper = child.keys.split_off(t - 1);
    let median = upper.remove(0);
    let right_children = if child.is_leaf() {
        Vec::new()
    } else {
        child.children.split_off(t)
    };
    let left_id = child.id;
    parent.keys.insert(index, median);
    parent.children.insert(
        index + 1,
        Rc::new(BNode {
            id: right_id,
            keys: upper,
            children: right_children,
        }),
    );
    (left_id, right_id)
}

/// Fold child `index + 1` and the separator into child `index`
fn merge_children(parent: &mut BNode, index: usize) -> NodeId {
    let right = parent.children.remove(index + 1);
    let separator = parent.keys.remove(index);
    let left = Rc::make_mut(&mut parent.children[index]);
    left.keys.push(separator);
    left.keys.extend(right.keys.iter().copied());
    left.children.extend(right.children.iter().cloned());
    left.id
}

fn describe(keys: &[i64]) -> String {
    let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    format!("[{}]", keys.join(", "))
}

pub type BTreeLog = OperationLog<Rc<BNode>>;

#[derive(Debug, Clone)]
pub struct BTree {
    degree: usize,
    root: Rc<BNode>,
    ids: IdAllocator,
    history: Vec<Rc<BNode>>,
}

impl Default for BTree {
    fn default() -> Self {
        let mut ids = IdAllocator::default();
        let root = Rc::new(BNode::leaf(ids.next_id()));
        BTree {
            degree: DEFAULT_BTREE_DEGREE,
            root,
            ids,
            history: Vec::new(),
        }
    }
}

impl BTree {
    pub fn new(degree: usize) -> Result<Self, TreeError> {
        if degree < 2 {
            return Err(TreeError::InvalidDegree(degree));
        }
        Ok(BTree {
            degree,
            ..BTree::default()
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn root(&self) -> &Rc<BNode> {
        &self.root
    }

    fn max_keys(&self) -> usize {
        2 * self.degree - 1
    }

    pub fn is_empty(&self) -> bool {
        self.root.keys.is_empty()
    }

    pub fn contains(&self, key: i64) -> bool {
        let mut node: &BNode = &self.root;
        loop {
            let i = node.keys.partition_point(|&k| k < key);
            if node.keys.get(i) == Some(&key) {
                return true;
            }
            match node.children.get(i) {
                Some(child) => node = child,
                None => return false,
            }
        }
    }

    pub fn keys_in_order(&self) -> Vec<i64> {
        self.root.slots().into_iter().map(|(_, k)| k).collect()
    }

    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node: &BNode = &self.root;
        while let Some(child) = node.children.first() {
            node = child;
            height += 1;
        }
        height
    }

    /// Walk from the root towards `key`, one frame per node visited
    pub fn search(&self, key: i64) -> (bool, BTreeLog) {
        let mut log = OperationLog::new();
        let mut node: &BNode = &self.root;
        loop {
            log.push(
                Rc::clone(&self.root),
                [(node.id, Highlight::Search)],
                format!("Search {} in {}", key, describe(&node.keys)),
                13,
            );
            let i = node.keys.partition_point(|&k| k < key);
            if node.keys.get(i) == Some(&key) {
                log.push(
                    Rc::clone(&self.root),
                    [(node.id, Highlight::Insert)],
                    format!("Found {}", key),
                    13,
                );
                log.finish(Rc::clone(&self.root), format!("{} is in the tree", key), 12);
                return (true, log);
            }
            match node.children.get(i) {
                Some(child) => node = child,
                None => {
                    log.finish(Rc::clone(&self.root), format!("{} is not in the tree", key), 12);
                    return (false, log);
                }
            }
        }
    }

    pub fn insert(&mut self, key: i64) -> Result<BTreeLog, TreeError> {
        if self.contains(key) {
            tracing::warn!(key, "duplicate B-Tree key rejected");
            return Err(TreeError::DuplicateKey(key));
        }
        let t = self.degree;
        let max = self.max_keys();
        let mut root = Rc::clone(&self.root);
        let mut log = OperationLog::new();
        log.note(Rc::clone(&root), format!("Insert {}", key), 0);

        if root.keys.len() == max {
            let new_root = BNode {
                id: self.ids.next_id(),
                keys: Vec::new(),
                children: vec![root],
            };
            root = Rc::new(new_root);
            let right_id = self.ids.next_id();
            let top = Rc::make_mut(&mut root);
            let (left, right) = split_child(top, 0, t, right_id);
            let top_id = top.id;
            log.push(
                Rc::clone(&root),
                [(top_id, Highlight::Split), (left, Highlight::Split), (right, Highlight::Split)],
                "The root is full: split it and grow a new root",
                2,
            );
        }

        let mut path = Vec::new();
        loop {
            let (id, keys, leaf) = {
                let node = node_at(&root, &path);
                (node.id, node.keys.clone(), node.is_leaf())
            };
            let mut i = keys.partition_point(|&k| k < key);
            if leaf {
                node_mut(&mut root, &path).keys.insert(i, key);
                log.push(
                    Rc::clone(&root),
                    [(id, Highlight::Insert)],
                    format!("Insert {} into leaf {}", key, describe(&keys)),
                    6,
                );
                break;
            }

            log.push(
                Rc::clone(&root),
                [(id, Highlight::Search)],
                format!("At {}: {} belongs in child {}", describe(&keys), key, i),
                4,
            );
            let child_full = node_at(&root, &path).children[i].keys.len() == max;
            if child_full {
                let right_id = self.ids.next_id();
                let parent = node_mut(&mut root, &path);
                let (left, right) = split_child(parent, i, t, right_id);
                let median = parent.keys[i];
                log.push(
                    Rc::clone(&root),
                    [(id, Highlight::Split), (left, Highlight::Split), (right, Highlight::Split)],
                    format!("Child is full: split it, {} moves up", median),
                    5,
                );
                if key > median {
                    i += 1;
                }
            }
            path.push(i);
        }

        log.finish(Rc::clone(&root), format!("Inserted {}", key), 0);
        self.history.push(std::mem::replace(&mut self.root, root));
        tracing::debug!(key, frames = log.len(), "B-Tree insert");
        Ok(log)
    }

    pub fn delete(&mut self, key: i64) -> Result<BTreeLog, TreeError> {
        if !self.contains(key) {
            tracing::warn!(key, "B-Tree delete of a missing key");
            return Err(TreeError::KeyNotFound(key));
        }
        let t = self.degree;
        let mut root = Rc::clone(&self.root);
        let mut log = OperationLog::new();
        log.note(Rc::clone(&root), format!("Delete {}", key), 7);

        let mut target = key;
        let mut path: Vec<usize> = Vec::new();
        loop {
            let (id, keys, leaf) = {
                let node = node_at(&root, &path);
                (node.id, node.keys.clone(), node.is_leaf())
            };
            let idx = keys.partition_point(|&k| k < target);
            let found = keys.get(idx) == Some(&target);
            log.push(
                Rc::clone(&root),
                [(id, Highlight::Search)],
                format!("Look for {} in {}", target, describe(&keys)),
                7,
            );

            if leaf {
                if found {
                    node_mut(&mut root, &path).keys.remove(idx);
                    log.push(
                        Rc::clone(&root),
                        [(id, Highlight::Delete)],
                        format!("Remove {} from leaf", target),
                        8,
                    );
                }
                break;
            }

            if found {
                let (left_len, right_len) = {
                    let node = node_at(&root, &path);
                    (node.children[idx].keys.len(), node.children[idx + 1].keys.len())
                };
                if left_len >= t {
                    let pred = extreme(&node_at(&root, &path).children[idx], true);
                    node_mut(&mut root, &path).keys[idx] = pred;
                    log.push(
                        Rc::clone(&root),
                        [(id, Highlight::Delete)],
                        format!("Replace {} with its predecessor {}", target, pred),
                        9,
                    );
                    target = pred;
                    path.push(idx);
                } else if right_len >= t {
                    let succ = extreme(&node_at(&root, &path).children[idx + 1], false);
                    node_mut(&mut root, &path).keys[idx] = succ;
                    log.push(
                        Rc::clone(&root),
                        [(id, Highlight::Delete)],
                        format!("Replace {} with its successor {}", target, succ),
                        9,
                    );
                    target = succ;
                    path.push(idx + 1);
                } else {
                    let merged = merge_children(node_mut(&mut root, &path), idx);
                    log.push(
                        Rc::clone(&root),
                        [(merged, Highlight::Merge)],
                        format!("Both children are minimal: merge them around {}", target),
                        9,
                    );
                    if !shrink_root(&mut root, &path, &mut log) {
                        path.push(idx);
                    }
                }
                continue;
            }

            let child_len = node_at(&root, &path).children[idx].keys.len();
            let mut next = idx;
            if child_len < t {
                let (left_len, right_len) = {
                    let node = node_at(&root, &path);
                    let left = idx.checked_sub(1).map(|l| node.children[l].keys.len());
                    let right = node.children.get(idx + 1).map(|c| c.keys.len());
                    (left.unwrap_or(0), right.unwrap_or(0))
                };
                if left_len >= t {
                    let child_id = borrow_from_left(node_mut(&mut root, &path), idx);
                    log.push(
                        Rc::clone(&root),
                        [(child_id, Highlight::Insert), (id, Highlight::Search)],
                        "Child is minimal: rotate a key in from the left sibling",
                        10,
                    );
                } else if right_len >= t {
                    let child_id = borrow_from_right(node_mut(&mut root, &path), idx);
                    log.push(
                        Rc::clone(&root),
                        [(child_id, Highlight::Insert), (id, Highlight::Search)],
                        "Child is minimal: rotate a key in from the right sibling",
                        10,
                    );
                } else {
                    let at = if idx < keys.len() { idx } else { idx - 1 };
                    let merged = merge_children(node_mut(&mut root, &path), at);
                    log.push(
                        Rc::clone(&root),
                        [(merged, Highlight::Merge)],
                        "Child and sibling are minimal: merge them",
                        10,
                    );
                    next = at;
                    if shrink_root(&mut root, &path, &mut log) {
                        continue;
                    }
                }
            }
            path.push(next);
        }

        log.finish(Rc::clone(&root), format!("Deleted {}", key), 7);
        self.history.push(std::mem::replace(&mut self.root, root));
        tracing::debug!(key, frames = log.len(), "B-Tree delete");
        Ok(log)
    }

    pub fn undo(&mut self) -> Result<(), TreeError> {
        let previous = self.history.pop().ok_or(TreeError::NothingToUndo)?;
        self.root = previous;
        Ok(())
    }

    /// Empty the tree and forget its history
    pub fn reset(&mut self) {
        self.root = Rc::new(BNode::leaf(self.ids.next_id()));
        self.history.clear();
    }

    /// Check occupancy, child counts, leaf depth and key order
    pub fn validate(&self) -> Result<(), TreeError> {
        let mut leaf_depth = None;
        self.check(&self.root, 0, true, &mut leaf_depth)?;
        let keys = self.keys_in_order();
        if keys.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TreeError::Invariant(format!("keys out of order: {:?}", keys)));
        }
        Ok(())
    }

    fn check(&self, node: &BNode, depth: usize, is_root: bool, leaf_depth: &mut Option<usize>) -> Result<(), TreeError> {
        let n = node.keys.len();
        if n > self.max_keys() || (!is_root && n < self.degree - 1) {
            return Err(TreeError::Invariant(format!(
                "node {} holds {} keys, allowed {}..={}",
                describe(&node.keys),
                n,
                self.degree - 1,
                self.max_keys()
            )));
        }
        if node.is_leaf() {
            match *leaf_depth {
                Some(d) if d != depth => {
                    return Err(TreeError::Invariant(format!("leaves at depths {} and {}", d, depth)));
                }
                _ => *leaf_depth = Some(depth),
            }
            return Ok(());
        }
        if node.children.len() != n + 1 {
            return Err(TreeError::Invariant(format!(
                "node {} has {} children",
                describe(&node.keys),
                node.children.len()
            )));
        }
        for child in &node.children {
            self.check(child, depth + 1, false, leaf_depth)?;
        }
        Ok(())
    }

    /// Frames drawing the current tree, for a player that starts from here
    pub fn snapshot(&self) -> BTreeLog {
        let mut log = OperationLog::new();
        log.finish(Rc::clone(&self.root), format!("B-Tree of minimum degree {}", self.degree), 0);
        log
    }
}

/// Replace an empty internal root by its only child
fn shrink_root(root: &mut Rc<BNode>, path: &[usize], log: &mut BTreeLog) -> bool {
    if !path.is_empty() || !root.keys.is_empty() || root.is_leaf() {
        return false;
    }
    let child = Rc::clone(&root.children[0]);
    *root = child;
    log.push(
        Rc::clone(root),
        [(root.id, Highlight::Merge)],
        "The root is empty: its child becomes the new root",
        11,
    );
    true
}

/// Largest (`max`) or smallest key in a subtree
fn extreme(node: &BNode, max: bool) -> i64 {
    let mut node = node;
    loop {
        let next = if max { node.children.last() } else { node.children.first() };
        match next {
            Some(child) => node = child,
            None => break,
        }
    }
    let key = if max { node.keys.last() } else { node.keys.first() };
    key.copied().unwrap_or_default()
}

fn borrow_from_left(parent: &mut BNode, idx: usize) -> NodeId {
    let separator = parent.keys[idx - 1];
    let sibling = Rc::make_mut(&mut parent.children[idx - 1]);
    let moved_key = sibling.keys.pop();
    let moved_child = sibling.children.pop();
    if let Some(k) = moved_key {
        parent.keys[idx - 1] = k;
    }
    let child = Rc::make_mut(&mut parent.children[idx]);
    child.keys.insert(0, separator);
    if let Some(c) = moved_child {
        child.children.insert(0, c);
    }
    child.id
}

fn borrow_from_right(parent: &mut BNode, idx: usize) -> NodeId {
    let separator = parent.keys[idx];
    let sibling = Rc::make_mut(&mut parent.children[idx + 1]);
    let moved_key = sibling.keys.remove(0);
    let moved_child = (!sibling.is_leaf()).then(|| sibling.children.remove(0));
    parent.keys[idx] = moved_key;
    let child = Rc::make_mut(&mut parent.children[idx]);
    child.keys.push(separator);
    if let Some(c) = moved_child {
        child.children.push(c);
    }
    child.id
}

/// Build a tree by inserting `keys` in order, skipping duplicates
pub fn from_keys(degree: usize, keys: &[i64]) -> Result<BTree, TreeError> {
    let mut tree = BTree::new(degree)?;
    for &k in keys {
        match tree.insert(k) {
            Ok(_) | Err(TreeError::DuplicateKey(_)) => {}
            Err(err) => return Err(err),
        }
    }
    Ok(tree)
}

/// Level-order node ids, mostly useful for inspecting splits
pub fn level_order_ids(root: &BNode) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut queue: VecDeque<&BNode> = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        out.push(node.id);
        queue.extend(node.children.iter().map(Rc::as_ref));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_small_degree() {
        assert_eq!(BTree::new(1).unwrap_err(), TreeError::InvalidDegree(1));
    }

    #[test]
    fn root_split_grows_the_tree() {
        let mut tree = from_keys(2, &[10, 20, 30]).unwrap();
        assert_eq!(tree.height(), 1);
        let log = tree.insert(40).unwrap();
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.root().keys, vec![20]);
        assert!(log.frames().iter().any(|f| f.code_line == 2));
        assert!(log.last().unwrap().highlights.is_empty());
        tree.validate().unwrap();
    }

    #[test]
    fn duplicate_insert_leaves_tree_unchanged() {
        let mut tree = from_keys(2, &[5, 1, 9]).unwrap();
        let before = Rc::clone(tree.root());
        assert_eq!(tree.insert(9).unwrap_err(), TreeError::DuplicateKey(9));
        assert!(Rc::ptr_eq(&before, tree.root()));
    }

    #[test]
    fn frames_are_persistent_snapshots() {
        let mut tree = from_keys(2, &[1, 2, 3, 4, 5]).unwrap();
        let log = tree.insert(6).unwrap();
        let first = log.frames()[0].state.slots().len();
        let last = log.last().unwrap().state.slots().len();
        assert_eq!(first, 5);
        assert_eq!(last, 6);
    }

    #[test]
    fn search_walks_to_the_key() {
        let tree = from_keys(2, &(1..=20).collect::<Vec<_>>()).unwrap();
        let (found, log) = tree.search(17);
        assert!(found);
        assert!(log.len() >= 3);
        assert!(log.last().unwrap().highlights.is_empty());
        let (found, _) = tree.search(42);
        assert!(!found);
    }

    #[test]
    fn delete_covers_borrow_and_merge() {
        let mut tree = from_keys(2, &(1..=20).collect::<Vec<_>>()).unwrap();
        for k in [1, 20, 10, 11, 5, 6, 7, 15, 2, 3] {
            let log = tree.delete(k).unwrap();
            assert!(!log.is_empty());
            tree.validate().unwrap();
            assert!(!tree.contains(k));
        }
        assert_eq!(tree.keys_in_order(), vec![4, 8, 9, 12, 13, 14, 16, 17, 18, 19]);
    }

    #[test]
    fn delete_everything_leaves_an_empty_leaf() {
        let mut tree = from_keys(3, &[8, 3, 5, 1, 9, 4, 7, 2, 6]).unwrap();
        for k in 1..=9 {
            tree.delete(k).unwrap();
            tree.validate().unwrap();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.delete(3).unwrap_err(), TreeError::KeyNotFound(3));
    }

    #[test]
    fn undo_restores_previous_root() {
        let mut tree = from_keys(2, &[1, 2, 3]).unwrap();
        tree.insert(4).unwrap();
        tree.undo().unwrap();
        assert_eq!(tree.keys_in_order(), vec![1, 2, 3]);
        tree.reset();
        assert!(tree.is_empty());
        assert_eq!(tree.undo(), Err(TreeError::NothingToUndo));
    }

    #[test]
    fn split_keeps_node_identity() {
        let mut tree = from_keys(2, &[1, 2, 3]).unwrap();
        let old_root = tree.root().id;
        tree.insert(4).unwrap();
        let ids = level_order_ids(tree.root());
        assert_eq!(ids[1], old_root);
    }

    proptest! {
        #[test]
        fn invariants_hold_under_mixed_operations(
            degree in 2usize..5,
            keys in proptest::collection::vec(0i64..200, 0..60),
            removals in proptest::collection::vec(0i64..200, 0..40),
        ) {
            let mut tree = from_keys(degree, &keys).unwrap();
            prop_assert!(tree.validate().is_ok());
            for k in removals {
                let present = tree.contains(k);
                prop_assert_eq!(tree.delete(k).is_ok(), present);
                prop_assert!(tree.validate().is_ok());
            }
            let mut expected: Vec<i64> = keys.clone();
            expected.sort_unstable();
            expected.dedup();
            let remaining = tree.keys_in_order();
            prop_assert!(remaining.iter().all(|k| expected.contains(k)));
        }
    }
}

//! Prefix tree with animated insert, search and delete
//!
//! Delete clears the terminal mark and then prunes the branch bottom-up while
//! nodes are childless and not the end of another word.

use super::{Highlight, IdAllocator, NodeId, OperationLog, TreeError, TreeShape};
use std::collections::BTreeMap;
use std::rc::Rc;

pub const PSEUDOCODE: &[&str] = &[
    "insert(w)",
    "  for each char c of w: follow or create child c",
    "  mark the last node as a word end",
    "search(w)",
    "  follow each char; fail on a missing child",
    "delete(w)",
    "  unmark the word end",
    "  prune childless, unmarked nodes bottom-up",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieNode {
    pub id: NodeId,
    pub terminal: bool,
    pub children: BTreeMap<char, Rc<TrieNode>>,
}

impl TrieNode {
    fn new(id: NodeId) -> Self {
        TrieNode {
            id,
            terminal: false,
            children: BTreeMap::new(),
        }
    }

    fn walk(&self, prefix: &mut String, out: &mut Vec<String>) {
        if self.terminal {
            out.push(prefix.clone());
        }
        for (&c, child) in &self.children {
            prefix.push(c);
            child.walk(prefix, out);
            prefix.pop();
        }
    }

    fn collect_slots(&self, out: &mut Vec<(NodeId, i64)>) {
        for (&c, child) in &self.children {
            out.push((child.id, i64::from(u32::from(c))));
            child.collect_slots(out);
        }
    }

    fn draw(&self, depth: usize, lines: &mut Vec<String>) {
        for (&c, child) in &self.children {
            let mark = if child.terminal { "*" } else { "" };
            lines.push(format!("{}{}{}", "  ".repeat(depth), c, mark));
            child.draw(depth + 1, lines);
        }
    }
}

impl TreeShape for TrieNode {
    /// Every node below the root in preorder, valued by its character
    fn slots(&self) -> Vec<(NodeId, i64)> {
        let mut out = Vec::new();
        self.collect_slots(&mut out);
        out
    }

    fn outline(&self) -> Vec<String> {
        let mut lines = vec!["(root)".to_string()];
        self.draw(1, &mut lines);
        lines
    }
}

fn node_at<'a>(root: &'a Rc<TrieNode>, path: &[char]) -> Option<&'a TrieNode> {
    let mut node: &TrieNode = root;
    for c in path {
        node = node.children.get(c)?;
    }
    Some(node)
}

/// Mutable access along `path`; every node on it must exist
fn node_mut<'a>(root: &'a mut Rc<TrieNode>, path: &[char]) -> Option<&'a mut TrieNode> {
    let mut node = Rc::make_mut(root);
    for c in path {
        node = Rc::make_mut(node.children.get_mut(c)?);
    }
    Some(node)
}

pub type TrieLog = OperationLog<Rc<TrieNode>>;

#[derive(Debug, Clone)]
pub struct Trie {
    root: Rc<TrieNode>,
    ids: IdAllocator,
    history: Vec<Rc<TrieNode>>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        let mut ids = IdAllocator::default();
        Trie {
            root: Rc::new(TrieNode::new(ids.next_id())),
            ids,
            history: Vec::new(),
        }
    }

    pub fn root(&self) -> &Rc<TrieNode> {
        &self.root
    }

    pub fn contains(&self, word: &str) -> bool {
        let path: Vec<char> = word.chars().collect();
        node_at(&self.root, &path).is_some_and(|n| n.terminal)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        let path: Vec<char> = prefix.chars().collect();
        node_at(&self.root, &path).is_some()
    }

    /// Stored words in lexicographic order
    pub fn words(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.root.walk(&mut String::new(), &mut out);
        out
    }

    /// Nodes below the root
    pub fn node_count(&self) -> usize {
        self.root.slots().len()
    }

    pub fn insert(&mut self, word: &str) -> Result<TrieLog, TreeError> {
        if word.is_empty() {
            return Err(TreeError::EmptyWord);
        }
        if self.contains(word) {
            tracing::warn!(word, "duplicate trie word rejected");
            return Err(TreeError::DuplicateWord(word.to_string()));
        }

        let mut root = Rc::clone(&self.root);
        let mut log = OperationLog::new();
        log.note(Rc::clone(&root), format!("Insert \"{}\"", word), 0);

        let mut path: Vec<char> = Vec::new();
        for c in word.chars() {
            let existing = node_at(&root, &path)
                .and_then(|n| n.children.get(&c))
                .map(|child| child.id);
            let (id, description) = match existing {
                Some(id) => (id, format!("Follow '{}'", c)),
                None => {
                    let id = self.ids.next_id();
                    if let Some(node) = node_mut(&mut root, &path) {
                        node.children.insert(c, Rc::new(TrieNode::new(id)));
                    }
                    (id, format!("Create a node for '{}'", c))
                }
            };
            let role = if existing.is_some() { Highlight::Search } else { Highlight::Insert };
            path.push(c);
            log.push(Rc::clone(&root), [(id, role)], description, 1);
        }

        if let Some(node) = node_mut(&mut root, &path) {
            node.terminal = true;
            let id = node.id;
            log.push(Rc::clone(&root), [(id, Highlight::Insert)], format!("Mark the end of \"{}\"", word), 2);
        }
        log.finish(Rc::clone(&root), format!("Inserted \"{}\"", word), 0);
        self.history.push(std::mem::replace(&mut self.root, root));
        Ok(log)
    }

    /// Follow `word` from the root, one frame per character
    pub fn search(&self, word: &str) -> (bool, TrieLog) {
        let mut log = OperationLog::new();
        let mut node: &TrieNode = &self.root;
        for c in word.chars() {
            match node.children.get(&c) {
                Some(child) => {
                    log.push(Rc::clone(&self.root), [(child.id, Highlight::Search)], format!("Follow '{}'", c), 4);
                    node = child;
                }
                None => {
                    log.push(Rc::clone(&self.root), [(node.id, Highlight::Delete)], format!("No child for '{}'", c), 4);
                    log.finish(Rc::clone(&self.root), format!("\"{}\" is not stored", word), 3);
                    return (false, log);
                }
            }
        }
        let found = node.terminal && !word.is_empty();
        let verdict = if found {
            format!("\"{}\" is stored", word)
        } else {
            format!("\"{}\" is only a prefix", word)
        };
        log.finish(Rc::clone(&self.root), verdict, 3);
        (found, log)
    }

    pub fn delete(&mut self, word: &str) -> Result<TrieLog, TreeError> {
        if !self.contains(word) {
            tracing::warn!(word, "trie delete of a missing word");
            return Err(TreeError::WordNotFound(word.to_string()));
        }
        let mut root = Rc::clone(&self.root);
        let mut log = OperationLog::new();
        log.note(Rc::clone(&root), format!("Delete \"{}\"", word), 5);

        let mut path: Vec<char> = word.chars().collect();
        for depth in 1..=path.len() {
            if let Some(node) = node_at(&root, &path[..depth]) {
                log.push(Rc::clone(&root), [(node.id, Highlight::Search)], format!("Follow '{}'", path[depth - 1]), 5);
            }
        }

        if let Some(node) = node_mut(&mut root, &path) {
            node.terminal = false;
            let id = node.id;
            log.push(Rc::clone(&root), [(id, Highlight::Delete)], format!("Unmark the end of \"{}\"", word), 6);
        }

        while let Some(c) = path.last().copied() {
            let prunable = node_at(&root, &path).map(|n| (n.id, !n.terminal && n.children.is_empty()));
            let Some((id, true)) = prunable else { break };
            log.push(Rc::clone(&root), [(id, Highlight::Delete)], format!("Prune '{}'", c), 7);
            path.pop();
            if let Some(parent) = node_mut(&mut root, &path) {
                parent.children.remove(&c);
            }
        }

        log.finish(Rc::clone(&root), format!("Deleted \"{}\"", word), 5);
        self.history.push(std::mem::replace(&mut self.root, root));
        Ok(log)
    }

    pub fn undo(&mut self) -> Result<(), TreeError> {
        self.root = self.history.pop().ok_or(TreeError::NothingToUndo)?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.root = Rc::new(TrieNode::new(self.ids.next_id()));
        self.history.clear();
    }

    pub fn snapshot(&self) -> TrieLog {
        let mut log = OperationLog::new();
        log.finish(Rc::clone(&self.root), format!("Trie of {} words", self.words().len()), 0);
        log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie_of(words: &[&str]) -> Trie {
        let mut trie = Trie::new();
        for w in words {
            trie.insert(w).unwrap();
        }
        trie
    }

    #[test]
    fn shares_prefixes() {
        let trie = trie_of(&["car", "cart", "care", "dog"]);
        // c a r t e d o g
        assert_eq!(trie.node_count(), 8);
        assert_eq!(trie.words(), vec!["car", "care", "cart", "dog"]);
        assert!(trie.starts_with("ca"));
        assert!(!trie.contains("ca"));
    }

    #[test]
    fn search_distinguishes_prefix_from_word() {
        let trie = trie_of(&["tea", "ten"]);
        assert!(trie.search("ten").0);
        let (found, log) = trie.search("te");
        assert!(!found);
        assert_eq!(log.last().unwrap().description, "\"te\" is only a prefix");
        assert!(!trie.search("tx").0);
    }

    #[test]
    fn delete_keeps_sibling_words() {
        let mut trie = trie_of(&["car", "cart", "cat"]);
        trie.delete("cart").unwrap();
        assert_eq!(trie.words(), vec!["car", "cat"]);
        // only the 't' after "car" is pruned
        assert_eq!(trie.node_count(), 4);

        trie.delete("car").unwrap();
        assert_eq!(trie.words(), vec!["cat"]);
        assert_eq!(trie.node_count(), 3);
    }

    #[test]
    fn delete_of_a_prefix_word_prunes_nothing() {
        let mut trie = trie_of(&["in", "inn"]);
        let log = trie.delete("in").unwrap();
        assert!(!log.frames().iter().any(|f| f.description.starts_with("Prune")));
        assert_eq!(trie.words(), vec!["inn"]);
    }

    #[test]
    fn errors_leave_the_trie_unchanged() {
        let mut trie = trie_of(&["a"]);
        let before = Rc::clone(trie.root());
        assert_eq!(trie.insert("a").unwrap_err(), TreeError::DuplicateWord("a".into()));
        assert_eq!(trie.insert("").unwrap_err(), TreeError::EmptyWord);
        assert_eq!(trie.delete("b").unwrap_err(), TreeError::WordNotFound("b".into()));
        assert!(Rc::ptr_eq(&before, trie.root()));
    }

    #[test]
    fn frames_survive_later_edits() {
        let mut trie = trie_of(&["ab"]);
        let log = trie.insert("ac").unwrap();
        trie.delete("ab").unwrap();
        assert_eq!(log.last().unwrap().state.slots().len(), 3);
        trie.undo().unwrap();
        assert_eq!(trie.words(), vec!["ab", "ac"]);
    }
}

//! Interactive breadth-first search over an editable undirected graph
//!
//! [`BfsGraph::step_bfs`] is the only traversal transition. Visiting a node
//! takes two calls: one dequeues it and marks it visiting, the next enqueues
//! its unvisited neighbors and marks it visited. Each call first pushes a deep
//! copy of the traversal state onto a history stack, which is what `undo` pops. Editing the graph (nodes or edges) resets the traversal;
//! moving a node is presentation only and leaves it running.

use crate::config::MAX_BFS_NODES;
use crate::errors::PlaybackError;
use crate::snapshot::{ArrayElement, Step, Stepper};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use thiserror::Error;

pub const PSEUDOCODE: &[&str] = &[
    "procedure BFS(G, s)",
    "  mark s queued; dist[s] = 0; enqueue s",
    "  while the queue is not empty",
    "    u = dequeue; mark u visiting",
    "    for each neighbor v of u in ascending order",
    "      if v is unvisited: mark queued; parent[v] = u; dist[v] = dist[u] + 1; enqueue v",
    "    mark u visited",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BfsError {
    #[error("choose a start node first")]
    NoStartNode,

    #[error("the graph already has the maximum of {0} nodes")]
    NodeLimit(usize),

    #[error("node {0} does not exist")]
    UnknownNode(usize),

    #[error("self-loops are not allowed (node {0})")]
    SelfLoop(usize),

    #[error("traversal finished: the queue is empty")]
    Finished,

    #[error("nothing to undo")]
    NothingToUndo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Unvisited,
    Queued,
    Visiting,
    Visited,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BfsStats {
    pub visited: usize,
    pub max_queue: usize,
    pub steps: usize,
}

/// Everything a single `step_bfs` call may change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalState {
    status: BTreeMap<usize, NodeStatus>,
    queue: VecDeque<usize>,
    parent: BTreeMap<usize, usize>,
    distance: BTreeMap<usize, usize>,
    current: Option<usize>,
    started: bool,
    code_line: usize,
    stats: BfsStats,
    trace: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BfsGraph {
    positions: BTreeMap<usize, (i32, i32)>,
    edges: BTreeMap<usize, BTreeSet<usize>>,
    next_id: usize,
    start: Option<usize>,
    traversal: TraversalState,
    history: Vec<TraversalState>,
}

impl Default for BfsGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl BfsGraph {
    pub fn new() -> Self {
        BfsGraph {
            positions: BTreeMap::new(),
            edges: BTreeMap::new(),
            next_id: 0,
            start: None,
            traversal: TraversalState::default(),
            history: Vec::new(),
        }
    }

    /// Seven-node demo graph rooted at node 0
    pub fn sample() -> Self {
        let layout = [(20, 2), (10, 6), (30, 6), (5, 10), (15, 10), (35, 10), (25, 14)];
        let mut graph = BfsGraph::new();
        for (id, xy) in layout.into_iter().enumerate() {
            graph.positions.insert(id, xy);
            graph.edges.insert(id, BTreeSet::new());
        }
        for (a, b) in [(0, 1), (0, 2), (1, 3), (1, 4), (2, 5), (4, 6), (5, 6)] {
            graph.edges.entry(a).or_default().insert(b);
            graph.edges.entry(b).or_default().insert(a);
        }
        graph.next_id = layout.len();
        graph.start = Some(0);
        graph
    }

    pub fn node_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.keys().copied()
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn node_position(&self, id: usize) -> Option<(i32, i32)> {
        self.positions.get(&id).copied()
    }

    pub fn neighbors(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges.get(&id).into_iter().flatten().copied()
    }

    /// Each undirected edge once, smaller endpoint first
    pub fn edge_list(&self) -> Vec<(usize, usize)> {
        self.edges
            .iter()
            .flat_map(|(&a, ns)| ns.iter().filter(move |&&b| a < b).map(move |&b| (a, b)))
            .collect()
    }

    pub fn start(&self) -> Option<usize> {
        self.start
    }

    pub fn status(&self, id: usize) -> NodeStatus {
        self.traversal
            .status
            .get(&id)
            .copied()
            .unwrap_or(NodeStatus::Unvisited)
    }

    pub fn queue(&self) -> impl Iterator<Item = usize> + '_ {
        self.traversal.queue.iter().copied()
    }

    pub fn stats(&self) -> BfsStats {
        self.traversal.stats
    }

    pub fn trace(&self) -> &[String] {
        &self.traversal.trace
    }

    pub fn traversal(&self) -> &TraversalState {
        &self.traversal
    }

    pub fn is_finished(&self) -> bool {
        self.traversal.started && self.traversal.queue.is_empty() && self.visiting().is_none()
    }

    /// The dequeued node whose neighbors have not been scanned yet
    fn visiting(&self) -> Option<usize> {
        self.traversal
            .current
            .filter(|&u| self.status(u) == NodeStatus::Visiting)
    }

    fn require(&self, id: usize) -> Result<(), BfsError> {
        if self.positions.contains_key(&id) {
            Ok(())
        } else {
            Err(BfsError::UnknownNode(id))
        }
    }

    fn restart(&mut self) {
        if self.traversal.started {
            tracing::debug!("graph edited, traversal reset");
        }
        self.traversal = TraversalState::default();
        self.history.clear();
    }

    pub fn add_node(&mut self, x: i32, y: i32) -> Result<usize, BfsError> {
        if self.positions.len() >= MAX_BFS_NODES {
            tracing::warn!(limit = MAX_BFS_NODES, "node limit reached");
            return Err(BfsError::NodeLimit(MAX_BFS_NODES));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.positions.insert(id, (x, y));
        self.edges.insert(id, BTreeSet::new());
        self.restart();
        Ok(id)
    }

    pub fn delete_node(&mut self, id: usize) -> Result<(), BfsError> {
        self.require(id)?;
        self.positions.remove(&id);
        if let Some(neighbors) = self.edges.remove(&id) {
            for n in neighbors {
                if let Some(set) = self.edges.get_mut(&n) {
                    set.remove(&id);
                }
            }
        }
        if self.start == Some(id) {
            self.start = None;
        }
        self.restart();
        Ok(())
    }

    /// Add the edge if absent, remove it otherwise; returns whether it now exists
    pub fn toggle_edge(&mut self, a: usize, b: usize) -> Result<bool, BfsError> {
        self.require(a)?;
        self.require(b)?;
        if a == b {
            return Err(BfsError::SelfLoop(a));
        }
        let present = self.edges.get(&a).is_some_and(|s| s.contains(&b));
        for (x, y) in [(a, b), (b, a)] {
            let set = self.edges.entry(x).or_default();
            if present {
                set.remove(&y);
            } else {
                set.insert(y);
            }
        }
        self.restart();
        Ok(!present)
    }

    pub fn move_node(&mut self, id: usize, x: i32, y: i32) -> Result<(), BfsError> {
        let slot = self.positions.get_mut(&id).ok_or(BfsError::UnknownNode(id))?;
        *slot = (x, y);
        Ok(())
    }

    pub fn set_start(&mut self, id: usize) -> Result<(), BfsError> {
        self.require(id)?;
        self.start = Some(id);
        self.restart();
        Ok(())
    }

    /// Advance the traversal by one transition
    pub fn step_bfs(&mut self) -> Result<(), BfsError> {
        let start = self.start.ok_or(BfsError::NoStartNode)?;
        if self.is_finished() {
            return Err(BfsError::Finished);
        }

        let visiting = self.visiting();
        self.history.push(self.traversal.clone());
        let edges = &self.edges;
        let t = &mut self.traversal;
        t.stats.steps += 1;

        if !t.started {
            t.started = true;
            t.status.insert(start, NodeStatus::Queued);
            t.distance.insert(start, 0);
            t.queue.push_back(start);
            t.stats.max_queue = t.stats.max_queue.max(t.queue.len());
            t.code_line = 1;
            t.trace.push(format!("Enqueue start node {} at distance 0", start));
            return Ok(());
        }

        let Some(u) = visiting else {
            let Some(u) = t.queue.pop_front() else {
                return Err(BfsError::Finished);
            };
            t.current = Some(u);
            t.status.insert(u, NodeStatus::Visiting);
            t.code_line = 3;
            t.trace.push(format!("Dequeue {} and visit it", u));
            return Ok(());
        };

        let du = t.distance.get(&u).copied().unwrap_or(0);
        for &v in edges.get(&u).into_iter().flatten() {
            let seen = t.status.get(&v).copied().unwrap_or(NodeStatus::Unvisited);
            if seen != NodeStatus::Unvisited {
                continue;
            }
            t.status.insert(v, NodeStatus::Queued);
            t.parent.insert(v, u);
            t.distance.insert(v, du + 1);
            t.queue.push_back(v);
            t.trace.push(format!("Enqueue {} from {} at distance {}", v, u, du + 1));
        }
        t.stats.max_queue = t.stats.max_queue.max(t.queue.len());

        t.status.insert(u, NodeStatus::Visited);
        t.stats.visited += 1;
        t.code_line = 6;
        t.trace.push(format!("{} is visited", u));
        if t.queue.is_empty() {
            t.trace.push(format!("Queue empty: {} nodes reached", t.stats.visited));
        }
        Ok(())
    }

    /// Restore the state before the last `step_bfs`
    pub fn undo(&mut self) -> Result<(), BfsError> {
        let previous = self.history.pop().ok_or(BfsError::NothingToUndo)?;
        self.traversal = previous;
        Ok(())
    }

    /// Drop all traversal progress, keeping the graph and start node
    pub fn reset(&mut self) {
        self.traversal = TraversalState::default();
        self.history.clear();
    }

    /// Hop count from the start node, once the node has been reached
    pub fn distance_to(&self, id: usize) -> Option<usize> {
        self.traversal.distance.get(&id).copied()
    }

    /// Shortest path from the start node, following parent links back
    pub fn path_to(&self, id: usize) -> Option<Vec<usize>> {
        let start = self.start?;
        self.distance_to(id)?;
        let mut path = vec![id];
        let mut node = id;
        while node != start {
            node = *self.traversal.parent.get(&node)?;
            path.push(node);
        }
        path.reverse();
        Some(path)
    }

    /// Render the engine as a step: one slot per node, flags from its status
    pub fn snapshot_step(&self) -> Step {
        let t = &self.traversal;
        let ids: Vec<usize> = self.node_ids().collect();
        let array = ids
            .iter()
            .enumerate()
            .map(|(k, &id)| {
                let mut slot = ArrayElement::new(id as i64, k);
                match self.status(id) {
                    NodeStatus::Unvisited => {}
                    NodeStatus::Queued => slot.is_comparing = true,
                    NodeStatus::Visiting => slot.is_swapping = true,
                    NodeStatus::Visited => slot.is_sorted = true,
                }
                slot.is_pivot = self.start == Some(id);
                slot.is_selected = t.current == Some(id);
                slot
            })
            .collect();

        let description = t.trace.last().cloned().unwrap_or_else(|| match self.start {
            Some(s) => format!("Ready to search from node {}", s),
            None => "Choose a start node".to_string(),
        });
        let distances: Vec<i64> = ids
            .iter()
            .map(|&id| self.distance_to(id).map_or(-1, |d| d as i64))
            .collect();
        let parents: Vec<i64> = ids
            .iter()
            .map(|id| t.parent.get(id).map_or(-1, |&p| p as i64))
            .collect();
        let edges: Vec<Vec<i64>> = self
            .edge_list()
            .into_iter()
            .map(|(a, b)| vec![a as i64, b as i64])
            .collect();
        let queue: Vec<usize> = self.queue().collect();

        let step = Step::new(array, description, t.code_line)
            .with_info("queue", queue)
            .with_info("distance", distances)
            .with_info("parent", parents)
            .with_info("edges", edges)
            .with_info("visited", t.stats.visited)
            .with_info("max_queue", t.stats.max_queue)
            .with_info("steps", t.stats.steps);
        match t.current {
            Some(u) => step.at(u, None),
            None => step,
        }
    }
}

impl From<BfsError> for PlaybackError {
    fn from(err: BfsError) -> Self {
        match err {
            BfsError::Finished => PlaybackError::AtEnd,
            BfsError::NothingToUndo => PlaybackError::AtStart,
            other => PlaybackError::Rejected(other.to_string()),
        }
    }
}

impl Stepper for BfsGraph {
    fn current(&self) -> Cow<'_, Step> {
        Cow::Owned(self.snapshot_step())
    }

    fn step_forward(&mut self) -> Result<(), PlaybackError> {
        Ok(self.step_bfs()?)
    }

    fn step_backward(&mut self) -> Result<(), PlaybackError> {
        Ok(self.undo()?)
    }

    fn rewind_to_start(&mut self) -> Result<(), PlaybackError> {
        self.reset();
        Ok(())
    }

    fn position(&self) -> usize {
        self.traversal.stats.steps
    }

    fn total(&self) -> Option<usize> {
        None
    }

    fn narration(&self) -> Vec<String> {
        self.traversal.trace.clone()
    }
}

//! Tarjan's strongly connected components
//!
//! The DFS is real recursion; steps are appended as a side-effect log while it
//! runs, so the trace cannot be resumed from the middle. The step array holds
//! the low-link value of every node (`-1` until the node is discovered).

use super::signed_list;
use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use crate::snapshot::{ArrayElement, Mark, Step, StepRecorder};

pub const PSEUDOCODE: &[&str] = &[
    "procedure tarjan(G)",
    "  for each v: if disc[v] undefined: strongConnect(v)",
    "procedure strongConnect(u)",
    "  disc[u] = low[u] = time++; push u",
    "  for each v in adj[u]",
    "    if disc[v] undefined: strongConnect(v)",
    "      low[u] = min(low[u], low[v])",
    "    else if v on stack",
    "      low[u] = min(low[u], disc[v])",
    "  if low[u] == disc[u]",
    "    pop until u: emit SCC",
];

struct Tarjan<'g> {
    graph: &'g [Vec<usize>],
    rec: StepRecorder,
    low: Vec<ArrayElement>,
    disc: Vec<Option<usize>>,
    stack: Vec<usize>,
    on_stack: Vec<bool>,
    time: usize,
    sccs: Vec<Vec<usize>>,
}

impl Tarjan<'_> {
    fn record(
        &mut self,
        marks: &[(usize, Mark)],
        description: String,
        code_line: usize,
        u: Option<usize>,
        v: Option<usize>,
    ) -> Result<(), GeneratorError> {
        let stack: Vec<usize> = self.stack.clone();
        let sccs: Vec<Vec<i64>> = self
            .sccs
            .iter()
            .map(|c| c.iter().map(|&x| x as i64).collect())
            .collect();
        let step = self
            .rec
            .snap(&self.low, marks, description, code_line)
            .at(u, v)
            .with_info("disc", signed_list(&self.disc))
            .with_info("stack", stack)
            .with_info("sccs", sccs);
        self.rec.push(step)
    }

    fn strong_connect(&mut self, u: usize) -> Result<(), GeneratorError> {
        let t = self.time;
        self.time += 1;
        self.disc[u] = Some(t);
        self.low[u].value = t as i64;
        self.stack.push(u);
        self.on_stack[u] = true;
        self.record(
            &[(u, Mark::Selected)],
            format!("Visit {}: disc = low = {}, push onto stack", u, t),
            3,
            Some(u),
            None,
        )?;

        let graph = self.graph;
        for &v in &graph[u] {
            self.rec.count_comparison();
            match self.disc[v] {
                None => {
                    self.record(
                        &[(u, Mark::Comparing), (v, Mark::Comparing)],
                        format!("Tree edge {} -> {}: recurse into {}", u, v, v),
                        5,
                        Some(u),
                        Some(v),
                    )?;
                    self.strong_connect(v)?;

                    let before = self.low[u].value;
                    let after = before.min(self.low[v].value);
                    self.update_low(u, v, before, after, 6, "low[v]")?;
                }
                Some(dv) if self.on_stack[v] => {
                    self.record(
                        &[(u, Mark::Comparing), (v, Mark::Comparing)],
                        format!("Back edge {} -> {}: {} is on the stack", u, v, v),
                        7,
                        Some(u),
                        Some(v),
                    )?;
                    let before = self.low[u].value;
                    let after = before.min(dv as i64);
                    self.update_low(u, v, before, after, 8, "disc[v]")?;
                }
                Some(_) => {
                    self.record(
                        &[(u, Mark::Comparing), (v, Mark::Comparing)],
                        format!("Edge {} -> {} leads to a finished component: ignore", u, v),
                        4,
                        Some(u),
                        Some(v),
                    )?;
                }
            }
        }

        let disc_u = t as i64;
        if self.low[u].value == disc_u {
            self.record(
                &[(u, Mark::Pivot)],
                format!("low[{}] == disc[{}] = {}: {} roots a component", u, u, disc_u, u),
                9,
                Some(u),
                None,
            )?;

            let mut component = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack[w] = false;
                self.low[w].is_sorted = true;
                component.push(w);
                self.rec.count_swap();
                self.record(
                    &[(u, Mark::Pivot), (w, Mark::Swapping)],
                    format!("Pop {} into the component of {}", w, u),
                    10,
                    Some(u),
                    Some(w),
                )?;
                if w == u {
                    break;
                }
            }
            component.sort_unstable();
            self.sccs.push(component);
        }
        Ok(())
    }

    fn update_low(
        &mut self,
        u: usize,
        v: usize,
        before: i64,
        after: i64,
        code_line: usize,
        source: &str,
    ) -> Result<(), GeneratorError> {
        let description = if after < before {
            format!("low[{}] = min({}, {}) -> {} (from {})", u, before, after, after, source)
        } else {
            format!("low[{}] stays {} (from {})", u, before, source)
        };
        self.record(&[(u, Mark::Swapping)], description, code_line, Some(u), Some(v))?;
        self.low[u].value = after;
        Ok(())
    }
}

/// Generate the trace for a directed graph given as adjacency lists
pub fn steps(graph: &[Vec<usize>], limits: TraceLimits) -> Result<Vec<Step>, GeneratorError> {
    let n = graph.len();
    for (u, neighbors) in graph.iter().enumerate() {
        if let Some(&v) = neighbors.iter().find(|&&v| v >= n) {
            return Err(GeneratorError::InvalidGraph(format!(
                "edge {} -> {} points outside the {} nodes",
                u, v, n
            )));
        }
    }

    let mut state = Tarjan {
        graph,
        rec: StepRecorder::new(limits),
        low: ArrayElement::from_values(&vec![-1; n]),
        disc: vec![None; n],
        stack: Vec::new(),
        on_stack: vec![false; n],
        time: 0,
        sccs: Vec::new(),
    };

    state.record(&[], format!("Find strongly connected components of {} nodes", n), 0, None, None)?;
    for v in 0..n {
        if state.disc[v].is_none() {
            state.record(&[(v, Mark::Selected)], format!("Start a DFS at {}", v), 1, Some(v), None)?;
            state.strong_connect(v)?;
        }
    }

    let listing = state
        .sccs
        .iter()
        .map(|c| {
            let members: Vec<String> = c.iter().map(|x| x.to_string()).collect();
            format!("{{{}}}", members.join(", "))
        })
        .collect::<Vec<_>>()
        .join(" ");
    for slot in state.low.iter_mut() {
        slot.is_sorted = true;
    }
    state.record(
        &[],
        format!("Found {} components: {}", state.sccs.len(), listing),
        0,
        None,
        None,
    )?;
    Ok(state.rec.finish())
}

/// Components in discovery-completion order, each sorted ascending
pub fn components(graph: &[Vec<usize>]) -> Result<Vec<Vec<usize>>, GeneratorError> {
    let steps = steps(graph, TraceLimits::default())?;
    let sccs = steps
        .last()
        .and_then(|s| s.info.get("sccs"))
        .and_then(|v| v.as_table())
        .map(|rows| {
            rows.iter()
                .map(|r| r.iter().map(|&x| x as usize).collect())
                .collect()
        })
        .unwrap_or_default();
    Ok(sccs)
}

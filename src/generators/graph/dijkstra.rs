//! Dijkstra's shortest paths with an O(V^2) linear minimum scan
//!
//! The input is a JSON adjacency matrix where `matrix[u][v]` is the weight of
//! the directed edge `u -> v` and `0` off the diagonal means "no edge". The
//! step array holds the tentative distance of every node, with
//! [`INFINITY`](crate::snapshot::INFINITY) for nodes not reached yet.

use super::signed_list;
use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use crate::snapshot::{ArrayElement, Mark, Step, StepRecorder, INFINITY};

pub const PSEUDOCODE: &[&str] = &[
    "function dijkstra(G, s)",
    "  dist[v] = infinity for all v; dist[s] = 0",
    "  repeat |V| times",
    "    u = unvisited node with the smallest dist",
    "    mark u visited",
    "    for each edge (u, v, w) with v unvisited",
    "      if dist[u] + w < dist[v]",
    "        dist[v] = dist[u] + w; prev[v] = u",
    "  return dist",
];

/// Parse a JSON adjacency matrix, `None` when it is malformed or not square
pub fn parse_matrix(json: &str) -> Option<Vec<Vec<i64>>> {
    let matrix: Vec<Vec<i64>> = match serde_json::from_str(json) {
        Ok(m) => m,
        Err(err) => {
            tracing::warn!(%err, "unparseable adjacency matrix");
            return None;
        }
    };
    let n = matrix.len();
    if n == 0 || matrix.iter().any(|row| row.len() != n) {
        tracing::warn!(rows = n, "adjacency matrix is empty or not square");
        return None;
    }
    Some(matrix)
}

/// Generate the trace from a JSON matrix. Malformed JSON or a source outside
/// the matrix yields an empty trace.
pub fn steps(json: &str, source: usize, limits: TraceLimits) -> Result<Vec<Step>, GeneratorError> {
    let Some(matrix) = parse_matrix(json) else {
        return Ok(Vec::new());
    };
    if source >= matrix.len() {
        tracing::warn!(source, nodes = matrix.len(), "dijkstra source is outside the matrix");
        return Ok(Vec::new());
    }
    steps_for_matrix(&matrix, source, limits)
}

pub fn steps_for_matrix(
    matrix: &[Vec<i64>],
    source: usize,
    limits: TraceLimits,
) -> Result<Vec<Step>, GeneratorError> {
    let n = matrix.len();
    if source >= n {
        return Err(GeneratorError::InvalidGraph(format!(
            "source {} is not one of the {} nodes",
            source, n
        )));
    }
    if let Some((u, v)) = (0..n)
        .flat_map(|u| (0..n).map(move |v| (u, v)))
        .find(|&(u, v)| matrix[u][v] < 0)
    {
        return Err(GeneratorError::InvalidGraph(format!(
            "edge {} -> {} has negative weight {}",
            u, v, matrix[u][v]
        )));
    }

    let mut rec = StepRecorder::new(limits);
    let mut dist = ArrayElement::from_values(&vec![INFINITY; n]);
    let mut previous: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];

    rec.push(rec.snap(&dist, &[], format!("Shortest paths from node {}", source), 0))?;
    dist[source].value = 0;
    rec.push(
        rec.snap(&dist, &[(source, Mark::Pivot)], format!("dist[{}] = 0, every other node is infinity", source), 1)
            .with_info("source", source),
    )?;

    for _ in 0..n {
        let next = (0..n)
            .filter(|&v| !visited[v])
            .min_by_key(|&v| dist[v].value);
        let Some(u) = next else { break };

        if dist[u].value == INFINITY {
            rec.push(
                rec.snap(&dist, &[], "Every remaining node is unreachable", 3)
                    .with_info("previous", signed_list(&previous)),
            )?;
            break;
        }

        visited[u] = true;
        dist[u].is_sorted = true;
        rec.push(
            rec.snap(
                &dist,
                &[(u, Mark::Selected)],
                format!("Visit node {} at distance {}", u, dist[u].value),
                4,
            )
            .at(u, None)
            .with_info("previous", signed_list(&previous)),
        )?;

        for v in 0..n {
            let w = matrix[u][v];
            if v == u || w == 0 || visited[v] {
                continue;
            }
            rec.count_comparison();
            let candidate = dist[u].value.saturating_add(w);
            if candidate >= dist[v].value {
                continue;
            }

            rec.push(
                rec.snap(
                    &dist,
                    &[(u, Mark::Comparing), (v, Mark::Comparing)],
                    format!(
                        "Edge {} -> {} (w = {}): {} + {} = {} beats {}",
                        u,
                        v,
                        w,
                        dist[u].value,
                        w,
                        candidate,
                        render(dist[v].value)
                    ),
                    6,
                )
                .at(u, v)
                .with_info("previous", signed_list(&previous)),
            )?;

            rec.count_swap();
            rec.push(
                rec.snap(
                    &dist,
                    &[(v, Mark::Swapping)],
                    format!("dist[{}] = {}, prev[{}] = {}", v, candidate, v, u),
                    7,
                )
                .at(u, v)
                .with_info("previous", signed_list(&previous)),
            )?;
            dist[v].value = candidate;
            previous[v] = Some(u);
        }
    }

    for slot in dist.iter_mut() {
        slot.is_sorted = true;
    }
    let listing = dist
        .iter()
        .enumerate()
        .map(|(v, d)| format!("{}: {}", v, render(d.value)))
        .collect::<Vec<_>>()
        .join(", ");
    rec.push(
        rec.snap(&dist, &[], format!("Final distances {}", listing), 8)
            .with_info("previous", signed_list(&previous))
            .with_info("source", source),
    )?;
    Ok(rec.finish())
}

fn render(value: i64) -> String {
    if value == INFINITY {
        "inf".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::InfoValue;

    const GRAPH: &str = "[[0,4,1,0],[0,0,0,1],[0,2,0,5],[0,0,0,0]]";

    #[test]
    fn finds_shortest_distances() {
        let steps = steps(GRAPH, 0, TraceLimits::default()).unwrap();
        let last = steps.last().unwrap();
        assert_eq!(last.values(), vec![0, 3, 1, 4]);
        assert_eq!(last.info["previous"], InfoValue::List(vec![-1, 2, 0, 1]));
        assert!(last.array.iter().all(|e| e.is_sorted));
    }

    #[test]
    fn only_improving_relaxations_emit_steps() {
        let steps = steps(GRAPH, 0, TraceLimits::default()).unwrap();
        let updates = steps.iter().filter(|s| s.code_line == 7).count();
        // 0->1, 0->2, 2->1, 2->3 (6), 1->3 (4)
        assert_eq!(updates, 5);
        assert_eq!(steps.iter().filter(|s| s.code_line == 6).count(), updates);
    }

    #[test]
    fn unreachable_nodes_stay_infinite() {
        let steps = steps("[[0,1,0],[0,0,0],[0,0,0]]", 0, TraceLimits::default()).unwrap();
        assert_eq!(steps.last().unwrap().values(), vec![0, 1, INFINITY]);
    }

    #[test]
    fn malformed_json_yields_no_steps() {
        assert!(steps("[[0,1],[", 0, TraceLimits::default()).unwrap().is_empty());
        assert!(steps("[[0,1,2],[0,0]]", 0, TraceLimits::default()).unwrap().is_empty());
    }

    #[test]
    fn source_outside_the_matrix_yields_no_steps() {
        assert!(steps("[[0,1],[1,0]]", 5, TraceLimits::default()).unwrap().is_empty());
        assert!(steps("[[0,1],[1,0]]", 2, TraceLimits::default()).unwrap().is_empty());
    }

    #[test]
    fn negative_weights_are_rejected() {
        let err = steps("[[0,-1],[0,0]]", 0, TraceLimits::default()).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidGraph(_)));
    }
}

//! Graph generators: Dijkstra over an adjacency matrix, Tarjan over adjacency lists
//!
//! The interactive BFS editor lives in [`crate::interactive::bfs`] because it
//! advances live state instead of producing a trace up front.

pub mod dijkstra;
pub mod tarjan;

/// Render a distance or id list, mapping the infinity sentinel to `-1`
pub(crate) fn signed_list(values: &[Option<usize>]) -> Vec<i64> {
    values
        .iter()
        .map(|v| v.map_or(-1, |x| x as i64))
        .collect()
}

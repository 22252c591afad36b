// Limits and player configuration

use std::time::Duration;

/// Largest array any sorting or sieve generator accepts
pub const MAX_ARRAY_LEN: usize = 800;

/// Node cap for the interactive BFS editor
pub const MAX_BFS_NODES: usize = 15;

/// Most cells a Game of Life or maze grid may hold
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Largest Fibonacci index whose term fits in an i64
pub const MAX_FIBONACCI_N: i64 = 92;

/// Default memory budget for a single generated trace (64 MB)
pub const DEFAULT_TRACE_MEMORY: usize = 64 * 1024 * 1024;

/// Default delay between automatic steps in play mode
pub const DEFAULT_PLAY_INTERVAL_MS: u64 = 500;

/// Default minimum degree for the B-Tree
pub const DEFAULT_BTREE_DEGREE: usize = 2;

/// Default live-cell probability when seeding a Game of Life grid
pub const DEFAULT_LIFE_DENSITY: f64 = 0.3;

/// Bounds applied while recording a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceLimits {
    pub max_memory: usize,
    pub max_array_len: usize,
}

impl Default for TraceLimits {
    fn default() -> Self {
        TraceLimits {
            max_memory: DEFAULT_TRACE_MEMORY,
            max_array_len: MAX_ARRAY_LEN,
        }
    }
}

/// Settings for the terminal player
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Delay between automatic steps while playing
    pub play_interval: Duration,
    /// Title shown above the pseudocode pane
    pub title: String,
}

impl PlayerConfig {
    pub fn new(title: impl Into<String>, interval_ms: u64) -> Self {
        PlayerConfig {
            play_interval: Duration::from_millis(interval_ms.max(1)),
            title: title.into(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::new("AlgoTTY", DEFAULT_PLAY_INTERVAL_MS)
    }
}

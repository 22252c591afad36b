//! Error types shared by the generators and the playback layer
//!
//! Generators follow a split policy:
//! - A wrong number of arguments is not an error at all; the generator returns
//!   a single step whose description explains the problem.
//! - Domain violations (negative values into counting sort, oversized inputs,
//!   dangling graph edges) surface as [`GeneratorError`].
//! - Malformed structured input (Dijkstra's JSON matrix) yields an empty trace.
//!
//! Interactive engines own their error types (`BfsError`, `TreeError`) and leave
//! their state untouched whenever an operation is rejected.

use thiserror::Error;

/// Errors raised while generating a step trace
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// Input contained a negative value where only non-negative ones are defined
    #[error("{algorithm} is defined over non-negative integers, got {value}")]
    NegativeValue { algorithm: &'static str, value: i64 },

    /// Input exceeded the visualization cap
    #[error("input of {len} elements exceeds the limit of {limit}")]
    InputTooLarge { len: usize, limit: usize },

    /// Grid dimensions were rejected
    #[error("invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        reason: &'static str,
    },

    /// A parameter fell outside its valid range
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Graph input referenced a node that does not exist
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// The input kind does not match what the algorithm consumes
    #[error("{algorithm} expects {expected} input")]
    WrongInputKind {
        algorithm: &'static str,
        expected: &'static str,
    },

    /// The trace grew past its memory budget
    #[error("trace memory limit exceeded: {current} + {step} > {limit} bytes")]
    TraceLimitExceeded {
        current: usize,
        step: usize,
        limit: usize,
    },
}

/// Errors raised while moving through a trace or a live engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("already at the first step")]
    AtStart,

    #[error("no more steps available")]
    AtEnd,

    #[error("step {index} is out of range for a trace of {len} steps")]
    OutOfRange { index: usize, len: usize },

    #[error("trace is empty")]
    Empty,

    /// The engine refused the transition (no start node, history exhausted, ...)
    #[error("{0}")]
    Rejected(String),
}

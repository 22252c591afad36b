//! Trace generators and the registry that dispatches to them
//!
//! Every generator is a pure function from a typed input to a `Vec<Step>`.
//! [`AlgorithmId`] ties an algorithm to its display name, its pseudocode
//! listing and the input kind it consumes.

pub mod graph;
pub mod grid;
pub mod kmp;
pub mod numeric;
pub mod sorting;

use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use crate::snapshot::Step;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::str::FromStr;

/// Typed input accepted by [`AlgorithmId::generate_steps`]
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorInput {
    /// Array for the sorts, registers for the numeric algorithms
    Numbers(Vec<i64>),
    /// Text and pattern for KMP
    Text { text: String, pattern: String },
    /// JSON adjacency matrix and source node for Dijkstra
    Matrix { json: String, source: usize },
    /// Directed adjacency lists for Tarjan
    Adjacency(Vec<Vec<usize>>),
    /// Maze size; `seed` makes the carving reproducible
    Dimensions {
        width: usize,
        height: usize,
        seed: Option<u64>,
    },
}

impl GeneratorInput {
    fn kind(&self) -> &'static str {
        match self {
            GeneratorInput::Numbers(_) => "numbers",
            GeneratorInput::Text { .. } => "text and pattern",
            GeneratorInput::Matrix { .. } => "adjacency matrix",
            GeneratorInput::Adjacency(_) => "adjacency lists",
            GeneratorInput::Dimensions { .. } => "dimensions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmId {
    BubbleSort,
    SelectionSort,
    MergeSort,
    CountingSort,
    RadixSort,
    Gcd,
    ModularExponentiation,
    PrimeFactorization,
    Fibonacci,
    Sieve,
    Dijkstra,
    Tarjan,
    Kmp,
    Maze,
}

impl AlgorithmId {
    pub const ALL: [AlgorithmId; 14] = [
        AlgorithmId::BubbleSort,
        AlgorithmId::SelectionSort,
        AlgorithmId::MergeSort,
        AlgorithmId::CountingSort,
        AlgorithmId::RadixSort,
        AlgorithmId::Gcd,
        AlgorithmId::ModularExponentiation,
        AlgorithmId::PrimeFactorization,
        AlgorithmId::Fibonacci,
        AlgorithmId::Sieve,
        AlgorithmId::Dijkstra,
        AlgorithmId::Tarjan,
        AlgorithmId::Kmp,
        AlgorithmId::Maze,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AlgorithmId::BubbleSort => "Bubble Sort",
            AlgorithmId::SelectionSort => "Selection Sort",
            AlgorithmId::MergeSort => "Merge Sort",
            AlgorithmId::CountingSort => "Counting Sort",
            AlgorithmId::RadixSort => "Radix Sort",
            AlgorithmId::Gcd => "Euclidean GCD",
            AlgorithmId::ModularExponentiation => "Modular Exponentiation",
            AlgorithmId::PrimeFactorization => "Prime Factorization",
            AlgorithmId::Fibonacci => "Fibonacci",
            AlgorithmId::Sieve => "Sieve of Eratosthenes",
            AlgorithmId::Dijkstra => "Dijkstra",
            AlgorithmId::Tarjan => "Tarjan SCC",
            AlgorithmId::Kmp => "Knuth-Morris-Pratt",
            AlgorithmId::Maze => "Maze (randomized DFS)",
        }
    }

    /// Command-line identifier
    pub fn slug(self) -> &'static str {
        match self {
            AlgorithmId::BubbleSort => "bubble",
            AlgorithmId::SelectionSort => "selection",
            AlgorithmId::MergeSort => "merge",
            AlgorithmId::CountingSort => "counting",
            AlgorithmId::RadixSort => "radix",
            AlgorithmId::Gcd => "gcd",
            AlgorithmId::ModularExponentiation => "modexp",
            AlgorithmId::PrimeFactorization => "factorize",
            AlgorithmId::Fibonacci => "fibonacci",
            AlgorithmId::Sieve => "sieve",
            AlgorithmId::Dijkstra => "dijkstra",
            AlgorithmId::Tarjan => "tarjan",
            AlgorithmId::Kmp => "kmp",
            AlgorithmId::Maze => "maze",
        }
    }

    pub fn pseudocode(self) -> &'static [&'static str] {
        match self {
            AlgorithmId::BubbleSort => sorting::bubble::PSEUDOCODE,
            AlgorithmId::SelectionSort => sorting::selection::PSEUDOCODE,
            AlgorithmId::MergeSort => sorting::merge::PSEUDOCODE,
            AlgorithmId::CountingSort => sorting::counting::PSEUDOCODE,
            AlgorithmId::RadixSort => sorting::radix::PSEUDOCODE,
            AlgorithmId::Gcd => numeric::gcd::PSEUDOCODE,
            AlgorithmId::ModularExponentiation => numeric::modexp::PSEUDOCODE,
            AlgorithmId::PrimeFactorization => numeric::factorize::PSEUDOCODE,
            AlgorithmId::Fibonacci => numeric::fibonacci::PSEUDOCODE,
            AlgorithmId::Sieve => numeric::sieve::PSEUDOCODE,
            AlgorithmId::Dijkstra => graph::dijkstra::PSEUDOCODE,
            AlgorithmId::Tarjan => graph::tarjan::PSEUDOCODE,
            AlgorithmId::Kmp => kmp::PSEUDOCODE,
            AlgorithmId::Maze => grid::maze::PSEUDOCODE,
        }
    }

    /// Input kind this algorithm consumes, for messages and CLI help
    pub fn expected_input(self) -> &'static str {
        match self {
            AlgorithmId::Kmp => "text and pattern",
            AlgorithmId::Dijkstra => "adjacency matrix",
            AlgorithmId::Tarjan => "adjacency lists",
            AlgorithmId::Maze => "dimensions",
            _ => "numbers",
        }
    }

    /// Run the generator once and return the complete trace
    pub fn generate_steps(
        self,
        input: &GeneratorInput,
        limits: TraceLimits,
    ) -> Result<Vec<Step>, GeneratorError> {
        tracing::debug!(algorithm = self.slug(), input = input.kind(), "generating trace");
        let steps = match (self, input) {
            (AlgorithmId::BubbleSort, GeneratorInput::Numbers(v)) => sorting::bubble::steps(v, limits),
            (AlgorithmId::SelectionSort, GeneratorInput::Numbers(v)) => sorting::selection::steps(v, limits),
            (AlgorithmId::MergeSort, GeneratorInput::Numbers(v)) => sorting::merge::steps(v, limits),
            (AlgorithmId::CountingSort, GeneratorInput::Numbers(v)) => sorting::counting::steps(v, limits),
            (AlgorithmId::RadixSort, GeneratorInput::Numbers(v)) => sorting::radix::steps(v, limits),
            (AlgorithmId::Gcd, GeneratorInput::Numbers(v)) => numeric::gcd::steps(v, limits),
            (AlgorithmId::ModularExponentiation, GeneratorInput::Numbers(v)) => numeric::modexp::steps(v, limits),
            (AlgorithmId::PrimeFactorization, GeneratorInput::Numbers(v)) => numeric::factorize::steps(v, limits),
            (AlgorithmId::Fibonacci, GeneratorInput::Numbers(v)) => numeric::fibonacci::steps(v, limits),
            (AlgorithmId::Sieve, GeneratorInput::Numbers(v)) => numeric::sieve::steps(v, limits),
            (AlgorithmId::Dijkstra, GeneratorInput::Matrix { json, source }) => {
                graph::dijkstra::steps(json, *source, limits)
            }
            (AlgorithmId::Tarjan, GeneratorInput::Adjacency(lists)) => graph::tarjan::steps(lists, limits),
            (AlgorithmId::Kmp, GeneratorInput::Text { text, pattern }) => {
                kmp::trace(text, pattern, limits).map(|trace| trace.combined())
            }
            (AlgorithmId::Maze, GeneratorInput::Dimensions { width, height, seed }) => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_entropy(),
                };
                grid::maze::steps(*width, *height, &mut rng)
            }
            _ => {
                tracing::warn!(algorithm = self.slug(), input = input.kind(), "input kind mismatch");
                return Err(GeneratorError::WrongInputKind {
                    algorithm: self.name(),
                    expected: self.expected_input(),
                });
            }
        }?;
        tracing::debug!(algorithm = self.slug(), steps = steps.len(), "trace generated");
        Ok(steps)
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AlgorithmId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AlgorithmId::ALL
            .into_iter()
            .find(|id| id.slug() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = AlgorithmId::ALL.iter().map(|id| id.slug()).collect();
                format!("unknown algorithm '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

// AlgoTTY: step-by-step algorithm visualizer

use std::io;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use algotty::config::{
    PlayerConfig, TraceLimits, DEFAULT_BTREE_DEGREE, DEFAULT_LIFE_DENSITY,
    DEFAULT_PLAY_INTERVAL_MS,
};
use algotty::generators::grid::{life, Grid};
use algotty::generators::{AlgorithmId, GeneratorInput};
use algotty::interactive::heap::{self, Heap, HeapKind};
use algotty::interactive::trie::{self, Trie};
use algotty::interactive::{bfs, btree, TreeError};
use algotty::snapshot::{Playback, Step, Stepper};
use algotty::ui::App;

#[derive(Parser, Debug)]
#[command(name = "algotty", about = "Step through algorithms in the terminal")]
struct Cli {
    /// Delay between steps while playing, in milliseconds
    #[arg(long, global = true, default_value_t = DEFAULT_PLAY_INTERVAL_MS)]
    interval_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a full trace for one algorithm and open the player.
    Trace {
        /// bubble, selection, merge, counting, radix, gcd, modexp, factorize,
        /// fibonacci, sieve, dijkstra, tarjan, kmp or maze
        algorithm: AlgorithmId,
        /// Comma-separated integers (sorts and number theory).
        #[arg(long, allow_hyphen_values = true)]
        values: Option<String>,
        /// Text to search (kmp).
        #[arg(long)]
        text: Option<String>,
        /// Pattern to find (kmp).
        #[arg(long)]
        pattern: Option<String>,
        /// JSON adjacency matrix, 0 for no edge (dijkstra).
        #[arg(long)]
        matrix: Option<String>,
        /// Source node (dijkstra).
        #[arg(long, default_value_t = 0)]
        source: usize,
        /// Adjacency lists, `;` between nodes and `,` between neighbors (tarjan).
        #[arg(long)]
        graph: Option<String>,
        /// Maze width, odd and at least 5.
        #[arg(long, default_value_t = 21)]
        width: usize,
        /// Maze height, odd and at least 5.
        #[arg(long, default_value_t = 11)]
        height: usize,
        /// Seed for reproducible mazes.
        #[arg(long)]
        seed: Option<u64>,
        /// Print the trace as text instead of opening the player.
        #[arg(long, conflicts_with = "json")]
        print: bool,
        /// Print the trace as JSON instead of opening the player.
        #[arg(long)]
        json: bool,
    },
    /// Breadth-first search, one dequeue per step.
    Bfs {
        /// Edges as `a-b` pairs separated by commas; defaults to a sample graph.
        #[arg(long)]
        edges: Option<String>,
        /// Start node.
        #[arg(long, default_value_t = 0)]
        start: usize,
    },
    /// Conway's Game of Life on a random board.
    Life {
        #[arg(long, default_value_t = 40)]
        width: usize,
        #[arg(long, default_value_t = 20)]
        height: usize,
        /// Probability that a cell starts alive.
        #[arg(long, default_value_t = DEFAULT_LIFE_DENSITY)]
        density: f64,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Animate B-Tree inserts and deletes.
    Btree {
        /// Minimum degree.
        #[arg(long, default_value_t = DEFAULT_BTREE_DEGREE)]
        degree: usize,
        /// Comma-separated keys to insert.
        #[arg(allow_hyphen_values = true)]
        keys: String,
        /// Comma-separated keys to delete afterwards.
        #[arg(long, allow_hyphen_values = true)]
        delete: Option<String>,
    },
    /// Animate binary heap inserts and extractions.
    Heap {
        /// Build a max-heap instead of a min-heap.
        #[arg(long)]
        max: bool,
        /// Comma-separated values to insert.
        #[arg(allow_hyphen_values = true)]
        values: String,
        /// Number of extractions afterwards.
        #[arg(long, default_value_t = 0)]
        extract: usize,
    },
    /// Animate trie inserts and deletes.
    Trie {
        /// Comma-separated words to insert.
        words: String,
        /// Comma-separated words to delete afterwards.
        #[arg(long)]
        delete: Option<String>,
    },
}

fn main() -> Result<()> {
    // stderr keeps log lines out of the player's screen buffer
    let filter = EnvFilter::try_from_env("ALGOTTY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let interval = cli.interval_ms;

    match cli.command {
        Commands::Trace {
            algorithm,
            values,
            text,
            pattern,
            matrix,
            source,
            graph,
            width,
            height,
            seed,
            print,
            json,
        } => {
            let input = match algorithm {
                AlgorithmId::Kmp => GeneratorInput::Text {
                    text: text.context("kmp needs --text")?,
                    pattern: pattern.context("kmp needs --pattern")?,
                },
                AlgorithmId::Dijkstra => GeneratorInput::Matrix {
                    json: matrix.context("dijkstra needs --matrix")?,
                    source,
                },
                AlgorithmId::Tarjan => {
                    GeneratorInput::Adjacency(parse_adjacency(&graph.context("tarjan needs --graph")?)?)
                }
                AlgorithmId::Maze => GeneratorInput::Dimensions { width, height, seed },
                _ => GeneratorInput::Numbers(parse_numbers(
                    &values.with_context(|| format!("{} needs --values", algorithm.slug()))?,
                )?),
            };
            let steps = algorithm
                .generate_steps(&input, TraceLimits::default())
                .with_context(|| format!("failed to generate {}", algorithm))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&steps)?);
            } else if print {
                print_trace(&steps);
            } else {
                let playback = Playback::new(steps)
                    .with_context(|| format!("{} produced no steps for this input", algorithm))?;
                run_player(
                    Box::new(playback),
                    algorithm.pseudocode(),
                    PlayerConfig::new(algorithm.name(), interval),
                )?;
            }
        }
        Commands::Bfs { edges, start } => {
            let graph = match edges {
                Some(edges) => build_bfs_graph(&parse_edges(&edges)?, start)?,
                None => bfs::BfsGraph::sample(),
            };
            run_player(
                Box::new(graph),
                bfs::PSEUDOCODE,
                PlayerConfig::new("Breadth-First Search", interval),
            )?;
        }
        Commands::Life {
            width,
            height,
            density,
            seed,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let grid = Grid::random(width, height, density, &mut rng)
                .context("invalid Game of Life board")?;
            run_player(
                Box::new(life::LifeSimulation::new(grid)),
                life::PSEUDOCODE,
                PlayerConfig::new("Game of Life", interval),
            )?;
        }
        Commands::Btree {
            degree,
            keys,
            delete,
        } => {
            let mut tree = btree::BTree::new(degree).context("invalid B-Tree degree")?;
            let mut steps = tree.snapshot().to_steps();
            for key in parse_numbers(&keys)? {
                steps.extend(log_or_error(tree.insert(key).map(|log| log.to_steps())));
            }
            for key in parse_numbers(delete.as_deref().unwrap_or(""))? {
                steps.extend(log_or_error(tree.delete(key).map(|log| log.to_steps())));
            }
            run_steps(steps, btree::PSEUDOCODE, PlayerConfig::new("B-Tree", interval))?;
        }
        Commands::Heap {
            max,
            values,
            extract,
        } => {
            let kind = if max { HeapKind::Max } else { HeapKind::Min };
            let mut heap = Heap::new(kind);
            let mut steps = heap.snapshot().to_steps();
            for value in parse_numbers(&values)? {
                steps.extend(heap.insert(value).to_steps());
            }
            for _ in 0..extract {
                steps.extend(log_or_error(heap.extract().map(|(_, log)| log.to_steps())));
            }
            run_steps(steps, heap::PSEUDOCODE, PlayerConfig::new("Binary Heap", interval))?;
        }
        Commands::Trie { words, delete } => {
            let mut trie = Trie::new();
            let mut steps = trie.snapshot().to_steps();
            for word in split_list(&words) {
                steps.extend(log_or_error(trie.insert(word).map(|log| log.to_steps())));
            }
            for word in split_list(delete.as_deref().unwrap_or("")) {
                steps.extend(log_or_error(trie.delete(word).map(|log| log.to_steps())));
            }
            run_steps(steps, trie::PSEUDOCODE, PlayerConfig::new("Trie", interval))?;
        }
    }

    Ok(())
}

/// A rejected tree operation becomes one error step; the tree is unchanged
fn log_or_error(result: Result<Vec<Step>, TreeError>) -> Vec<Step> {
    result.unwrap_or_else(|e| vec![Step::error(format!("Rejected: {}", e))])
}

fn run_steps(steps: Vec<Step>, pseudocode: &'static [&'static str], config: PlayerConfig) -> Result<()> {
    let playback = Playback::new(steps).context("nothing to play")?;
    run_player(Box::new(playback), pseudocode, config)
}

fn run_player(
    stepper: Box<dyn Stepper>,
    pseudocode: &'static [&'static str],
    config: PlayerConfig,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(stepper, pseudocode, config);
    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("player loop failed")
}

fn print_trace(steps: &[Step]) {
    for (idx, step) in steps.iter().enumerate() {
        let values: Vec<String> = step.values().iter().map(|v| v.to_string()).collect();
        println!(
            "{:>4}  line {:<3} {}  [{}]",
            idx + 1,
            step.code_line + 1,
            step.description,
            values.join(", ")
        );
    }
}

fn split_list(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_numbers(input: &str) -> Result<Vec<i64>> {
    split_list(input)
        .map(|s| s.parse::<i64>().with_context(|| format!("'{}' is not an integer", s)))
        .collect()
}

/// `"1,2;2;0"` is node 0 -> {1, 2}, node 1 -> {2}, node 2 -> {0}
fn parse_adjacency(input: &str) -> Result<Vec<Vec<usize>>> {
    input
        .split(';')
        .enumerate()
        .map(|(node, list)| {
            split_list(list)
                .map(|s| {
                    s.parse::<usize>()
                        .with_context(|| format!("node {}: '{}' is not a node id", node, s))
                })
                .collect()
        })
        .collect()
}

fn parse_edges(input: &str) -> Result<Vec<(usize, usize)>> {
    split_list(input)
        .map(|pair| {
            let Some((a, b)) = pair.split_once('-') else {
                bail!("edge '{}' is not of the form a-b", pair);
            };
            let a = a.trim().parse().with_context(|| format!("bad node in edge '{}'", pair))?;
            let b = b.trim().parse().with_context(|| format!("bad node in edge '{}'", pair))?;
            Ok((a, b))
        })
        .collect()
}

/// Nodes are created for every id up to the largest mentioned, laid out on a circle
fn build_bfs_graph(edges: &[(usize, usize)], start: usize) -> Result<bfs::BfsGraph> {
    let count = edges
        .iter()
        .flat_map(|&(a, b)| [a, b])
        .chain([start])
        .max()
        .map_or(1, |m| m + 1);
    let mut graph = bfs::BfsGraph::new();
    for k in 0..count {
        let angle = k as f64 / count as f64 * std::f64::consts::TAU;
        let x = 20 + (angle.cos() * 15.0).round() as i32;
        let y = 10 + (angle.sin() * 8.0).round() as i32;
        graph.add_node(x, y).context("too many nodes")?;
    }
    for &(a, b) in edges {
        if graph.toggle_edge(a, b).context("invalid edge")? {
            continue;
        }
        // listed twice: put it back
        graph.toggle_edge(a, b).context("invalid edge")?;
    }
    graph.set_start(start).context("invalid start node")?;
    Ok(graph)
}

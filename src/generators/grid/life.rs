//! Conway's Game of Life on a bounded grid
//!
//! This is a simulation, not a trace: [`LifeSimulation`] keeps only the
//! latest generation and computes the next one on demand.

use super::Grid;
use crate::errors::{GeneratorError, PlaybackError};
use crate::snapshot::{Step, Stepper};
use rand::Rng;
use std::borrow::Cow;

pub const PSEUDOCODE: &[&str] = &[
    "for each cell (x, y)",
    "  n = live neighbors among the 8 around (x, y)",
    "  if alive and n in {2, 3}: survives",
    "  else if dead and n == 3: born",
    "  else: dead",
];

/// Narration entries kept by the simulation
const NARRATION_LIMIT: usize = 64;

/// Result of one generation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub next: Grid,
    pub births: usize,
    pub deaths: usize,
    pub survivals: usize,
}

impl Grid {
    /// Seed every cell independently with probability `density`
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        density: f64,
        rng: &mut R,
    ) -> Result<Grid, GeneratorError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(GeneratorError::InvalidParameter {
                name: "density",
                reason: format!("{} is outside [0, 1]", density),
            });
        }
        let mut grid = Grid::new(width, height)?;
        for cell in grid.cells.iter_mut() {
            *cell = rng.gen_bool(density);
        }
        Ok(grid)
    }

    /// Live neighbors of (x, y); cells past the edge count as dead
    pub fn live_neighbors(&self, x: usize, y: usize) -> usize {
        let mut count = 0;
        for dy in [-1isize, 0, 1] {
            for dx in [-1isize, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (x as isize + dx, y as isize + dy);
                if nx >= 0 && ny >= 0 && self.get(nx as usize, ny as usize) {
                    count += 1;
                }
            }
        }
        count
    }
}

/// Apply the B3/S23 rules once
pub fn next_generation(grid: &Grid) -> Generation {
    let mut next = grid.clone();
    let (mut births, mut deaths, mut survivals) = (0, 0, 0);
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let alive = grid.get(x, y);
            let n = grid.live_neighbors(x, y);
            let lives = matches!((alive, n), (true, 2) | (true, 3) | (false, 3));
            match (alive, lives) {
                (true, true) => survivals += 1,
                (true, false) => deaths += 1,
                (false, true) => births += 1,
                (false, false) => {}
            }
            next.set(x, y, lives);
        }
    }
    Generation {
        next,
        births,
        deaths,
        survivals,
    }
}

/// Live simulation driven one generation at a time by the player
#[derive(Debug, Clone)]
pub struct LifeSimulation {
    initial: Grid,
    current: Grid,
    generation: usize,
    last: Option<(usize, usize, usize)>,
    narration: Vec<String>,
}

impl LifeSimulation {
    pub fn new(initial: Grid) -> Self {
        let narration = vec![opening_line(&initial)];
        LifeSimulation {
            current: initial.clone(),
            initial,
            generation: 0,
            last: None,
            narration,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.current
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Replace the current generation with the next one
    pub fn advance(&mut self) -> Generation {
        let generation = next_generation(&self.current);
        self.generation += 1;
        self.last = Some((generation.births, generation.deaths, generation.survivals));
        self.log(format!(
            "Generation {}: {} born, {} died, {} survived",
            self.generation, generation.births, generation.deaths, generation.survivals
        ));
        self.current = generation.next.clone();
        tracing::trace!(
            generation = self.generation,
            population = self.current.population(),
            "life advanced"
        );
        generation
    }

    fn log(&mut self, line: String) {
        if self.narration.len() == NARRATION_LIMIT {
            self.narration.remove(0);
        }
        self.narration.push(line);
    }
}

fn opening_line(grid: &Grid) -> String {
    format!("Generation 0: {} live cells", grid.population())
}

impl Stepper for LifeSimulation {
    fn current(&self) -> Cow<'_, Step> {
        let description = self
            .narration
            .last()
            .cloned()
            .unwrap_or_else(|| opening_line(&self.current));
        let mut step = self
            .current
            .to_step(description, if self.last.is_some() { 1 } else { 0 })
            .with_info("generation", self.generation)
            .with_info("population", self.current.population());
        if let Some((births, deaths, survivals)) = self.last {
            step = step
                .with_info("births", births)
                .with_info("deaths", deaths)
                .with_info("survivals", survivals);
        }
        Cow::Owned(step)
    }

    fn step_forward(&mut self) -> Result<(), PlaybackError> {
        self.advance();
        Ok(())
    }

    fn step_backward(&mut self) -> Result<(), PlaybackError> {
        Err(PlaybackError::Rejected(
            "the simulation keeps only the latest generation".to_string(),
        ))
    }

    fn rewind_to_start(&mut self) -> Result<(), PlaybackError> {
        self.current = self.initial.clone();
        self.generation = 0;
        self.last = None;
        self.narration = vec![opening_line(&self.initial)];
        Ok(())
    }

    fn position(&self) -> usize {
        self.generation
    }

    fn total(&self) -> Option<usize> {
        None
    }

    fn narration(&self) -> Vec<String> {
        self.narration.clone()
    }
}

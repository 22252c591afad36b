//! Perfect maze carving with an explicit-stack randomized DFS
//!
//! Rooms sit on odd coordinates and walls on even ones. The generator yields a
//! single step holding the finished map; there is no carving animation.

use super::Grid;
use crate::errors::GeneratorError;
use crate::snapshot::Step;
use rand::Rng;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

pub const PSEUDOCODE: &[&str] = &[
    "fill the grid with walls; open (1, 1); push (1, 1)",
    "while the stack is not empty",
    "  c = top of stack",
    "  if c has unvisited rooms two cells away",
    "    pick one at random, open it and the wall between, push it",
    "  else pop",
    "open the entrance and the exit",
];

/// Smallest legal side length
pub const MIN_SIDE: usize = 5;

/// Carved maze; set cells are walls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    walls: Grid,
}

impl Maze {
    /// Carve a `width` x `height` maze; both sides must be odd and at least 5
    pub fn generate<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Result<Maze, GeneratorError> {
        let problem = if width < MIN_SIDE || height < MIN_SIDE {
            Some("both sides must be at least 5")
        } else if width % 2 == 0 || height % 2 == 0 {
            Some("both sides must be odd")
        } else {
            None
        };
        if let Some(reason) = problem {
            tracing::warn!(width, height, reason, "maze dimensions rejected");
            return Err(GeneratorError::InvalidDimensions { width, height, reason });
        }

        let mut walls = Grid::new(width, height)?;
        for cell in walls.cells.iter_mut() {
            *cell = true;
        }

        let mut stack = vec![(1usize, 1usize)];
        walls.set(1, 1, false);
        while let Some(&(x, y)) = stack.last() {
            let mut options: Vec<(usize, usize)> = Vec::with_capacity(4);
            if y >= 3 && walls.get(x, y - 2) {
                options.push((x, y - 2));
            }
            if x + 2 < width - 1 && walls.get(x + 2, y) {
                options.push((x + 2, y));
            }
            if y + 2 < height - 1 && walls.get(x, y + 2) {
                options.push((x, y + 2));
            }
            if x >= 3 && walls.get(x - 2, y) {
                options.push((x - 2, y));
            }

            if options.is_empty() {
                stack.pop();
                continue;
            }
            let (nx, ny) = options[rng.gen_range(0..options.len())];
            walls.set((x + nx) / 2, (y + ny) / 2, false);
            walls.set(nx, ny, false);
            stack.push((nx, ny));
        }

        walls.set(1, 0, false);
        walls.set(width - 2, height - 1, false);
        tracing::debug!(width, height, "maze carved");
        Ok(Maze { walls })
    }

    pub fn width(&self) -> usize {
        self.walls.width()
    }

    pub fn height(&self) -> usize {
        self.walls.height()
    }

    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.walls.get(x, y)
    }

    pub fn grid(&self) -> &Grid {
        &self.walls
    }

    /// Opening on the top row, as (x, y)
    pub fn entrance(&self) -> (usize, usize) {
        (1, 0)
    }

    /// Opening on the bottom row, as (x, y)
    pub fn exit(&self) -> (usize, usize) {
        (self.width() - 2, self.height() - 1)
    }

    /// Open cells reachable from the entrance
    pub fn reachable(&self) -> FxHashSet<(usize, usize)> {
        let mut seen = FxHashSet::default();
        let start = self.entrance();
        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some((x, y)) = queue.pop_front() {
            let mut next = Vec::with_capacity(4);
            if x > 0 {
                next.push((x - 1, y));
            }
            if y > 0 {
                next.push((x, y - 1));
            }
            next.push((x + 1, y));
            next.push((x, y + 1));
            for (nx, ny) in next {
                if nx < self.width() && ny < self.height() && !self.is_wall(nx, ny) && seen.insert((nx, ny)) {
                    queue.push_back((nx, ny));
                }
            }
        }
        seen
    }

    /// Flood fill from the entrance reaches the exit and every open cell
    pub fn is_connected(&self) -> bool {
        let reached = self.reachable();
        let open = self.walls.cells.iter().filter(|&&wall| !wall).count();
        reached.contains(&self.exit()) && reached.len() == open
    }

    pub fn to_step(&self) -> Step {
        let (ex, ey) = self.entrance();
        let (xx, xy) = self.exit();
        let mut step = self
            .walls
            .to_step(
                format!("Carved a {}x{} maze; enter at the top, leave at the bottom", self.width(), self.height()),
                6,
            )
            .with_info("entrance", vec![ex as i64, ey as i64])
            .with_info("exit", vec![xx as i64, xy as i64]);
        // the only step is also the final one
        for cell in step.array.iter_mut() {
            cell.is_sorted = true;
        }
        step
    }
}

/// Trace for the registry: exactly one step
pub fn steps<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Result<Vec<Step>, GeneratorError> {
    Ok(vec![Maze::generate(width, height, rng)?.to_step()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn every_seed_yields_a_connected_maze() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let maze = Maze::generate(21, 15, &mut rng).unwrap();
            assert!(maze.is_connected(), "seed {} left a region unreachable", seed);
        }
    }

    #[test]
    fn carving_forms_a_spanning_tree() {
        let mut rng = StdRng::seed_from_u64(42);
        let (w, h) = (15, 11);
        let maze = Maze::generate(w, h, &mut rng).unwrap();
        let rooms = ((w - 1) / 2) * ((h - 1) / 2);
        let open = (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter(|&(x, y)| !maze.is_wall(x, y))
            .count();
        // rooms + (rooms - 1) opened walls + entrance + exit
        assert_eq!(open, 2 * rooms - 1 + 2);
    }

    #[test]
    fn openings_are_on_the_boundary() {
        let mut rng = StdRng::seed_from_u64(3);
        let maze = Maze::generate(7, 9, &mut rng).unwrap();
        assert!(!maze.is_wall(1, 0));
        assert!(!maze.is_wall(5, 8));
        assert!(maze.is_wall(0, 0));
    }

    #[test]
    fn bad_dimensions_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            Maze::generate(6, 7, &mut rng),
            Err(GeneratorError::InvalidDimensions { .. })
        ));
        assert!(Maze::generate(7, 3, &mut rng).is_err());
    }

    #[test]
    fn huge_dimensions_fail_without_allocating() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = Maze::generate(usize::MAX, usize::MAX, &mut rng).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidDimensions { .. }));
        assert!(Maze::generate(100_001, 100_001, &mut rng).is_err());
    }

    #[test]
    fn final_step_flags_every_cell_terminal() {
        let mut rng = StdRng::seed_from_u64(5);
        let steps = steps(11, 7, &mut rng).unwrap();
        assert!(steps[0].array.iter().all(|cell| cell.is_sorted));
        assert_eq!(steps[0].array.len(), 77);
    }

    #[test]
    fn trace_has_a_single_step() {
        let mut rng = StdRng::seed_from_u64(9);
        let steps = steps(9, 9, &mut rng).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].array.len(), 81);
        assert_eq!(steps[0].info["width"].as_int(), Some(9));
    }
}

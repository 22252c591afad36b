//! Boolean cell grids shared by the Game of Life and the maze generator

pub mod life;
pub mod maze;

use crate::config::MAX_GRID_CELLS;
use crate::errors::GeneratorError;
use crate::snapshot::{ArrayElement, Step};

/// Row-major grid of boolean cells
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Result<Self, GeneratorError> {
        if width == 0 || height == 0 {
            return Err(GeneratorError::InvalidDimensions {
                width,
                height,
                reason: "both dimensions must be positive",
            });
        }
        let Some(len) = width.checked_mul(height).filter(|&len| len <= MAX_GRID_CELLS) else {
            tracing::warn!(width, height, "grid dimensions exceed the cell cap");
            return Err(GeneratorError::InvalidDimensions {
                width,
                height,
                reason: "grid has too many cells",
            });
        };
        Ok(Grid {
            width,
            height,
            cells: vec![false; len],
        })
    }

    /// Parse rows of `#`/`O` (set) and `.` (clear). All rows must share one width.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GeneratorError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut grid = Grid::new(width, height)?;
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(GeneratorError::InvalidDimensions {
                    width,
                    height,
                    reason: "rows have different lengths",
                });
            }
            for (x, c) in row.chars().enumerate() {
                grid.set(x, y, matches!(c, '#' | 'O' | '1'));
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = value;
        }
    }

    /// Number of set cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.width)
    }

    /// Rows as 0/1 integers for `info["grid"]`
    pub fn to_table(&self) -> Vec<Vec<i64>> {
        self.rows()
            .map(|row| row.iter().map(|&c| i64::from(c)).collect())
            .collect()
    }

    /// Render into a step: the array is the flattened grid, set cells selected
    pub fn to_step(&self, description: impl Into<String>, code_line: usize) -> Step {
        let array = self
            .cells
            .iter()
            .enumerate()
            .map(|(k, &c)| {
                let mut e = ArrayElement::new(i64::from(c), k);
                e.is_selected = c;
                e
            })
            .collect();
        Step::new(array, description, code_line)
            .with_info("grid", self.to_table())
            .with_info("width", self.width)
            .with_info("height", self.height)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|&c| if c { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows() {
        let grid = Grid::from_rows(&[".#.", "##."]).unwrap();
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert!(grid.get(1, 0));
        assert!(!grid.get(2, 1));
        assert_eq!(grid.population(), 3);
        assert_eq!(grid.to_string(), ".#.\n##.\n");
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(Grid::from_rows(&["..", "..."]).is_err());
        assert!(Grid::from_rows(&[]).is_err());
    }

    #[test]
    fn oversized_grids_are_rejected_before_allocating() {
        let err = Grid::new(usize::MAX, 3).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidDimensions { width: usize::MAX, height: 3, .. }));
        assert!(Grid::new(MAX_GRID_CELLS + 1, 1).is_err());
        assert!(Grid::new(MAX_GRID_CELLS, 1).is_ok());
    }

    #[test]
    fn out_of_bounds_reads_are_dead() {
        let grid = Grid::new(2, 2).unwrap();
        assert!(!grid.get(5, 0));
    }
}

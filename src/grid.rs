use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::Rng;
use thiserror::Error;

use crate::Coord;
use crate::patterns::Pattern;
use crate::rule_set::B3S23;
use crate::rule_set::RuleSet;

/// Fraction of cells brought to life by [`Grid::randomize`] when the caller has no preference.
pub const DEFAULT_DENSITY: f64 = 0.3;

/// The Moore neighborhood, without the center cell.
const NEIGHBORHOOD: [(Coord, Coord); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid dimensions must be positive, got {rows}x{cols}")]
    EmptyDimension { rows: usize, cols: usize },

    #[error("Grid dimensions {rows}x{cols} do not fit in cell coordinates")]
    Oversized { rows: usize, cols: usize },

    #[error("A {rows}x{cols} grid holds {exp} cells, but {got} were given")]
    CellCount {
        rows: usize,
        cols: usize,
        exp: usize,
        got: usize,
    },

    #[error("Unexpected '{got}' on line {line}, column {col}")]
    UnexpectedChar { line: usize, col: usize, got: char },

    #[error("Line {line} holds {got} cells, expected {exp}")]
    RaggedLine { line: usize, exp: usize, got: usize },
}

/// A fixed-size, immutable board of cells.
///
/// Every transformation returns a new `Grid`. The cell buffer is shared between clones and only
/// copied when one of them is changed, so handing a `Grid` out for rendering is cheap.
///
/// Cells are stored in row-major order, `index = row * cols + col`. Coordinates outside the board
/// read as dead and writes to them are ignored: the board is surrounded by a permanently dead
/// border, it does not wrap around.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Arc<Vec<bool>>,
}

impl Grid {
    /// Build a grid from a row-major cell buffer.
    pub fn new(rows: usize, cols: usize, cells: Vec<bool>) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyDimension { rows, cols });
        }

        let fits = |n: usize| Coord::try_from(n).is_ok();
        if !fits(rows) || !fits(cols) {
            return Err(GridError::Oversized { rows, cols });
        }

        let exp = rows
            .checked_mul(cols)
            .ok_or(GridError::Oversized { rows, cols })?;

        if cells.len() != exp {
            return Err(GridError::CellCount {
                rows,
                cols,
                exp,
                got: cells.len(),
            });
        }

        Ok(Self {
            rows,
            cols,
            cells: Arc::new(cells),
        })
    }

    /// An all-dead grid.
    pub fn empty(rows: usize, cols: usize) -> Result<Self, GridError> {
        let len = rows.checked_mul(cols).unwrap_or(0);

        Self::new(rows, cols, vec![false; len]).map_err(|e| match e {
            // `checked_mul` overflowed, so report the dimensions rather than a bogus count
            GridError::CellCount { .. } => GridError::Oversized { rows, cols },
            e => e,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the cell at `(row, col)` is alive. Anything off the board is dead.
    pub fn get(&self, row: Coord, col: Coord) -> bool {
        self.index(row, col).is_some_and(|i| self.cells[i])
    }

    /// Returns a grid where the cell at `(row, col)` is `alive`. Off-board writes are ignored.
    pub fn set(&self, row: Coord, col: Coord, alive: bool) -> Grid {
        let mut next = self.clone();

        if let Some(i) = self.index(row, col) {
            if self.cells[i] != alive {
                Arc::make_mut(&mut next.cells)[i] = alive;
            }
        }

        next
    }

    pub fn toggle(&self, row: Coord, col: Coord) -> Grid {
        self.set(row, col, !self.get(row, col))
    }

    /// Number of live cells among the 8 surrounding `(row, col)`.
    ///
    /// Cells on the edge simply have fewer neighbors on the board.
    pub fn count_neighbors(&self, row: Coord, col: Coord) -> u8 {
        NEIGHBORHOOD
            .iter()
            .filter(|&&(dr, dc)| {
                let (Some(r), Some(c)) = (row.checked_add(dr), col.checked_add(dc)) else {
                    return false;
                };

                self.get(r, c)
            })
            .count() as u8
    }

    /// Advance one generation under Conway's rules (B3/S23).
    pub fn next_generation(&self) -> Grid {
        self.next_generation_with(&B3S23)
    }

    /// Advance one generation under `rules`.
    ///
    /// Every cell is decided from this grid alone; the result is written to a fresh buffer.
    pub fn next_generation_with(&self, rules: &RuleSet) -> Grid {
        let cells = self
            .coords()
            .map(|(row, col)| rules.next_state(self.get(row, col), self.count_neighbors(row, col)))
            .collect();

        self.with_cells(cells)
    }

    /// A grid of the same size with every cell dead.
    pub fn clear(&self) -> Grid {
        self.with_cells(vec![false; self.cells.len()])
    }

    /// A grid of the same size where each cell is alive with probability `density`, using the
    /// thread-local generator.
    pub fn randomize(&self, density: f64) -> Grid {
        self.randomize_with(density, &mut rand::thread_rng())
    }

    /// Like [`Grid::randomize`], drawing from `rng`. A seeded generator gives reproducible grids.
    ///
    /// `density` is clamped into `[0, 1]`, and NaN counts as 0.
    pub fn randomize_with<R>(&self, density: f64, rng: &mut R) -> Grid
    where
        R: Rng + ?Sized,
    {
        let p = if density.is_nan() {
            0.0
        } else {
            density.clamp(0.0, 1.0)
        };

        let cells = (0..self.cells.len()).map(|_| rng.gen_bool(p)).collect();

        self.with_cells(cells)
    }

    /// Bring `pattern` to life with its top-left corner at `(row, col)`. Cells of the pattern that
    /// land off the board are dropped.
    pub fn stamp(&self, pattern: &Pattern, row: Coord, col: Coord) -> Grid {
        let mut next = self.clone();

        for &(dr, dc) in pattern.cells {
            let (Some(r), Some(c)) = (row.checked_add(dr), col.checked_add(dc)) else {
                continue;
            };

            if let Some(i) = self.index(r, c) {
                Arc::make_mut(&mut next.cells)[i] = true;
            }
        }

        next
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// True when no cell is alive.
    pub fn is_extinct(&self) -> bool {
        !self.cells.contains(&true)
    }

    /// Coordinates of every live cell, in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = (Coord, Coord)> + '_ {
        self.coords().filter(move |&(row, col)| self.get(row, col))
    }

    /// Every on-board coordinate, in row-major order.
    fn coords(&self) -> impl Iterator<Item = (Coord, Coord)> {
        // Dimensions are checked to fit in `Coord` on construction
        let (rows, cols) = (self.rows as Coord, self.cols as Coord);

        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    fn index(&self, row: Coord, col: Coord) -> Option<usize> {
        let row = usize::try_from(row).ok().filter(|&r| r < self.rows)?;
        let col = usize::try_from(col).ok().filter(|&c| c < self.cols)?;

        Some(row * self.cols + col)
    }

    fn with_cells(&self, cells: Vec<bool>) -> Grid {
        debug_assert_eq!(cells.len(), self.rows * self.cols);

        Grid {
            rows: self.rows,
            cols: self.cols,
            cells: Arc::new(cells),
        }
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.rows, self.cols)?;
        write!(f, "{self}")
    }
}

/// Plaintext rendering: one line per row, `O` for a live cell and `.` for a dead one.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.cols).enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }

            for &alive in row {
                f.write_str(if alive { "O" } else { "." })?;
            }
        }

        Ok(())
    }
}

/// Reads the plaintext form written by `Display`. `*` is also accepted for a live cell and lines
/// starting with `!` are comments. A blank line is a row of dead cells, except at the end of the
/// text where blank lines are dropped. Every other row must have the same width.
///
/// See: https://conwaylife.com/wiki/Plaintext
impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = Vec::new();

        for (line_no, line) in s.lines().enumerate() {
            let line = line.trim_end();
            if line.starts_with('!') {
                continue;
            }

            let line_no = line_no + 1;

            let row = line
                .chars()
                .enumerate()
                .map(|(col, c)| match c {
                    '.' => Ok(false),
                    'O' | '*' => Ok(true),
                    got => Err(GridError::UnexpectedChar {
                        line: line_no,
                        col: col + 1,
                        got,
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;

            lines.push((line_no, row));
        }

        while lines.last().is_some_and(|(_, row)| row.is_empty()) {
            lines.pop();
        }

        let cols = lines
            .iter()
            .map(|(_, row)| row.len())
            .find(|&width| width > 0)
            .unwrap_or(0);

        let mut cells = Vec::with_capacity(lines.len() * cols);

        for (line, row) in &lines {
            match row.len() {
                0 => cells.resize(cells.len() + cols, false),
                got if got == cols => cells.extend(row),
                got => {
                    return Err(GridError::RaggedLine {
                        line: *line,
                        exp: cols,
                        got,
                    });
                }
            }
        }

        Grid::new(lines.len(), cols, cells)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::patterns::BLINKER;

    fn grid(s: &str) -> Grid {
        s.parse().unwrap()
    }

    #[test]
    fn construction_rejects_bad_dimensions() {
        assert_eq!(
            Grid::empty(0, 3),
            Err(GridError::EmptyDimension { rows: 0, cols: 3 })
        );
        assert_eq!(
            Grid::empty(3, 0),
            Err(GridError::EmptyDimension { rows: 3, cols: 0 })
        );
        assert_eq!(
            Grid::new(2, 2, vec![false; 3]),
            Err(GridError::CellCount {
                rows: 2,
                cols: 2,
                exp: 4,
                got: 3
            })
        );
        assert_eq!(
            Grid::empty(usize::MAX, 2),
            Err(GridError::Oversized {
                rows: usize::MAX,
                cols: 2
            })
        );
    }

    #[test]
    fn out_of_bounds_reads_are_dead() {
        let g = Grid::new(2, 2, vec![true; 4]).unwrap();

        assert!(g.get(0, 0));
        assert!(g.get(1, 1));
        assert!(!g.get(-1, 0));
        assert!(!g.get(0, -1));
        assert!(!g.get(2, 0));
        assert!(!g.get(0, 2));
        assert!(!g.get(Coord::MIN, Coord::MAX));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let g = Grid::empty(3, 3).unwrap();

        assert_eq!(g.set(3, 0, true), g);
        assert_eq!(g.set(0, -1, true), g);
        assert_eq!(g.toggle(-5, 7), g);
    }

    #[test]
    fn set_leaves_source_untouched() {
        let g = Grid::empty(3, 3).unwrap();
        let h = g.set(1, 1, true);

        assert!(!g.get(1, 1));
        assert!(h.get(1, 1));
        assert_eq!(h.population(), 1);
    }

    #[test]
    fn neighbors_at_corners_and_center() {
        let g = Grid::new(3, 3, vec![true; 9]).unwrap();

        assert_eq!(g.count_neighbors(1, 1), 8);
        assert_eq!(g.count_neighbors(0, 0), 3);
        assert_eq!(g.count_neighbors(0, 1), 5);
        assert_eq!(g.count_neighbors(2, 2), 3);

        // Just off the board still sees its on-board neighbors
        assert_eq!(g.count_neighbors(-1, -1), 1);
        assert_eq!(g.count_neighbors(Coord::MAX, Coord::MAX), 0);
    }

    #[test]
    fn edges_do_not_wrap() {
        // A toroidal board would give the left column neighbors in the right column
        let g = grid("O..O\n....\nO..O");

        assert_eq!(g.count_neighbors(0, 0), 0);
        assert_eq!(g.count_neighbors(1, 0), 2);
        assert!(g.next_generation().is_extinct());
    }

    #[test]
    fn generation_uses_previous_state_only() {
        // Updating in place while scanning would let the first births feed later ones
        let g = grid(
            "\
.....
.OOO.
.....",
        );

        insta::assert_snapshot!(g.next_generation(), @r"
        ..O..
        ..O..
        ..O..
        ");
    }

    #[test]
    fn clear_kills_everything() {
        let g = Grid::new(4, 5, vec![true; 20]).unwrap();
        let c = g.clear();

        assert_eq!((c.rows(), c.cols()), (4, 5));
        assert!(c.is_extinct());
    }

    #[test]
    fn randomize_extremes() {
        let g = Grid::empty(6, 7).unwrap();

        assert!(g.randomize(0.0).is_extinct());
        assert_eq!(g.randomize(1.0).population(), 42);
        assert!(g.randomize(f64::NAN).is_extinct());
        assert_eq!(g.randomize(3.5).population(), 42);
    }

    #[test]
    fn seeded_randomize_is_reproducible() {
        let g = Grid::empty(20, 20).unwrap();

        let a = g.randomize_with(DEFAULT_DENSITY, &mut StdRng::seed_from_u64(7));
        let b = g.randomize_with(DEFAULT_DENSITY, &mut StdRng::seed_from_u64(7));

        assert_eq!(a, b);
        assert!(!a.is_extinct());
    }

    #[test]
    fn randomize_density_is_roughly_respected() {
        let g = Grid::empty(100, 100).unwrap();
        let r = g.randomize_with(DEFAULT_DENSITY, &mut StdRng::seed_from_u64(42));

        let live = r.population() as f64 / 10_000.0;
        assert!((0.25..0.35).contains(&live), "density was {live}");
    }

    #[test]
    fn stamp_clips_at_edges() {
        let g = Grid::empty(3, 4).unwrap().stamp(&BLINKER, 1, 2);

        insta::assert_snapshot!(g, @r"
        ....
        ..OO
        ....
        ");
    }

    #[test]
    fn live_cells_in_row_major_order() {
        let g = grid(".O\nO.\n.O");

        assert_eq!(g.live_cells().collect::<Vec<_>>(), vec![(0, 1), (1, 0), (2, 1)]);
    }

    #[test]
    fn parse_plaintext() {
        let g = grid("!Name: Glider\n.O.\n..O\nOOO\n");

        assert_eq!((g.rows(), g.cols()), (3, 3));
        assert_eq!(g.population(), 5);
        assert_eq!(g, grid(".*.\n..*\n***"));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "..\n.x".parse::<Grid>(),
            Err(GridError::UnexpectedChar {
                line: 2,
                col: 2,
                got: 'x'
            })
        );
        assert_eq!(
            "...\n..".parse::<Grid>(),
            Err(GridError::RaggedLine {
                line: 2,
                exp: 3,
                got: 2
            })
        );
        assert_eq!(
            "".parse::<Grid>(),
            Err(GridError::EmptyDimension { rows: 0, cols: 0 })
        );
    }

    #[test]
    fn parse_blank_lines() {
        // Inside the pattern a blank line is an empty row; at the end it is dropped
        let g = grid("O.\n\n.O\n\n\n");

        assert_eq!((g.rows(), g.cols()), (3, 2));
        assert_eq!(g.live_cells().collect::<Vec<_>>(), vec![(0, 0), (2, 1)]);
        assert_eq!(grid("OO\n\n"), grid("OO"));

        assert_eq!(
            "\n\n".parse::<Grid>(),
            Err(GridError::EmptyDimension { rows: 0, cols: 0 })
        );
    }

    #[test]
    fn display_round_trips() {
        let g = grid("O..\n.O.\n..O\nOOO");

        assert_eq!(g.to_string().parse::<Grid>(), Ok(g));
    }
}

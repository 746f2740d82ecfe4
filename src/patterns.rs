use crate::Coord;

/// A small hand-placed configuration of live cells.
///
/// Cells are `(row, col)` offsets from the pattern's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub cells: &'static [(Coord, Coord)],
}

/// ```notrust
/// .O.
/// ..O
/// OOO
/// ```
///
/// Travels one cell down and one cell right every 4 generations.
pub const GLIDER: Pattern = Pattern {
    cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
};

/// Period 2 oscillator, horizontal phase.
pub const BLINKER: Pattern = Pattern {
    cells: &[(0, 0), (0, 1), (0, 2)],
};

/// Still life.
pub const BLOCK: Pattern = Pattern {
    cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
};

pub const TOAD: Pattern = Pattern {
    cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
};

pub const BEACON: Pattern = Pattern {
    cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
};

/// Methuselah that takes over a thousand generations to settle on an unbounded plane.
pub const R_PENTOMINO: Pattern = Pattern {
    cells: &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
};

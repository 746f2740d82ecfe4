use std::ops::RangeInclusive;

use crate::Coord;

/// Smallest and largest board side picked from the available drawing area.
pub const DEFAULT_BOUNDS: RangeInclusive<usize> = 20..=60;

/// Size of one cell on screen, in whatever unit the drawing area is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u16,
    pub height: u16,
}

impl CellSize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    // A zero-sized cell would divide by zero, so it counts as one unit
    fn width(&self) -> u16 {
        self.width.max(1)
    }

    fn height(&self) -> u16 {
        self.height.max(1)
    }
}

/// Board dimensions `(rows, cols)` for a drawing area of `width` x `height`.
///
/// `reserved` rows of the area are kept for controls. Each side is the number of whole cells that
/// fit, clamped into `bounds`. An empty or inverted `bounds` falls back to [`DEFAULT_BOUNDS`].
pub fn fit(
    width: u16,
    height: u16,
    reserved: u16,
    cell: CellSize,
    bounds: RangeInclusive<usize>,
) -> (usize, usize) {
    let bounds = if bounds.is_empty() || *bounds.start() == 0 {
        DEFAULT_BOUNDS
    } else {
        bounds
    };

    let (min, max) = (*bounds.start(), *bounds.end());

    let cols = (width / cell.width()) as usize;
    let rows = (height.saturating_sub(reserved) / cell.height()) as usize;

    (rows.clamp(min, max), cols.clamp(min, max))
}

/// The `(row, col)` under the position `(x, y)` of a board drawn with its top-left corner at
/// `origin`. Positions left of or above the board give `None`; positions past its far edges are
/// returned as is and left to the board's own bounds handling.
pub fn cell_at(x: u16, y: u16, origin: (u16, u16), cell: CellSize) -> Option<(Coord, Coord)> {
    let dx = x.checked_sub(origin.0)?;
    let dy = y.checked_sub(origin.1)?;

    let col = (dx / cell.width()) as Coord;
    let row = (dy / cell.height()) as Coord;

    Some((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    // One cell per 15 units, 200 units kept for the controls
    const PHONE_CELL: CellSize = CellSize::new(15, 15);

    #[test]
    fn fit_divides_and_clamps() {
        assert_eq!(fit(411, 891, 200, PHONE_CELL, DEFAULT_BOUNDS), (46, 27));
        assert_eq!(fit(100, 100, 200, PHONE_CELL, DEFAULT_BOUNDS), (20, 20));
        assert_eq!(fit(2000, 2000, 0, PHONE_CELL, DEFAULT_BOUNDS), (60, 60));
    }

    #[test]
    fn fit_with_terminal_cells() {
        let cell = CellSize::new(2, 1);
        assert_eq!(fit(120, 45, 3, cell, 10..=80), (42, 60));
    }

    #[test]
    fn fit_rejects_degenerate_bounds() {
        #[allow(clippy::reversed_empty_ranges)]
        let inverted = 60..=20;

        assert_eq!(fit(411, 891, 200, PHONE_CELL, inverted), (46, 27));
        assert_eq!(fit(15, 15, 0, PHONE_CELL, 0..=5), (20, 20));
    }

    #[test]
    fn zero_sized_cell() {
        assert_eq!(fit(30, 30, 0, CellSize::new(0, 0), DEFAULT_BOUNDS), (30, 30));
        assert_eq!(cell_at(3, 4, (0, 0), CellSize::new(0, 0)), Some((4, 3)));
    }

    #[test]
    fn cell_at_truncates() {
        let cell = CellSize::new(2, 1);

        assert_eq!(cell_at(0, 1, (0, 1), cell), Some((0, 0)));
        assert_eq!(cell_at(5, 3, (0, 1), cell), Some((2, 2)));
        assert_eq!(cell_at(5, 0, (0, 1), cell), None);
        assert_eq!(cell_at(1, 4, (2, 1), cell), None);
    }
}

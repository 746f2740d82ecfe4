use std::collections::HashSet;

use crate::Coord;
use crate::controller::Controller;
use crate::scheduler::Scheduler;

/// One press-drag-release gesture painting cells.
///
/// The first cell is toggled and its new state becomes the paint. Every other cell crossed by the
/// drag is set to the paint, each at most once per stroke, so wiggling back over a cell does not
/// flip it again. Ending the stroke is dropping it.
#[derive(Debug)]
pub struct Stroke {
    paint: bool,
    touched: HashSet<(Coord, Coord)>,
}

impl Stroke {
    /// Start a stroke on `(row, col)`. Returns `None`, and changes nothing, when the cell is off
    /// the board.
    pub fn begin<S: Scheduler>(
        controller: &mut Controller<S>,
        row: Coord,
        col: Coord,
    ) -> Option<Stroke> {
        if !on_board(controller, row, col) {
            return None;
        }

        let paint = !controller.grid().get(row, col);
        controller.toggle_cell(row, col);

        Some(Stroke {
            paint,
            touched: HashSet::from([(row, col)]),
        })
    }

    /// Continue the stroke over `(row, col)`.
    pub fn extend<S: Scheduler>(&mut self, controller: &mut Controller<S>, row: Coord, col: Coord) {
        if !on_board(controller, row, col) || !self.touched.insert((row, col)) {
            return;
        }

        if controller.grid().get(row, col) != self.paint {
            controller.toggle_cell(row, col);
        }
    }

    /// State painted onto the cells of this stroke
    pub fn paint(&self) -> bool {
        self.paint
    }
}

fn on_board<S: Scheduler>(controller: &Controller<S>, row: Coord, col: Coord) -> bool {
    let grid = controller.grid();

    usize::try_from(row).is_ok_and(|r| r < grid.rows())
        && usize::try_from(col).is_ok_and(|c| c < grid.cols())
}

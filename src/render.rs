use crate::Coord;
use crate::controller::Controller;
use crate::grid::Grid;
use crate::layout::CellSize;
use crate::scheduler::Scheduler;

const ALIVE: char = '█';
const DEAD: char = '·';
const CURSOR_ALIVE: char = '▓';
const CURSOR_DEAD: char = '░';

/// Turns a board into text, one glyph per screen unit.
///
/// Each cell is drawn `cell.width` glyphs wide and `cell.height` lines tall. The frame buffer is
/// kept between frames so redrawing does not allocate once it has grown to the board's size.
pub struct Canvas {
    /// The frame buffer
    fb: String,

    cell: CellSize,
}

impl Canvas {
    pub fn new(cell: CellSize) -> Self {
        Self {
            fb: String::new(),
            cell,
        }
    }

    /// Draw `grid`, marking the cell under `cursor` if there is one. Lines are separated by `\n`,
    /// with no trailing newline.
    pub fn render(&mut self, grid: &Grid, cursor: Option<(Coord, Coord)>) -> &str {
        self.fb.clear();

        let (w, h) = (self.cell.width.max(1), self.cell.height.max(1));

        for row in 0..grid.rows() as Coord {
            for _ in 0..h {
                if !self.fb.is_empty() {
                    self.fb.push('\n');
                }

                for col in 0..grid.cols() as Coord {
                    let alive = grid.get(row, col);

                    let glyph = match (cursor == Some((row, col)), alive) {
                        (false, true) => ALIVE,
                        (false, false) => DEAD,
                        (true, true) => CURSOR_ALIVE,
                        (true, false) => CURSOR_DEAD,
                    };

                    for _ in 0..w {
                        self.fb.push(glyph);
                    }
                }
            }
        }

        &self.fb
    }
}

/// One line summary of the session: generation, playback state, speed and population.
pub fn status_line<S: Scheduler>(controller: &Controller<S>) -> String {
    let state = if controller.is_playing() {
        "running"
    } else {
        "paused"
    };

    let grid = controller.grid();

    format!(
        "gen {} | {} | speed {} ({}ms) | {}x{} | pop {}",
        controller.generation(),
        state,
        controller.speed().get(),
        controller.delay_millis(),
        grid.rows(),
        grid.cols(),
        grid.population(),
    )
}

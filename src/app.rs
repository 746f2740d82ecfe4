use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;
use tracing::error;
use tracing::info;

use crate::Coord;
use crate::brush::Stroke;
use crate::config::Config;
use crate::controller::Controller;
use crate::events::AppEvent;
use crate::events::EditEvent;
use crate::events::Event;
use crate::events::SimEvent;
use crate::grid::GridError;
use crate::layout;
use crate::scheduler::Scheduler;

/// The interactive session behind the terminal front end.
///
/// Editing the board (cursor toggles and mouse strokes) and single steps are only accepted while
/// playback is paused.
pub struct App<S: Scheduler> {
    controller: Controller<S>,
    config: Config,
    rng: StdRng,

    /// Keyboard cursor, always on the board
    cursor: (Coord, Coord),

    /// Mouse stroke in progress
    stroke: Option<Stroke>,

    exit: bool,
}

impl<S: Scheduler> App<S> {
    pub fn new(config: Config, scheduler: S) -> Result<Self, GridError> {
        let mut controller = Controller::new(config.rows, config.cols, scheduler)?;
        controller.update_speed(config.speed);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            controller,
            config,
            rng,
            cursor: (0, 0),
            stroke: None,
            exit: false,
        })
    }

    pub fn controller(&self) -> &Controller<S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller<S> {
        &mut self.controller
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cursor(&self) -> (Coord, Coord) {
        self.cursor
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    /// Run the generation that has come due, if any. Returns whether one was taken.
    pub fn tick(&mut self) -> bool {
        self.controller.poll()
    }

    pub fn handle(&mut self, event: Event) {
        match event {
            Event::SimEvent(event) => self.handle_sim(event),
            Event::EditEvent(event) => self.handle_edit(event),
            Event::AppEvent(AppEvent::Resize { cols, rows }) => self.resize(cols, rows),
            Event::AppEvent(AppEvent::Exit) => {
                info!(generation = self.controller.generation(), "exiting");
                self.exit = true;
            }
        }
    }

    fn handle_sim(&mut self, event: SimEvent) {
        match event {
            SimEvent::TogglePlay => {
                // A stroke cannot outlive the switch to playback
                self.stroke = None;
                self.controller.toggle_playing();
            }
            SimEvent::Step => {
                if !self.controller.is_playing() {
                    self.controller.step();
                }
            }
            SimEvent::Clear => self.controller.clear(),
            SimEvent::Randomize => self.controller.randomize_with(&mut self.rng),
            SimEvent::Speed(delta) => {
                let speed = self.controller.speed().get() as i64;
                self.controller.update_speed(speed.saturating_add(delta));
            }
        }
    }

    fn handle_edit(&mut self, event: EditEvent) {
        if let EditEvent::MoveCursor(dr, dc) = event {
            self.move_cursor(dr, dc);
            return;
        }

        if self.controller.is_playing() {
            debug!(?event, "ignoring edit while running");
            return;
        }

        match event {
            EditEvent::ToggleCursor => {
                let (row, col) = self.cursor;
                self.controller.toggle_cell(row, col);
            }
            EditEvent::Press { x, y } => {
                self.stroke = layout::cell_at(x, y, (0, 0), self.config.cell)
                    .and_then(|(row, col)| Stroke::begin(&mut self.controller, row, col));
            }
            EditEvent::Drag { x, y } => {
                let Some(stroke) = self.stroke.as_mut() else {
                    return;
                };

                if let Some((row, col)) = layout::cell_at(x, y, (0, 0), self.config.cell) {
                    stroke.extend(&mut self.controller, row, col);
                }
            }
            EditEvent::Release => self.stroke = None,
            EditEvent::MoveCursor(..) => {}
        }
    }

    fn move_cursor(&mut self, dr: Coord, dc: Coord) {
        let (row, col) = self.cursor;
        self.cursor = self.clamp_to_board(row.saturating_add(dr), col.saturating_add(dc));
    }

    /// Fit the board to a drawing area of `cols` x `rows`. The board is only rebuilt, and the
    /// generation count reset, when its dimensions actually change.
    fn resize(&mut self, cols: u16, rows: u16) {
        let (new_rows, new_cols) = layout::fit(
            cols,
            rows,
            self.config.reserved_rows,
            self.config.cell,
            self.config.bounds(),
        );

        let grid = self.controller.grid();
        if (grid.rows(), grid.cols()) == (new_rows, new_cols) {
            return;
        }

        // `fit` never returns a zero dimension, so this cannot fail
        if let Err(e) = self.controller.init_grid(new_rows, new_cols) {
            error!("Failed to resize board: {e}");
            return;
        }

        self.stroke = None;
        self.cursor = self.clamp_to_board(self.cursor.0, self.cursor.1);
    }

    fn clamp_to_board(&self, row: Coord, col: Coord) -> (Coord, Coord) {
        let grid = self.controller.grid();

        // Dimensions fit in `Coord`, see `Grid::new`
        let max_row = grid.rows() as Coord - 1;
        let max_col = grid.cols() as Coord - 1;

        (row.clamp(0, max_row), col.clamp(0, max_col))
    }
}

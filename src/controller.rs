use std::time::Duration;

use rand::Rng;
use tracing::debug;
use tracing::trace;

use crate::Coord;
use crate::grid::DEFAULT_DENSITY;
use crate::grid::Grid;
use crate::grid::GridError;
use crate::scheduler::Scheduler;

/// Playback speed, from 1 (slowest) to 10 (fastest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(1);
    pub const MAX: Speed = Speed(10);

    /// Clamp any integer into the supported range.
    pub fn clamped(speed: i64) -> Self {
        Speed(speed.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Time between two generations: 1000ms at speed 1 down to 100ms at speed 10.
    pub fn delay(self) -> Duration {
        Duration::from_millis(1100 - self.0 as u64 * 100)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed(8)
    }
}

/// Owns the board of a running session and decides when it advances.
///
/// The controller is either idle or running. While running, it holds exactly one request on its
/// [`Scheduler`], and [`Controller::poll`] turns every due tick into one [`Controller::step`].
pub struct Controller<S: Scheduler> {
    grid: Grid,
    generation: u64,
    playing: bool,
    speed: Speed,
    scheduler: S,
}

impl<S: Scheduler> Controller<S> {
    /// Start idle on an empty `rows` x `cols` board.
    pub fn new(rows: usize, cols: usize, scheduler: S) -> Result<Self, GridError> {
        Ok(Self::with_grid(Grid::empty(rows, cols)?, scheduler))
    }

    /// Start idle on an existing board.
    pub fn with_grid(grid: Grid, scheduler: S) -> Self {
        Self {
            grid,
            generation: 0,
            playing: false,
            speed: Speed::default(),
            scheduler,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// A copy of the current board that stays valid while the controller moves on.
    pub fn snapshot(&self) -> Grid {
        self.grid.clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Replace the board with an empty one of the given size and reset the generation count.
    ///
    /// Playback is left as it is: a running timer keeps ticking, now on the new board. Invalid
    /// dimensions leave the controller untouched.
    pub fn init_grid(&mut self, rows: usize, cols: usize) -> Result<(), GridError> {
        self.grid = Grid::empty(rows, cols)?;
        self.generation = 0;

        debug!(rows, cols, playing = self.playing, "grid initialized");

        Ok(())
    }

    /// Flip one cell. Off-board coordinates are ignored.
    pub fn toggle_cell(&mut self, row: Coord, col: Coord) {
        self.grid = self.grid.toggle(row, col);
    }

    /// Set one cell. Off-board coordinates are ignored.
    pub fn set_cell(&mut self, row: Coord, col: Coord, alive: bool) {
        self.grid = self.grid.set(row, col, alive);
    }

    /// Advance the board by one generation.
    pub fn step(&mut self) {
        self.grid = self.grid.next_generation();
        self.generation += 1;

        trace!(generation = self.generation, "step");
    }

    /// Start continuous playback. Does nothing when already running.
    pub fn play(&mut self) {
        if self.playing {
            return;
        }

        self.playing = true;
        self.scheduler.start(self.delay());

        debug!(speed = self.speed.get(), "play");
    }

    /// Stop continuous playback. Once this returns, [`Controller::poll`] takes no more steps.
    pub fn pause(&mut self) {
        if self.playing {
            debug!(generation = self.generation, "pause");
        }

        self.playing = false;
        self.scheduler.cancel();
    }

    pub fn toggle_playing(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Pause, then kill every cell.
    pub fn clear(&mut self) {
        self.pause();
        self.grid = self.grid.clear();
        self.generation = 0;

        debug!("grid cleared");
    }

    /// Pause, then fill the board at random using the thread-local generator.
    pub fn randomize(&mut self) {
        self.randomize_with(&mut rand::thread_rng());
    }

    /// Pause, then fill the board at random from `rng`.
    pub fn randomize_with<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.pause();
        self.grid = self.grid.randomize_with(DEFAULT_DENSITY, rng);
        self.generation = 0;

        debug!(population = self.grid.population(), "grid randomized");
    }

    /// Store a new speed, clamped into `1..=10`.
    ///
    /// A tick that is already scheduled keeps its period. The new period applies from the cycle
    /// after it.
    pub fn update_speed(&mut self, speed: i64) {
        let speed = Speed::clamped(speed);

        if speed != self.speed {
            debug!(from = self.speed.get(), to = speed.get(), "speed changed");
        }

        self.speed = speed;
    }

    pub fn delay(&self) -> Duration {
        self.speed.delay()
    }

    pub fn delay_millis(&self) -> u64 {
        self.delay().as_millis() as u64
    }

    /// Take one step if a tick has come due, then schedule the next one at the current speed.
    /// Returns whether a step was taken. Never blocks.
    ///
    /// At most one step is taken per call, however long ago the tick was due. Ticks missed while
    /// nobody polled are dropped rather than replayed.
    pub fn poll(&mut self) -> bool {
        if !self.playing || !self.scheduler.fire() {
            return false;
        }

        self.step();
        self.scheduler.rearm(self.delay());

        true
    }
}

impl<S: Scheduler> Drop for Controller<S> {
    fn drop(&mut self) {
        self.scheduler.cancel();
    }
}

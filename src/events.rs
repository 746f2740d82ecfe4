use crate::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    SimEvent(SimEvent),
    EditEvent(EditEvent),
    AppEvent(AppEvent),
}

/// Playback controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// Start or stop continuous playback
    TogglePlay,

    /// Advance by a single generation
    Step,

    Clear,
    Randomize,

    /// Change speed by the given amount
    Speed(i64),
}

/// Board editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEvent {
    /// Flip the cell under the keyboard cursor
    ToggleCursor,

    /// Move the keyboard cursor by `(rows, cols)`
    MoveCursor(Coord, Coord),

    /// A pointer went down at screen position `(x, y)`
    Press { x: u16, y: u16 },

    /// A pressed pointer moved to `(x, y)`
    Drag { x: u16, y: u16 },

    /// The pointer was released
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The drawing area changed size
    Resize { cols: u16, rows: u16 },

    /// Exit the application
    Exit,
}

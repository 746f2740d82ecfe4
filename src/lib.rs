pub mod app;
pub mod brush;
pub mod config;
pub mod controller;
pub mod events;
pub mod grid;
pub mod io;
pub mod layout;
pub mod patterns;
pub mod render;
pub mod rule_set;
pub mod scheduler;

/// Signed cell coordinate. Negative and too-large values are valid input and read as dead cells.
pub type Coord = i32;

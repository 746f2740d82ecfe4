use std::ops::RangeInclusive;
use std::str::FromStr;

use tracing::warn;

use crate::layout::CellSize;
use crate::layout::DEFAULT_BOUNDS;

/// Prefix of every environment variable read by [`Config::from_env`].
pub const ENV_PREFIX: &str = "GOL_";

/// Session settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Board size used until the drawing area is known
    pub rows: usize,
    pub cols: usize,

    /// Initial playback speed, clamped into `1..=10` by the controller
    pub speed: i64,

    /// Seed for randomizing the board. `None` draws a fresh seed from the OS.
    pub seed: Option<u64>,

    /// Smallest and largest board side picked from the drawing area
    pub min_dim: usize,
    pub max_dim: usize,

    /// On-screen size of a cell
    pub cell: CellSize,

    /// Lines of the drawing area kept for the status bar
    pub reserved_rows: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 40,
            cols: 25,
            speed: 8,
            seed: None,
            min_dim: *DEFAULT_BOUNDS.start(),
            max_dim: *DEFAULT_BOUNDS.end(),
            // Two terminal columns make a roughly square cell
            cell: CellSize::new(2, 1),
            reserved_rows: 2,
        }
    }
}

impl Config {
    /// Defaults, overridden by `GOL_SPEED`, `GOL_SEED`, `GOL_MIN_DIM` and `GOL_MAX_DIM`.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Like [`Config::from_env`], reading from `vars` instead of the process environment.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();

        for (key, value) in vars {
            let Some(key) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref();

            match key {
                "SPEED" => {
                    set_parsed(&mut config.speed, key, value);
                }
                "SEED" => {
                    let mut seed: u64 = 0;
                    if set_parsed(&mut seed, key, value) {
                        config.seed = Some(seed);
                    }
                }
                "MIN_DIM" => {
                    set_parsed(&mut config.min_dim, key, value);
                }
                "MAX_DIM" => {
                    set_parsed(&mut config.max_dim, key, value);
                }
                _ => warn!("Unknown setting {ENV_PREFIX}{key}"),
            }
        }

        if config.min_dim == 0 || config.min_dim > config.max_dim {
            warn!(
                min = config.min_dim,
                max = config.max_dim,
                "Invalid board bounds. Using defaults"
            );

            config.min_dim = *DEFAULT_BOUNDS.start();
            config.max_dim = *DEFAULT_BOUNDS.end();
        }

        config
    }

    pub fn bounds(&self) -> RangeInclusive<usize> {
        self.min_dim..=self.max_dim
    }
}

/// Overwrite `slot` if `value` parses. Returns whether it did.
fn set_parsed<T: FromStr>(slot: &mut T, key: &str, value: &str) -> bool {
    match value.trim().parse() {
        Ok(v) => {
            *slot = v;
            true
        }
        Err(_) => {
            warn!("Ignoring {ENV_PREFIX}{key}: failed to convert \"{value}\"");
            false
        }
    }
}

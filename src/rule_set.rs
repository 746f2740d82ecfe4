use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::new(0b1000, 0b1100);

/// Highest neighbor count a Moore neighborhood can produce.
const MAX_NEIGHBORS: u8 = 8;

/// # Representation
/// Life rules are represented as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
///
/// # Examples
/// ```notrust
/// b3s23:                0000_0000_0000_1000_0000_0000_0000_1100
///
/// b0s0:                 0000_0000_0000_0000_0000_0000_0000_0000
/// b012345678s012345678: 0000_0001_1111_1111_0000_0001_1111_1111
/// ```
///
/// Only outer-totalistic rules on two states are representable, so every `RuleSet` is still a
/// binary automaton.
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. For both `b` and
    /// `s`, numbers are set on a bit basis. For instance if bit `i` in `b` is on, it
    /// means `i` is included in the set of births. Any bit past the 8th is ignored.
    ///
    /// Big endian is used here (i.e. `b = 0b1` means b1, and `b = 0b1_0000_0000` means b8).
    pub const fn new(b: u16, s: u16) -> Self {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    pub fn births(&self) -> u16 {
        ((self.rule & 0x1FF0000) >> 0x10) as u16
    }

    pub fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// State of a cell in the next generation, given its current state and how many of its
    /// neighbors are alive.
    pub fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        if neighbors > MAX_NEIGHBORS {
            return false;
        }

        let mask = 1u16 << neighbors;

        if alive {
            self.survivals() & mask == mask
        } else {
            self.births() & mask == mask
        }
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleSet({self})")
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |mask: u16| -> String {
            (0..=MAX_NEIGHBORS)
                .filter(|&n| mask & (1u16 << n) != 0)
                .map(|n| char::from(b'0' + n))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Empty rule string")]
    Empty,

    #[error("Expected '/' between births and survivals")]
    MissingSeparator,

    #[error("Expected '{exp}', but got '{got}'")]
    UnexpectedToken { exp: char, got: char },

    #[error("Neighbor count '{got}' is not a digit in 0..=8")]
    InvalidCount { got: char },
}

impl FromStr for RuleSet {
    type Err = RuleError;

    /// Parse rules that look like `B3/S23`, or the nameless `3/23` form found in RLE `#r` lines.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RuleError::Empty);
        }

        let Some((b, s)) = s.split_once('/') else {
            return Err(RuleError::MissingSeparator);
        };

        let b = strip_prefix(b, 'b')?;
        let s = strip_prefix(s, 's')?;

        Ok(RuleSet::new(digits_to_mask(b)?, digits_to_mask(s)?))
    }
}

/// Strip the `b`/`s` marker if one is present. Any other letter is an error.
fn strip_prefix(part: &str, marker: char) -> Result<&str, RuleError> {
    match part.chars().next() {
        Some(c) if c.eq_ignore_ascii_case(&marker) => Ok(&part[c.len_utf8()..]),
        Some(c) if c.is_ascii_alphabetic() => Err(RuleError::UnexpectedToken {
            exp: marker.to_ascii_uppercase(),
            got: c,
        }),
        _ => Ok(part),
    }
}

/// Convert the human readable birth/survival digits to a packed bit representation
fn digits_to_mask(digits: &str) -> Result<u16, RuleError> {
    let mut n: u16 = 0;

    for c in digits.chars() {
        let Some(d) = c.to_digit(10).filter(|&d| d <= MAX_NEIGHBORS as u32) else {
            return Err(RuleError::InvalidCount { got: c });
        };

        n |= 1u16 << d;
    }

    Ok(n)
}

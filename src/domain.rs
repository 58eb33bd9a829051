use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::LocatorError;

/// Canonical numeric identifier of one disclosed document.
///
/// Externally a document id is either a bare integer string or the
/// `EFTA`-prefixed form zero-padded to eight digits (`EFTA00001234`).
/// Leading zeros are insignificant on the way in; formatting always
/// produces the padded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(u64);

impl DocumentId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// Lenient parse of user input. Accepts the `EFTA` form
    /// (case-insensitive, surrounding whitespace tolerated) or a plain
    /// digit run; anything else is `None`. Never panics.
    pub fn parse(input: &str) -> Option<Self> {
        let efta = Regex::new(r"(?i)^\s*EFTA0*(\d+)\s*$").unwrap();
        if let Some(captures) = efta.captures(input) {
            return captures[1].parse::<u64>().ok().map(Self);
        }

        let trimmed = input.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit()) {
            return trimmed.parse::<u64>().ok().map(Self);
        }

        None
    }

    pub fn step(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::Forward => self.0.checked_add(1).map(Self),
            Direction::Backward => self.0.checked_sub(1).map(Self),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Ids past eight digits keep their full width.
        write!(f, "EFTA{:08}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = LocatorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| LocatorError::InvalidDocumentId(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Forward => "next",
            Direction::Backward => "previous",
        }
    }
}

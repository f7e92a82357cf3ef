use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("level must be between 1 and 4, got {0}")]
    OutOfRange(u8),
}

/// Difficulty tier partitioning the question bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    Recent,
    Actors,
    Directors,
    BoxOffice,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Recent,
        Level::Actors,
        Level::Directors,
        Level::BoxOffice,
    ];

    pub const FIRST: Level = Level::Recent;
    pub const MAX: Level = Level::BoxOffice;

    /// Builds a level from its 1-based number.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::OutOfRange` for anything outside 1..=4.
    pub fn new(number: u8) -> Result<Self, LevelError> {
        match number {
            1 => Ok(Level::Recent),
            2 => Ok(Level::Actors),
            3 => Ok(Level::Directors),
            4 => Ok(Level::BoxOffice),
            other => Err(LevelError::OutOfRange(other)),
        }
    }

    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Level::Recent => 1,
            Level::Actors => 2,
            Level::Directors => 3,
            Level::BoxOffice => 4,
        }
    }

    /// The level unlocked by passing this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Level> {
        Level::new(self.number() + 1).ok()
    }

    #[must_use]
    pub fn previous(self) -> Option<Level> {
        self.number().checked_sub(1).and_then(|n| Level::new(n).ok())
    }

    /// Title shown above the quiz.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Level::Recent => "ಹಂತ 1 – ಇತ್ತೀಚಿನ ಸಿನಿಮಾ",
            Level::Actors => "ಹಂತ 2 – ನಟರು",
            Level::Directors => "ಹಂತ 3 – ನಿರ್ದೇಶಕರು",
            Level::BoxOffice => "ಹಂತ 4 – ಬಾಕ್ಸ್ ಆಫೀಸ್",
        }
    }

    /// Short label used on the level select cards.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Level::Recent => "ಸುಲಭ – ಇತ್ತೀಚಿನ ಸಿನಿಮಾ",
            Level::Actors => "ನಟರು",
            Level::Directors => "ನಿರ್ದೇಶಕರು",
            Level::BoxOffice => "ಬಾಕ್ಸ್ ಆಫೀಸ್",
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.number()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

use std::fmt;

use crate::model::{Level, SessionId};

/// Which question set a session plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuizMode {
    Level(Level),
    DailyChallenge,
}

impl QuizMode {
    #[must_use]
    pub fn level(self) -> Option<Level> {
        match self {
            QuizMode::Level(level) => Some(level),
            QuizMode::DailyChallenge => None,
        }
    }

    #[must_use]
    pub fn is_daily(self) -> bool {
        matches!(self, QuizMode::DailyChallenge)
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            QuizMode::Level(level) => level.display_name(),
            QuizMode::DailyChallenge => "ದೈನಂದಿನ ಸವಾಲು 🏅",
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizMode::Level(level) => write!(f, "level {level}"),
            QuizMode::DailyChallenge => f.write_str("daily challenge"),
        }
    }
}

/// Numbers reported when a session ends.
///
/// `questions` is the full set size for a completed session and the number of
/// questions reached for a game over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionResult {
    pub session_id: SessionId,
    pub mode: QuizMode,
    pub score: u32,
    pub correct_count: u32,
    pub questions: u32,
    pub coins_delta: i64,
}

/// Terminal outcome of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed(SessionResult),
    GameOver(SessionResult),
}

impl SessionOutcome {
    #[must_use]
    pub fn result(&self) -> &SessionResult {
        match self {
            SessionOutcome::Completed(result) | SessionOutcome::GameOver(result) => result,
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, SessionOutcome::Completed(_))
    }
}

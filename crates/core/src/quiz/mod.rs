//! The quiz session engine: question selection, countdown, scoring, lives,
//! streaks and power-ups for a single playthrough.

mod outcome;
mod purse;
mod rules;
mod session;

pub use outcome::{QuizMode, SessionOutcome, SessionResult};
pub use purse::{CoinEntry, CoinPurse, CoinReason, Wallet};
pub use rules::{PowerUp, Rules};
pub use session::{
    ActionRejected, Advance, AnswerFeedback, QuestionPhase, QuestionToken, QuizError,
    QuizSession, SessionSnapshot, SessionStatus, TickResult,
};

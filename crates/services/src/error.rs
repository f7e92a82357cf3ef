//! Shared error types for the services crate.

use thiserror::Error;

use huduga_core::model::{Level, SessionId};
use huduga_core::quiz::{ActionRejected, QuizError};
use storage::bank::BankLoadError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuizService` and `LiveSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("level {0} is locked")]
    LevelLocked(Level),
    #[error("daily challenge already played today")]
    DailyUnavailable,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Rejected(#[from] ActionRejected),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressionError {
    #[error("outcome of session {0} was already applied")]
    AlreadyApplied(SessionId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ShopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShopError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors raised by sound sinks. Players log and drop these.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AudioError {
    #[error("audio output is closed")]
    Closed,
    #[error("audio output failed: {0}")]
    Output(String),
}

/// Errors emitted by `ScreenFlow`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlowError {
    #[error("cannot {event} from the {screen} screen")]
    InvalidTransition {
        screen: &'static str,
        event: &'static str,
    },
    #[error("no session is running")]
    NoActiveSession,
    #[error(transparent)]
    Quiz(#[from] QuizServiceError),
    #[error(transparent)]
    Progression(#[from] ProgressionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping game services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Bank(#[from] BankLoadError),
}

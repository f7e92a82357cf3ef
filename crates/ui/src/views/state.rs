use dioxus::prelude::*;

use huduga_core::quiz::ActionRejected;
use services::{FlowError, QuizServiceError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    LevelLocked,
    DailyUnavailable,
    InsufficientCoins { needed: u32 },
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> String {
        match self {
            ViewError::Unknown => "ಏನೋ ತಪ್ಪಾಗಿದೆ. ಮತ್ತೆ ಪ್ರಯತ್ನಿಸಿ.".into(),
            ViewError::LevelLocked => "🔒 ಈ ಹಂತ ಇನ್ನೂ ತೆರೆದಿಲ್ಲ".into(),
            ViewError::DailyUnavailable => "ಇಂದಿನ ಸವಾಲು ಮುಗಿದಿದೆ! ನಾಳೆ ಮತ್ತೆ ಬನ್ನಿ".into(),
            ViewError::InsufficientCoins { needed } => {
                format!("ಸಾಕಷ್ಟು ನಾಣ್ಯಗಳಿಲ್ಲ! ({needed} 🪙 ಬೇಕು)")
            }
        }
    }

    #[must_use]
    pub fn from_flow(err: &FlowError) -> Self {
        match err {
            FlowError::Quiz(err) => Self::from_quiz(err).unwrap_or(ViewError::Unknown),
            _ => ViewError::Unknown,
        }
    }

    /// What to tell the player about a refused quiz action. `None` for
    /// refusals that need no message, like a second tap on an answered
    /// question.
    #[must_use]
    pub fn from_quiz(err: &QuizServiceError) -> Option<Self> {
        match err {
            QuizServiceError::LevelLocked(_) => Some(ViewError::LevelLocked),
            QuizServiceError::DailyUnavailable => Some(ViewError::DailyUnavailable),
            QuizServiceError::Rejected(ActionRejected::InsufficientCoins { needed, .. }) => {
                Some(ViewError::InsufficientCoins { needed: *needed })
            }
            QuizServiceError::Rejected(_) => None,
            _ => Some(ViewError::Unknown),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

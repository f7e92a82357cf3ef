use thiserror::Error;

use crate::model::{Level, QuestionId};

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct option {index} is out of range")]
    CorrectOutOfRange { index: usize },
}

/// A single trivia item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: [String; OPTION_COUNT],
    correct_option: usize,
    level: Level,
}

impl Question {
    /// Validate and build a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text or an option is blank, or when the
    /// correct index does not point at one of the four options.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_option: usize,
        level: Level,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_owned();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if let Some(index) = options.iter().position(|opt| opt.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if correct_option >= OPTION_COUNT {
            return Err(QuestionError::CorrectOutOfRange {
                index: correct_option,
            });
        }

        Ok(Self {
            id,
            text,
            options,
            correct_option,
            level,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_option
    }

    /// Indices of the three wrong options, in ascending order.
    #[must_use]
    pub fn wrong_options(&self) -> Vec<usize> {
        (0..OPTION_COUNT)
            .filter(|idx| *idx != self.correct_option)
            .collect()
    }
}

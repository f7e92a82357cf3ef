//! Loads the question bank shipped with the game.

use serde::Deserialize;
use thiserror::Error;

use huduga_core::model::{
    BankError, Level, LevelError, OPTION_COUNT, Question, QuestionBank, QuestionError, QuestionId,
};

const BUILTIN_QUESTIONS: &str = include_str!("../assets/questions.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("invalid question bank json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("question {id}: {source}")]
    Level { id: u64, source: LevelError },

    #[error("question {id}: {source}")]
    Question { id: u64, source: QuestionError },

    #[error(transparent)]
    Bank(#[from] BankError),
}

/// On-disk shape of a question.
#[derive(Debug, Deserialize)]
struct QuestionRecord {
    id: u64,
    level: u8,
    text: String,
    options: [String; OPTION_COUNT],
    correct: usize,
}

impl QuestionRecord {
    fn into_question(self) -> Result<Question, BankLoadError> {
        let level = Level::new(self.level).map_err(|source| BankLoadError::Level {
            id: self.id,
            source,
        })?;
        Question::new(
            QuestionId::new(self.id),
            self.text,
            self.options,
            self.correct,
            level,
        )
        .map_err(|source| BankLoadError::Question {
            id: self.id,
            source,
        })
    }
}

/// The Kannada cinema questions bundled into the binary.
///
/// # Errors
///
/// Returns `BankLoadError` if the bundled asset is malformed.
pub fn builtin_bank() -> Result<QuestionBank, BankLoadError> {
    parse_bank(BUILTIN_QUESTIONS)
}

/// Parse and validate a JSON array of questions.
///
/// # Errors
///
/// Returns `BankLoadError` for malformed json, invalid questions, or duplicate ids.
pub fn parse_bank(json: &str) -> Result<QuestionBank, BankLoadError> {
    let records: Vec<QuestionRecord> = serde_json::from_str(json)?;
    let questions = records
        .into_iter()
        .map(QuestionRecord::into_question)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(QuestionBank::new(questions)?)
}

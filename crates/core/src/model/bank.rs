use std::collections::HashSet;
use thiserror::Error;

use crate::model::{Level, Question, QuestionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("question bank is empty")]
    Empty,

    #[error("duplicate question id {0}")]
    DuplicateId(QuestionId),
}

/// Read-only collection of every question shipped with the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Empty` for an empty list and `BankError::DuplicateId`
    /// when two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(BankError::DuplicateId(question.id()));
            }
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn all(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Questions tagged with `level`, in bank order.
    pub fn for_level(&self, level: Level) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.level() == level)
    }

    #[must_use]
    pub fn count_for_level(&self, level: Level) -> usize {
        self.for_level(level).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u64, level: Level) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            ["a".into(), "b".into(), "c".into(), "d".into()],
            0,
            level,
        )
        .unwrap()
    }

    #[test]
    fn filters_by_level() {
        let bank = QuestionBank::new(vec![
            question(1, Level::Recent),
            question(2, Level::Actors),
            question(3, Level::Recent),
        ])
        .unwrap();

        let ids: Vec<_> = bank.for_level(Level::Recent).map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(bank.count_for_level(Level::BoxOffice), 0);
    }

    #[test]
    fn rejects_duplicates() {
        let err = QuestionBank::new(vec![question(1, Level::Recent), question(1, Level::Actors)])
            .unwrap_err();
        assert_eq!(err, BankError::DuplicateId(QuestionId::new(1)));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(QuestionBank::new(Vec::new()).unwrap_err(), BankError::Empty);
    }
}

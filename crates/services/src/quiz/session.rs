use chrono::{DateTime, Utc};
use lingo_core::model::{Language, QuizQuestion, QuizResult, QuizScore};

use crate::error::QuizError;

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResult {
    pub correct: bool,
    pub correct_answer: String,
    pub is_complete: bool,
}

/// One run through a generated quiz, keeping the running score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    language: Language,
    questions: Vec<QuizQuestion>,
    position: usize,
    score: u32,
}

impl QuizSession {
    #[must_use]
    pub fn new(language: Language, questions: Vec<QuizQuestion>) -> Self {
        Self {
            language,
            questions,
            position: 0,
            score: 0,
        }
    }

    #[must_use]
    pub fn language(&self) -> &Language {
        &self.language
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// A quiz built from an empty pool has no questions and is complete from the start.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Index of the question awaiting an answer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.position)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.position >= self.questions.len()
    }

    /// Answer the current question with `choice` and move on.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` when every question is already answered.
    pub fn answer(&mut self, choice: &str) -> Result<AnswerResult, QuizError> {
        let question = self.current().ok_or(QuizError::Completed)?;
        let correct = question.is_correct(choice);
        let correct_answer = question.correct_answer.clone();

        if correct {
            self.score = self.score.saturating_add(1);
        }
        self.position += 1;

        Ok(AnswerResult {
            correct,
            correct_answer,
            is_complete: self.is_complete(),
        })
    }

    /// Score so far over the number of questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::TooManyQuestions` if the count does not fit in `u32`.
    pub fn result(&self) -> Result<QuizResult, QuizError> {
        Ok(QuizResult::new(self.score, self.total()?))
    }

    fn total(&self) -> Result<u32, QuizError> {
        u32::try_from(self.questions.len()).map_err(|_| QuizError::TooManyQuestions {
            len: self.questions.len(),
        })
    }

    /// History entry for a finished quiz, dated `now`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Unfinished` if questions remain unanswered.
    pub fn finish(&self, now: DateTime<Utc>) -> Result<QuizScore, QuizError> {
        if !self.is_complete() {
            return Err(QuizError::Unfinished {
                answered: self.position,
                total: self.questions.len(),
            });
        }
        let score = QuizScore::new(self.score, self.total()?, now, self.language.clone())?;
        Ok(score)
    }
}

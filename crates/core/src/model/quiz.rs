use serde::{Deserialize, Serialize};

/// Share of correct answers that earns `Excellent`.
pub const EXCELLENT_PERCENT: f64 = 80.0;
/// Share of correct answers that earns `GoodJob`.
pub const GOOD_JOB_PERCENT: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Vocabulary,
    Phrase,
}

/// A single multiple-choice question, alive for one quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: usize,
    pub prompt: String,
    pub correct_answer: String,
    pub choices: Vec<String>,
    pub category: QuestionCategory,
}

impl QuizQuestion {
    #[must_use]
    pub fn is_correct(&self, choice: &str) -> bool {
        self.correct_answer == choice
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizFeedback {
    Excellent,
    GoodJob,
    KeepPracticing,
}

impl QuizFeedback {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            QuizFeedback::Excellent => "Excellent!",
            QuizFeedback::GoodJob => "Good job!",
            QuizFeedback::KeepPracticing => "Keep practicing!",
        }
    }
}

/// Score out of total for a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    score: u32,
    total: u32,
}

impl QuizResult {
    #[must_use]
    pub fn new(score: u32, total: u32) -> Self {
        Self { score, total }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Percentage of correct answers; `0.0` for an empty quiz.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total) * 100.0
    }

    #[must_use]
    pub fn feedback(&self) -> QuizFeedback {
        let pct = self.percentage();
        if pct >= EXCELLENT_PERCENT {
            QuizFeedback::Excellent
        } else if pct >= GOOD_JOB_PERCENT {
            QuizFeedback::GoodJob
        } else {
            QuizFeedback::KeepPracticing
        }
    }
}

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::{Language, LessonId, QuizResult};
use crate::time::same_calendar_day;

/// Lessons needed to reach `Intermediate`.
pub const INTERMEDIATE_LESSONS: usize = 10;
/// Lessons needed to reach `Advanced`.
pub const ADVANCED_LESSONS: usize = 20;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("study time must be a positive number of minutes")]
    ZeroStudyTime,

    #[error("quiz score ({score}) exceeds question count ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

/// One finished quiz, appended to a learner's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScore {
    score: u32,
    total: u32,
    date: DateTime<Utc>,
    language: Language,
}

impl QuizScore {
    /// # Errors
    ///
    /// Returns `ProgressError::ScoreExceedsTotal` if `score > total`.
    pub fn new(
        score: u32,
        total: u32,
        date: DateTime<Utc>,
        language: Language,
    ) -> Result<Self, ProgressError> {
        if score > total {
            return Err(ProgressError::ScoreExceedsTotal { score, total });
        }
        Ok(Self {
            score,
            total,
            date,
            language,
        })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    #[must_use]
    pub fn language(&self) -> &Language {
        &self.language
    }

    #[must_use]
    pub fn result(&self) -> QuizResult {
        QuizResult::new(self.score, self.total)
    }
}

/// Coarse learner level derived from the number of completed lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LearnerLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl LearnerLevel {
    #[must_use]
    pub fn for_completed_lessons(count: usize) -> Self {
        if count >= ADVANCED_LESSONS {
            LearnerLevel::Advanced
        } else if count >= INTERMEDIATE_LESSONS {
            LearnerLevel::Intermediate
        } else {
            LearnerLevel::Beginner
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LearnerLevel::Beginner => "Beginner",
            LearnerLevel::Intermediate => "Intermediate",
            LearnerLevel::Advanced => "Advanced",
        }
    }
}

/// Per-user learning progress.
///
/// Values are never mutated in place: every transition returns a new
/// `UserProgress` that replaces the stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    #[serde(default, deserialize_with = "dedup_lessons")]
    completed_lessons: Vec<LessonId>,
    #[serde(default)]
    quiz_scores: Vec<QuizScore>,
    #[serde(default)]
    streak: u32,
    #[serde(default = "unix_epoch")]
    last_active: DateTime<Utc>,
    #[serde(default)]
    total_study_time: u32,
}

/// Result of completing a lesson that was not completed before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCompletion {
    pub progress: UserProgress,
    pub streak_extended: bool,
}

impl UserProgress {
    /// Zero-valued progress for a learner first seen at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            completed_lessons: Vec::new(),
            quiz_scores: Vec::new(),
            streak: 0,
            last_active: now,
            total_study_time: 0,
        }
    }

    #[must_use]
    pub fn completed_lessons(&self) -> &[LessonId] {
        &self.completed_lessons
    }

    #[must_use]
    pub fn quiz_scores(&self) -> &[QuizScore] {
        &self.quiz_scores
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    /// Accumulated study time in minutes.
    #[must_use]
    pub fn total_study_time(&self) -> u32 {
        self.total_study_time
    }

    #[must_use]
    pub fn has_completed(&self, lesson_id: &LessonId) -> bool {
        self.completed_lessons.contains(lesson_id)
    }

    #[must_use]
    pub fn level(&self) -> LearnerLevel {
        LearnerLevel::for_completed_lessons(self.completed_lessons.len())
    }

    /// Mark `lesson_id` complete at `now`.
    ///
    /// Returns `None` when the lesson was already completed; the caller keeps
    /// the current value. Otherwise the streak grows by one if `now` falls on a
    /// different calendar day (at `offset`) than `last_active`, and
    /// `last_active` moves to `now`.
    #[must_use]
    pub fn completing_lesson(
        &self,
        lesson_id: &LessonId,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Option<LessonCompletion> {
        if self.has_completed(lesson_id) {
            return None;
        }

        let mut next = self.clone();
        next.completed_lessons.push(lesson_id.clone());

        // Missed days do not reset the streak.
        let streak_extended = !same_calendar_day(now, self.last_active, offset);
        if streak_extended {
            next.streak = next.streak.saturating_add(1);
        }
        next.last_active = now;

        Some(LessonCompletion {
            progress: next,
            streak_extended,
        })
    }

    /// Add `minutes` of study time.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::ZeroStudyTime` when `minutes` is zero.
    pub fn with_study_time(&self, minutes: u32) -> Result<Self, ProgressError> {
        if minutes == 0 {
            return Err(ProgressError::ZeroStudyTime);
        }
        let mut next = self.clone();
        next.total_study_time = next.total_study_time.saturating_add(minutes);
        Ok(next)
    }

    /// Append a finished quiz to the history.
    #[must_use]
    pub fn with_quiz_score(&self, score: QuizScore) -> Self {
        let mut next = self.clone();
        next.quiz_scores.push(score);
        next
    }

    /// The most recent `n` quiz scores, oldest first.
    #[must_use]
    pub fn recent_quiz_scores(&self, n: usize) -> &[QuizScore] {
        let start = self.quiz_scores.len().saturating_sub(n);
        &self.quiz_scores[start..]
    }
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

fn dedup_lessons<'de, D>(deserializer: D) -> Result<Vec<LessonId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<LessonId>::deserialize(deserializer)?;
    let mut seen = HashSet::with_capacity(raw.len());
    Ok(raw.into_iter().filter(|id| seen.insert(id.clone())).collect())
}

use chrono::{DateTime, Utc};
use lingo_core::model::{Language, LearnerLevel, QuizResult, UserProgress};

/// Lessons per day the home screen goal is measured against.
pub const DAILY_GOAL_LESSONS: usize = 5;
/// Lessons the overall progress bar is measured against.
pub const OVERALL_LESSON_TARGET: usize = 20;
/// Quiz results shown in the recent list.
pub const RECENT_QUIZ_COUNT: usize = 3;

/// A recent quiz row.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentQuiz {
    pub language: Language,
    pub date: DateTime<Utc>,
    pub result: QuizResult,
}

/// Display-ready statistics derived from a learner's progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressOverview {
    pub streak: u32,
    pub lessons_completed: usize,
    pub study_minutes: u32,
    pub study_hours: u32,
    pub quizzes_taken: usize,
    pub recent_quizzes: Vec<RecentQuiz>,
    pub level: LearnerLevel,
    pub daily_goal_percent: f64,
    pub overall_percent: f64,
}

fn capped_percent(done: usize, target: usize) -> f64 {
    if target == 0 {
        return 100.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let pct = done as f64 / target as f64 * 100.0;
    pct.min(100.0)
}

impl ProgressOverview {
    #[must_use]
    pub fn from_progress(progress: &UserProgress) -> Self {
        let lessons_completed = progress.completed_lessons().len();
        let study_minutes = progress.total_study_time();

        let recent_quizzes = progress
            .recent_quiz_scores(RECENT_QUIZ_COUNT)
            .iter()
            .map(|entry| RecentQuiz {
                language: entry.language().clone(),
                date: entry.date(),
                result: entry.result(),
            })
            .collect();

        Self {
            streak: progress.streak(),
            lessons_completed,
            study_minutes,
            // Half hours round up.
            study_hours: study_minutes.saturating_add(30) / 60,
            quizzes_taken: progress.quiz_scores().len(),
            recent_quizzes,
            level: progress.level(),
            daily_goal_percent: capped_percent(lessons_completed, DAILY_GOAL_LESSONS),
            overall_percent: capped_percent(lessons_completed, OVERALL_LESSON_TARGET),
        }
    }
}

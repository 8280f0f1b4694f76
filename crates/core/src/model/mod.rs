pub mod content;
mod ids;
mod progress;
mod quiz;

pub use content::{
    ContentError, ContentItem, ContentItemDraft, Difficulty, Language, Lesson, LessonDraft, Term,
};
pub use ids::{IdError, LessonId, UserId};

pub use progress::{
    ADVANCED_LESSONS, INTERMEDIATE_LESSONS, LearnerLevel, LessonCompletion, ProgressError,
    QuizScore, UserProgress,
};
pub use quiz::{QuestionCategory, QuizFeedback, QuizQuestion, QuizResult};

mod content;
mod lesson;

pub use content::{ContentError, ContentItem, ContentItemDraft, Term};
pub use lesson::{Difficulty, Language, Lesson, LessonDraft};

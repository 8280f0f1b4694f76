mod generator;
mod service;
mod session;

pub use crate::error::QuizError;
pub use generator::{DEFAULT_QUIZ_SIZE, MAX_DISTRACTORS, QuizGenerator, generate_quiz};
pub use service::{QuizOutcome, QuizService};
pub use session::{AnswerResult, QuizSession};

use rand::Rng;
use rand::seq::SliceRandom;

use lingo_core::model::{ContentItem, QuestionCategory, QuizQuestion};

/// Number of questions in a quiz unless configured otherwise.
pub const DEFAULT_QUIZ_SIZE: usize = 10;
/// Wrong answers offered next to the correct one.
pub const MAX_DISTRACTORS: usize = 3;

/// Build multiple-choice questions from a content pool.
///
/// - The first `size` items become questions, in pool order.
/// - Distractors are the translations of the first `MAX_DISTRACTORS` other
///   items in pool order; only the final choice order is random.
/// - Pools smaller than four items give smaller choice sets.
pub fn generate_quiz<R>(pool: &[ContentItem], size: usize, rng: &mut R) -> Vec<QuizQuestion>
where
    R: Rng + ?Sized,
{
    let mut questions = Vec::with_capacity(size.min(pool.len()));

    for (index, item) in pool.iter().take(size).enumerate() {
        let mut choices = Vec::with_capacity(1 + MAX_DISTRACTORS);
        choices.push(item.translation().to_owned());
        choices.extend(
            pool.iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .take(MAX_DISTRACTORS)
                .map(|(_, other)| other.translation().to_owned()),
        );
        choices.shuffle(rng);

        let category = if item.term().is_word() {
            QuestionCategory::Vocabulary
        } else {
            QuestionCategory::Phrase
        };

        questions.push(QuizQuestion {
            id: index,
            prompt: item.text().to_owned(),
            correct_answer: item.translation().to_owned(),
            choices,
            category,
        });
    }

    questions
}

/// Quiz generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizGenerator {
    size: usize,
}

impl Default for QuizGenerator {
    fn default() -> Self {
        Self {
            size: DEFAULT_QUIZ_SIZE,
        }
    }
}

impl QuizGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn generate<R>(&self, pool: &[ContentItem], rng: &mut R) -> Vec<QuizQuestion>
    where
        R: Rng + ?Sized,
    {
        generate_quiz(pool, self.size, rng)
    }
}

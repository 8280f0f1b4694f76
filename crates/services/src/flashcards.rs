use lingo_core::model::{ContentItem, Lesson};

/// A content item shown as a two-sided card, tagged with its lesson category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub item: ContentItem,
    pub category: String,
}

impl Flashcard {
    #[must_use]
    pub fn front(&self) -> &str {
        self.item.text()
    }

    #[must_use]
    pub fn back(&self) -> &str {
        self.item.translation()
    }

    #[must_use]
    pub fn pronunciation(&self) -> &str {
        self.item.pronunciation()
    }
}

/// Cyclic deck of flashcards. Moving between cards turns the card face up again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    index: usize,
    flipped: bool,
}

impl FlashcardDeck {
    #[must_use]
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self {
            cards,
            index: 0,
            flipped: false,
        }
    }

    /// All lesson content in catalog order.
    #[must_use]
    pub fn from_lessons(lessons: &[Lesson]) -> Self {
        let cards = lessons
            .iter()
            .flat_map(|lesson| {
                lesson.content().iter().map(|item| Flashcard {
                    item: item.clone(),
                    category: lesson.category().to_owned(),
                })
            })
            .collect();
        Self::new(cards)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    #[must_use]
    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    /// Zero-based index of the current card.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn next(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.cards.len();
        self.flipped = false;
    }

    pub fn previous(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        let len = self.cards.len();
        self.index = (self.index + len - 1) % len;
        self.flipped = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::model::{ContentItemDraft, Difficulty, LessonId};

    fn lesson(id: &str, category: &str, words: &[(&str, &str)]) -> Lesson {
        let content = words
            .iter()
            .map(|(w, t)| ContentItemDraft::word(*w, *t, "").validate().unwrap())
            .collect();
        Lesson::new(
            LessonId::new(id).unwrap(),
            "Lesson",
            category,
            Difficulty::Beginner,
            content,
        )
        .unwrap()
    }

    fn deck() -> FlashcardDeck {
        FlashcardDeck::from_lessons(&[
            lesson("1", "Vocabulary", &[("Hola", "Hello"), ("Adiós", "Goodbye")]),
            lesson("3", "Numbers", &[("Uno", "One")]),
        ])
    }

    #[test]
    fn flattens_lessons_with_categories() {
        let deck = deck();
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.cards()[2].category, "Numbers");
        assert_eq!(deck.current().unwrap().front(), "Hola");
        assert_eq!(deck.current().unwrap().back(), "Hello");
    }

    #[test]
    fn navigation_wraps_and_resets_flip() {
        let mut deck = deck();
        deck.flip();
        assert!(deck.is_flipped());
        deck.previous();
        assert_eq!(deck.position(), 2);
        assert!(!deck.is_flipped());
        deck.next();
        assert_eq!(deck.position(), 0);
    }

    #[test]
    fn empty_deck_navigation_is_a_no_op() {
        let mut deck = FlashcardDeck::default();
        deck.next();
        deck.previous();
        assert!(deck.is_empty());
        assert!(deck.current().is_none());
    }
}

use std::sync::Arc;

use lingo_core::model::{ContentItem, Language, Lesson, LessonId};
use storage::catalog::ContentCatalog;

use crate::error::LessonServiceError;
use crate::flashcards::FlashcardDeck;

/// Read access to the lesson catalog.
#[derive(Clone)]
pub struct LessonService {
    catalog: Arc<dyn ContentCatalog>,
}

impl LessonService {
    #[must_use]
    pub fn new(catalog: Arc<dyn ContentCatalog>) -> Self {
        Self { catalog }
    }

    /// Languages that have lessons.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Catalog` if the catalog cannot be read.
    pub async fn languages(&self) -> Result<Vec<Language>, LessonServiceError> {
        Ok(self.catalog.languages().await?)
    }

    /// Lessons for a language; empty when the language is unknown.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Catalog` if the catalog cannot be read.
    pub async fn lessons(&self, language: &Language) -> Result<Vec<Lesson>, LessonServiceError> {
        Ok(self.catalog.lessons(language).await?)
    }

    /// Fetch one lesson by ID.
    ///
    /// Returns `Ok(None)` when the lesson does not exist.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Catalog` if the catalog cannot be read.
    pub async fn lesson(
        &self,
        language: &Language,
        lesson_id: &LessonId,
    ) -> Result<Option<Lesson>, LessonServiceError> {
        let lessons = self.lessons(language).await?;
        Ok(lessons.into_iter().find(|lesson| lesson.id() == lesson_id))
    }

    /// Every content item of the language, lessons flattened in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Catalog` if the catalog cannot be read.
    pub async fn content_pool(
        &self,
        language: &Language,
    ) -> Result<Vec<ContentItem>, LessonServiceError> {
        let lessons = self.lessons(language).await?;
        Ok(lessons
            .iter()
            .flat_map(|lesson| lesson.content().iter().cloned())
            .collect())
    }

    /// Flashcard deck over all of a language's content.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Catalog` if the catalog cannot be read.
    pub async fn flashcards(
        &self,
        language: &Language,
    ) -> Result<FlashcardDeck, LessonServiceError> {
        let lessons = self.lessons(language).await?;
        Ok(FlashcardDeck::from_lessons(&lessons))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::catalog::InMemoryCatalog;

    const CATALOG: &str = r#"{
        "spanish": [
            {"id": "1", "title": "Basic Greetings", "category": "Vocabulary", "difficulty": "Beginner",
             "content": [
                {"word": "Hola", "translation": "Hello", "pronunciation": "OH-lah"},
                {"word": "Adiós", "translation": "Goodbye", "pronunciation": "ah-DYOHS"}
             ]},
            {"id": "2", "title": "Common Phrases", "category": "Phrases", "difficulty": "Beginner",
             "content": [
                {"phrase": "No entiendo", "translation": "I don't understand", "pronunciation": "noh en-TYEN-doh"}
             ]}
        ]
    }"#;

    fn service() -> LessonService {
        LessonService::new(Arc::new(InMemoryCatalog::from_json(CATALOG).unwrap()))
    }

    fn spanish() -> Language {
        Language::new("spanish").unwrap()
    }

    #[tokio::test]
    async fn content_pool_flattens_in_order() {
        let pool = service().content_pool(&spanish()).await.unwrap();
        let terms: Vec<&str> = pool.iter().map(ContentItem::text).collect();
        assert_eq!(terms, vec!["Hola", "Adiós", "No entiendo"]);
    }

    #[tokio::test]
    async fn finds_lesson_by_id() {
        let id = LessonId::new("2").unwrap();
        let lesson = service().lesson(&spanish(), &id).await.unwrap().unwrap();
        assert_eq!(lesson.title(), "Common Phrases");
        let missing = LessonId::new("9").unwrap();
        assert!(service().lesson(&spanish(), &missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn flashcards_carry_lesson_category() {
        let deck = service().flashcards(&spanish()).await.unwrap();
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.cards()[2].category, "Phrases");
    }

    #[tokio::test]
    async fn unknown_language_has_no_content() {
        let french = Language::new("french").unwrap();
        assert!(service().content_pool(&french).await.unwrap().is_empty());
        assert_eq!(service().languages().await.unwrap(), vec![spanish()]);
    }
}

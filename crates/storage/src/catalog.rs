use async_trait::async_trait;
use lingo_core::model::{Language, Lesson};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::repository::StorageError;

/// Read-only lesson catalog keyed by language.
#[async_trait]
pub trait ContentCatalog: Send + Sync {
    /// Lessons for a language in catalog order.
    ///
    /// Unknown languages yield an empty list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn lessons(&self, language: &Language) -> Result<Vec<Lesson>, StorageError>;

    /// Languages with at least one lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn languages(&self) -> Result<Vec<Language>, StorageError>;
}

/// Catalog held in memory, typically loaded from a JSON document of the form
/// `{"spanish": [lesson, ...], "french": [...]}`.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    lessons: Arc<BTreeMap<Language, Vec<Lesson>>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_lessons(lessons: BTreeMap<Language, Vec<Lesson>>) -> Self {
        Self {
            lessons: Arc::new(lessons),
        }
    }

    /// Parse a catalog document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the document is malformed or
    /// any lesson item fails validation.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        let lessons: BTreeMap<Language, Vec<Lesson>> =
            serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Self::from_lessons(lessons))
    }
}

#[async_trait]
impl ContentCatalog for InMemoryCatalog {
    async fn lessons(&self, language: &Language) -> Result<Vec<Lesson>, StorageError> {
        Ok(self.lessons.get(language).cloned().unwrap_or_default())
    }

    async fn languages(&self) -> Result<Vec<Language>, StorageError> {
        Ok(self
            .lessons
            .iter()
            .filter(|(_, lessons)| !lessons.is_empty())
            .map(|(language, _)| language.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "spanish": [
            {
                "id": "1",
                "title": "Basic Greetings",
                "category": "Vocabulary",
                "difficulty": "Beginner",
                "content": [
                    {"word": "Hola", "translation": "Hello", "pronunciation": "OH-lah"},
                    {"word": "Adiós", "translation": "Goodbye", "pronunciation": "ah-DYOHS"}
                ]
            }
        ],
        "french": []
    }"#;

    #[tokio::test]
    async fn loads_lessons_by_language() {
        let catalog = InMemoryCatalog::from_json(CATALOG).unwrap();
        let spanish = Language::new("spanish").unwrap();
        let lessons = catalog.lessons(&spanish).await.unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].content().len(), 2);
    }

    #[tokio::test]
    async fn unknown_language_is_empty() {
        let catalog = InMemoryCatalog::from_json(CATALOG).unwrap();
        let klingon = Language::new("klingon").unwrap();
        assert!(catalog.lessons(&klingon).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn languages_skip_empty_entries() {
        let catalog = InMemoryCatalog::from_json(CATALOG).unwrap();
        let languages = catalog.languages().await.unwrap();
        assert_eq!(languages, vec![Language::new("spanish").unwrap()]);
    }

    #[test]
    fn rejects_items_without_a_term() {
        let raw = r#"{"spanish":[{"id":"1","title":"T","category":"C","difficulty":"Beginner",
            "content":[{"translation":"Hello","pronunciation":""}]}]}"#;
        assert!(matches!(
            InMemoryCatalog::from_json(raw),
            Err(StorageError::Serialization(_))
        ));
    }
}

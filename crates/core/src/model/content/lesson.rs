use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::LessonId;
use crate::model::content::{ContentError, ContentItem};

/// Catalog language key, stored lowercase (`spanish`, `french`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    /// # Errors
    ///
    /// Returns `ContentError::EmptyLanguage` for blank input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ContentError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ContentError::EmptyLanguage);
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Language {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Language {
    type Error = ContentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(ContentError::UnknownDifficulty(s.to_owned())),
        }
    }
}

/// Lesson as it appears in catalog documents, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDraft {
    pub id: LessonId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub difficulty: String,
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

impl TryFrom<LessonDraft> for Lesson {
    type Error = ContentError;

    fn try_from(draft: LessonDraft) -> Result<Self, Self::Error> {
        let difficulty = draft.difficulty.parse()?;
        Lesson::new(
            draft.id,
            draft.title,
            draft.category,
            difficulty,
            draft.content,
        )
    }
}

impl From<Lesson> for LessonDraft {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title,
            category: lesson.category,
            difficulty: lesson.difficulty.as_str().to_owned(),
            content: lesson.content,
        }
    }
}

/// A titled group of content items within one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LessonDraft", into = "LessonDraft")]
pub struct Lesson {
    id: LessonId,
    title: String,
    category: String,
    difficulty: Difficulty,
    content: Vec<ContentItem>,
}

impl Lesson {
    /// # Errors
    ///
    /// Returns `ContentError::EmptyTitle` when the title is blank.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        category: impl Into<String>,
        difficulty: Difficulty,
        content: Vec<ContentItem>,
    ) -> Result<Self, ContentError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ContentError::EmptyTitle);
        }
        Ok(Self {
            id,
            title,
            category: category.into(),
            difficulty,
            content,
        })
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn content(&self) -> &[ContentItem] {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::content::ContentItemDraft;

    #[test]
    fn language_is_normalized() {
        let lang: Language = " Spanish ".parse().unwrap();
        assert_eq!(lang.as_str(), "spanish");
        assert!(Language::new("").is_err());
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("beginner".parse::<Difficulty>().unwrap(), Difficulty::Beginner);
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn lesson_requires_title() {
        let err = Lesson::new(
            LessonId::new("1").unwrap(),
            " ",
            "Vocabulary",
            Difficulty::Beginner,
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, ContentError::EmptyTitle);
    }

    #[test]
    fn lesson_deserializes_catalog_shape() {
        let json = r#"{
            "id": "1",
            "title": "Basic Greetings",
            "category": "Vocabulary",
            "difficulty": "Beginner",
            "content": [
                {"word": "Hola", "translation": "Hello", "pronunciation": "OH-lah"}
            ]
        }"#;
        let lesson: Lesson = serde_json::from_str(json).unwrap();
        assert_eq!(lesson.id().as_str(), "1");
        assert_eq!(lesson.content().len(), 1);
        assert_eq!(
            lesson.content()[0],
            ContentItemDraft::word("Hola", "Hello", "OH-lah").validate().unwrap()
        );
    }

    #[test]
    fn catalog_lesson_with_blank_title_is_rejected() {
        let json = r#"{"id": "1", "title": " ", "category": "Vocabulary", "difficulty": "Beginner", "content": []}"#;
        let err = serde_json::from_str::<Lesson>(json).unwrap_err();
        assert!(err.to_string().contains("lesson title cannot be empty"));
    }

    #[test]
    fn catalog_difficulty_is_parsed_leniently() {
        let json = r#"{"id": "4", "title": "Numbers", "category": "Vocabulary", "difficulty": "advanced"}"#;
        let lesson: Lesson = serde_json::from_str(json).unwrap();
        assert_eq!(lesson.difficulty(), Difficulty::Advanced);
        assert!(lesson.content().is_empty());

        let back = serde_json::to_value(&lesson).unwrap();
        assert_eq!(back["difficulty"], "Advanced");

        let unknown = r#"{"id": "5", "title": "Colors", "category": "Vocabulary", "difficulty": "expert"}"#;
        assert!(serde_json::from_str::<Lesson>(unknown).is_err());
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── CONTENT TYPES ─────────────────────────────────────────────────────────────
//

/// Raw catalog entry as it appears in catalog documents.
///
/// Exactly one of `word` / `phrase` is expected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentItemDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrase: Option<String>,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub pronunciation: String,
}

/// The foreign-language side of a content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Word(String),
    Phrase(String),
}

impl Term {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Term::Word(text) | Term::Phrase(text) => text,
        }
    }

    #[must_use]
    pub fn is_word(&self) -> bool {
        matches!(self, Term::Word(_))
    }
}

/// A validated word or phrase with its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContentItemDraft", into = "ContentItemDraft")]
pub struct ContentItem {
    term: Term,
    translation: String,
    pronunciation: String,
}

//
// ─── CONTENT VALIDATION ERRORS ─────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("content item needs a word or a phrase")]
    MissingTerm,

    #[error("content item cannot have both a word and a phrase")]
    AmbiguousTerm,

    #[error("translation cannot be empty")]
    EmptyTranslation,

    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("language cannot be empty")]
    EmptyLanguage,

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── CONTENT DRAFT IMPL ─────────────────────────────────────────────────────────
//

impl ContentItemDraft {
    pub fn word(
        word: impl Into<String>,
        translation: impl Into<String>,
        pronunciation: impl Into<String>,
    ) -> Self {
        Self {
            word: Some(word.into()),
            phrase: None,
            translation: translation.into(),
            pronunciation: pronunciation.into(),
        }
    }

    pub fn phrase(
        phrase: impl Into<String>,
        translation: impl Into<String>,
        pronunciation: impl Into<String>,
    ) -> Self {
        Self {
            word: None,
            phrase: Some(phrase.into()),
            translation: translation.into(),
            pronunciation: pronunciation.into(),
        }
    }

    /// Validate into a `ContentItem`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` when the term is missing or ambiguous, or the
    /// translation is blank.
    pub fn validate(self) -> Result<ContentItem, ContentError> {
        let word = self.word.filter(|w| !w.trim().is_empty());
        let phrase = self.phrase.filter(|p| !p.trim().is_empty());
        let term = match (word, phrase) {
            (Some(_), Some(_)) => return Err(ContentError::AmbiguousTerm),
            (Some(word), None) => Term::Word(word),
            (None, Some(phrase)) => Term::Phrase(phrase),
            (None, None) => return Err(ContentError::MissingTerm),
        };
        if self.translation.trim().is_empty() {
            return Err(ContentError::EmptyTranslation);
        }

        Ok(ContentItem {
            term,
            translation: self.translation,
            pronunciation: self.pronunciation,
        })
    }
}

impl TryFrom<ContentItemDraft> for ContentItem {
    type Error = ContentError;

    fn try_from(draft: ContentItemDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl From<ContentItem> for ContentItemDraft {
    fn from(item: ContentItem) -> Self {
        let (word, phrase) = match item.term {
            Term::Word(word) => (Some(word), None),
            Term::Phrase(phrase) => (None, Some(phrase)),
        };
        Self {
            word,
            phrase,
            translation: item.translation,
            pronunciation: item.pronunciation,
        }
    }
}

//
// ─── ACCESSORS ─────────────────────────────────────────────────────────────────
//

impl ContentItem {
    #[must_use]
    pub fn term(&self) -> &Term {
        &self.term
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.term.text()
    }

    #[must_use]
    pub fn translation(&self) -> &str {
        &self.translation
    }

    #[must_use]
    pub fn pronunciation(&self) -> &str {
        &self.pronunciation
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

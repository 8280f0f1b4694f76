use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for building an ID from a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} must not be blank")]
pub struct IdError {
    kind: &'static str,
}

impl IdError {
    /// Name of the id type that failed to parse.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

fn normalize(raw: impl Into<String>, kind: &'static str) -> Result<String, IdError> {
    let raw = raw.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdError { kind });
    }
    if trimmed.len() == raw.len() {
        Ok(raw)
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Identifier of a learner account, as issued by the auth provider.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Creates a new `UserId`
    ///
    /// # Errors
    ///
    /// Returns `IdError` if the value is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        normalize(id, "UserId").map(Self)
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a lesson inside a language's catalog.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LessonId(String);

impl LessonId {
    /// Creates a new `LessonId`
    ///
    /// # Errors
    ///
    /// Returns `IdError` if the value is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        normalize(id, "LessonId").map(Self)
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Debug for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Conversions ───────────────────────────────────────────────────────────────

impl FromStr for UserId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for LessonId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for LessonId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl From<LessonId> for String {
    fn from(id: LessonId) -> Self {
        id.0
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_display() {
        let id = UserId::new("uid-42").unwrap();
        assert_eq!(id.to_string(), "uid-42");
    }

    #[test]
    fn test_user_id_from_str_trims() {
        let id: UserId = "  abc ".parse().unwrap();
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn test_user_id_from_str_blank() {
        let err = "   ".parse::<UserId>().unwrap_err();
        assert_eq!(err.kind(), "UserId");
    }

    #[test]
    fn test_lesson_id_from_str() {
        let id: LessonId = "3".parse().unwrap();
        assert_eq!(id, LessonId::new("3").unwrap());
    }

    #[test]
    fn test_lesson_id_serializes_as_plain_string() {
        let id = LessonId::new("2").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"2\"");
        let back: LessonId = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_lesson_id_rejects_blank_json() {
        assert!(serde_json::from_str::<LessonId>("\"\"").is_err());
    }
}

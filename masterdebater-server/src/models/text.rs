//! Bounded text fields

use super::validation::{bounded, ValidationError};

const MAX_USERNAME_LEN: usize = 64;
const MAX_TITLE_LEN: usize = 256;
const MAX_MEMORY_KEY_LEN: usize = 128;

/// Display name of a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded(s, "username", MAX_USERNAME_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Title of a debate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateTitle(String);

impl DebateTitle {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded(s, "title", MAX_TITLE_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Key of a participant's memory entry.
///
/// Keys are compared exactly, so surrounding whitespace is an error rather
/// than silently trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoryKey(String);

impl MemoryKey {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let key = bounded(s, "memory key", MAX_MEMORY_KEY_LEN)?;
        if key.len() != s.len() {
            return Err(ValidationError::InvalidFormat {
                field: "memory key",
                reason: "must not have leading or trailing whitespace",
            });
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_trims() {
        assert_eq!(Username::new("  Admin ").unwrap().as_str(), "Admin");
        assert!(Username::new("").is_err());
    }

    #[test]
    fn title_max_length() {
        assert!(DebateTitle::new(&"a".repeat(256)).is_ok());
        let err = DebateTitle::new(&"a".repeat(257)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 256, .. }));
    }

    #[test]
    fn memory_key_is_exact() {
        assert!(MemoryKey::new("opponent_weaknesses").is_ok());
        let err = MemoryKey::new(" padded").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }
}

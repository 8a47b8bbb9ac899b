//! Validated index names.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A validated name for a vector index.
///
/// Index names are globally unique, chosen at creation, and immutable.
/// Names must be non-empty and contain only alphanumeric characters,
/// underscores, and hyphens.
///
/// # Example
///
/// ```
/// use neardb::IndexName;
///
/// let name = IndexName::new("documents").unwrap();
/// assert_eq!(name.as_str(), "documents");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexName(String);

impl IndexName {
    /// Create a new index name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or contains invalid characters.
    pub fn new(name: impl Into<String>) -> Result<Self, EngineError> {
        let name = name.into();

        if name.is_empty() {
            return Err(EngineError::InvalidName("index name cannot be empty".to_string()));
        }

        if !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Err(EngineError::InvalidName(format!(
                "index name '{name}' contains invalid characters (allowed: alphanumeric, underscore, hyphen)"
            )));
        }

        Ok(Self(name))
    }

    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the name and return the underlying string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for IndexName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

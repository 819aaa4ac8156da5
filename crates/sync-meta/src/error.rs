//! Error types for sync-meta

/// Result type for sync-meta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while validating or (de)serializing canonical resources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid resource name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Frontmatter header opened but never closed")]
    UnterminatedHeader,

    #[error("Malformed frontmatter metadata: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

//! Error types for sync-tools

use std::path::PathBuf;
use sync_meta::{ResourceKind, Scope};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] sync_fs::Error),

    #[error("Resource error: {0}")]
    Meta(#[from] sync_meta::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind} '{name}' not found on {platform}")]
    NotFound {
        platform: String,
        kind: ResourceKind,
        name: String,
    },

    #[error("Invalid resource: {message}")]
    InvalidResource { message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Malformed MCP config: {message}")]
    MalformedConfig { message: String },

    #[error("{platform} does not support {kind} at {scope} scope")]
    Unsupported {
        platform: String,
        kind: ResourceKind,
        scope: Scope,
    },

    #[error("Unknown platform '{slug}'")]
    UnknownPlatform { slug: String },

    #[error("Backup failed for {platform}: {message}")]
    Backup { platform: String, message: String },

    #[error("Scope selection cancelled")]
    Cancelled,

    #[error("Failed to read input: {0}")]
    Prompt(#[from] std::io::Error),
}

impl Error {
    /// NotFound is recoverable — for install it means "create".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn not_found(platform: impl Into<String>, kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            platform: platform.into(),
            kind,
            name: name.into(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

//! Configuration scopes.
//!
//! A scope names the configuration layer a read or write targets. Together
//! with a platform and a resource kind it deterministically yields exactly
//! one filesystem path.

use serde::{Deserialize, Serialize};

/// Where a resource definition should be read from or installed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// User-level: stored in the user's home dir, available across projects.
    User,
    /// Project-level: stored in the repo, can be committed to VCS.
    Project,
    /// Local: project-associated but never committed (gitignored layer).
    Local,
    /// Managed: machine-wide configuration provisioned by an administrator.
    Managed,
}

impl Scope {
    /// Fallback used when a requested scope string is not recognized.
    pub const DEFAULT: Scope = Scope::User;

    /// Parse a scope name case-insensitively.
    ///
    /// Returns `None` for unrecognized input; callers decide whether that
    /// falls back to [`Scope::DEFAULT`] or is an error.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Self::User),
            "project" => Some(Self::Project),
            "local" => Some(Self::Local),
            "managed" => Some(Self::Managed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Project => "project",
            Self::Local => "local",
            Self::Managed => "managed",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

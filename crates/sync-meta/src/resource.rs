//! Canonical resources.
//!
//! A [`Resource`] is the platform-independent, in-memory representation of
//! one reusable AI-assistant asset. It is constructed transiently from
//! parsed bytes, held for the duration of one invocation, and has no store
//! of truth beyond the platform-native file it was read from or is about to
//! be written to.

use crate::mcp::McpServerConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// The four kinds of resource AgentSync can synchronize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Skill,
    Command,
    Agent,
    McpServer,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::Command => "command",
            Self::Agent => "agent",
            Self::McpServer => "mcp-server",
        }
    }

    /// Whether documents of this kind must carry a frontmatter header.
    ///
    /// A missing header is a hard error from `get` for these kinds, but
    /// only a skip from `list`.
    pub fn requires_header(self) -> bool {
        matches!(self, Self::Skill | Self::Agent)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reusable skill: instructions plus a description of when to apply them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillResource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub body: String,
}

/// A slash command. The body is the prompt template; metadata is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub body: String,
}

/// An agent persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Preferred model alias, where the platform supports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub body: String,
}

/// A named MCP server connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerResource {
    pub name: String,
    #[serde(flatten)]
    pub config: McpServerConfig,
}

/// Canonical resource: a closed tagged union over the four kinds.
///
/// Translators implement one typed conversion per variant; there is no
/// dynamic boxing or type-switching at call sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Resource {
    Skill(SkillResource),
    Command(CommandResource),
    Agent(AgentResource),
    #[serde(rename = "mcp-server")]
    McpServer(McpServerResource),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Skill(_) => ResourceKind::Skill,
            Self::Command(_) => ResourceKind::Command,
            Self::Agent(_) => ResourceKind::Agent,
            Self::McpServer(_) => ResourceKind::McpServer,
        }
    }

    /// The resource's identity. Unique within platform + scope + kind.
    pub fn name(&self) -> &str {
        match self {
            Self::Skill(r) => &r.name,
            Self::Command(r) => &r.name,
            Self::Agent(r) => &r.name,
            Self::McpServer(r) => &r.name,
        }
    }

    /// Platforms this resource is allowed to install to. Empty = all.
    pub fn platform_allow_list(&self) -> &[String] {
        match self {
            Self::McpServer(r) => &r.config.platforms,
            _ => &[],
        }
    }

    /// Validate the identity field.
    ///
    /// # Errors
    ///
    /// Fails when the name is empty or contains characters unsafe for use
    /// as a filename or JSON map key.
    pub fn validate(&self) -> Result<()> {
        validate_name(self.name())
    }

    /// Semantic equality used for idempotent-install detection.
    ///
    /// Metadata fields compare exactly; bodies compare after whitespace
    /// normalization (line endings unified, trailing whitespace stripped).
    /// Structured metadata is deliberately *not* compared order-insensitively:
    /// a permuted `platforms` list counts as a different resource.
    pub fn semantically_equal(&self, other: &Resource) -> bool {
        match (self, other) {
            (Self::Skill(a), Self::Skill(b)) => {
                a.name == b.name
                    && a.description == b.description
                    && normalize_body(&a.body) == normalize_body(&b.body)
            }
            (Self::Command(a), Self::Command(b)) => {
                a.name == b.name
                    && a.description == b.description
                    && normalize_body(&a.body) == normalize_body(&b.body)
            }
            (Self::Agent(a), Self::Agent(b)) => {
                a.name == b.name
                    && a.description == b.description
                    && a.model == b.model
                    && normalize_body(&a.body) == normalize_body(&b.body)
            }
            (Self::McpServer(a), Self::McpServer(b)) => a == b,
            _ => false,
        }
    }
}

/// Validate a resource name for use as a filename and map key.
///
/// Allowed: ASCII alphanumerics, `-`, `_`, `.`; must be non-empty and must
/// not start with a dot.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_name(name, "name is empty"));
    }
    if name.starts_with('.') {
        return Err(Error::invalid_name(name, "name must not start with '.'"));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(Error::invalid_name(
            name,
            format!("character {bad:?} is not allowed"),
        ));
    }
    Ok(())
}

/// Normalize a body for comparison: unify CRLF, strip trailing whitespace
/// per line, and drop leading/trailing blank space.
fn normalize_body(body: &str) -> String {
    let unified = body.replace("\r\n", "\n");
    let lines: Vec<&str> = unified.lines().map(str::trim_end).collect();
    lines.join("\n").trim().to_string()
}

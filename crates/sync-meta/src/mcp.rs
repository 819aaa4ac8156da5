//! Canonical MCP server configuration.
//!
//! These are the tool-agnostic types that users write and that get
//! translated into each platform's native JSON format by the per-platform
//! translator in `sync-tools`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Transport-specific configuration for an MCP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transport", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Local process communication via stdin/stdout.
    Stdio {
        command: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
    },
    /// Server-Sent Events remote transport.
    Sse {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        headers: Option<BTreeMap<String, String>>,
    },
}

impl TransportConfig {
    /// The canonical tag for this transport (`"stdio"` or `"sse"`).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Stdio { .. } => "stdio",
            Self::Sse { .. } => "sse",
        }
    }
}

/// A platform-agnostic MCP server definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerConfig {
    /// Transport configuration.
    pub transport: TransportConfig,

    /// Environment variables to pass to the server process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,

    /// Platforms this server applies to. Empty means all platforms.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,

    /// Whether the server is installed but disabled.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl McpServerConfig {
    /// Whether this server should be applied to the given platform slug.
    ///
    /// An empty allow-list means the server applies everywhere.
    pub fn applies_to(&self, platform: &str) -> bool {
        self.platforms.is_empty() || self.platforms.iter().any(|p| p == platform)
    }
}

/// The parsed content of one platform's MCP config file.
///
/// `extra` holds every top-level key the translator does not recognize; it
/// must be re-emitted unchanged on every write so that configs written by a
/// newer platform version survive a round-trip through this tool.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlatformMcpConfig {
    /// Server name → canonical config.
    pub servers: BTreeMap<String, McpServerConfig>,
    /// Unrecognized top-level keys, preserved verbatim.
    pub extra: serde_json::Map<String, serde_json::Value>,
    /// Entries under the servers key that did not parse as servers,
    /// re-emitted verbatim inside the servers map.
    pub unrecognized_servers: serde_json::Map<String, serde_json::Value>,
}

impl PlatformMcpConfig {
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty() && self.extra.is_empty() && self.unrecognized_servers.is_empty()
    }
}

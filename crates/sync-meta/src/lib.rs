//! Canonical resource model for AgentSync
//!
//! Defines the platform-independent representation of reusable AI-assistant
//! resources (agents, skills, slash commands, MCP servers), the configuration
//! scopes they can live in, the frontmatter document codec, and the
//! structured outcome types produced by multi-platform installs.

pub mod error;
pub mod frontmatter;
pub mod mcp;
pub mod outcome;
pub mod resource;
pub mod scope;

pub use error::{Error, Result};
pub use mcp::{McpServerConfig, PlatformMcpConfig, TransportConfig};
pub use outcome::{AggregateStatus, InstallReport, OutcomeStatus, TargetOutcome};
pub use resource::{
    AgentResource, CommandResource, McpServerResource, Resource, ResourceKind, SkillResource,
    validate_name,
};
pub use scope::Scope;

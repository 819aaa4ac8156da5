//! Scope → concrete filesystem path resolution.
//!
//! A [`PlatformPaths`] binds a platform spec from the registry to a home
//! directory and (optionally) a project root, and answers "where does
//! resource kind X live at scope Y". All path composition is pure table
//! lookup — `None` means the platform does not support that combination.

use sync_fs::NormalizedPath;
use sync_meta::{ResourceKind, Scope};

use crate::registry::{McpLocation, PlatformSpec};

/// Path resolver for one platform, anchored at a home dir and project root.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    spec: &'static PlatformSpec,
    home: NormalizedPath,
    project_root: Option<NormalizedPath>,
}

impl PlatformPaths {
    pub fn new(
        spec: &'static PlatformSpec,
        home: NormalizedPath,
        project_root: Option<NormalizedPath>,
    ) -> Self {
        Self {
            spec,
            home,
            project_root,
        }
    }

    pub fn spec(&self) -> &'static PlatformSpec {
        self.spec
    }

    pub fn slug(&self) -> &'static str {
        self.spec.slug
    }

    /// The platform base directory for a scope.
    ///
    /// User scope anchors at `$HOME`; Project and Local share the project
    /// root (the layering difference is VCS ignore status, not location);
    /// Managed uses the machine-wide directory when the platform has one.
    pub fn base_dir(&self, scope: Scope) -> Option<NormalizedPath> {
        match scope {
            Scope::User => Some(self.home.join(self.spec.base_dir)),
            Scope::Project | Scope::Local => self
                .project_root
                .as_ref()
                .map(|root| root.join(self.spec.base_dir)),
            Scope::Managed => self
                .spec
                .managed_dir
                .map(|dirs| NormalizedPath::new(dirs.resolve())),
        }
    }

    /// Directory holding resources of `kind` at `scope`, or `None` when the
    /// platform does not support the kind (or the scope has no anchor).
    pub fn resource_dir(&self, kind: ResourceKind, scope: Scope) -> Option<NormalizedPath> {
        let subdir = match kind {
            ResourceKind::Skill => self.spec.skills_dir?,
            ResourceKind::Command => self.spec.commands_dir?,
            ResourceKind::Agent => self.spec.agents_dir?,
            // MCP servers live in a config file, not a directory.
            ResourceKind::McpServer => return None,
        };
        Some(self.base_dir(scope)?.join(subdir))
    }

    pub fn skill_dir(&self, scope: Scope) -> Option<NormalizedPath> {
        self.resource_dir(ResourceKind::Skill, scope)
    }

    pub fn command_dir(&self, scope: Scope) -> Option<NormalizedPath> {
        self.resource_dir(ResourceKind::Command, scope)
    }

    pub fn agent_dir(&self, scope: Scope) -> Option<NormalizedPath> {
        self.resource_dir(ResourceKind::Agent, scope)
    }

    /// The platform's instructions/memory file at `scope`.
    pub fn instructions_path(&self, scope: Scope) -> Option<NormalizedPath> {
        Some(self.base_dir(scope)?.join(self.spec.instructions_file))
    }

    /// The MCP config file for `scope`.
    ///
    /// Managed scope never resolves here: no supported platform reads
    /// machine-wide MCP config. Local falls back to the project location
    /// when the platform defines no distinct local file.
    pub fn mcp_config_path(&self, scope: Scope) -> Option<NormalizedPath> {
        let mcp = self.spec.mcp.as_ref()?;
        let location = match scope {
            Scope::User => mcp.user_location,
            Scope::Project => mcp.project_location,
            Scope::Local => mcp.local_location.unwrap_or(mcp.project_location),
            Scope::Managed => return None,
        };
        self.resolve_location(location, scope)
    }

    fn resolve_location(&self, location: McpLocation, scope: Scope) -> Option<NormalizedPath> {
        match location {
            McpLocation::HomeRoot(file) => Some(self.home.join(file)),
            McpLocation::InBase(file) => Some(self.base_dir(scope)?.join(file)),
            McpLocation::ProjectRoot(file) => {
                self.project_root.as_ref().map(|root| root.join(file))
            }
        }
    }
}

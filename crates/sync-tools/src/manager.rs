//! Per-platform resource stores.
//!
//! A [`ResourceStore`] is one platform + scope + kind. Markdown-backed
//! kinds (skills, commands, agents) go through [`MarkdownStore`]; MCP
//! servers live inside a shared JSON config file and go through
//! [`McpStore`]. The installer only sees the trait.

use serde::{Deserialize, Serialize};
use std::fs;
use tracing::debug;

use sync_fs::{NormalizedPath, read_bytes, read_text, write_text};
use sync_meta::{
    AgentResource, CommandResource, McpServerResource, PlatformMcpConfig, Resource, ResourceKind,
    Scope, SkillResource, frontmatter, validate_name,
};

use crate::error::{Error, Result};
use crate::paths::PlatformPaths;
use crate::translate::{config_from_canonical, config_to_canonical};

/// Skills are directories holding a canonical entry file, so that a skill
/// can ship support files alongside its instructions.
const SKILL_ENTRY: &str = "SKILL.md";

/// CRUD over one platform + scope + kind.
pub trait ResourceStore {
    fn platform(&self) -> &'static str;
    fn kind(&self) -> ResourceKind;

    /// All parseable resources. Unparseable entries are skipped, never
    /// fatal — a listing must not be held hostage by one bad file.
    fn list(&self) -> Result<Vec<Resource>>;

    /// One resource by name. Unlike `list`, parse failures here are hard
    /// errors, including a missing mandatory header.
    fn get(&self, name: &str) -> Result<Resource>;

    /// Write the resource in native format. Overwrites an existing entry.
    fn install(&self, resource: &Resource) -> Result<()>;

    /// Remove the resource. Removing an absent resource is a no-op.
    fn uninstall(&self, name: &str) -> Result<()>;

    /// Where an install of `name` would write.
    fn target_path(&self, name: &str) -> NormalizedPath;

    /// Paths the backup layer must snapshot before this store mutates.
    fn backup_paths(&self) -> Vec<NormalizedPath>;
}

// ---------------------------------------------------------------------------
// Frontmatter metadata, one shape per markdown kind
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
struct SkillMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CommandMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AgentMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

/// Store for markdown-backed kinds.
#[derive(Debug)]
pub struct MarkdownStore {
    paths: PlatformPaths,
    kind: ResourceKind,
    dir: NormalizedPath,
}

impl MarkdownStore {
    /// # Errors
    ///
    /// Fails with [`Error::Unsupported`] when the platform has no directory
    /// for this kind at this scope.
    pub fn new(paths: PlatformPaths, kind: ResourceKind, scope: Scope) -> Result<Self> {
        debug_assert!(kind != ResourceKind::McpServer);
        let dir = paths
            .resource_dir(kind, scope)
            .ok_or_else(|| Error::Unsupported {
                platform: paths.slug().to_string(),
                kind,
                scope,
            })?;
        Ok(Self { paths, kind, dir })
    }

    fn document_path(&self, name: &str) -> NormalizedPath {
        match self.kind {
            ResourceKind::Skill => self.dir.join(name).join(SKILL_ENTRY),
            _ => self.dir.join(&format!("{name}.md")),
        }
    }

    /// Parse one document into a resource.
    ///
    /// A missing mandatory header is an error here; `list` turns that
    /// error into a skip, `get` surfaces it.
    fn parse_document(&self, name: &str, content: &str) -> Result<Resource> {
        let path = self.document_path(name);
        let missing_header = || {
            Error::parse(
                path.to_native(),
                format!("missing mandatory frontmatter header for {}", self.kind),
            )
        };

        let resource = match self.kind {
            ResourceKind::Skill => {
                let (meta, body) = frontmatter::parse::<SkillMeta>(content)
                    .map_err(|e| Error::parse(path.to_native(), e.to_string()))?;
                let meta = meta.ok_or_else(missing_header)?;
                Resource::Skill(SkillResource {
                    name: name.to_string(),
                    description: meta.description,
                    body: body.to_string(),
                })
            }
            ResourceKind::Command => {
                let (meta, body) = frontmatter::parse::<CommandMeta>(content)
                    .map_err(|e| Error::parse(path.to_native(), e.to_string()))?;
                let meta = meta.unwrap_or_default();
                Resource::Command(CommandResource {
                    name: name.to_string(),
                    description: meta.description,
                    body: body.to_string(),
                })
            }
            ResourceKind::Agent => {
                let (meta, body) = frontmatter::parse::<AgentMeta>(content)
                    .map_err(|e| Error::parse(path.to_native(), e.to_string()))?;
                let meta = meta.ok_or_else(missing_header)?;
                Resource::Agent(AgentResource {
                    name: name.to_string(),
                    description: meta.description,
                    model: meta.model,
                    body: body.to_string(),
                })
            }
            ResourceKind::McpServer => unreachable!("MarkdownStore never holds MCP servers"),
        };

        Ok(resource)
    }

    fn render_document(&self, resource: &Resource) -> Result<String> {
        // Header-mandated kinds must emit a header even with empty
        // metadata; `get` would otherwise reject the store's own output.
        let rendered = match resource {
            Resource::Skill(r) => frontmatter::format_always(
                &SkillMeta {
                    description: r.description.clone(),
                },
                &r.body,
            ),
            Resource::Command(r) => frontmatter::format(
                &CommandMeta {
                    description: r.description.clone(),
                },
                &r.body,
            ),
            Resource::Agent(r) => frontmatter::format_always(
                &AgentMeta {
                    description: r.description.clone(),
                    model: r.model.clone(),
                },
                &r.body,
            ),
            Resource::McpServer(_) => {
                return Err(Error::InvalidResource {
                    message: "MCP servers are not markdown documents".into(),
                });
            }
        };
        Ok(rendered?)
    }

    /// Entry names present on disk, without parsing their contents.
    fn entry_names(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(vec![]);
        }
        let native = self.dir.to_native();
        let mut names = Vec::new();
        for entry in fs::read_dir(&native).map_err(|e| sync_fs::Error::io(&native, e))? {
            let entry = entry.map_err(|e| sync_fs::Error::io(&native, e))?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            match self.kind {
                ResourceKind::Skill => {
                    if entry.path().is_dir() {
                        names.push(file_name);
                    }
                }
                _ => {
                    if let Some(stem) = file_name.strip_suffix(".md") {
                        names.push(stem.to_string());
                    }
                }
            }
        }
        names.sort_unstable();
        Ok(names)
    }
}

impl ResourceStore for MarkdownStore {
    fn platform(&self) -> &'static str {
        self.paths.slug()
    }

    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn list(&self) -> Result<Vec<Resource>> {
        let mut resources = Vec::new();
        for name in self.entry_names()? {
            let path = self.document_path(&name);
            let content = match read_text(&path) {
                Ok(content) => content,
                Err(e) => {
                    debug!(platform = self.platform(), %path, error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            match self.parse_document(&name, &content) {
                Ok(resource) => resources.push(resource),
                Err(e) => {
                    debug!(platform = self.platform(), %path, error = %e, "skipping unparseable entry");
                }
            }
        }
        Ok(resources)
    }

    fn get(&self, name: &str) -> Result<Resource> {
        validate_name(name).map_err(Error::Meta)?;
        let path = self.document_path(name);
        if !path.is_file() {
            return Err(Error::not_found(self.platform(), self.kind, name));
        }
        let content = read_text(&path)?;
        self.parse_document(name, &content)
    }

    fn install(&self, resource: &Resource) -> Result<()> {
        if resource.kind() != self.kind {
            return Err(Error::InvalidResource {
                message: format!(
                    "store holds {} resources, got {}",
                    self.kind,
                    resource.kind()
                ),
            });
        }
        resource.validate().map_err(Error::Meta)?;
        let rendered = self.render_document(resource)?;
        let path = self.document_path(resource.name());
        write_text(&path, &rendered)?;
        debug!(platform = self.platform(), kind = %self.kind, name = resource.name(), "installed");
        Ok(())
    }

    fn uninstall(&self, name: &str) -> Result<()> {
        validate_name(name).map_err(Error::Meta)?;
        let target = match self.kind {
            ResourceKind::Skill => self.dir.join(name),
            _ => self.dir.join(&format!("{name}.md")),
        };
        if !target.exists() {
            return Ok(());
        }
        let native = target.to_native();
        if native.is_dir() {
            fs::remove_dir_all(&native).map_err(|e| sync_fs::Error::io(&native, e))?;
        } else {
            fs::remove_file(&native).map_err(|e| sync_fs::Error::io(&native, e))?;
        }
        debug!(platform = self.platform(), kind = %self.kind, name, "uninstalled");
        Ok(())
    }

    fn target_path(&self, name: &str) -> NormalizedPath {
        self.document_path(name)
    }

    fn backup_paths(&self) -> Vec<NormalizedPath> {
        vec![self.dir.clone()]
    }
}

/// Store for MCP server definitions inside a platform's JSON config file.
pub struct McpStore {
    paths: PlatformPaths,
    config_path: NormalizedPath,
}

impl McpStore {
    /// # Errors
    ///
    /// Fails with [`Error::Unsupported`] when the platform has no MCP
    /// config location at this scope.
    pub fn new(paths: PlatformPaths, scope: Scope) -> Result<Self> {
        let config_path = paths
            .mcp_config_path(scope)
            .ok_or_else(|| Error::Unsupported {
                platform: paths.slug().to_string(),
                kind: ResourceKind::McpServer,
                scope,
            })?;
        Ok(Self { paths, config_path })
    }

    fn read_config(&self) -> Result<PlatformMcpConfig> {
        if !self.config_path.is_file() {
            return Ok(PlatformMcpConfig::default());
        }
        let raw = read_bytes(&self.config_path)?;
        config_to_canonical(&raw, self.paths.spec())
    }

    fn write_config(&self, config: &PlatformMcpConfig) -> Result<()> {
        let bytes = config_from_canonical(config, self.paths.spec())?;
        sync_fs::write_atomic(&self.config_path, &bytes)?;
        Ok(())
    }
}

impl ResourceStore for McpStore {
    fn platform(&self) -> &'static str {
        self.paths.slug()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::McpServer
    }

    fn list(&self) -> Result<Vec<Resource>> {
        let config = self.read_config()?;
        Ok(config
            .servers
            .into_iter()
            .map(|(name, config)| Resource::McpServer(McpServerResource { name, config }))
            .collect())
    }

    fn get(&self, name: &str) -> Result<Resource> {
        validate_name(name).map_err(Error::Meta)?;
        let mut config = self.read_config()?;
        match config.servers.remove(name) {
            Some(server) => Ok(Resource::McpServer(McpServerResource {
                name: name.to_string(),
                config: server,
            })),
            None => Err(Error::not_found(
                self.platform(),
                ResourceKind::McpServer,
                name,
            )),
        }
    }

    fn install(&self, resource: &Resource) -> Result<()> {
        let Resource::McpServer(server) = resource else {
            return Err(Error::InvalidResource {
                message: format!("store holds mcp-server resources, got {}", resource.kind()),
            });
        };
        resource.validate().map_err(Error::Meta)?;

        let mut config = self.read_config()?;
        // Verbatim-preserved entries lose to an explicit install of the
        // same name.
        config.unrecognized_servers.remove(&server.name);
        config
            .servers
            .insert(server.name.clone(), server.config.clone());
        self.write_config(&config)?;
        debug!(platform = self.platform(), name = %server.name, "installed mcp server");
        Ok(())
    }

    fn uninstall(&self, name: &str) -> Result<()> {
        validate_name(name).map_err(Error::Meta)?;
        let mut config = self.read_config()?;
        let removed = config.servers.remove(name).is_some()
            | config.unrecognized_servers.remove(name).is_some();
        if removed {
            self.write_config(&config)?;
            debug!(platform = self.platform(), name, "uninstalled mcp server");
        }
        Ok(())
    }

    fn target_path(&self, _name: &str) -> NormalizedPath {
        // Every server of this platform + scope shares one config file.
        self.config_path.clone()
    }

    fn backup_paths(&self) -> Vec<NormalizedPath> {
        vec![self.config_path.clone()]
    }
}

//! Platform registry — the single source of truth for platform deviations.
//!
//! Every difference between platforms (directory layout, resource subdirs,
//! MCP config file locations, JSON servers key, transport vocabulary) is
//! data in [`PLATFORMS`]; call sites never branch on a slug.
//!
//! # Adding a new platform
//!
//! 1. Add a `PlatformSpec` constant below.
//! 2. Append it to [`PLATFORMS`] (keep the slice alphabetical by slug).

/// Complete description of one assistant platform's on-disk layout.
#[derive(Debug)]
pub struct PlatformSpec {
    /// Stable identifier, used in outcome reports and backup directories.
    pub slug: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Base directory, relative to `$HOME` for User scope and to the
    /// project root for Project/Local scope.
    pub base_dir: &'static str,
    /// Machine-wide base directory for Managed scope, per OS.
    /// `None` if the platform has no managed layer.
    pub managed_dir: Option<OsDirs>,
    /// Subdirectory of the base dir holding skills; `None` = unsupported.
    pub skills_dir: Option<&'static str>,
    /// Subdirectory holding slash commands; `None` = unsupported.
    pub commands_dir: Option<&'static str>,
    /// Subdirectory holding agent personas; `None` = unsupported.
    pub agents_dir: Option<&'static str>,
    /// Filename of the platform's instructions/memory file within the base.
    pub instructions_file: &'static str,
    /// MCP configuration, `None` if the platform does not speak MCP.
    pub mcp: Option<McpSpec>,
}

/// OS-dependent absolute directories (Managed scope).
#[derive(Debug, Clone, Copy)]
pub struct OsDirs {
    pub macos: &'static str,
    pub linux: &'static str,
    pub windows: &'static str,
}

impl OsDirs {
    /// Resolve for the compile-target OS.
    pub fn resolve(&self) -> &'static str {
        if cfg!(target_os = "macos") {
            self.macos
        } else if cfg!(target_os = "windows") {
            self.windows
        } else {
            self.linux
        }
    }
}

/// How a platform stores MCP server definitions.
#[derive(Debug)]
pub struct McpSpec {
    /// Top-level JSON key for the servers map (`"mcpServers"`, `"mcp"`, …).
    pub servers_key: &'static str,
    /// Config file location at User scope.
    pub user_location: McpLocation,
    /// Config file location at Project scope.
    pub project_location: McpLocation,
    /// Config file location at Local scope; `None` falls back to the
    /// project location.
    pub local_location: Option<McpLocation>,
    /// Native transport tags, mapped bidirectionally to the canonical
    /// `stdio`/`sse` vocabulary.
    pub vocab: TransportVocab,
}

/// Where an MCP config file lives, relative to a known anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McpLocation {
    /// File directly under `$HOME`, outside the platform base dir.
    HomeRoot(&'static str),
    /// File inside the platform base dir for the resolved scope.
    InBase(&'static str),
    /// File at the project root, outside the base dir.
    ProjectRoot(&'static str),
}

/// Bidirectional transport-tag lookup table.
///
/// `None` means the platform omits the tag for that transport and infers
/// it from the fields present; reading such an entry falls back to exactly
/// one default guess (URL present ⇒ sse, else stdio).
#[derive(Debug, Clone, Copy)]
pub struct TransportVocab {
    pub stdio: Option<&'static str>,
    pub sse: Option<&'static str>,
}

impl TransportVocab {
    /// Canonical tag → native tag, if the platform writes one.
    pub fn to_native(&self, canonical: &str) -> Option<&'static str> {
        match canonical {
            "stdio" => self.stdio,
            "sse" => self.sse,
            _ => None,
        }
    }

    /// Native tag → canonical tag.
    pub fn to_canonical(&self, native: &str) -> Option<&'static str> {
        if self.stdio == Some(native) {
            Some("stdio")
        } else if self.sse == Some(native) {
            Some("sse")
        } else {
            None
        }
    }
}

// ===========================================================================
// Per-platform specs
// ===========================================================================

/// Claude Code. The one platform whose user/local MCP config lives at the
/// home root (`~/.claude.json`) rather than inside `~/.claude/`, while the
/// project MCP config sits at the project root as `.mcp.json`.
static CLAUDE: PlatformSpec = PlatformSpec {
    slug: "claude",
    name: "Claude Code",
    base_dir: ".claude",
    managed_dir: Some(OsDirs {
        macos: "/Library/Application Support/ClaudeCode",
        linux: "/etc/claude-code",
        windows: "C:/ProgramData/ClaudeCode",
    }),
    skills_dir: Some("skills"),
    commands_dir: Some("commands"),
    agents_dir: Some("agents"),
    instructions_file: "CLAUDE.md",
    mcp: Some(McpSpec {
        servers_key: "mcpServers",
        user_location: McpLocation::HomeRoot(".claude.json"),
        project_location: McpLocation::ProjectRoot(".mcp.json"),
        local_location: Some(McpLocation::HomeRoot(".claude.json")),
        vocab: TransportVocab {
            stdio: Some("stdio"),
            sse: Some("sse"),
        },
    }),
};

/// Cursor. Commands only; MCP entries carry no type tag (transport is
/// inferred from the fields present).
static CURSOR: PlatformSpec = PlatformSpec {
    slug: "cursor",
    name: "Cursor",
    base_dir: ".cursor",
    managed_dir: None,
    skills_dir: None,
    commands_dir: Some("commands"),
    agents_dir: None,
    instructions_file: "rules.md",
    mcp: Some(McpSpec {
        servers_key: "mcpServers",
        user_location: McpLocation::InBase("mcp.json"),
        project_location: McpLocation::InBase("mcp.json"),
        local_location: None,
        vocab: TransportVocab {
            stdio: None,
            sse: None,
        },
    }),
};

/// Gemini CLI. MCP servers are nested inside the larger `settings.json`;
/// the other top-level settings keys ride through as preserved unknowns.
static GEMINI: PlatformSpec = PlatformSpec {
    slug: "gemini",
    name: "Gemini CLI",
    base_dir: ".gemini",
    managed_dir: None,
    skills_dir: None,
    commands_dir: Some("commands"),
    agents_dir: None,
    instructions_file: "GEMINI.md",
    mcp: Some(McpSpec {
        servers_key: "mcpServers",
        user_location: McpLocation::InBase("settings.json"),
        project_location: McpLocation::InBase("settings.json"),
        local_location: None,
        vocab: TransportVocab {
            stdio: None,
            sse: None,
        },
    }),
};

/// OpenCode. Singular resource directory names, `"mcp"` servers key, and
/// a `local`/`remote` transport vocabulary where the canonical tags are
/// `stdio`/`sse`.
static OPENCODE: PlatformSpec = PlatformSpec {
    slug: "opencode",
    name: "OpenCode",
    base_dir: ".opencode",
    managed_dir: None,
    skills_dir: Some("skill"),
    commands_dir: Some("command"),
    agents_dir: Some("agent"),
    instructions_file: "AGENTS.md",
    mcp: Some(McpSpec {
        servers_key: "mcp",
        user_location: McpLocation::InBase("opencode.json"),
        project_location: McpLocation::ProjectRoot("opencode.json"),
        local_location: None,
        vocab: TransportVocab {
            stdio: Some("local"),
            sse: Some("remote"),
        },
    }),
};

/// All supported platforms, alphabetical by slug.
pub static PLATFORMS: &[&PlatformSpec] = &[&CLAUDE, &CURSOR, &GEMINI, &OPENCODE];

/// Look up a platform spec by slug.
pub fn platform_spec(slug: &str) -> Option<&'static PlatformSpec> {
    PLATFORMS.iter().copied().find(|spec| spec.slug == slug)
}

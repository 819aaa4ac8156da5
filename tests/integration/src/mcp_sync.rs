//! MCP server synchronization across platform config formats.
//!
//! Covers the asymmetric Claude file locations, the OpenCode transport
//! vocabulary, and preservation of settings that belong to other tools.

use pretty_assertions::assert_eq;
use serde_json::Value;
use std::collections::BTreeMap;
use tempfile::TempDir;

use sync_fs::{NormalizedPath, read_text, write_text};
use sync_meta::{
    AggregateStatus, McpServerConfig, McpServerResource, OutcomeStatus, Resource, ResourceKind,
    Scope, TransportConfig,
};
use sync_tools::{
    BackupGuard, BackupManager, InstallOptions, InstallOrchestrator, InstallTarget, PlatformPaths,
};

struct Sandbox {
    _temp: TempDir,
    root: NormalizedPath,
}

impl Sandbox {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = NormalizedPath::new(temp.path());
        Self { _temp: temp, root }
    }

    fn home(&self) -> NormalizedPath {
        self.root.join("home")
    }

    fn project(&self) -> NormalizedPath {
        self.root.join("proj")
    }

    fn orchestrator(&self) -> InstallOrchestrator {
        let manager = BackupManager::new(self.root.join("backups"));
        InstallOrchestrator::new(BackupGuard::new(manager), InstallOptions::default())
    }

    fn target(&self, slug: &str, scope: Scope) -> InstallTarget {
        InstallTarget::for_platform(slug, ResourceKind::McpServer, scope, |spec| {
            PlatformPaths::new(spec, self.home(), Some(self.project()))
        })
        .unwrap()
    }

    fn json_at(&self, path: &NormalizedPath) -> Value {
        serde_json::from_str(&read_text(path).unwrap()).unwrap()
    }
}

fn stdio_server(name: &str) -> Resource {
    Resource::McpServer(McpServerResource {
        name: name.into(),
        config: McpServerConfig {
            transport: TransportConfig::Stdio {
                command: "npx".into(),
                args: vec!["-y".into(), "@example/mcp-files".into()],
            },
            env: Some(BTreeMap::from([("LOG_LEVEL".into(), "info".into())])),
            platforms: vec![],
            disabled: false,
        },
    })
}

fn sse_server(name: &str) -> Resource {
    Resource::McpServer(McpServerResource {
        name: name.into(),
        config: McpServerConfig {
            transport: TransportConfig::Sse {
                url: "https://mcp.example.com/sse".into(),
                headers: None,
            },
            env: None,
            platforms: vec![],
            disabled: false,
        },
    })
}

#[test]
fn test_claude_user_and_project_files_are_asymmetric() {
    let sandbox = Sandbox::new();
    let mut orch = sandbox.orchestrator();

    let report = orch.install_to_all(
        &stdio_server("files"),
        &[sandbox.target("claude", Scope::User)],
    );
    assert_eq!(report.aggregate(), AggregateStatus::Success);

    let report = orch.install_to_all(
        &sse_server("docs"),
        &[sandbox.target("claude", Scope::Project)],
    );
    assert_eq!(report.aggregate(), AggregateStatus::Success);

    // User scope writes the home-root dotfile, not ~/.claude/.
    let user = sandbox.json_at(&sandbox.home().join(".claude.json"));
    assert_eq!(user["mcpServers"]["files"]["command"], "npx");
    assert!(!sandbox.home().join(".claude/mcp.json").exists());

    // Project scope writes .mcp.json at the project root, not .claude/.
    let project = sandbox.json_at(&sandbox.project().join(".mcp.json"));
    assert_eq!(project["mcpServers"]["docs"]["type"], "sse");
    assert!(!sandbox.project().join(".claude/mcp.json").exists());
}

#[test]
fn test_claude_local_scope_shares_the_home_root_file() {
    let sandbox = Sandbox::new();
    sandbox.orchestrator().install_to_all(
        &stdio_server("files"),
        &[sandbox.target("claude", Scope::Local)],
    );
    assert!(sandbox.home().join(".claude.json").is_file());
    assert!(!sandbox.project().join(".mcp.json").exists());
}

#[test]
fn test_same_server_renders_per_platform_vocabulary() {
    let sandbox = Sandbox::new();
    let server = sse_server("remote-docs");
    let targets = vec![
        sandbox.target("claude", Scope::User),
        sandbox.target("cursor", Scope::User),
        sandbox.target("opencode", Scope::User),
    ];
    let report = sandbox.orchestrator().install_to_all(&server, &targets);
    assert_eq!(report.aggregate(), AggregateStatus::Success);

    let claude = sandbox.json_at(&sandbox.home().join(".claude.json"));
    assert_eq!(claude["mcpServers"]["remote-docs"]["type"], "sse");

    // Cursor never writes a type tag.
    let cursor = sandbox.json_at(&sandbox.home().join(".cursor/mcp.json"));
    assert!(cursor["mcpServers"]["remote-docs"].get("type").is_none());
    assert_eq!(
        cursor["mcpServers"]["remote-docs"]["url"],
        "https://mcp.example.com/sse"
    );

    // OpenCode says "remote" under its "mcp" key.
    let opencode = sandbox.json_at(&sandbox.home().join(".opencode/opencode.json"));
    assert_eq!(opencode["mcp"]["remote-docs"]["type"], "remote");
}

#[test]
fn test_gemini_settings_survive_a_server_install() {
    let sandbox = Sandbox::new();
    let settings = sandbox.home().join(".gemini/settings.json");
    write_text(
        &settings,
        r#"{
  "theme": "dark",
  "telemetry": {"enabled": false},
  "mcpServers": {}
}"#,
    )
    .unwrap();

    sandbox.orchestrator().install_to_all(
        &stdio_server("files"),
        &[sandbox.target("gemini", Scope::User)],
    );

    let doc = sandbox.json_at(&settings);
    assert_eq!(doc["theme"], "dark");
    assert_eq!(doc["telemetry"]["enabled"], false);
    assert_eq!(doc["mcpServers"]["files"]["command"], "npx");
    assert_eq!(doc["mcpServers"]["files"]["env"]["LOG_LEVEL"], "info");
}

#[test]
fn test_bare_historical_config_is_readable_and_upgraded() {
    let sandbox = Sandbox::new();
    let config = sandbox.home().join(".cursor/mcp.json");
    // Old shape: the document itself is the servers map.
    write_text(&config, r#"{"legacy": {"command": "legacy-mcp"}}"#).unwrap();

    sandbox.orchestrator().install_to_all(
        &stdio_server("files"),
        &[sandbox.target("cursor", Scope::User)],
    );

    let doc = sandbox.json_at(&config);
    assert_eq!(doc["mcpServers"]["legacy"]["command"], "legacy-mcp");
    assert_eq!(doc["mcpServers"]["files"]["command"], "npx");
    assert!(doc.get("legacy").is_none());
}

#[test]
fn test_unrecognized_server_entry_survives_install_and_uninstall() {
    let sandbox = Sandbox::new();
    let config = sandbox.home().join(".claude.json");
    write_text(
        &config,
        r#"{"mcpServers": {"weird": {"type": "grpc", "endpoint": "host:50051"}}}"#,
    )
    .unwrap();

    let mut orch = sandbox.orchestrator();
    orch.install_to_all(&stdio_server("files"), &[sandbox.target("claude", Scope::User)]);
    orch.uninstall_from_all(
        ResourceKind::McpServer,
        "files",
        &[sandbox.target("claude", Scope::User)],
    );

    let doc = sandbox.json_at(&config);
    assert_eq!(doc["mcpServers"]["weird"]["endpoint"], "host:50051");
    assert!(doc["mcpServers"].get("files").is_none());
}

#[test]
fn test_neighbor_server_unscathed_by_unrelated_install() {
    let sandbox = Sandbox::new();
    let config = sandbox.home().join(".claude.json");
    // A neighbor with a non-string arg and a key outside the canonical
    // schema; an unrelated install must not normalize it.
    write_text(
        &config,
        r#"{"mcpServers": {"existing": {"command": "srv", "args": ["-p", 8080], "timeout": 30}}}"#,
    )
    .unwrap();

    sandbox.orchestrator().install_to_all(
        &stdio_server("newcomer"),
        &[sandbox.target("claude", Scope::User)],
    );

    let doc = sandbox.json_at(&config);
    assert_eq!(doc["mcpServers"]["existing"]["args"][1], 8080);
    assert_eq!(doc["mcpServers"]["existing"]["timeout"], 30);
    assert_eq!(doc["mcpServers"]["newcomer"]["command"], "npx");
}

#[test]
fn test_mixed_install_collision_and_error_aggregates_partial() {
    let sandbox = Sandbox::new();

    // cursor: same name, differing definition.
    write_text(
        &sandbox.home().join(".cursor/mcp.json"),
        r#"{"mcpServers": {"files": {"command": "other-server"}}}"#,
    )
    .unwrap();
    // gemini: unreadable config.
    write_text(&sandbox.home().join(".gemini/settings.json"), "{broken").unwrap();

    let targets = vec![
        sandbox.target("claude", Scope::User),
        sandbox.target("cursor", Scope::User),
        sandbox.target("gemini", Scope::User),
    ];
    let report = sandbox
        .orchestrator()
        .install_to_all(&stdio_server("files"), &targets);

    let statuses: Vec<OutcomeStatus> = report.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![
            OutcomeStatus::Installed,
            OutcomeStatus::Collision,
            OutcomeStatus::Error,
        ]
    );
    assert_eq!(report.aggregate(), AggregateStatus::PartialFailure);
    assert_eq!(report.aggregate().exit_code(), 2);
}

#[test]
fn test_malformed_config_is_an_error_not_a_wipe() {
    let sandbox = Sandbox::new();
    let config = sandbox.home().join(".claude.json");
    write_text(&config, "{definitely not json").unwrap();
    let before = read_text(&config).unwrap();

    let report = sandbox.orchestrator().install_to_all(
        &stdio_server("files"),
        &[sandbox.target("claude", Scope::User)],
    );
    assert_eq!(report.outcomes[0].status, OutcomeStatus::Error);
    assert_eq!(report.aggregate(), AggregateStatus::Failure);
    assert_eq!(report.aggregate().exit_code(), 1);

    // The broken file is left untouched for the user to inspect.
    assert_eq!(read_text(&config).unwrap(), before);
}

#[test]
fn test_allow_listed_server_skips_other_platforms() {
    let sandbox = Sandbox::new();
    let mut server = stdio_server("files");
    if let Resource::McpServer(s) = &mut server {
        s.config.platforms = vec!["opencode".into()];
    }

    let targets = vec![
        sandbox.target("claude", Scope::User),
        sandbox.target("opencode", Scope::User),
    ];
    let report = sandbox.orchestrator().install_to_all(&server, &targets);

    let statuses: Vec<OutcomeStatus> = report.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![OutcomeStatus::Skipped, OutcomeStatus::Installed]
    );
    assert!(!sandbox.home().join(".claude.json").exists());
    assert!(sandbox.home().join(".opencode/opencode.json").is_file());
}

#[test]
fn test_disabled_flag_round_trips() {
    let sandbox = Sandbox::new();
    let mut server = stdio_server("files");
    if let Resource::McpServer(s) = &mut server {
        s.config.disabled = true;
    }

    sandbox
        .orchestrator()
        .install_to_all(&server, &[sandbox.target("cursor", Scope::User)]);

    let doc = sandbox.json_at(&sandbox.home().join(".cursor/mcp.json"));
    assert_eq!(doc["mcpServers"]["files"]["disabled"], true);
}

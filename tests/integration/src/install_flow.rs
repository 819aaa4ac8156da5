//! End-to-end install flow across platforms.
//!
//! Exercises the full path a CLI front end would take: resolve a scope,
//! build targets, run the orchestrator, inspect the structured report and
//! the files it left behind.

use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

use sync_fs::{NormalizedPath, read_bytes, read_text, write_text};
use sync_meta::{
    AgentResource, AggregateStatus, OutcomeStatus, Resource, ResourceKind, Scope, SkillResource,
};
use sync_tools::{
    BackupGuard, BackupManager, InstallOptions, InstallOrchestrator, InstallTarget, PlatformPaths,
    ScopePrompt, ScopeResolver, VcsProbe,
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

    fn orchestrator(&self, force: bool) -> InstallOrchestrator {
        let manager = BackupManager::new(self.root.join("backups"));
        InstallOrchestrator::new(BackupGuard::new(manager), InstallOptions { force })
    }

    fn target(&self, slug: &str, kind: ResourceKind, scope: Scope) -> InstallTarget {
        InstallTarget::for_platform(slug, kind, scope, |spec| {
            PlatformPaths::new(spec, self.home(), Some(self.project()))
        })
        .unwrap()
    }
}

fn reviewer_agent() -> Resource {
    Resource::Agent(AgentResource {
        name: "code-reviewer".into(),
        description: Some("Reviews pull requests for style and correctness".into()),
        model: Some("fast".into()),
        body: "You are a careful code reviewer.\n\nFocus on correctness first.\n".into(),
    })
}

#[test]
fn test_agent_reaches_every_capable_platform() {
    let sandbox = Sandbox::new();
    let targets = vec![
        sandbox.target("claude", ResourceKind::Agent, Scope::User),
        sandbox.target("cursor", ResourceKind::Agent, Scope::User),
        sandbox.target("gemini", ResourceKind::Agent, Scope::User),
        sandbox.target("opencode", ResourceKind::Agent, Scope::User),
    ];

    let report = sandbox
        .orchestrator(false)
        .install_to_all(&reviewer_agent(), &targets);

    let got: Vec<(&str, OutcomeStatus)> = report
        .outcomes
        .iter()
        .map(|o| (o.platform.as_str(), o.status))
        .collect();
    assert_eq!(
        got,
        vec![
            ("claude", OutcomeStatus::Installed),
            ("cursor", OutcomeStatus::Skipped),
            ("gemini", OutcomeStatus::Skipped),
            ("opencode", OutcomeStatus::Installed),
        ]
    );
    assert_eq!(report.aggregate(), AggregateStatus::PartialFailure);
    assert_eq!(report.aggregate().exit_code(), 2);

    // Each platform gets its own directory convention.
    assert!(
        sandbox
            .home()
            .join(".claude/agents/code-reviewer.md")
            .is_file()
    );
    assert!(
        sandbox
            .home()
            .join(".opencode/agent/code-reviewer.md")
            .is_file()
    );
}

#[test]
fn test_installed_document_round_trips_through_native_format() {
    let sandbox = Sandbox::new();
    let resource = reviewer_agent();
    let targets = vec![sandbox.target("claude", ResourceKind::Agent, Scope::User)];
    sandbox.orchestrator(false).install_to_all(&resource, &targets);

    let rendered = read_text(&sandbox.home().join(".claude/agents/code-reviewer.md")).unwrap();
    assert!(rendered.starts_with("---\n"));
    assert!(rendered.contains("description: Reviews pull requests"));
    assert!(rendered.contains("model: fast"));
    assert!(rendered.contains("You are a careful code reviewer."));
}

#[test]
fn test_second_install_is_byte_identical_noop() {
    let sandbox = Sandbox::new();
    let resource = reviewer_agent();
    let targets = vec![sandbox.target("claude", ResourceKind::Agent, Scope::User)];
    let mut orch = sandbox.orchestrator(false);

    orch.install_to_all(&resource, &targets);
    let path = sandbox.home().join(".claude/agents/code-reviewer.md");
    let first = read_bytes(&path).unwrap();

    let report = orch.install_to_all(&resource, &targets);
    assert_eq!(report.outcomes[0].status, OutcomeStatus::Installed);
    assert_eq!(report.aggregate(), AggregateStatus::Success);
    assert_eq!(read_bytes(&path).unwrap(), first);
}

#[test]
fn test_partial_aggregation_mixed_outcomes() {
    let sandbox = Sandbox::new();

    // Pre-seed opencode with a differing agent of the same name.
    write_text(
        &sandbox.home().join(".opencode/agent/code-reviewer.md"),
        "---\ndescription: something else\n---\n\nDifferent body.\n",
    )
    .unwrap();

    let targets = vec![
        sandbox.target("claude", ResourceKind::Agent, Scope::User),
        sandbox.target("opencode", ResourceKind::Agent, Scope::User),
        sandbox.target("cursor", ResourceKind::Agent, Scope::User),
    ];
    let report = sandbox
        .orchestrator(false)
        .install_to_all(&reviewer_agent(), &targets);

    let statuses: Vec<OutcomeStatus> = report.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![
            OutcomeStatus::Installed,
            OutcomeStatus::Collision,
            OutcomeStatus::Skipped,
        ]
    );
    assert_eq!(report.aggregate(), AggregateStatus::PartialFailure);
}

#[test]
fn test_report_serializes_for_alternate_front_ends() {
    let sandbox = Sandbox::new();
    let targets = vec![sandbox.target("claude", ResourceKind::Agent, Scope::User)];
    let report = sandbox
        .orchestrator(false)
        .install_to_all(&reviewer_agent(), &targets);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["resource"], "code-reviewer");
    assert_eq!(json["outcomes"][0]["platform"], "claude");
    assert_eq!(json["outcomes"][0]["status"], "installed");
}

#[test]
fn test_skill_installs_as_directory_per_platform_convention() {
    let sandbox = Sandbox::new();
    let skill = Resource::Skill(SkillResource {
        name: "refactoring".into(),
        description: Some("How to refactor safely".into()),
        body: "Always keep the tests green.\n".into(),
    });
    let targets = vec![
        sandbox.target("claude", ResourceKind::Skill, Scope::Project),
        sandbox.target("opencode", ResourceKind::Skill, Scope::Project),
    ];
    let report = sandbox.orchestrator(false).install_to_all(&skill, &targets);
    assert_eq!(report.aggregate(), AggregateStatus::Success);

    assert!(
        sandbox
            .project()
            .join(".claude/skills/refactoring/SKILL.md")
            .is_file()
    );
    assert!(
        sandbox
            .project()
            .join(".opencode/skill/refactoring/SKILL.md")
            .is_file()
    );
}

#[test]
fn test_one_backup_per_platform_across_many_installs() {
    let sandbox = Sandbox::new();

    // Pre-existing state worth protecting.
    write_text(
        &sandbox.home().join(".claude/agents/veteran.md"),
        "---\ndescription: was here first\n---\n\nOld hand.\n",
    )
    .unwrap();

    let targets = vec![sandbox.target("claude", ResourceKind::Agent, Scope::User)];
    let mut orch = sandbox.orchestrator(false);

    for name in ["first", "second", "third"] {
        let resource = Resource::Agent(AgentResource {
            name: name.into(),
            description: Some("batch".into()),
            model: None,
            body: "body\n".into(),
        });
        let report = orch.install_to_all(&resource, &targets);
        assert_eq!(report.aggregate(), AggregateStatus::Success);
    }

    let manager = BackupManager::new(sandbox.root.join("backups"));
    let backups = manager.list_backups("claude").unwrap();
    assert_eq!(backups.len(), 1);

    // The one snapshot holds only the pre-run state.
    let snapshot = &backups[0];
    assert!(snapshot.join("agents/veteran.md").is_file());
    assert!(!snapshot.join("agents/first.md").exists());

    // And it can bring that state back.
    manager.restore_backup(snapshot).unwrap();
    assert!(
        sandbox
            .home()
            .join(".claude/agents/veteran.md")
            .is_file()
    );
}

// ---------------------------------------------------------------------------
// Scope resolution wired into target construction
// ---------------------------------------------------------------------------

struct FixedVcs(bool);

impl VcsProbe for FixedVcs {
    fn is_repo(&self, _path: &Path) -> bool {
        self.0
    }
}

struct NonInteractive;

impl ScopePrompt for NonInteractive {
    fn interactive(&self) -> bool {
        false
    }

    fn read_line(&mut self, _prompt: &str) -> std::io::Result<Option<String>> {
        unreachable!("non-interactive sessions never prompt")
    }
}

#[test]
fn test_resolved_scope_drives_install_location() {
    let sandbox = Sandbox::new();

    // Inside a repository, non-interactive: project scope.
    let vcs = FixedVcs(true);
    let mut prompt = NonInteractive;
    let resolved = ScopeResolver::new(&vcs, &mut prompt)
        .resolve(None, sandbox.project().to_native().as_path())
        .unwrap();
    assert_eq!(resolved.scope, Scope::Project);

    let targets = vec![sandbox.target("claude", ResourceKind::Agent, resolved.scope)];
    sandbox
        .orchestrator(false)
        .install_to_all(&reviewer_agent(), &targets);

    assert!(
        sandbox
            .project()
            .join(".claude/agents/code-reviewer.md")
            .is_file()
    );
    assert!(
        !sandbox
            .home()
            .join(".claude/agents/code-reviewer.md")
            .exists()
    );
}

#[test]
fn test_outside_repo_defaults_to_user_scope() {
    let sandbox = Sandbox::new();
    let vcs = FixedVcs(false);
    let mut prompt = NonInteractive;
    let resolved = ScopeResolver::new(&vcs, &mut prompt)
        .resolve(None, sandbox.root.to_native().as_path())
        .unwrap();
    assert_eq!(resolved.scope, Scope::User);

    let targets = vec![sandbox.target("claude", ResourceKind::Agent, resolved.scope)];
    sandbox
        .orchestrator(false)
        .install_to_all(&reviewer_agent(), &targets);
    assert!(
        sandbox
            .home()
            .join(".claude/agents/code-reviewer.md")
            .is_file()
    );
}

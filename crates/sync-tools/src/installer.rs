//! Multi-platform install orchestration.
//!
//! Drives one resource across N targets, sequentially and in caller order:
//! backup the platform (at most once per run), read what is already there,
//! then write, collide, or no-op. One target's failure never aborts
//! another's attempt; the caller gets a structured [`InstallReport`].

use tracing::warn;

use sync_meta::{InstallReport, Resource, ResourceKind, Scope, TargetOutcome};

use crate::backup::BackupGuard;
use crate::error::{Error, Result};
use crate::manager::{MarkdownStore, McpStore, ResourceStore};
use crate::paths::PlatformPaths;
use crate::registry::platform_spec;

/// Install behavior switches, threaded explicitly through calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Overwrite an existing, differing resource instead of reporting a
    /// collision.
    pub force: bool,
}

enum TargetState {
    Ready(Box<dyn ResourceStore>),
    /// The platform cannot hold this kind at this scope; recorded so the
    /// report still names the platform instead of silently dropping it.
    Unsupported(String),
}

impl std::fmt::Debug for TargetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetState::Ready(store) => {
                f.debug_tuple("Ready").field(&store.platform()).finish()
            }
            TargetState::Unsupported(reason) => {
                f.debug_tuple("Unsupported").field(reason).finish()
            }
        }
    }
}

/// One platform a resource will be applied to.
#[derive(Debug)]
pub struct InstallTarget {
    platform: String,
    state: TargetState,
}

impl InstallTarget {
    pub fn new(store: Box<dyn ResourceStore>) -> Self {
        Self {
            platform: store.platform().to_string(),
            state: TargetState::Ready(store),
        }
    }

    pub fn unsupported(platform: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            state: TargetState::Unsupported(reason.into()),
        }
    }

    /// Build the right store for a platform + kind + scope.
    ///
    /// An unsupported combination yields a skippable target, not an error:
    /// "cursor has no agents" is an expected per-target outcome of a
    /// multi-platform install, not a reason to refuse the whole run.
    ///
    /// # Errors
    ///
    /// Fails only on an unknown platform slug.
    pub fn for_platform(
        slug: &str,
        kind: ResourceKind,
        scope: Scope,
        paths_for: impl Fn(&'static crate::registry::PlatformSpec) -> PlatformPaths,
    ) -> Result<Self> {
        let spec = platform_spec(slug).ok_or_else(|| Error::UnknownPlatform {
            slug: slug.to_string(),
        })?;
        let paths = paths_for(spec);
        let store: Result<Box<dyn ResourceStore>> = match kind {
            ResourceKind::McpServer => McpStore::new(paths, scope).map(|s| Box::new(s) as _),
            _ => MarkdownStore::new(paths, kind, scope).map(|s| Box::new(s) as _),
        };
        match store {
            Ok(store) => Ok(Self::new(store)),
            Err(e @ Error::Unsupported { .. }) => Ok(Self::unsupported(slug, e.to_string())),
            Err(e) => Err(e),
        }
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }
}

/// Applies one resource to many targets with backup-before-mutate.
pub struct InstallOrchestrator {
    guard: BackupGuard,
    options: InstallOptions,
}

impl InstallOrchestrator {
    pub fn new(guard: BackupGuard, options: InstallOptions) -> Self {
        Self { guard, options }
    }

    /// Apply `resource` to every target, in order. Never returns early:
    /// each target gets exactly one outcome.
    pub fn install_to_all(&mut self, resource: &Resource, targets: &[InstallTarget]) -> InstallReport {
        let mut report = InstallReport::new(resource.name());

        if let Err(e) = resource.validate() {
            for target in targets {
                report.push(TargetOutcome::error(&target.platform, e.to_string()));
            }
            return report;
        }

        for target in targets {
            report.push(self.install_one(resource, target));
        }
        report
    }

    fn install_one(&mut self, resource: &Resource, target: &InstallTarget) -> TargetOutcome {
        let platform = &target.platform;

        let store = match &target.state {
            TargetState::Ready(store) => store,
            TargetState::Unsupported(reason) => {
                return TargetOutcome::skipped(platform, reason.clone());
            }
        };

        let allow_list = resource.platform_allow_list();
        if !allow_list.is_empty() && !allow_list.iter().any(|p| p == platform) {
            return TargetOutcome::skipped(platform, "not in the resource's platform list");
        }

        if let Err(e) = self
            .guard
            .ensure_backed_up(platform, &store.backup_paths())
        {
            return TargetOutcome::error(platform, e.to_string());
        }

        let existing = match store.get(resource.name()) {
            Ok(existing) => Some(existing),
            Err(e) if e.is_not_found() => None,
            Err(e) => return TargetOutcome::error(platform, e.to_string()),
        };

        if let Some(existing) = existing {
            if comparable(resource).semantically_equal(&comparable(&existing)) {
                // Already current; idempotent no-op.
                return TargetOutcome::installed(platform);
            }
            if !self.options.force {
                return TargetOutcome::collision(
                    platform,
                    format!("existing {} differs", resource.kind()),
                );
            }
            warn!(
                platform,
                kind = %resource.kind(),
                name = resource.name(),
                "overwriting differing resource (force)"
            );
        }

        match store.install(resource) {
            Ok(()) => TargetOutcome::installed(platform),
            Err(e) => TargetOutcome::error(platform, e.to_string()),
        }
    }

    /// Remove `resource_name` from every target, with the same backup and
    /// never-abort contract as installs. Absence counts as success.
    pub fn uninstall_from_all(
        &mut self,
        kind: ResourceKind,
        name: &str,
        targets: &[InstallTarget],
    ) -> InstallReport {
        let mut report = InstallReport::new(name);
        for target in targets {
            let platform = &target.platform;
            let store = match &target.state {
                TargetState::Ready(store) => store,
                TargetState::Unsupported(reason) => {
                    report.push(TargetOutcome::skipped(platform, reason.clone()));
                    continue;
                }
            };
            debug_assert_eq!(store.kind(), kind);
            let outcome = match self
                .guard
                .ensure_backed_up(platform, &store.backup_paths())
                .and_then(|()| store.uninstall(name))
            {
                Ok(()) => TargetOutcome::removed(platform),
                Err(e) => TargetOutcome::error(platform, e.to_string()),
            };
            report.push(outcome);
        }
        report
    }

    pub fn into_guard(self) -> BackupGuard {
        self.guard
    }
}

/// Projection used for the idempotency check.
///
/// An MCP server's `platforms` allow-list routes the install; the native
/// config files never store it, so a freshly-read resource must not be
/// judged different for lacking it.
fn comparable(resource: &Resource) -> Resource {
    match resource {
        Resource::McpServer(server) => {
            let mut server = server.clone();
            server.config.platforms = vec![];
            Resource::McpServer(server)
        }
        other => other.clone(),
    }
}

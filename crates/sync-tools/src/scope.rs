//! Scope resolution for install operations.
//!
//! Decides which configuration layer (user, project, local, managed) an
//! operation targets, from an explicit request when present, otherwise from
//! the working directory's VCS status and stdin interactivity. The probes
//! are traits so tests can script both without a real repository or TTY.

use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

use sync_meta::Scope;
use tracing::debug;

use crate::error::{Error, Result};

/// Answers "is this directory inside a version-controlled repository?".
pub trait VcsProbe {
    fn is_repo(&self, path: &Path) -> bool;
}

/// Probe backed by libgit2's repository discovery (walks parent dirs).
#[derive(Debug, Default)]
pub struct GitProbe;

impl VcsProbe for GitProbe {
    fn is_repo(&self, path: &Path) -> bool {
        git2::Repository::discover(path).is_ok()
    }
}

/// Interactive prompt for scope selection.
pub trait ScopePrompt {
    /// Whether stdin is attached to an interactive terminal.
    fn interactive(&self) -> bool;

    /// Show `prompt` and read one line. `Ok(None)` means EOF.
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>>;
}

/// Prompt over real stdin/stderr.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl ScopePrompt for StdinPrompt {
    fn interactive(&self) -> bool {
        std::io::stdin().is_terminal()
    }

    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(prompt.as_bytes())?;
        stderr.flush()?;

        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// A resolved scope plus an optional warning to surface to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub scope: Scope,
    pub warning: Option<String>,
}

impl Resolved {
    fn clean(scope: Scope) -> Self {
        Self {
            scope,
            warning: None,
        }
    }

    fn warn(scope: Scope, warning: impl Into<String>) -> Self {
        Self {
            scope,
            warning: Some(warning.into()),
        }
    }
}

const SCOPE_MENU: &str = "Select installation scope:\n  1. project (shared, committed to VCS)\n  2. user (all your projects)\n  3. local (this project, not committed)\nChoice [1]: ";

/// Resolves the target scope for an operation.
pub struct ScopeResolver<'a> {
    vcs: &'a dyn VcsProbe,
    prompt: &'a mut dyn ScopePrompt,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(vcs: &'a dyn VcsProbe, prompt: &'a mut dyn ScopePrompt) -> Self {
        Self { vcs, prompt }
    }

    /// Resolve the scope for an operation.
    ///
    /// Precedence: an explicit request always wins (an unrecognized one
    /// falls back to the default with a warning, never an error). With no
    /// request, a directory outside any repository gets [`Scope::User`];
    /// inside a repository a non-interactive session gets [`Scope::Project`]
    /// and an interactive one is asked. EOF at the prompt cancels the
    /// operation.
    pub fn resolve_current(&mut self, requested: Option<&str>) -> Result<Resolved> {
        if let Some(resolved) = explicit_request(requested) {
            return Ok(resolved);
        }
        match std::env::current_dir() {
            Ok(cwd) => self.resolve(requested, &cwd),
            // An unreadable working directory degrades to user scope
            // rather than failing the whole operation.
            Err(e) => Ok(Resolved::warn(
                Scope::User,
                format!("cannot determine working directory ({e}), using user scope"),
            )),
        }
    }

    pub fn resolve(&mut self, requested: Option<&str>, cwd: &Path) -> Result<Resolved> {
        if let Some(resolved) = explicit_request(requested) {
            return Ok(resolved);
        }

        if !self.vcs.is_repo(cwd) {
            debug!(cwd = %cwd.display(), "not inside a repository, using user scope");
            return Ok(Resolved::clean(Scope::User));
        }

        if !self.prompt.interactive() {
            debug!("non-interactive session inside a repository, using project scope");
            return Ok(Resolved::clean(Scope::Project));
        }

        match self.prompt.read_line(SCOPE_MENU)? {
            None => Err(Error::Cancelled),
            Some(line) => Ok(match line.trim() {
                "" | "1" => Resolved::clean(Scope::Project),
                "2" => Resolved::clean(Scope::User),
                "3" => Resolved::clean(Scope::Local),
                other => Resolved::warn(
                    Scope::Project,
                    format!("unrecognized choice '{other}', using project scope"),
                ),
            }),
        }
    }
}

/// An explicit, non-blank request always settles the scope without probing
/// anything. Unrecognized strings fall back to the default with a warning.
fn explicit_request(requested: Option<&str>) -> Option<Resolved> {
    let trimmed = requested?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(match Scope::parse(trimmed) {
        Some(scope) => Resolved::clean(scope),
        None => Resolved::warn(
            Scope::DEFAULT,
            format!("unrecognized scope '{trimmed}', defaulting to user"),
        ),
    })
}

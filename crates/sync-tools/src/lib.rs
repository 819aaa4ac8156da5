//! Platform synchronization core for AgentSync.
//!
//! This crate turns canonical resources from `sync-meta` into the native
//! on-disk formats of the supported assistant platforms, and back.
//!
//! # Architecture
//!
//! - [`registry`] — one static table describing every platform deviation
//!   (directory layout, MCP file locations, transport vocabulary).
//! - [`paths`] — scope → concrete path resolution on top of that table.
//! - [`scope`] — decides which configuration layer an operation targets.
//! - [`manager`] — per-platform CRUD stores for each resource kind.
//! - [`translate`] — bidirectional MCP config translation with
//!   unknown-field preservation.
//! - [`backup`] — backup-before-mutate guard, at most once per platform
//!   per process run.
//! - [`installer`] — drives Get → Backup → Install across N targets and
//!   aggregates structured outcomes.

pub mod backup;
pub mod error;
pub mod installer;
pub mod manager;
pub mod paths;
pub mod registry;
pub mod scope;
pub mod translate;

pub use backup::{BackupGuard, BackupManager};
pub use error::{Error, Result};
pub use installer::{InstallOptions, InstallOrchestrator, InstallTarget};
pub use manager::{MarkdownStore, McpStore, ResourceStore};
pub use paths::PlatformPaths;
pub use registry::{PLATFORMS, PlatformSpec, platform_spec};
pub use scope::{GitProbe, Resolved, ScopePrompt, ScopeResolver, StdinPrompt, VcsProbe};

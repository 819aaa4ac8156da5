//! Backup-before-mutate.
//!
//! Every mutating install snapshots the files it is about to touch into a
//! timestamped directory under the backup root, with a `metadata.toml`
//! recording provenance and checksums. [`BackupGuard`] enforces the
//! at-most-once policy: within one process run a platform is backed up
//! before its first mutation and never again, no matter how many resources
//! the run installs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

use sync_fs::{NormalizedPath, compute_file_checksum, copy_recursive, read_text, write_text};

use crate::error::{Error, Result};

const METADATA_FILE: &str = "metadata.toml";

/// One snapshotted path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupEntry {
    /// Absolute path the snapshot was taken from.
    pub original: String,
    /// Name of the copy inside the backup directory.
    pub stored: String,
    /// Content checksum, present for files only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Provenance record written next to every snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupMetadata {
    pub platform: String,
    pub created: DateTime<Utc>,
    pub entries: Vec<BackupEntry>,
}

/// Creates, lists, and restores snapshots under a backup root.
#[derive(Debug, Clone)]
pub struct BackupManager {
    root: NormalizedPath,
}

impl BackupManager {
    pub fn new(root: NormalizedPath) -> Self {
        Self { root }
    }

    /// Manager rooted at the user-level backup directory
    /// (`~/.agentsync/backups`).
    pub fn for_user() -> Result<Self> {
        let home = NormalizedPath::new(sync_fs::home_dir()?);
        Ok(Self::new(home.join(".agentsync").join("backups")))
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Snapshot `paths` for `platform`. Paths that do not exist yet are
    /// skipped — there is nothing to protect. Returns the snapshot
    /// directory, or `None` when no path existed.
    pub fn create_backup(
        &self,
        platform: &str,
        paths: &[NormalizedPath],
    ) -> Result<Option<NormalizedPath>> {
        let existing: Vec<&NormalizedPath> = paths.iter().filter(|p| p.exists()).collect();
        if existing.is_empty() {
            debug!(platform, "nothing to back up");
            return Ok(None);
        }

        let created = Utc::now();
        let stamp = created.format("%Y%m%d-%H%M%S").to_string();
        let backup_dir = self.root.join(platform).join(&stamp);

        let mut entries = Vec::with_capacity(existing.len());
        for path in existing {
            let stored = path
                .file_name()
                .unwrap_or("unnamed")
                .to_string();
            copy_recursive(path, &backup_dir.join(&stored))?;
            let checksum = if path.is_file() {
                let native = path.to_native();
                let digest =
                    compute_file_checksum(&native).map_err(|e| sync_fs::Error::io(&native, e))?;
                Some(digest)
            } else {
                None
            };
            entries.push(BackupEntry {
                original: path.as_str().to_string(),
                stored,
                checksum,
            });
        }

        let metadata = BackupMetadata {
            platform: platform.to_string(),
            created,
            entries,
        };
        let rendered = toml::to_string_pretty(&metadata).map_err(|e| Error::Backup {
            platform: platform.to_string(),
            message: format!("failed to serialize metadata: {e}"),
        })?;
        write_text(&backup_dir.join(METADATA_FILE), &rendered)?;

        info!(platform, dir = %backup_dir, "created backup");
        Ok(Some(backup_dir))
    }

    /// Snapshot directories for `platform`, newest first.
    pub fn list_backups(&self, platform: &str) -> Result<Vec<NormalizedPath>> {
        let platform_dir = self.root.join(platform);
        if !platform_dir.is_dir() {
            return Ok(vec![]);
        }
        let native = platform_dir.to_native();
        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(&native).map_err(|e| sync_fs::Error::io(&native, e))? {
            let entry = entry.map_err(|e| sync_fs::Error::io(&native, e))?;
            if entry.path().is_dir() {
                dirs.push(platform_dir.join(&entry.file_name().to_string_lossy()));
            }
        }
        // Timestamped names sort chronologically.
        dirs.sort_unstable_by(|a, b| b.as_str().cmp(a.as_str()));
        Ok(dirs)
    }

    /// Restore every entry of a snapshot to its original location.
    pub fn restore_backup(&self, backup_dir: &NormalizedPath) -> Result<()> {
        let metadata = self.read_metadata(backup_dir)?;
        for entry in &metadata.entries {
            let source = backup_dir.join(&entry.stored);
            let dest = NormalizedPath::new(&entry.original);
            copy_recursive(&source, &dest)?;
        }
        info!(platform = %metadata.platform, dir = %backup_dir, "restored backup");
        Ok(())
    }

    pub fn read_metadata(&self, backup_dir: &NormalizedPath) -> Result<BackupMetadata> {
        let raw = read_text(&backup_dir.join(METADATA_FILE))?;
        toml::from_str(&raw).map_err(|e| Error::Backup {
            platform: String::new(),
            message: format!("corrupt metadata in {backup_dir}: {e}"),
        })
    }
}

/// At-most-once backup enforcement for one process run.
pub struct BackupGuard {
    manager: BackupManager,
    completed: HashSet<String>,
}

impl BackupGuard {
    pub fn new(manager: BackupManager) -> Self {
        Self {
            manager,
            completed: HashSet::new(),
        }
    }

    /// Back up `platform` if this run has not already done so.
    ///
    /// Success is recorded even when nothing existed to snapshot, so later
    /// installs in the same run never re-trigger the attempt.
    pub fn ensure_backed_up(&mut self, platform: &str, paths: &[NormalizedPath]) -> Result<()> {
        if self.completed.contains(platform) {
            debug!(platform, "already backed up this run");
            return Ok(());
        }
        self.manager
            .create_backup(platform, paths)
            .map_err(|e| Error::Backup {
                platform: platform.to_string(),
                message: e.to_string(),
            })?;
        self.completed.insert(platform.to_string());
        Ok(())
    }

    pub fn manager(&self) -> &BackupManager {
        &self.manager
    }
}

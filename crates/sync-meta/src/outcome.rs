//! Structured install outcomes.
//!
//! Per-target progress is data, not printed text, so alternate front ends
//! (a human summary, a JSON payload) can render it without re-deriving
//! state from the filesystem.

use serde::Serialize;

/// Terminal state of one target platform during an install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Written, or already present and semantically identical.
    Installed,
    /// Uninstalled, or already absent.
    Removed,
    /// An existing resource shares the name but differs, and force was off.
    Collision,
    /// Backup precondition or I/O failure; no mutation happened.
    Error,
    /// Target was never attempted (kind unsupported, allow-list excluded).
    Skipped,
}

impl OutcomeStatus {
    /// Whether the target reached its desired end state.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Installed | Self::Removed)
    }
}

/// One platform's outcome within a multi-target install.
#[derive(Debug, Clone, Serialize)]
pub struct TargetOutcome {
    pub platform: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl TargetOutcome {
    pub fn installed(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            status: OutcomeStatus::Installed,
            detail: None,
        }
    }

    pub fn removed(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            status: OutcomeStatus::Removed,
            detail: None,
        }
    }

    pub fn collision(platform: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            status: OutcomeStatus::Collision,
            detail: Some(detail.into()),
        }
    }

    pub fn error(platform: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            status: OutcomeStatus::Error,
            detail: Some(detail.into()),
        }
    }

    pub fn skipped(platform: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            status: OutcomeStatus::Skipped,
            detail: Some(detail.into()),
        }
    }
}

/// Aggregate status over all targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateStatus {
    /// Every target reached Installed.
    Success,
    /// A mix: some Installed, some not.
    PartialFailure,
    /// Zero targets reached Installed.
    Failure,
}

impl AggregateStatus {
    /// Process exit code: "all failed" and "some succeeded" are distinct.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::PartialFailure => 2,
        }
    }
}

/// Full report of one `install_to_all` run.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    /// Name of the resource that was installed.
    pub resource: String,
    /// Per-target outcomes, in the caller-supplied target order.
    pub outcomes: Vec<TargetOutcome>,
}

impl InstallReport {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: TargetOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn aggregate(&self) -> AggregateStatus {
        let succeeded = self
            .outcomes
            .iter()
            .filter(|o| o.status.is_success())
            .count();
        if succeeded == 0 {
            AggregateStatus::Failure
        } else if succeeded == self.outcomes.len() {
            AggregateStatus::Success
        } else {
            AggregateStatus::PartialFailure
        }
    }

    /// Human-readable per-target lines, one per outcome.
    pub fn summary_lines(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .map(|o| {
                let status = match o.status {
                    OutcomeStatus::Installed => "installed",
                    OutcomeStatus::Removed => "removed",
                    OutcomeStatus::Collision => "collision",
                    OutcomeStatus::Error => "error",
                    OutcomeStatus::Skipped => "skipped",
                };
                match &o.detail {
                    Some(detail) => format!("{}: {status} ({detail})", o.platform),
                    None => format!("{}: {status}", o.platform),
                }
            })
            .collect()
    }
}

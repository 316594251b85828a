use std::{fmt, path::PathBuf, time::Duration};

use serde::Serialize;

/// How reconciling one artifact turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtifactStatus {
    Created,
    Updated,
    NotChanged,
}

impl fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::NotChanged => "unchanged",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactOutcome {
    pub path: PathBuf,
    pub status: ArtifactStatus,
    pub lines: usize,
}

/// Accumulated result of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStatistics {
    pub created: usize,
    pub updated: usize,
    pub not_changed: usize,
    pub total_lines: usize,
    pub elapsed: Duration,
    pub artifacts: Vec<ArtifactOutcome>,
    /// Non-fatal findings from preparation, already logged.
    pub warnings: Vec<String>,
}

impl GenerationStatistics {
    pub fn record(&mut self, outcome: ArtifactOutcome) {
        match outcome.status {
            ArtifactStatus::Created => self.created += 1,
            ArtifactStatus::Updated => self.updated += 1,
            ArtifactStatus::NotChanged => self.not_changed += 1,
        }
        self.total_lines += outcome.lines;
        self.artifacts.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.created + self.updated + self.not_changed
    }

    /// Files created or updated.
    pub fn changed(&self) -> usize {
        self.created + self.updated
    }

    pub fn is_unchanged(&self) -> bool {
        self.changed() == 0
    }

    pub fn merge(&mut self, other: GenerationStatistics) {
        self.created += other.created;
        self.updated += other.updated;
        self.not_changed += other.not_changed;
        self.total_lines += other.total_lines;
        self.elapsed += other.elapsed;
        self.artifacts.extend(other.artifacts);
        self.warnings.extend(other.warnings);
    }
}

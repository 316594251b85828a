//! Diff rendered artifacts against the output directory and apply them.

use std::path::Path;

use tracing::{debug, instrument};

use crate::{
    application::{
        binder::Artifact,
        ports::Filesystem,
        statistics::{ArtifactOutcome, ArtifactStatus, GenerationStatistics},
    },
    error::EntigenResult,
};

pub struct Reconciler<'a> {
    filesystem: &'a dyn Filesystem,
    simulate: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, simulate: bool) -> Self {
        Self {
            filesystem,
            simulate,
        }
    }

    /// Classify and (unless simulating) write each artifact.
    ///
    /// Absent files are created, differing files are updated and identical
    /// files are left alone. Simulation classifies identically but never
    /// writes.
    #[instrument(skip_all, fields(artifacts = artifacts.len(), simulate = self.simulate))]
    pub fn reconcile(
        &self,
        output_root: &Path,
        artifacts: &[Artifact],
        statistics: &mut GenerationStatistics,
    ) -> EntigenResult<()> {
        for artifact in artifacts {
            let target = output_root.join(&artifact.path);
            let status = match self.filesystem.read_file(&target)? {
                None => ArtifactStatus::Created,
                Some(existing) if existing == artifact.content.as_bytes() => {
                    ArtifactStatus::NotChanged
                }
                Some(_) => ArtifactStatus::Updated,
            };

            if !self.simulate && status != ArtifactStatus::NotChanged {
                if let Some(parent) = target.parent() {
                    self.filesystem.create_dir_all(parent)?;
                }
                self.filesystem.write_file(&target, &artifact.content)?;
            }

            debug!(path = %target.display(), %status, "artifact reconciled");
            statistics.record(ArtifactOutcome {
                path: artifact.path.clone(),
                status,
                lines: artifact.content.lines().count(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{application::ports::MockFilesystem, domain::NodePath};
    use mockall::predicate::eq;
    use std::path::PathBuf;

    fn artifact(path: &str, content: &str) -> Artifact {
        Artifact {
            path: PathBuf::from(path),
            content: content.to_string(),
            node: NodePath::root(),
        }
    }

    fn on_disk(fs: &mut MockFilesystem, files: &'static [(&'static str, &'static str)]) {
        fs.expect_read_file().returning(move |path| {
            Ok(files
                .iter()
                .find(|(name, _)| Path::new("/out").join(name) == path)
                .map(|(_, content)| content.as_bytes().to_vec()))
        });
    }

    const DISK: &[(&str, &str)] = &[("A", "old"), ("B", "match")];

    fn rendered() -> Vec<Artifact> {
        vec![artifact("A", "new"), artifact("B", "match"), artifact("C", "new-file")]
    }

    #[test]
    fn simulation_classifies_without_writing() {
        let mut fs = MockFilesystem::new();
        on_disk(&mut fs, DISK);
        fs.expect_write_file().never();
        fs.expect_create_dir_all().never();

        let mut stats = GenerationStatistics::default();
        Reconciler::new(&fs, true)
            .reconcile(Path::new("/out"), &rendered(), &mut stats)
            .unwrap();

        assert_eq!((stats.created, stats.updated, stats.not_changed), (1, 1, 1));
        assert_eq!(stats.total_lines, 3);
    }

    #[test]
    fn real_run_writes_only_changes() {
        let mut fs = MockFilesystem::new();
        on_disk(&mut fs, DISK);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .with(eq(Path::new("/out/A")), eq("new"))
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_write_file()
            .with(eq(Path::new("/out/C")), eq("new-file"))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut stats = GenerationStatistics::default();
        Reconciler::new(&fs, false)
            .reconcile(Path::new("/out"), &rendered(), &mut stats)
            .unwrap();

        assert_eq!((stats.created, stats.updated, stats.not_changed), (1, 1, 1));
        let statuses: Vec<_> = stats.artifacts.iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            vec![ArtifactStatus::Updated, ArtifactStatus::NotChanged, ArtifactStatus::Created]
        );
    }
}

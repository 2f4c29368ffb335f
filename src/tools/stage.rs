use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::tools::{move_file, remove_if_exists, CommandRunner, Invocation, ToolError};
use crate::utils::paths::with_suffix;

/// An output the stage keeps, optionally moved to a final destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeptOutput {
    pub suffix: &'static str,
    pub destination: Option<PathBuf>,
}

impl KeptOutput {
    pub fn at_prefix(suffix: &'static str) -> Self {
        Self {
            suffix,
            destination: None,
        }
    }

    pub fn moved_to(suffix: &'static str, destination: impl Into<PathBuf>) -> Self {
        Self {
            suffix,
            destination: Some(destination.into()),
        }
    }
}

/// One tool run plus the bookkeeping of its output files
#[derive(Debug, Clone)]
pub struct Stage {
    pub name: &'static str,
    pub invocation: Invocation,
    pub prefix: PathBuf,
    /// Suffixes of files deleted after the run (they may not exist)
    pub discard: &'static [&'static str],
    pub keep: Vec<KeptOutput>,
}

impl Stage {
    /// Run the tool and delete discarded files
    ///
    /// # Errors
    ///
    /// Returns a `ToolError` if the tool fails or a file cannot be removed.
    pub fn run(&self, runner: &dyn CommandRunner) -> Result<(), ToolError> {
        info!(stage = self.name, prefix = %self.prefix.display(), "Starting stage");
        runner.run(&self.invocation)?;

        for suffix in self.discard {
            remove_if_exists(&self.output_path(suffix))?;
        }
        Ok(())
    }

    /// Move kept outputs into place, returning their final paths in `keep` order
    ///
    /// # Errors
    ///
    /// Returns `ToolError::MissingOutput` if the tool did not write a kept
    /// output, or `ToolError::Io` if it cannot be moved.
    pub fn finish(&self) -> Result<Vec<PathBuf>, ToolError> {
        let mut paths = Vec::with_capacity(self.keep.len());

        for kept in &self.keep {
            let produced = self.output_path(kept.suffix);
            if !produced.exists() {
                return Err(ToolError::MissingOutput(produced));
            }

            match &kept.destination {
                Some(destination) => {
                    move_file(&produced, destination)?;
                    paths.push(destination.clone());
                }
                None => paths.push(produced),
            }
        }

        info!(stage = self.name, outputs = paths.len(), "Finished stage");
        Ok(paths)
    }

    /// Run, clean up and move outputs
    ///
    /// # Errors
    ///
    /// See [`Stage::run`] and [`Stage::finish`].
    pub fn execute(&self, runner: &dyn CommandRunner) -> Result<Vec<PathBuf>, ToolError> {
        self.run(runner)?;
        self.finish()
    }

    /// File the tool writes for a suffix
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        with_suffix(&self.prefix, suffix)
    }
}

/// Shared `--out <prefix>` argument pair
pub(crate) fn out_args(prefix: &Path) -> [&OsStr; 2] {
    [OsStr::new("--out"), prefix.as_os_str()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::FakeRunner;

    fn stage(prefix: &Path, destination: &Path) -> Stage {
        Stage {
            name: "test",
            invocation: Invocation::new("tool").args(out_args(prefix)),
            prefix: prefix.to_path_buf(),
            discard: &[".log", ".nosex"],
            keep: vec![KeptOutput::moved_to(".hwe", destination)],
        }
    }

    #[test]
    fn test_execute_cleans_and_moves() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("cges");
        let destination = dir.path().join("hardy.txt");
        // .nosex is not produced; its removal must still succeed
        let runner = FakeRunner::producing(&[".log", ".hwe"]);

        let paths = stage(&prefix, &destination).execute(&runner).unwrap();
        assert_eq!(paths, vec![destination.clone()]);
        assert!(destination.exists());
        assert!(!with_suffix(&prefix, ".log").exists());
        assert!(!with_suffix(&prefix, ".hwe").exists());
    }

    #[test]
    fn test_missing_kept_output() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("cges");
        let runner = FakeRunner::producing(&[".log"]);

        let err = stage(&prefix, &dir.path().join("out"))
            .execute(&runner)
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingOutput(p) if p.ends_with("cges.hwe")));
    }

    #[test]
    fn test_tool_failure_skips_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("cges");
        std::fs::write(with_suffix(&prefix, ".log"), "previous").unwrap();
        let runner = FakeRunner {
            fail: true,
            ..FakeRunner::default()
        };

        let err = stage(&prefix, &dir.path().join("out"))
            .execute(&runner)
            .unwrap_err();
        assert!(matches!(err, ToolError::Failed { .. }));
        assert!(with_suffix(&prefix, ".log").exists());
    }
}

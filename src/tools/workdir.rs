use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::tools::ToolError;
use crate::utils::validation::validate_label;

/// Directory holding intermediate tool outputs.
///
/// Either a caller-supplied directory, which is created if needed and kept, or
/// a private temporary directory removed when this value is dropped.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
    _temp: Option<TempDir>,
}

impl WorkDir {
    /// # Errors
    ///
    /// Returns `ToolError::Io` if the directory cannot be created.
    pub fn new(dir: Option<&Path>) -> Result<Self, ToolError> {
        match dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|source| ToolError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
                Ok(Self {
                    path: dir.to_path_buf(),
                    _temp: None,
                })
            }
            None => {
                let temp = tempfile::Builder::new()
                    .prefix("variant-qc-")
                    .tempdir()
                    .map_err(|source| ToolError::Io {
                        path: std::env::temp_dir(),
                        source,
                    })?;
                debug!(path = %temp.path().display(), "Created temporary work directory");
                Ok(Self {
                    path: temp.path().to_path_buf(),
                    _temp: Some(temp),
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Output prefix for a stage: `<dir>/<label>`
    ///
    /// # Errors
    ///
    /// Returns `ToolError::Label` if the label is not a plain file name.
    pub fn prefix(&self, label: &str) -> Result<PathBuf, ToolError> {
        Ok(self.path.join(validate_label(label)?))
    }
}

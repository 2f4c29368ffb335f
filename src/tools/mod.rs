//! Wrappers for the external toolkits that compute most QC metrics.
//!
//! Each metric is produced by one *stage*: a single vcftools or plink run that
//! writes files named after an output prefix (`--out <prefix>`), followed by
//! removal of the auxiliary files the tool leaves behind and a move of the
//! wanted output to its destination.
//!
//! | Stage | Tool | Kept output |
//! |-------|------|-------------|
//! | PLINK recode | vcftools `--plink --recode` | `.ped`, `.map` |
//! | Ts/Tv | vcftools `--TsTv` | `.TsTv.summary` |
//! | Heterozygosity | vcftools `--het` | `.het` |
//! | Mendel | plink `--mendel` | `.fmendel`, `.lmendel` |
//! | MAF | plink `--freq` | `.frq` |
//! | Missingness | plink `--missing` | `.lmiss` |
//! | Hardy-Weinberg | plink `--hardy` | `.hwe` |
//!
//! Commands run through a [`CommandRunner`], so stages can be exercised
//! without the toolkits installed.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::{debug, info};

use crate::parsing::ParseError;
use crate::pedigree::PedigreeError;
use crate::utils::validation::ValidationError;

pub mod plink;
pub mod stage;
pub mod vcftools;
pub mod workdir;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: String },

    #[error("Expected output was not produced: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid stage label: {0}")]
    Label(#[from] ValidationError),

    #[error("Failed to apply pedigree: {0}")]
    Pedigree(#[from] PedigreeError),

    #[error("Failed to read VCF: {0}")]
    Parse(#[from] ParseError),
}

/// Locations of the external programs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub vcftools: PathBuf,
    pub plink: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            vcftools: PathBuf::from("vcftools"),
            plink: PathBuf::from("plink"),
        }
    }
}

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Program name for messages
    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Executes stage commands
pub trait CommandRunner {
    /// Run to completion; a non-zero exit is an error
    ///
    /// # Errors
    ///
    /// Returns `ToolError::Spawn` if the program cannot be started, or
    /// `ToolError::Failed` if it exits unsuccessfully.
    fn run(&self, invocation: &Invocation) -> Result<(), ToolError>;
}

/// Runs commands as child processes, discarding their stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ToolError> {
        info!(command = %invocation, "Running");

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdout(Stdio::null())
            .status()
            .map_err(|source| ToolError::Spawn {
                program: invocation.program_name(),
                source,
            })?;

        if !status.success() {
            return Err(ToolError::Failed {
                program: invocation.program_name(),
                status: status.to_string(),
            });
        }

        debug!(program = %invocation.program_name(), "Finished");
        Ok(())
    }
}

/// Remove a file, treating an already-missing file as success
///
/// # Errors
///
/// Returns `ToolError::Io` for any other removal failure.
pub fn remove_if_exists(path: &Path) -> Result<(), ToolError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ToolError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Move a file, copying across filesystems when a rename is not possible
///
/// # Errors
///
/// Returns `ToolError::Io` if the file cannot be moved.
pub fn move_file(from: &Path, to: &Path) -> Result<(), ToolError> {
    let io_err = |source| ToolError::Io {
        path: to.to_path_buf(),
        source,
    };

    if let Err(rename_err) = std::fs::rename(from, to) {
        if !from.exists() {
            return Err(ToolError::Io {
                path: from.to_path_buf(),
                source: rename_err,
            });
        }
        std::fs::copy(from, to).map_err(io_err)?;
        std::fs::remove_file(from).map_err(|source| ToolError::Io {
            path: from.to_path_buf(),
            source,
        })?;
    }

    debug!(from = %from.display(), to = %to.display(), "Moved");
    Ok(())
}

//! Pedigree information for PLINK re-coding.
//!
//! vcftools writes PLINK `.ped` files without family structure: every sample is
//! its own family with unknown parents and sex. Mendelian-error analysis needs
//! that structure, so it is re-injected from a pedigree sheet with
//! [`recode::recode_ped_file`].

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::core::types::PedigreeEntry;
use crate::parsing::pedigree::parse_pedigree_file;
use crate::parsing::ParseError;

pub mod recode;

#[derive(Error, Debug)]
pub enum PedigreeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse pedigree: {0}")]
    Parse(#[from] ParseError),

    #[error("Malformed ped line {line}: expected at least 6 columns, found {columns}")]
    MalformedPedLine { line: usize, columns: usize },
}

/// Pedigree entries indexed by individual ID
#[derive(Debug, Clone, Default)]
pub struct Pedigree {
    entries: HashMap<String, PedigreeEntry>,
}

impl Pedigree {
    /// Build from parsed entries; a repeated individual replaces the earlier row
    pub fn from_entries(entries: impl IntoIterator<Item = PedigreeEntry>) -> Self {
        let mut index = HashMap::new();
        for entry in entries {
            if let Some(previous) = index.insert(entry.individual_id.clone(), entry) {
                warn!(
                    individual = %previous.individual_id,
                    "Individual listed more than once in pedigree, using last row"
                );
            }
        }
        Self { entries: index }
    }

    /// Load a pedigree sheet
    ///
    /// # Errors
    ///
    /// Returns `PedigreeError::Parse` if the sheet cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, PedigreeError> {
        Ok(Self::from_entries(parse_pedigree_file(path)?))
    }

    pub fn get(&self, individual_id: &str) -> Option<&PedigreeEntry> {
        self.entries.get(individual_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use serde::{Deserialize, Serialize};

/// Parent value used in pedigree sheets for individuals without sequence data
pub const NOT_SEQUENCED: &str = "Not Sequenced";

/// PLINK's code for an unknown parent
pub const UNKNOWN_PARENT: &str = "0";

/// Fraction of a call set's alternate alleles found in a reference panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RediscoveryResult {
    /// Base name of the source VCF
    pub source_label: String,
    pub matched: u64,
    pub total: u64,
    pub rate: f64,
}

impl RediscoveryResult {
    /// Report line as written to rediscovery output files.
    ///
    /// The rate is printed with `{:?}` so whole fractions keep their decimal point (`1.0`).
    #[must_use]
    pub fn to_tsv_line(&self) -> String {
        format!("{}\t{:?}", self.source_label, self.rate)
    }
}

/// One individual from a pedigree sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PedigreeEntry {
    pub family_id: String,
    pub individual_id: String,
    pub father_id: String,
    pub mother_id: String,
    /// Sex code as it appears in the sheet (PLINK: 1 = male, 2 = female, 0 = unknown)
    pub sex: String,
}

impl PedigreeEntry {
    /// Map a parent value from the sheet onto a PLINK parent code
    #[must_use]
    pub fn normalize_parent(value: &str) -> String {
        let value = value.trim();
        if value == NOT_SEQUENCED {
            UNKNOWN_PARENT.to_string()
        } else {
            value.to_string()
        }
    }
}

//! Panel builder for creating reference variant snapshots.
//!
//! The `PanelBuilder` collects canonical keys from one or more inputs (panel
//! VCFs or plain key lists) into a single `ReferenceVariantSet`. VCF inputs
//! contribute the forward key of every record/alternate pair, since panels are
//! stored in their own allele orientation and lookups check both.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::{debug, info};

use crate::core::variant::{canonical_keys, CanonicalKey};
use crate::panel::store::{PanelError, ReferenceVariantSet};
use crate::parsing::vcf::open_vcf;
use crate::utils::paths::is_gzipped;

/// Input format for auto-detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    /// VCF or gzipped VCF of panel sites
    Vcf,
    /// One canonical key per line
    Keys,
}

impl InputFormat {
    /// Detect format from file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_lowercase();
        let name = name
            .strip_suffix(".gz")
            .or_else(|| name.strip_suffix(".bgz"))
            .unwrap_or(&name);

        let ext = Path::new(name).extension()?.to_str()?;
        match ext {
            "vcf" => Some(Self::Vcf),
            "txt" | "keys" | "tsv" => Some(Self::Keys),
            _ => None,
        }
    }
}

/// Accumulates keys from panel inputs
#[derive(Debug)]
pub struct PanelBuilder {
    set: ReferenceVariantSet,
    inputs: usize,
    duplicates: u64,
}

impl PanelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            set: ReferenceVariantSet::new(name),
            inputs: 0,
            duplicates: 0,
        }
    }

    /// Add an input, detecting its format from the file name unless given
    ///
    /// # Errors
    ///
    /// Returns a `PanelError` if the format cannot be detected or the input
    /// cannot be read.
    pub fn add_input(
        &mut self,
        path: &Path,
        format: Option<InputFormat>,
    ) -> Result<u64, PanelError> {
        let format = format.or_else(|| InputFormat::from_path(path)).ok_or_else(|| {
            PanelError::ParseError(crate::parsing::ParseError::InvalidFormat(format!(
                "Cannot detect panel input format of '{}' (use --input-format)",
                path.display()
            )))
        })?;

        let added = match format {
            InputFormat::Vcf => self.add_vcf(path)?,
            InputFormat::Keys => self.add_key_list(path)?,
        };
        self.inputs += 1;

        info!(
            path = %path.display(),
            format = ?format,
            added,
            "Added panel input"
        );
        Ok(added)
    }

    /// Add the forward key of every record/alternate pair of a VCF.
    /// Returns the number of new keys.
    ///
    /// # Errors
    ///
    /// Returns `PanelError::ParseError` if the VCF cannot be opened or parsed.
    pub fn add_vcf(&mut self, path: &Path) -> Result<u64, PanelError> {
        let mut added = 0;
        for record in open_vcf(path)? {
            let record = record?;
            for alternate in &record.alternate_alleles {
                let (forward, _) = canonical_keys(&record, alternate);
                added += u64::from(self.insert(forward));
            }
        }
        Ok(added)
    }

    /// Add keys from a text file, one per line. Blank lines and `#` comments
    /// are skipped; only the first whitespace-delimited field of a line is used.
    ///
    /// # Errors
    ///
    /// Returns `PanelError::ReadError` if the file cannot be read.
    pub fn add_key_list(&mut self, path: &Path) -> Result<u64, PanelError> {
        let file = File::open(path)?;
        if is_gzipped(path) {
            self.add_keys_from_reader(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            self.add_keys_from_reader(BufReader::new(file))
        }
    }

    /// Add keys from any buffered reader in key-list format
    ///
    /// # Errors
    ///
    /// Returns `PanelError::ReadError` on read failure.
    pub fn add_keys_from_reader<R: BufRead>(&mut self, reader: R) -> Result<u64, PanelError> {
        let mut added = 0;
        for line in reader.lines() {
            let line = line?;
            let Some(key) = line.split_whitespace().next() else {
                continue;
            };
            if key.starts_with('#') {
                continue;
            }
            added += u64::from(self.insert(CanonicalKey::from_normalized(key)));
        }
        Ok(added)
    }

    fn insert(&mut self, key: CanonicalKey) -> bool {
        let new = self.set.insert(key);
        if !new {
            self.duplicates += 1;
        }
        new
    }

    /// Number of inputs added so far
    pub fn input_count(&self) -> usize {
        self.inputs
    }

    /// Finish building and return the set
    pub fn build(self) -> ReferenceVariantSet {
        debug!(
            panel = %self.set.name(),
            keys = self.set.len(),
            duplicates = self.duplicates,
            "Built panel"
        );
        self.set
    }
}

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Chromosome prefix used by UCSC-style contig names (`chr1`, `chrX`, ...)
pub const CHROMOSOME_PREFIX: &str = "chr";

/// A single variant site read from a VCF file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    pub chromosome: String,
    /// 1-based position
    pub position: u64,
    pub reference_allele: String,
    pub alternate_alleles: Vec<String>,
}

impl VariantRecord {
    pub fn new(
        chromosome: impl Into<String>,
        position: u64,
        reference_allele: impl Into<String>,
        alternate_alleles: Vec<String>,
    ) -> Self {
        Self {
            chromosome: chromosome.into(),
            position,
            reference_allele: reference_allele.into(),
            alternate_alleles,
        }
    }

    /// Forward and reverse keys for every alternate allele, in ALT order.
    pub fn keys(&self) -> impl Iterator<Item = (CanonicalKey, CanonicalKey)> + '_ {
        self.alternate_alleles
            .iter()
            .map(move |alt| canonical_keys(self, alt))
    }
}

/// Normalized variant identity used for panel lookups: `chrom:pos.allele_a.allele_b`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Wrap an already-normalized key (e.g. one line of a key list)
    pub fn from_normalized(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for CanonicalKey {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CanonicalKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip the literal `chr` prefix from a chromosome name.
///
/// Only the exact prefix is removed, and only once: `chrX` becomes `X`,
/// while `Chr1` and `hr1` are returned unchanged.
#[must_use]
pub fn strip_chromosome_prefix(chromosome: &str) -> &str {
    chromosome
        .strip_prefix(CHROMOSOME_PREFIX)
        .unwrap_or(chromosome)
}

/// Build the `(forward, reverse)` key pair for one alternate allele of a record.
///
/// The forward key orders alleles ref→alt and the reverse key alt→ref. Panels
/// do not agree on allele order for a site, so lookups check both.
///
/// # Examples
///
/// ```
/// use variant_qc::core::variant::{canonical_keys, VariantRecord};
///
/// let record = VariantRecord::new("chr7", 117_559_590, "A", vec!["G".to_string()]);
/// let (forward, reverse) = canonical_keys(&record, "G");
/// assert_eq!(forward.as_str(), "7:117559590.A.G");
/// assert_eq!(reverse.as_str(), "7:117559590.G.A");
/// ```
#[must_use]
pub fn canonical_keys(record: &VariantRecord, alternate: &str) -> (CanonicalKey, CanonicalKey) {
    let chrom = strip_chromosome_prefix(&record.chromosome);
    let pos = record.position;
    let reference = &record.reference_allele;

    let forward = CanonicalKey(format!("{chrom}:{pos}.{reference}.{alternate}"));
    let reverse = CanonicalKey(format!("{chrom}:{pos}.{alternate}.{reference}"));
    (forward, reverse)
}

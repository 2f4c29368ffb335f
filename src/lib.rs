//! # variant-qc
//!
//! Quality-control metrics for variant call sets.
//!
//! Call sets from different pipelines (GATK, Atlas, ...) are compared on a
//! handful of metrics. The central one, the *rediscovery rate*, is the fraction
//! of a call set's alternate alleles that already appear in a published
//! reference panel. It is computed natively; the remaining metrics (Ts/Tv,
//! heterozygosity, Mendelian errors, allele frequency, missingness,
//! Hardy-Weinberg) are delegated to vcftools and plink.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use variant_qc::{calculate_file, ReferenceVariantSet};
//!
//! let panel = ReferenceVariantSet::load_from_file(Path::new("evs.bin")).unwrap();
//! let result = calculate_file(&panel, Path::new("gatk.vcf.gz")).unwrap();
//! println!("{}", result.to_tsv_line());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Variant records, canonical keys and result types
//! - [`parsing`]: VCF and pedigree sheet parsers
//! - [`panel`]: Reference panel snapshots and their builder
//! - [`rediscovery`]: Rediscovery rate calculation
//! - [`pedigree`]: Pedigree lookup and PLINK ped re-coding
//! - [`tools`]: vcftools and plink stages
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod panel;
pub mod parsing;
pub mod pedigree;
pub mod rediscovery;
pub mod tools;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::types::*;
pub use crate::core::variant::{CanonicalKey, VariantRecord};
pub use panel::store::ReferenceVariantSet;
pub use rediscovery::{calculate, calculate_file, RediscoveryError};

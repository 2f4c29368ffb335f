//! Variant rediscovery against reference panels.
//!
//! The rediscovery rate of a call set is the fraction of its alternate alleles
//! that are also present in a reference panel. Every (record, alternate) pair
//! counts once toward the total, and counts as rediscovered when either its
//! forward or its reverse canonical key is in the panel.
//!
//! ## Example
//!
//! ```rust,no_run
//! use variant_qc::panel::store::ReferenceVariantSet;
//! use variant_qc::rediscovery::calculate_file;
//! use std::path::Path;
//!
//! let panel = ReferenceVariantSet::load_from_file(Path::new("evs.bin")).unwrap();
//! for vcf in ["atlas.vcf", "gatk.vcf.gz"] {
//!     let result = calculate_file(&panel, Path::new(vcf)).unwrap();
//!     println!("{}", result.to_tsv_line());
//! }
//! ```

pub mod calculator;

pub use calculator::{calculate, calculate_file, RediscoveryCounts, RediscoveryError};

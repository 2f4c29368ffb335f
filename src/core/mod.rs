//! Core data types for variant QC.
//!
//! - [`VariantRecord`](variant::VariantRecord): one site from a VCF with its alternate alleles
//! - [`CanonicalKey`](variant::CanonicalKey): normalized variant identity used for panel lookups
//! - [`RediscoveryResult`](types::RediscoveryResult): rediscovery rate for one call set
//! - [`PedigreeEntry`](types::PedigreeEntry): one individual from a pedigree sheet
//!
//! ## Variant Identity
//!
//! Reference panels and call sets disagree on contig naming and on allele order,
//! so a site is looked up under two keys:
//!
//! | Record | Forward | Reverse |
//! |--------|---------|---------|
//! | `chr7 117559590 A G` | `7:117559590.A.G` | `7:117559590.G.A` |
//!
//! Only the literal `chr` prefix is removed from the chromosome name.

pub mod types;
pub mod variant;

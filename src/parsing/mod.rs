//! Parsers for the input files of the QC pipeline.
//!
//! - **VCF files**: Site columns of every data record, streamed lazily
//! - **Pedigree sheets**: Comma-separated family/individual/parent/sex rows
//!
//! ## Example
//!
//! ```rust,no_run
//! use variant_qc::parsing::vcf::open_vcf;
//! use std::path::Path;
//!
//! for record in open_vcf(Path::new("calls.vcf.gz")).unwrap() {
//!     let record = record.unwrap();
//!     println!("{}:{}", record.chromosome, record.position);
//! }
//! ```

use thiserror::Error;

pub mod pedigree;
pub mod vcf;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("noodles error: {0}")]
    Noodles(String),
}

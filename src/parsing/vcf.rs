//! Streaming reader for VCF data records.
//!
//! Only the fixed site columns are decoded (`CHROM`, `POS`, `REF`, `ALT`);
//! sample columns are left to the external toolkits. Both plain and
//! gzip/bgzip-compressed files are supported.
//!
//! Records are produced lazily, one at a time, so call sets of any size can be
//! processed with constant memory.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::vcf;
use noodles::vcf::variant::record_buf::RecordBuf;
use tracing::debug;

use crate::core::variant::VariantRecord;
use crate::parsing::ParseError;
use crate::utils::paths::is_gzipped;

/// Lazy, single-pass iterator over the records of a VCF
pub struct VcfRecords<R> {
    reader: vcf::io::Reader<R>,
    header: vcf::Header,
    buf: RecordBuf,
    records_read: u64,
    finished: bool,
}

impl<R: BufRead> VcfRecords<R> {
    /// Read the header from `inner` and position the stream at the first record.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Noodles` if the header cannot be parsed.
    pub fn from_reader(inner: R) -> Result<Self, ParseError> {
        let mut reader = vcf::io::Reader::new(inner);
        let header = reader
            .read_header()
            .map_err(|e| ParseError::Noodles(format!("Failed to read VCF header: {e}")))?;

        Ok(Self {
            reader,
            header,
            buf: RecordBuf::default(),
            records_read: 0,
            finished: false,
        })
    }

    /// Number of records yielded so far
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Consume empty lines ahead of the next record
    fn skip_blank_lines(&mut self) -> Result<(), ParseError> {
        loop {
            let inner = self.reader.get_mut();
            let blank = match inner.fill_buf()? {
                [] => return Ok(()),
                [b'\n', ..] => 1,
                [b'\r', b'\n', ..] => 2,
                [b'\r'] => 1,
                _ => return Ok(()),
            };
            inner.consume(blank);
        }
    }

    fn read_next(&mut self) -> Result<Option<VariantRecord>, ParseError> {
        self.skip_blank_lines()?;

        let n = self
            .reader
            .read_record_buf(&self.header, &mut self.buf)
            .map_err(|e| {
                ParseError::Noodles(format!(
                    "Failed to parse VCF record {}: {e}",
                    self.records_read + 1
                ))
            })?;

        if n == 0 {
            return Ok(None);
        }

        Ok(Some(record_from_buf(&self.buf)))
    }
}

impl<R: BufRead> Iterator for VcfRecords<R> {
    type Item = Result<VariantRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_next() {
            Ok(Some(record)) => {
                self.records_read += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                self.finished = true;
                debug!(records = self.records_read, "Reached end of VCF");
                None
            }
            Err(e) => {
                // A malformed record ends the stream; nothing after it is trusted
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Open a VCF file for streaming, decompressing `.gz`/`.bgz` files.
///
/// A path of `-` reads from stdin.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened, or
/// `ParseError::Noodles` if its header cannot be parsed.
pub fn open_vcf(path: &Path) -> Result<VcfRecords<Box<dyn BufRead>>, ParseError> {
    let inner: Box<dyn BufRead> = if path == Path::new("-") {
        Box::new(io::stdin().lock())
    } else if is_gzipped(path) {
        let file = File::open(path)?;
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        let file = File::open(path)?;
        Box::new(BufReader::new(file))
    };

    debug!(path = %path.display(), "Opened VCF");
    VcfRecords::from_reader(inner)
}

/// Count the data records of a VCF file
///
/// # Errors
///
/// Returns a `ParseError` if the file cannot be opened or a record is malformed.
pub fn count_records(path: &Path) -> Result<u64, ParseError> {
    let mut records = open_vcf(path)?;
    for result in records.by_ref() {
        result?;
    }
    Ok(records.records_read())
}

/// Convert a noodles record into a `VariantRecord`
fn record_from_buf(record: &RecordBuf) -> VariantRecord {
    let chromosome = record.reference_sequence_name().to_string();

    // POS 0 marks a telomeric site; noodles reports it as no start position
    let position = record.variant_start().map_or(0, usize::from) as u64;

    let alternate_alleles: Vec<String> = record.alternate_bases().as_ref().to_vec();

    VariantRecord {
        chromosome,
        position,
        reference_allele: record.reference_bases().to_string(),
        alternate_alleles,
    }
}

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::pedigree::{Pedigree, PedigreeError};
use crate::utils::paths::is_gzipped;

/// Phenotype written for every sample (PLINK: 2 = affected)
pub const PLACEHOLDER_PHENOTYPE: &str = "2";

/// Leading ped columns: family, individual, father, mother, sex, phenotype
const PED_FIXED_COLUMNS: usize = 6;

/// Outcome of re-coding one ped file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecodeSummary {
    pub lines: usize,
    pub updated: usize,
}

/// Re-code ped lines from `reader` into `writer`.
///
/// Individuals found in the pedigree get their family, parents and sex from
/// it (empty pedigree values leave the column as is). Every line gets the
/// placeholder phenotype. Output is tab-delimited.
///
/// # Errors
///
/// Returns `PedigreeError::Io` on read/write failure, or
/// `PedigreeError::MalformedPedLine` for lines with fewer than six columns.
pub fn recode_ped<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    pedigree: &Pedigree,
) -> Result<RecodeSummary, PedigreeError> {
    let mut summary = RecodeSummary::default();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        let mut fields: Vec<&str> = if line.contains('\t') {
            line.split('\t').collect()
        } else {
            line.split_whitespace().collect()
        };
        if fields.len() < PED_FIXED_COLUMNS {
            return Err(PedigreeError::MalformedPedLine {
                line: line_num + 1,
                columns: fields.len(),
            });
        }

        if let Some(entry) = pedigree.get(fields[1]) {
            for (index, value) in [
                (0, entry.family_id.as_str()),
                (2, entry.father_id.as_str()),
                (3, entry.mother_id.as_str()),
                (4, entry.sex.as_str()),
            ] {
                if !value.is_empty() {
                    fields[index] = value;
                }
            }
            summary.updated += 1;
        }
        fields[5] = PLACEHOLDER_PHENOTYPE;

        writeln!(writer, "{}", fields.join("\t"))?;
        summary.lines += 1;
    }

    Ok(summary)
}

/// Re-code a ped file on disk. `.gz` inputs are decompressed.
///
/// # Errors
///
/// See [`recode_ped`]; also fails if either file cannot be opened.
pub fn recode_ped_file(
    input: &Path,
    output: &Path,
    pedigree: &Pedigree,
) -> Result<RecodeSummary, PedigreeError> {
    let file = File::open(input)?;
    let mut writer = BufWriter::new(File::create(output)?);

    let summary = if is_gzipped(input) {
        recode_ped(BufReader::new(MultiGzDecoder::new(file)), &mut writer, pedigree)?
    } else {
        recode_ped(BufReader::new(file), &mut writer, pedigree)?
    };
    writer.flush()?;

    debug!(
        input = %input.display(),
        output = %output.display(),
        lines = summary.lines,
        updated = summary.updated,
        "Re-coded ped file"
    );
    Ok(summary)
}

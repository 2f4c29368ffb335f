//! Parser for pedigree sheets.
//!
//! Pedigree sheets are comma-separated with no header line:
//!
//! ```text
//! family,individual,father,mother,sex[,extra columns...]
//! FAM01,P003,P001,P002,2
//! FAM01,P001,Not Sequenced,Not Sequenced,1
//! ```
//!
//! Parents recorded as `Not Sequenced` are mapped to PLINK's unknown parent code `0`.

use std::io::BufRead;
use std::path::Path;

use crate::core::types::PedigreeEntry;
use crate::parsing::ParseError;

/// Minimum number of columns in a pedigree row
const MIN_COLUMNS: usize = 5;

/// Parse a pedigree sheet from a file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if a row has fewer than five columns.
pub fn parse_pedigree_file(path: &Path) -> Result<Vec<PedigreeEntry>, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_pedigree_reader(std::io::BufReader::new(file))
}

/// Parse pedigree rows from any buffered reader
///
/// # Errors
///
/// Returns `ParseError::Io` on read failure, or `ParseError::InvalidFormat`
/// if a row has fewer than five columns.
pub fn parse_pedigree_reader<R: BufRead>(reader: R) -> Result<Vec<PedigreeEntry>, ParseError> {
    let mut entries = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < MIN_COLUMNS {
            return Err(ParseError::InvalidFormat(format!(
                "Pedigree line {}: expected at least {MIN_COLUMNS} columns, found {}",
                line_num + 1,
                fields.len()
            )));
        }

        entries.push(PedigreeEntry {
            family_id: fields[0].to_string(),
            individual_id: fields[1].to_string(),
            father_id: PedigreeEntry::normalize_parent(fields[2]),
            mother_id: PedigreeEntry::normalize_parent(fields[3]),
            sex: fields[4].to_string(),
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pedigree() {
        let sheet = "FAM01,P003,P001,P002,2\nFAM01,P001,Not Sequenced,Not Sequenced,1,extra\n";
        let entries = parse_pedigree_reader(sheet.as_bytes()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].individual_id, "P003");
        assert_eq!(entries[0].father_id, "P001");
        assert_eq!(entries[0].mother_id, "P002");
        assert_eq!(entries[0].sex, "2");

        assert_eq!(entries[1].father_id, "0");
        assert_eq!(entries[1].mother_id, "0");
        assert_eq!(entries[1].sex, "1");
    }

    #[test]
    fn test_parse_pedigree_trims_line_endings() {
        let sheet = "FAM01,P003,P001,P002,2\r\n\nFAM02,P010,0,0,1\r\n";
        let entries = parse_pedigree_reader(sheet.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].sex, "2");
        assert_eq!(entries[1].family_id, "FAM02");
    }

    #[test]
    fn test_parse_pedigree_short_row() {
        let sheet = "FAM01,P003,P001,P002,2\nFAM01,P004,P001\n";
        let err = parse_pedigree_reader(sheet.as_bytes()).unwrap_err();
        match err {
            ParseError::InvalidFormat(msg) => assert!(msg.contains("line 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

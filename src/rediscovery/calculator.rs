use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::core::types::RediscoveryResult;
use crate::core::variant::VariantRecord;
use crate::panel::store::ReferenceVariantSet;
use crate::parsing::vcf::open_vcf;
use crate::parsing::ParseError;
use crate::utils::paths::source_label;

#[derive(Error, Debug)]
pub enum RediscoveryError {
    /// The source had no record/alternate pairs, so no rate exists
    #[error("No alternate alleles found in '{source_label}'; rediscovery rate is undefined")]
    EmptyInput { source_label: String },

    #[error("Cannot read variants from '{source_label}': {error}")]
    SourceUnavailable {
        source_label: String,
        #[source]
        error: ParseError,
    },
}

/// Running match counts for one call set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RediscoveryCounts {
    pub matched: u64,
    pub total: u64,
}

impl RediscoveryCounts {
    /// Count every alternate allele of a record against the panel
    pub fn add_record(&mut self, panel: &ReferenceVariantSet, record: &VariantRecord) {
        for (forward, reverse) in record.keys() {
            if panel.contains(&forward) || panel.contains(&reverse) {
                self.matched += 1;
            }
            self.total += 1;
        }
    }

    /// Fraction matched, or `None` when nothing was counted
    #[must_use]
    pub fn rate(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.matched as f64 / self.total as f64;
        Some(rate)
    }
}

/// Rediscovery rate of a stream of records against a panel.
///
/// The stream is consumed once. The first record error aborts the calculation
/// with `SourceUnavailable`, and no partial result is returned.
///
/// # Errors
///
/// Returns `RediscoveryError::SourceUnavailable` if the stream yields an error,
/// or `RediscoveryError::EmptyInput` if it contains no alternate alleles.
pub fn calculate<I>(
    panel: &ReferenceVariantSet,
    records: I,
    source_label: &str,
) -> Result<RediscoveryResult, RediscoveryError>
where
    I: IntoIterator<Item = Result<VariantRecord, ParseError>>,
{
    let mut counts = RediscoveryCounts::default();

    for record in records {
        let record = record.map_err(|error| RediscoveryError::SourceUnavailable {
            source_label: source_label.to_string(),
            error,
        })?;
        counts.add_record(panel, &record);
    }

    let rate = counts.rate().ok_or_else(|| RediscoveryError::EmptyInput {
        source_label: source_label.to_string(),
    })?;

    debug!(
        source = source_label,
        panel = %panel.name(),
        matched = counts.matched,
        total = counts.total,
        rate,
        "Calculated rediscovery rate"
    );

    Ok(RediscoveryResult {
        source_label: source_label.to_string(),
        matched: counts.matched,
        total: counts.total,
        rate,
    })
}

/// Rediscovery rate of a VCF file, labeled with the file's base name
///
/// # Errors
///
/// Returns `RediscoveryError::SourceUnavailable` if the file cannot be opened
/// or parsed, or `RediscoveryError::EmptyInput` if it has no alternate alleles.
pub fn calculate_file(
    panel: &ReferenceVariantSet,
    path: &Path,
) -> Result<RediscoveryResult, RediscoveryError> {
    let label = source_label(path);
    let records = open_vcf(path).map_err(|error| RediscoveryError::SourceUnavailable {
        source_label: label.clone(),
        error,
    })?;
    calculate(panel, records, &label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variant::CanonicalKey;

    fn panel(keys: &[&str]) -> ReferenceVariantSet {
        ReferenceVariantSet::from_keys(
            "test",
            keys.iter().map(|k| CanonicalKey::from_normalized(*k)),
        )
    }

    fn record(chrom: &str, pos: u64, reference: &str, alts: &[&str]) -> VariantRecord {
        VariantRecord::new(
            chrom,
            pos,
            reference,
            alts.iter().map(|a| (*a).to_string()).collect(),
        )
    }

    fn ok(records: Vec<VariantRecord>) -> impl Iterator<Item = Result<VariantRecord, ParseError>> {
        records.into_iter().map(Ok)
    }

    #[test]
    fn test_exact_match() {
        let panel = panel(&["7:117559590.A.G"]);
        let records = ok(vec![record("chr7", 117_559_590, "A", &["G"])]);

        let result = calculate(&panel, records, "sample.vcf").unwrap();
        assert_eq!(result.matched, 1);
        assert_eq!(result.total, 1);
        assert!((result.rate - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.source_label, "sample.vcf");
    }

    #[test]
    fn test_reverse_orientation_matches() {
        let panel = panel(&["7:117559590.G.A"]);
        let records = ok(vec![record("chr7", 117_559_590, "A", &["G"])]);

        let result = calculate(&panel, records, "sample.vcf").unwrap();
        assert_eq!(result.matched, 1);
    }

    #[test]
    fn test_no_match_is_zero_rate() {
        let panel = panel(&["1:10.A.C"]);
        let records = ok(vec![record("chr7", 117_559_590, "A", &["G"])]);

        let result = calculate(&panel, records, "sample.vcf").unwrap();
        assert_eq!(result.matched, 0);
        assert_eq!(result.total, 1);
        assert!(result.rate.abs() < f64::EPSILON);
    }

    #[test]
    fn test_multiallelic_counts_each_alternate() {
        let panel = panel(&["1:10.A.C"]);
        let records = ok(vec![record("chr1", 10, "A", &["C", "T"])]);

        let result = calculate(&panel, records, "multi.vcf").unwrap();
        assert_eq!(result.matched, 1);
        assert_eq!(result.total, 2);
        assert!((result.rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rate_within_bounds() {
        let panel = panel(&["1:10.A.C", "1:20.G.T", "2:5.C.A"]);
        let records = ok(vec![
            record("chr1", 10, "A", &["C"]),
            record("chr1", 20, "T", &["G", "C"]),
            record("2", 5, "C", &["A"]),
            record("chr3", 1, "A", &[]),
            record("chr4", 7, "G", &["A"]),
        ]);

        let result = calculate(&panel, records, "calls.vcf").unwrap();
        assert_eq!(result.total, 5);
        assert_eq!(result.matched, 3);
        assert!(result.matched <= result.total);
        assert!((0.0..=1.0).contains(&result.rate));
    }

    #[test]
    fn test_empty_stream_is_error() {
        let panel = panel(&["1:10.A.C"]);
        let err = calculate(&panel, ok(vec![]), "empty.vcf").unwrap_err();
        assert!(matches!(
            err,
            RediscoveryError::EmptyInput { ref source_label } if source_label == "empty.vcf"
        ));
    }

    #[test]
    fn test_records_without_alternates_is_error() {
        let panel = panel(&["1:10.A.C"]);
        let records = ok(vec![record("chr1", 10, "A", &[])]);
        let err = calculate(&panel, records, "refonly.vcf").unwrap_err();
        assert!(matches!(err, RediscoveryError::EmptyInput { .. }));
    }

    #[test]
    fn test_stream_error_is_source_unavailable() {
        let panel = panel(&["1:10.A.C"]);
        let records = vec![
            Ok(record("chr1", 10, "A", &["C"])),
            Err(ParseError::InvalidRecord("bad line".to_string())),
        ];
        let err = calculate(&panel, records, "broken.vcf").unwrap_err();
        assert!(matches!(err, RediscoveryError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_trailing_blank_line_still_has_rate() {
        use crate::parsing::vcf::VcfRecords;

        let vcf = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
                   1\t100\t.\tA\tG\t.\t.\t.\n\n";
        let records = VcfRecords::from_reader(vcf.as_bytes()).unwrap();

        let result = calculate(&panel(&["1:100.A.G"]), records, "x").unwrap();
        assert_eq!((result.matched, result.total), (1, 1));
    }

    #[test]
    fn test_panel_is_reusable() {
        let panel = panel(&["1:10.A.C"]);
        let first = calculate(&panel, ok(vec![record("chr1", 10, "A", &["C"])]), "a.vcf").unwrap();
        let second = calculate(&panel, ok(vec![record("chr1", 10, "A", &["C"])]), "a.vcf").unwrap();
        assert_eq!(first, second);
        assert_eq!(panel.len(), 1);
    }

    #[test]
    fn test_calculate_file_missing() {
        let panel = panel(&[]);
        let err = calculate_file(&panel, Path::new("/nonexistent/dir/calls.vcf")).unwrap_err();
        match err {
            RediscoveryError::SourceUnavailable { source_label, .. } => {
                assert_eq!(source_label, "calls.vcf");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_counts_rate() {
        assert_eq!(RediscoveryCounts::default().rate(), None);
        let counts = RediscoveryCounts { matched: 1, total: 4 };
        assert_eq!(counts.rate(), Some(0.25));
    }
}

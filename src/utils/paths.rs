//! Path helpers shared by the parsers and the tool stages.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Label for a source file in reports: its base name, directories stripped.
#[must_use]
pub fn source_label(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Stage label derived from an input file: its base name without a
/// compression suffix and without its data-file extension.
///
/// `/data/cges.vcf.gz` -> `cges`, `tmp/atlas.ped` -> `atlas`
#[must_use]
pub fn stem_label(path: &Path) -> String {
    let name = source_label(path);
    let lower = name.to_ascii_lowercase();
    let mut end = name.len();
    for suffix in [".gz", ".bgz"] {
        if lower[..end].ends_with(suffix) {
            end -= suffix.len();
            break;
        }
    }
    for suffix in [".vcf", ".ped", ".map"] {
        if lower[..end].ends_with(suffix) {
            end -= suffix.len();
            break;
        }
    }
    if end == 0 {
        return name;
    }
    name[..end].to_string()
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Check if the path is a gzip-compressed VCF (vcftools needs `--gzvcf` for these)
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
#[must_use]
pub fn is_gzipped_vcf(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".vcf.gz") || path_str.ends_with(".vcf.bgz")
}

/// Append a suffix to an output prefix: `tmp/cges` + `.ped` -> `tmp/cges.ped`.
///
/// Unlike [`Path::with_extension`] this never replaces an existing extension,
/// matching how vcftools and plink derive file names from `--out`.
#[must_use]
pub fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

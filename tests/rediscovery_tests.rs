//! Rediscovery through the library API with on-disk panels and call sets

use std::fs::File;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

use variant_qc::panel::builder::PanelBuilder;
use variant_qc::{calculate_file, CanonicalKey, RediscoveryError, ReferenceVariantSet};

const VCF: &str = "##fileformat=VCFv4.2\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
chr2\t500\trs1\tT\tC\t50\tPASS\t.\n\
2\t600\t.\tAC\tA\t50\tPASS\t.\n\
2\t700\t.\tG\tA,C\t50\tPASS\t.\n";

#[test]
fn test_gzipped_call_set_against_saved_panel() {
    let dir = TempDir::new().unwrap();

    let mut builder = PanelBuilder::new("evs");
    builder
        .add_keys_from_reader("2:500.T.C\n2:600.A.AC\n".as_bytes())
        .unwrap();
    let snapshot = dir.path().join("evs.bin");
    builder.build().save_to_file(&snapshot).unwrap();

    let vcf = dir.path().join("gatk.vcf.gz");
    let mut encoder = GzEncoder::new(File::create(&vcf).unwrap(), Compression::default());
    encoder.write_all(VCF.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let panel = ReferenceVariantSet::load_from_file(&snapshot).unwrap();
    let result = calculate_file(&panel, &vcf).unwrap();

    // 2:500 forward match, 2:600 reverse-orientation match, both 2:700 alleles miss
    assert_eq!(result.source_label, "gatk.vcf.gz");
    assert_eq!((result.matched, result.total), (2, 4));
    assert!((result.rate - 0.5).abs() < f64::EPSILON);
    assert_eq!(result.to_tsv_line(), "gatk.vcf.gz\t0.5");
}

#[test]
fn test_empty_panel_gives_zero_rate() {
    let dir = TempDir::new().unwrap();
    let vcf = dir.path().join("atlas.vcf");
    std::fs::write(&vcf, VCF).unwrap();

    let panel = ReferenceVariantSet::new("empty");
    let result = calculate_file(&panel, &vcf).unwrap();
    assert_eq!(result.matched, 0);
    assert_eq!(result.to_tsv_line(), "atlas.vcf\t0.0");
}

#[test]
fn test_panel_is_reusable_across_call_sets() {
    let dir = TempDir::new().unwrap();
    let panel = ReferenceVariantSet::from_keys(
        "1kg",
        ["2:700.G.A", "2:700.G.C"].map(CanonicalKey::from_normalized),
    );

    let first = dir.path().join("first.vcf");
    let second = dir.path().join("second.vcf");
    std::fs::write(&first, VCF).unwrap();
    std::fs::write(
        &second,
        "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n",
    )
    .unwrap();

    assert_eq!(calculate_file(&panel, &first).unwrap().matched, 2);
    assert!(matches!(
        calculate_file(&panel, &second),
        Err(RediscoveryError::EmptyInput { source_label }) if source_label == "second.vcf"
    ));
    assert_eq!(panel.len(), 2);
}

//! vcftools stages: PLINK recode, Ts/Tv summary and heterozygosity.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::parsing::vcf::count_records;
use crate::pedigree::recode::recode_ped_file;
use crate::pedigree::Pedigree;
use crate::tools::stage::{out_args, KeptOutput, Stage};
use crate::tools::{move_file, CommandRunner, Invocation, ToolError, ToolPaths};
use crate::utils::paths::{is_gzipped_vcf, with_suffix};

/// Input flag for a VCF path: vcftools reads compressed files only with `--gzvcf`
#[must_use]
pub fn vcf_input_flag(vcf: &Path) -> &'static str {
    if is_gzipped_vcf(vcf) {
        "--gzvcf"
    } else {
        "--vcf"
    }
}

fn vcftools(tools: &ToolPaths, vcf: &Path) -> Invocation {
    Invocation::new(&tools.vcftools).args([OsStr::new(vcf_input_flag(vcf)), vcf.as_os_str()])
}

/// PLINK `.ped`/`.map` pair produced from a VCF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlinkFiles {
    pub ped: PathBuf,
    pub map: PathBuf,
}

/// Where the recode stage should leave its ped/map pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlinkDestinations {
    pub ped: PathBuf,
    pub map: PathBuf,
}

pub fn plink_recode_stage(tools: &ToolPaths, vcf: &Path, prefix: &Path) -> Stage {
    Stage {
        name: "plink-recode",
        invocation: vcftools(tools, vcf)
            .args(["--plink", "--recode"])
            .args(out_args(prefix)),
        prefix: prefix.to_path_buf(),
        discard: &[".recode.vcf"],
        keep: vec![KeptOutput::at_prefix(".ped"), KeptOutput::at_prefix(".map")],
    }
}

/// Convert a VCF into PLINK files, optionally re-coding the ped file with
/// pedigree information and moving the pair to final destinations.
///
/// # Errors
///
/// Returns a `ToolError` if vcftools fails, its outputs are missing, or the
/// pedigree cannot be applied.
pub fn plink_recode(
    runner: &dyn CommandRunner,
    tools: &ToolPaths,
    vcf: &Path,
    prefix: &Path,
    pedigree: Option<&Pedigree>,
    destinations: Option<&PlinkDestinations>,
) -> Result<PlinkFiles, ToolError> {
    let produced = plink_recode_stage(tools, vcf, prefix).execute(runner)?;
    let mut files = PlinkFiles {
        ped: produced[0].clone(),
        map: produced[1].clone(),
    };

    if let Some(pedigree) = pedigree {
        let recoded = with_suffix(prefix, ".pedigree.ped");
        let summary = recode_ped_file(&files.ped, &recoded, pedigree)?;
        move_file(&recoded, &files.ped)?;
        info!(
            ped = %files.ped.display(),
            individuals = summary.lines,
            updated = summary.updated,
            "Applied pedigree"
        );
    }

    if let Some(destinations) = destinations {
        move_file(&files.ped, &destinations.ped)?;
        move_file(&files.map, &destinations.map)?;
        files = PlinkFiles {
            ped: destinations.ped.clone(),
            map: destinations.map.clone(),
        };
    }

    Ok(files)
}

pub fn tstv_stage(
    tools: &ToolPaths,
    vcf: &Path,
    prefix: &Path,
    variant_count: u64,
    output: &Path,
) -> Stage {
    Stage {
        name: "tstv",
        invocation: vcftools(tools, vcf)
            .arg("--TsTv")
            .arg(variant_count.to_string())
            .args(out_args(prefix)),
        prefix: prefix.to_path_buf(),
        discard: &[".log", ".TsTv"],
        keep: vec![KeptOutput::moved_to(".TsTv.summary", output)],
    }
}

/// Ts/Tv summary of a VCF; the bin size passed to `--TsTv` is the record count
///
/// # Errors
///
/// Returns a `ToolError` if the VCF cannot be read or vcftools fails.
pub fn tstv(
    runner: &dyn CommandRunner,
    tools: &ToolPaths,
    vcf: &Path,
    prefix: &Path,
    output: &Path,
) -> Result<PathBuf, ToolError> {
    let variant_count = count_records(vcf)?;
    info!(vcf = %vcf.display(), records = variant_count, "Counted variants");

    let mut paths = tstv_stage(tools, vcf, prefix, variant_count, output).execute(runner)?;
    Ok(paths.remove(0))
}

pub fn het_stage(tools: &ToolPaths, vcf: &Path, prefix: &Path, output: &Path) -> Stage {
    Stage {
        name: "het",
        invocation: vcftools(tools, vcf).arg("--het").args(out_args(prefix)),
        prefix: prefix.to_path_buf(),
        discard: &[".log"],
        keep: vec![KeptOutput::moved_to(".het", output)],
    }
}

/// Per-sample heterozygosity of a VCF
///
/// # Errors
///
/// Returns a `ToolError` if vcftools fails or its output is missing.
pub fn het(
    runner: &dyn CommandRunner,
    tools: &ToolPaths,
    vcf: &Path,
    prefix: &Path,
    output: &Path,
) -> Result<PathBuf, ToolError> {
    let mut paths = het_stage(tools, vcf, prefix, output).execute(runner)?;
    Ok(paths.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::pedigree::parse_pedigree_reader;
    use crate::tools::testing::FakeRunner;
    use std::ffi::OsString;

    fn args(invocation: &Invocation) -> Vec<String> {
        invocation
            .args
            .iter()
            .map(|a: &OsString| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_gzvcf_flag() {
        let tools = ToolPaths::default();
        let plain = plink_recode_stage(&tools, Path::new("a.vcf"), Path::new("/t/a"));
        let gz = plink_recode_stage(&tools, Path::new("a.vcf.gz"), Path::new("/t/a"));

        assert_eq!(
            args(&plain.invocation),
            ["--vcf", "a.vcf", "--plink", "--recode", "--out", "/t/a"]
        );
        assert_eq!(args(&gz.invocation)[0], "--gzvcf");
        assert_eq!(gz.invocation.program, PathBuf::from("vcftools"));
    }

    #[test]
    fn test_tstv_stage_args() {
        let tools = ToolPaths::default();
        let stage = tstv_stage(&tools, Path::new("a.vcf"), Path::new("/t/a"), 42, Path::new("o"));
        assert_eq!(
            args(&stage.invocation),
            ["--vcf", "a.vcf", "--TsTv", "42", "--out", "/t/a"]
        );
    }

    #[test]
    fn test_plink_recode_with_pedigree_and_destinations() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("cges");
        let runner = FakeRunner::producing(&[".ped", ".map", ".recode.vcf", ".log"])
            .with_contents(".ped", "P003\tP003\t0\t0\t0\t-9\tA\tG\n");
        let pedigree = Pedigree::from_entries(
            parse_pedigree_reader("FAM01,P003,P001,P002,2\n".as_bytes()).unwrap(),
        );
        let destinations = PlinkDestinations {
            ped: dir.path().join("final.ped"),
            map: dir.path().join("final.map"),
        };

        let files = plink_recode(
            &runner,
            &ToolPaths::default(),
            Path::new("c.vcf"),
            &prefix,
            Some(&pedigree),
            Some(&destinations),
        )
        .unwrap();

        assert_eq!(files.ped, destinations.ped);
        assert_eq!(files.map, destinations.map);
        assert_eq!(
            std::fs::read_to_string(&files.ped).unwrap(),
            "FAM01\tP003\tP001\tP002\t2\t2\tA\tG\n"
        );
        assert!(files.map.exists());
        assert!(!with_suffix(&prefix, ".recode.vcf").exists());
        assert!(!with_suffix(&prefix, ".pedigree.ped").exists());
        assert!(!with_suffix(&prefix, ".ped").exists());
    }

    #[test]
    fn test_plink_recode_without_pedigree_keeps_prefix_files() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("atlas");
        let runner = FakeRunner::producing(&[".ped", ".map"]);

        let files = plink_recode(
            &runner,
            &ToolPaths::default(),
            Path::new("atlas.vcf"),
            &prefix,
            None,
            None,
        )
        .unwrap();

        assert_eq!(files.ped, with_suffix(&prefix, ".ped"));
        assert_eq!(files.map, with_suffix(&prefix, ".map"));
        assert!(files.ped.exists());
    }

    #[test]
    fn test_tstv_counts_records() {
        let dir = tempfile::tempdir().unwrap();
        let vcf = dir.path().join("calls.vcf");
        std::fs::write(
            &vcf,
            "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
             1\t10\t.\tA\tG\t.\t.\t.\n1\t20\t.\tC\tT\t.\t.\t.\n",
        )
        .unwrap();
        let output = dir.path().join("tstv.txt");
        let runner = FakeRunner::producing(&[".TsTv.summary", ".TsTv", ".log"]);

        let path = tstv(
            &runner,
            &ToolPaths::default(),
            &vcf,
            &dir.path().join("calls"),
            &output,
        )
        .unwrap();

        assert_eq!(path, output);
        assert!(output.exists());
        let calls = runner.calls.borrow();
        assert_eq!(args(&calls[0])[3], "2");
    }

    #[test]
    fn test_het_moves_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("het.txt");
        let runner = FakeRunner::producing(&[".het", ".log"]);

        het(
            &runner,
            &ToolPaths::default(),
            Path::new("calls.vcf.gz"),
            &dir.path().join("calls"),
            &output,
        )
        .unwrap();

        assert!(output.exists());
        assert!(!dir.path().join("calls.log").exists());
        assert_eq!(args(&runner.calls.borrow()[0])[0], "--gzvcf");
    }
}

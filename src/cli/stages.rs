//! Subcommands wrapping one vcftools or plink stage each.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::pedigree::Pedigree;
use crate::tools::plink::{self, MendelOutputs, PlinkAnalysis};
use crate::tools::vcftools::{self, PlinkDestinations, PlinkFiles};
use crate::tools::workdir::WorkDir;
use crate::tools::{SystemRunner, ToolPaths};
use crate::utils::paths::stem_label;

#[derive(Args)]
pub struct PlinkRecodeArgs {
    /// Input VCF (plain or gzipped)
    #[arg(long, required = true)]
    pub vcf: PathBuf,

    /// Pedigree sheet applied to the generated ped file
    #[arg(long)]
    pub pedigree: Option<PathBuf>,

    /// Directory holding the ped/map pair; required unless --ped-out and
    /// --map-out are given
    #[arg(long, required_unless_present_all = ["ped_out", "map_out"])]
    pub temp_dir: Option<PathBuf>,

    /// Output prefix name inside the temp directory (defaults to the VCF name)
    #[arg(long)]
    pub label: Option<String>,

    /// Final location of the ped file
    #[arg(long, requires = "map_out")]
    pub ped_out: Option<PathBuf>,

    /// Final location of the map file
    #[arg(long, requires = "ped_out")]
    pub map_out: Option<PathBuf>,
}

#[derive(Args)]
pub struct MendelArgs {
    /// PLINK ped file
    #[arg(long, required = true)]
    pub ped: PathBuf,

    /// PLINK map file
    #[arg(long, required = true)]
    pub map: PathBuf,

    /// Directory holding the Mendel tables; required unless --trio-out and
    /// --locus-out are given
    #[arg(long, required_unless_present_all = ["trio_out", "locus_out"])]
    pub temp_dir: Option<PathBuf>,

    /// Output prefix name inside the temp directory (defaults to the ped name)
    #[arg(long)]
    pub label: Option<String>,

    /// Destination of the per-trio table (`.fmendel`)
    #[arg(long, requires = "locus_out")]
    pub trio_out: Option<PathBuf>,

    /// Destination of the per-locus table (`.lmendel`)
    #[arg(long, requires = "trio_out")]
    pub locus_out: Option<PathBuf>,
}

#[derive(Args)]
pub struct VcfStageArgs {
    /// Input VCF (plain or gzipped)
    #[arg(long, required = true)]
    pub vcf: PathBuf,

    /// Output file
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Directory for intermediate files (a temporary one if omitted)
    #[arg(long)]
    pub temp_dir: Option<PathBuf>,

    /// Output prefix name inside the temp directory (defaults to the VCF name)
    #[arg(long)]
    pub label: Option<String>,
}

#[derive(Args)]
pub struct PlinkStageArgs {
    /// PLINK ped file
    #[arg(long, required = true)]
    pub ped: PathBuf,

    /// PLINK map file
    #[arg(long, required = true)]
    pub map: PathBuf,

    /// Output file
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Directory for intermediate files (a temporary one if omitted)
    #[arg(long)]
    pub temp_dir: Option<PathBuf>,

    /// Output prefix name inside the temp directory (defaults to the ped name)
    #[arg(long)]
    pub label: Option<String>,
}

/// vcftools analyses sharing [`VcfStageArgs`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcfAnalysis {
    Tstv,
    Het,
}

fn prefix_for(
    temp_dir: Option<&Path>,
    label: Option<&str>,
    input: &Path,
) -> anyhow::Result<(WorkDir, PathBuf)> {
    let workdir = WorkDir::new(temp_dir)?;
    let label = label.map_or_else(|| stem_label(input), str::to_string);
    let prefix = workdir.prefix(&label)?;
    Ok((workdir, prefix))
}

/// Execute plink-recode subcommand
///
/// # Errors
///
/// Returns an error if the pedigree cannot be loaded or the stage fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_plink_recode(
    args: PlinkRecodeArgs,
    tools: &ToolPaths,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let pedigree = args
        .pedigree
        .as_deref()
        .map(Pedigree::load)
        .transpose()
        .context("Failed to load pedigree")?;
    let destinations = match (&args.ped_out, &args.map_out) {
        (Some(ped), Some(map)) => Some(PlinkDestinations {
            ped: ped.clone(),
            map: map.clone(),
        }),
        _ => None,
    };

    let (_workdir, prefix) =
        prefix_for(args.temp_dir.as_deref(), args.label.as_deref(), &args.vcf)?;
    let files = vcftools::plink_recode(
        &SystemRunner,
        tools,
        &args.vcf,
        &prefix,
        pedigree.as_ref(),
        destinations.as_ref(),
    )
    .with_context(|| format!("PLINK recode of {} failed", args.vcf.display()))?;

    print_outputs(format, "plink-recode", &[files.ped.as_path(), files.map.as_path()])
}

/// Execute mendel subcommand
///
/// # Errors
///
/// Returns an error if plink fails or its outputs are missing.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_mendel(
    args: MendelArgs,
    tools: &ToolPaths,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let files = PlinkFiles {
        ped: args.ped.clone(),
        map: args.map.clone(),
    };
    let outputs = match (&args.trio_out, &args.locus_out) {
        (Some(trio), Some(locus)) => Some(MendelOutputs {
            trio: trio.clone(),
            locus: locus.clone(),
        }),
        _ => None,
    };

    let (_workdir, prefix) =
        prefix_for(args.temp_dir.as_deref(), args.label.as_deref(), &args.ped)?;
    let result = plink::mendel(&SystemRunner, tools, &files, &prefix, outputs.as_ref())
        .with_context(|| format!("Mendel analysis of {} failed", args.ped.display()))?;

    print_outputs(format, "mendel", &[result.trio.as_path(), result.locus.as_path()])
}

/// Execute tstv or het subcommand
///
/// # Errors
///
/// Returns an error if vcftools fails or its output is missing.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_vcf_stage(
    analysis: VcfAnalysis,
    args: VcfStageArgs,
    tools: &ToolPaths,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (_workdir, prefix) =
        prefix_for(args.temp_dir.as_deref(), args.label.as_deref(), &args.vcf)?;

    let (name, result) = match analysis {
        VcfAnalysis::Tstv => (
            "tstv",
            vcftools::tstv(&SystemRunner, tools, &args.vcf, &prefix, &args.output),
        ),
        VcfAnalysis::Het => (
            "het",
            vcftools::het(&SystemRunner, tools, &args.vcf, &prefix, &args.output),
        ),
    };
    let output =
        result.with_context(|| format!("{name} stage on {} failed", args.vcf.display()))?;

    print_outputs(format, name, &[output.as_path()])
}

/// Execute maf, missing or hardy subcommand
///
/// # Errors
///
/// Returns an error if plink fails or its output is missing.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_plink_stage(
    analysis: PlinkAnalysis,
    args: PlinkStageArgs,
    tools: &ToolPaths,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let files = PlinkFiles {
        ped: args.ped.clone(),
        map: args.map.clone(),
    };

    let (_workdir, prefix) =
        prefix_for(args.temp_dir.as_deref(), args.label.as_deref(), &args.ped)?;
    let output =
        plink::run_analysis(&SystemRunner, tools, analysis, &files, &prefix, &args.output)
            .with_context(|| format!("{analysis:?} analysis of {} failed", args.ped.display()))?;

    print_outputs(format, &format!("{analysis:?}").to_lowercase(), &[output.as_path()])
}

fn print_outputs(format: OutputFormat, stage: &str, outputs: &[&Path]) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let outputs: Vec<String> = outputs.iter().map(|p| p.display().to_string()).collect();
            let json = serde_json::json!({
                "stage": stage,
                "outputs": outputs,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Tsv => {
            for output in outputs {
                println!("{stage}\t{}", output.display());
            }
        }
        OutputFormat::Text => {
            for output in outputs {
                println!("{stage}: wrote {}", output.display());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::error::ErrorKind;
    use clap::Parser;

    #[test]
    fn test_plink_recode_needs_somewhere_to_keep_outputs() {
        let err = Cli::try_parse_from(["variant-qc", "plink-recode", "--vcf", "c.vcf"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from([
            "variant-qc",
            "plink-recode",
            "--vcf",
            "c.vcf",
            "--ped-out",
            "c.ped",
            "--map-out",
            "c.map",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::PlinkRecode(args) if args.temp_dir.is_none()));

        let cli = Cli::try_parse_from([
            "variant-qc",
            "plink-recode",
            "--vcf",
            "c.vcf",
            "--temp-dir",
            "tmp",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::PlinkRecode(_)));
    }

    #[test]
    fn test_mendel_needs_somewhere_to_keep_outputs() {
        let err = Cli::try_parse_from(["variant-qc", "mendel", "--ped", "a.ped", "--map", "a.map"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from([
            "variant-qc",
            "mendel",
            "--ped",
            "a.ped",
            "--map",
            "a.map",
            "--trio-out",
            "a.fmendel",
            "--locus-out",
            "a.lmendel",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Mendel(args) if args.temp_dir.is_none()));
    }

    #[test]
    fn test_prefix_defaults_to_input_stem() {
        let dir = tempfile::tempdir().unwrap();
        let (_workdir, prefix) =
            prefix_for(Some(dir.path()), None, Path::new("/data/cges.vcf.gz")).unwrap();
        assert_eq!(prefix, dir.path().join("cges"));
    }

    #[test]
    fn test_prefix_uses_explicit_label() {
        let dir = tempfile::tempdir().unwrap();
        let (_workdir, prefix) =
            prefix_for(Some(dir.path()), Some("atlas"), Path::new("calls.vcf")).unwrap();
        assert_eq!(prefix, dir.path().join("atlas"));
    }

    #[test]
    fn test_prefix_rejects_bad_label() {
        assert!(prefix_for(None, Some("a/b"), Path::new("calls.vcf")).is_err());
    }
}

//! plink stages over a `.ped`/`.map` pair: Mendel errors, allele frequency,
//! missingness and Hardy-Weinberg.

use std::path::{Path, PathBuf};

use crate::tools::stage::{out_args, KeptOutput, Stage};
use crate::tools::vcftools::PlinkFiles;
use crate::tools::{CommandRunner, Invocation, ToolError, ToolPaths};

/// plink analyses that produce a single kept output
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PlinkAnalysis {
    /// Minor allele frequency (`--freq`)
    Maf,
    /// Per-locus missingness (`--missing`)
    Missing,
    /// Hardy-Weinberg equilibrium (`--hardy`)
    Hardy,
}

impl PlinkAnalysis {
    fn flag(self) -> &'static str {
        match self {
            Self::Maf => "--freq",
            Self::Missing => "--missing",
            Self::Hardy => "--hardy",
        }
    }

    fn allows_no_sex(self) -> bool {
        matches!(self, Self::Maf)
    }

    fn discard(self) -> &'static [&'static str] {
        match self {
            Self::Maf | Self::Hardy => &[".log", ".nosex"],
            Self::Missing => &[".log", ".nosex", ".imiss"],
        }
    }

    fn output_suffix(self) -> &'static str {
        match self {
            Self::Maf => ".frq",
            Self::Missing => ".lmiss",
            Self::Hardy => ".hwe",
        }
    }

    fn stage_name(self) -> &'static str {
        match self {
            Self::Maf => "maf",
            Self::Missing => "missing",
            Self::Hardy => "hardy",
        }
    }
}

fn plink(tools: &ToolPaths, files: &PlinkFiles) -> Invocation {
    Invocation::new(&tools.plink)
        .arg("--ped")
        .arg(&files.ped)
        .arg("--map")
        .arg(&files.map)
}

pub fn analysis_stage(
    tools: &ToolPaths,
    analysis: PlinkAnalysis,
    files: &PlinkFiles,
    prefix: &Path,
    output: &Path,
) -> Stage {
    let mut invocation = plink(tools, files).arg(analysis.flag());
    if analysis.allows_no_sex() {
        invocation = invocation.arg("--allow-no-sex");
    }

    Stage {
        name: analysis.stage_name(),
        invocation: invocation.args(out_args(prefix)),
        prefix: prefix.to_path_buf(),
        discard: analysis.discard(),
        keep: vec![KeptOutput::moved_to(analysis.output_suffix(), output)],
    }
}

/// Run a single-output plink analysis and move its result to `output`
///
/// # Errors
///
/// Returns a `ToolError` if plink fails or its output is missing.
pub fn run_analysis(
    runner: &dyn CommandRunner,
    tools: &ToolPaths,
    analysis: PlinkAnalysis,
    files: &PlinkFiles,
    prefix: &Path,
    output: &Path,
) -> Result<PathBuf, ToolError> {
    let mut paths = analysis_stage(tools, analysis, files, prefix, output).execute(runner)?;
    Ok(paths.remove(0))
}

/// Destinations of the per-trio and per-locus Mendel error tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MendelOutputs {
    pub trio: PathBuf,
    pub locus: PathBuf,
}

pub fn mendel_stage(
    tools: &ToolPaths,
    files: &PlinkFiles,
    prefix: &Path,
    outputs: Option<&MendelOutputs>,
) -> Stage {
    let keep = match outputs {
        Some(outputs) => vec![
            KeptOutput::moved_to(".fmendel", &outputs.trio),
            KeptOutput::moved_to(".lmendel", &outputs.locus),
        ],
        None => vec![
            KeptOutput::at_prefix(".fmendel"),
            KeptOutput::at_prefix(".lmendel"),
        ],
    };

    Stage {
        name: "mendel",
        invocation: plink(tools, files)
            .args(["--mendel", "--allow-no-sex"])
            .args(out_args(prefix)),
        prefix: prefix.to_path_buf(),
        discard: &[".log", ".imendel", ".nosex"],
        keep,
    }
}

/// Mendelian inconsistencies per trio and per locus
///
/// Without `outputs` the tables stay next to the prefix, where a plotting step
/// can pick them up.
///
/// # Errors
///
/// Returns a `ToolError` if plink fails or its outputs are missing.
pub fn mendel(
    runner: &dyn CommandRunner,
    tools: &ToolPaths,
    files: &PlinkFiles,
    prefix: &Path,
    outputs: Option<&MendelOutputs>,
) -> Result<MendelOutputs, ToolError> {
    let paths = mendel_stage(tools, files, prefix, outputs).execute(runner)?;
    Ok(MendelOutputs {
        trio: paths[0].clone(),
        locus: paths[1].clone(),
    })
}

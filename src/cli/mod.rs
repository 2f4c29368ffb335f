//! Command-line interface for variant-qc.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **rediscovery**: Rediscovery rate of VCFs against a reference panel snapshot
//! - **panel**: Build or inspect reference panel snapshots
//! - **recode-ped**: Re-inject pedigree information into a PLINK ped file
//! - **plink-recode**, **tstv**, **het**: vcftools stages
//! - **mendel**, **maf**, **missing**, **hardy**: plink stages
//!
//! ## Usage
//!
//! ```text
//! # Build a panel snapshot once
//! variant-qc panel build --name evs -i ESP6500SI.snps.vcf.gz -o evs.bin
//!
//! # Rediscovery rates of several call sets
//! variant-qc rediscovery --panel evs.bin -o evs.rediscovery.txt atlas.vcf gatk.vcf
//!
//! # PLINK files with pedigree, then Mendel errors
//! variant-qc plink-recode --vcf cges.vcf --pedigree fam.csv --temp-dir tmp --label cges
//! variant-qc mendel --ped tmp/cges.ped --map tmp/cges.map --temp-dir tmp --label cges \
//!     --trio-out cges.fmendel --locus-out cges.lmendel
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::tools::ToolPaths;

pub mod panel;
pub mod pedigree;
pub mod rediscovery;
pub mod stages;

#[derive(Parser)]
#[command(name = "variant-qc")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Quality-control metrics for VCF call sets")]
#[command(
    long_about = "variant-qc produces QC metrics for variant call sets.\n\nIt computes rediscovery rates against reference panels natively, and wraps vcftools and plink for:\n- Ts/Tv ratio and heterozygosity\n- Mendelian inconsistencies (with pedigree re-coding)\n- Minor allele frequency, missingness and Hardy-Weinberg statistics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// vcftools executable
    #[arg(long, global = true, env = "VARIANT_QC_VCFTOOLS", default_value = "vcftools")]
    pub vcftools: PathBuf,

    /// plink executable
    #[arg(long, global = true, env = "VARIANT_QC_PLINK", default_value = "plink")]
    pub plink: PathBuf,
}

impl Cli {
    /// External tool locations from the command line / environment
    pub fn tool_paths(&self) -> ToolPaths {
        ToolPaths {
            vcftools: self.vcftools.clone(),
            plink: self.plink.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rediscovery rate of VCFs against a reference panel
    Rediscovery(rediscovery::RediscoveryArgs),

    /// Build or inspect reference panel snapshots
    Panel(panel::PanelArgs),

    /// Apply a pedigree sheet to a PLINK ped file
    RecodePed(pedigree::RecodePedArgs),

    /// Convert a VCF to PLINK ped/map files (vcftools)
    PlinkRecode(stages::PlinkRecodeArgs),

    /// Mendelian inconsistencies (plink)
    Mendel(stages::MendelArgs),

    /// Transition/transversion summary (vcftools)
    Tstv(stages::VcfStageArgs),

    /// Per-sample heterozygosity (vcftools)
    Het(stages::VcfStageArgs),

    /// Minor allele frequencies (plink)
    Maf(stages::PlinkStageArgs),

    /// Per-locus missingness (plink)
    Missing(stages::PlinkStageArgs),

    /// Hardy-Weinberg statistics (plink)
    Hardy(stages::PlinkStageArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_tool_paths() {
        let cli = Cli::parse_from([
            "variant-qc",
            "het",
            "--vcf",
            "a.vcf",
            "-o",
            "a.het",
            "--vcftools",
            "/opt/bin/vcftools",
        ]);
        assert_eq!(cli.tool_paths().vcftools, PathBuf::from("/opt/bin/vcftools"));
        assert!(matches!(cli.command, Commands::Het(_)));
    }
}

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::warn;

use crate::cli::OutputFormat;
use crate::pedigree::recode::recode_ped_file;
use crate::pedigree::Pedigree;

#[derive(Args)]
pub struct RecodePedArgs {
    /// PLINK ped file to re-code
    #[arg(long, required = true)]
    pub ped: PathBuf,

    /// Comma-separated pedigree sheet: family,individual,father,mother,sex
    #[arg(long, required = true)]
    pub pedigree: PathBuf,

    /// Re-coded ped file to write
    #[arg(short, long, required = true)]
    pub output: PathBuf,
}

/// Execute recode-ped subcommand
///
/// # Errors
///
/// Returns an error if the pedigree or ped file cannot be read, or the output
/// cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: RecodePedArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let pedigree = Pedigree::load(&args.pedigree)
        .with_context(|| format!("Failed to load pedigree {}", args.pedigree.display()))?;
    if pedigree.is_empty() {
        warn!(
            pedigree = %args.pedigree.display(),
            "Pedigree sheet is empty; only phenotypes change"
        );
    }
    if verbose {
        eprintln!("Loaded pedigree with {} individuals", pedigree.len());
    }

    let summary = recode_ped_file(&args.ped, &args.output, &pedigree)
        .with_context(|| format!("Failed to re-code {}", args.ped.display()))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "output": args.output.display().to_string(),
                "lines": summary.lines,
                "updated": summary.updated,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Tsv => {
            println!("output\tlines\tupdated");
            println!("{}\t{}\t{}", args.output.display(), summary.lines, summary.updated);
        }
        OutputFormat::Text => {
            println!(
                "Re-coded {} individuals ({} from pedigree) into {}",
                summary.lines,
                summary.updated,
                args.output.display()
            );
        }
    }

    Ok(())
}

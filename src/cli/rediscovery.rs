use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::cli::OutputFormat;
use crate::core::types::RediscoveryResult;
use crate::panel::store::ReferenceVariantSet;
use crate::rediscovery::{calculate_file, RediscoveryError};

#[derive(Args)]
pub struct RediscoveryArgs {
    /// VCF files to evaluate (plain or gzipped)
    #[arg(required = true, num_args = 1..)]
    pub vcfs: Vec<PathBuf>,

    /// Reference panel snapshot (see `panel build`)
    #[arg(long, required = true)]
    pub panel: PathBuf,

    /// Report file; one `<vcf name>\t<rate>` line per VCF
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip VCFs without alternate alleles instead of failing
    #[arg(long)]
    pub skip_empty: bool,
}

/// Execute rediscovery subcommand
///
/// # Errors
///
/// Returns an error if the panel cannot be loaded, a VCF cannot be read, or a
/// VCF has no alternate alleles and `--skip-empty` was not given.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: RediscoveryArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let panel = ReferenceVariantSet::load_from_file(&args.panel)
        .with_context(|| format!("Failed to load panel {}", args.panel.display()))?;

    info!(panel = %panel.name(), keys = panel.len(), "Loaded reference panel");
    if verbose {
        eprintln!(
            "Loaded panel '{}' with {} variants (built {})",
            panel.name(),
            panel.len(),
            panel.created_at()
        );
    }
    if panel.is_empty() {
        warn!(panel = %panel.name(), "Reference panel is empty; every rate will be 0");
    }

    let results = evaluate(&panel, &args)?;
    drop(panel);

    if let Some(path) = &args.output {
        write_report(path, &results)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!(report = %path.display(), files = results.len(), "Wrote rediscovery report");
    }

    match format {
        OutputFormat::Text => print_text(&results),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Tsv => {
            if args.output.is_none() {
                for result in &results {
                    println!("{}", result.to_tsv_line());
                }
            }
        }
    }

    Ok(())
}

fn evaluate(
    panel: &ReferenceVariantSet,
    args: &RediscoveryArgs,
) -> anyhow::Result<Vec<RediscoveryResult>> {
    let mut results = Vec::with_capacity(args.vcfs.len());

    for vcf in &args.vcfs {
        match calculate_file(panel, vcf) {
            Ok(result) => results.push(result),
            Err(RediscoveryError::EmptyInput { source_label }) if args.skip_empty => {
                warn!(vcf = %source_label, "No alternate alleles, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(results)
}

fn write_report(path: &std::path::Path, results: &[RediscoveryResult]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for result in results {
        writeln!(writer, "{}", result.to_tsv_line())?;
    }
    writer.flush()
}

fn print_text(results: &[RediscoveryResult]) {
    println!("Rediscovery Rates");
    println!("{}", "=".repeat(60));
    for result in results {
        println!(
            "{}: {:.2}% ({} of {} alternate alleles)",
            result.source_label,
            result.rate * 100.0,
            result.matched,
            result.total
        );
    }
}

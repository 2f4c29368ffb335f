use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};

use crate::cli::OutputFormat;
use crate::panel::builder::{InputFormat, PanelBuilder};
use crate::panel::store::ReferenceVariantSet;

#[derive(Args)]
pub struct PanelArgs {
    #[command(subcommand)]
    pub command: PanelCommands,
}

#[derive(Subcommand)]
pub enum PanelCommands {
    /// Build a reference panel snapshot from panel VCFs or key lists
    Build {
        /// Panel name (e.g., "evs", "1kg")
        #[arg(long, required = true)]
        name: String,

        /// Input file(s) - can be specified multiple times
        #[arg(short, long = "input", required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Input format (detected from the file name if omitted)
        #[arg(long, value_enum)]
        input_format: Option<InputFormat>,

        /// Snapshot file to write (gzipped when it ends in .gz)
        #[arg(short, long, required = true)]
        output: PathBuf,
    },

    /// Show summary information about a snapshot
    Info {
        /// Snapshot file
        #[arg(required = true)]
        snapshot: PathBuf,
    },
}

/// Execute panel subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be read or the snapshot cannot be
/// written or loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: PanelArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        PanelCommands::Build {
            name,
            inputs,
            input_format,
            output,
        } => run_build(name, &inputs, input_format, &output, format, verbose),
        PanelCommands::Info { snapshot } => run_info(&snapshot, format),
    }
}

fn run_build(
    name: String,
    inputs: &[PathBuf],
    input_format: Option<InputFormat>,
    output: &Path,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let mut builder = PanelBuilder::new(name);

    for input in inputs {
        let added = builder
            .add_input(input, input_format)
            .with_context(|| format!("Failed to add panel input {}", input.display()))?;
        if verbose {
            eprintln!("Added {} keys from {}", added, input.display());
        }
    }

    let panel = builder.build();
    panel
        .save_to_file(output)
        .with_context(|| format!("Failed to write snapshot {}", output.display()))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "name": panel.name(),
                "created_at": panel.created_at(),
                "keys": panel.len(),
                "inputs": inputs.len(),
                "output": output.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Tsv => {
            println!("name\tkeys\toutput");
            println!("{}\t{}\t{}", panel.name(), panel.len(), output.display());
        }
        OutputFormat::Text => {
            println!(
                "Wrote panel '{}' with {} variants to {}",
                panel.name(),
                panel.len(),
                output.display()
            );
        }
    }

    Ok(())
}

fn run_info(snapshot: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let panel = ReferenceVariantSet::load_from_file(snapshot)
        .with_context(|| format!("Failed to load snapshot {}", snapshot.display()))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "name": panel.name(),
                "created_at": panel.created_at(),
                "keys": panel.len(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Tsv => {
            println!("name\tcreated_at\tkeys");
            println!("{}\t{}\t{}", panel.name(), panel.created_at(), panel.len());
        }
        OutputFormat::Text => {
            println!("Panel:    {}", panel.name());
            println!("Built:    {}", panel.created_at());
            println!("Variants: {}", panel.len());
        }
    }

    Ok(())
}

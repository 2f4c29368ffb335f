use clap::Parser;
use tracing_subscriber::EnvFilter;

use variant_qc::cli;
use variant_qc::cli::stages::VcfAnalysis;
use variant_qc::tools::plink::PlinkAnalysis;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("variant_qc=debug,info")
    } else {
        EnvFilter::new("variant_qc=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let tools = cli.tool_paths();

    match cli.command {
        cli::Commands::Rediscovery(args) => {
            cli::rediscovery::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Panel(args) => {
            cli::panel::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::RecodePed(args) => {
            cli::pedigree::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::PlinkRecode(args) => {
            cli::stages::run_plink_recode(args, &tools, cli.format)?;
        }
        cli::Commands::Mendel(args) => {
            cli::stages::run_mendel(args, &tools, cli.format)?;
        }
        cli::Commands::Tstv(args) => {
            cli::stages::run_vcf_stage(VcfAnalysis::Tstv, args, &tools, cli.format)?;
        }
        cli::Commands::Het(args) => {
            cli::stages::run_vcf_stage(VcfAnalysis::Het, args, &tools, cli.format)?;
        }
        cli::Commands::Maf(args) => {
            cli::stages::run_plink_stage(PlinkAnalysis::Maf, args, &tools, cli.format)?;
        }
        cli::Commands::Missing(args) => {
            cli::stages::run_plink_stage(PlinkAnalysis::Missing, args, &tools, cli.format)?;
        }
        cli::Commands::Hardy(args) => {
            cli::stages::run_plink_stage(PlinkAnalysis::Hardy, args, &tools, cli.format)?;
        }
    }

    Ok(())
}

//! Rawclip CLI - 8-bit Raw Clip Converter
//!
//! Command-line interface for the Rawclip audio clip pipeline.

use anyhow::{bail, Context};
use clap::Parser;
use env_logger::Env;
use log::info;

use rawclip::cli::commands;
use rawclip::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Rawclip v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Rawclip v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Convert {
            inputs,
            start,
            end,
            duration,
            fade,
            normalize,
            max_span,
            config,
            output_dir,
        } => {
            let options = commands::build_options(
                config.as_deref(),
                duration.as_deref(),
                fade,
                normalize,
                max_span,
            )
            .context("failed to read options")?;

            let outcomes =
                commands::convert(&inputs, start, end, &options, output_dir.as_deref());
            let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

            if outcomes.is_empty() {
                bail!("no audio files found");
            }
            if failed > 0 {
                bail!("{} of {} file(s) failed", failed, outcomes.len());
            }
            Ok(())
        }
        Commands::Inspect {
            input,
            duration,
            width,
        } => commands::inspect(&input, duration.as_deref(), width)
            .map_err(|e| anyhow::anyhow!(e.friendly_message()))
            .with_context(|| format!("failed to inspect {}", input.display())),
    }
}

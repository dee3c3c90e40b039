//! CLI Module
//!
//! Command-line front end for Rawclip.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rawclip - cut audio into 8-bit signed raw PCM clips
#[derive(Parser, Debug)]
#[command(name = "rawclip")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert audio files (or directories of them) into .raw12b clips
    #[command(name = "convert")]
    Convert {
        /// Input audio files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Selection start in seconds
        #[arg(short, long)]
        start: Option<f64>,

        /// Selection end in seconds
        #[arg(short, long)]
        end: Option<f64>,

        /// Total preview duration in seconds (invalid values fall back to 3.0)
        #[arg(short, long)]
        duration: Option<String>,

        /// Apply a 20ms linear fade-in/out
        #[arg(long)]
        fade: bool,

        /// Peak-normalize before quantization
        #[arg(long)]
        normalize: bool,

        /// Cap the selection span, in seconds
        #[arg(long)]
        max_span: Option<f64>,

        /// JSON options file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for the clips (defaults to each input's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Print a JSON summary of the preview built for a file
    #[command(name = "inspect")]
    Inspect {
        /// Input audio file
        input: PathBuf,

        /// Total preview duration in seconds (invalid values fall back to 3.0)
        #[arg(short, long)]
        duration: Option<String>,

        /// Width of the waveform overview, in points
        #[arg(short, long, default_value_t = 64)]
        width: usize,
    },
}

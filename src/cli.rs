//! Command-line interface definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::export::OutputFormat;

/// Exit codes of the `bhashya-reader` binary
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_ARGS: i32 = 2;
    pub const INPUT_NOT_FOUND: i32 = 3;
    pub const CONFIG_ERROR: i32 = 4;
}

/// Reconstructs lines and pages of scanned Sanskrit commentaries from OCR output
#[derive(Debug, Parser)]
#[command(
    name = "bhashya-reader",
    version,
    about,
    after_help = "EXAMPLES:\n  \
                  bhashya-reader reconstruct ocr/gita -o out\n  \
                  bhashya-reader reconstruct ocr/ -o out --format pages\n  \
                  bhashya-reader reconstruct ocr/ --title-phrase \"प्रथमोऽध्यायः\" --dry-run"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconstruct one book directory or every book under a directory
    Reconstruct(ReconstructArgs),
    /// Show version, system and configuration information
    Info,
}

#[derive(Debug, Args)]
pub struct ReconstructArgs {
    /// Book directory of page annotation files, or a directory of books
    pub input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Output format [default: tagged, or the config file value]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Config file (defaults to the search path)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Line break threshold as a fraction of token height
    #[arg(long)]
    pub threshold_factor: Option<f64>,

    /// Lines taller than this are noise
    #[arg(long)]
    pub noise_height: Option<f64>,

    /// Heading phrase marking a line as noise (repeatable)
    #[arg(long = "title-phrase")]
    pub title_phrases: Vec<String>,

    /// Let a line continue across a page boundary
    #[arg(long)]
    pub no_page_reset: bool,

    /// Worker threads for loading annotation files
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Show the execution plan without processing
    #[arg(long)]
    pub dry_run: bool,

    /// Verbosity (-v stages, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

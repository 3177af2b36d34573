//! bhashya-reader - Layout reconstruction for scanned Sanskrit commentaries
//!
//! CLI entry point

use anyhow::{bail, Context, Result};
use bhashya_reader::{
    exit_codes,
    // CLI
    Cli, Commands, ReconstructArgs,
    // Config
    CliOverrides, Config, PipelineConfig,
    // OCR
    AnnotationLoader,
    // Pipeline
    BookPipeline, PipelineError,
    // Progress tracking
    progress::book_progress_bar, OutputMode, ProgressTracker,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Reconstruct(args) => {
            init_tracing(args.verbose, args.quiet);
            run_reconstruct(args)
        }
        Commands::Info => {
            init_tracing(0, false);
            run_info()
        }
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_codes::GENERAL_ERROR
        }
    });
}

/// Log to stderr; `RUST_LOG` wins over the verbosity flags
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ============ Reconstruct Command ============

fn run_reconstruct(args: &ReconstructArgs) -> Result<()> {
    let start_time = Instant::now();

    if !args.input.exists() {
        eprintln!("Error: Input path does not exist: {}", args.input.display());
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    let books = AnnotationLoader::list_book_dirs(&args.input)
        .with_context(|| format!("Failed to scan {}", args.input.display()))?;
    if books.is_empty() {
        eprintln!("Error: No book directories with page annotations found in input path");
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    let file_config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let file_config = match file_config {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {}", e);
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
    };

    // CLI takes precedence over the config file
    let pipeline_config = file_config.merge_with_cli(&create_cli_overrides(args));
    if let Err(e) = pipeline_config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(exit_codes::INVALID_ARGS);
    }

    if args.dry_run {
        print_execution_plan(args, &books, &pipeline_config);
        return Ok(());
    }

    if let Some(threads) = pipeline_config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let pipeline = BookPipeline::new(pipeline_config);
    let mode = OutputMode::from_flags(args.verbose, args.quiet);
    let mut tracker = ProgressTracker::new(books.len(), mode);
    let bar = book_progress_bar(books.len(), mode);

    let mut ok_count = 0usize;
    let mut skip_count = 0usize;
    let mut error_count = 0usize;

    for (idx, book_dir) in books.iter().enumerate() {
        let name = AnnotationLoader::book_id(book_dir);
        tracker.start_book(idx + 1, &name);
        bar.set_message(name.clone());

        match pipeline.process_book_dir(book_dir, &args.output, &tracker) {
            Ok(summary) => {
                ok_count += 1;
                tracker.complete_book();
                if mode.should_show(OutputMode::Verbose) {
                    println!(
                        "    {} lines ({} effective), {} pages, {} moola, {} bhaashya -> {}",
                        summary.lines,
                        summary.effective_lines,
                        summary.pages,
                        summary.moola,
                        summary.bhaashya,
                        summary.output_path.display()
                    );
                }
            }
            Err(PipelineError::EmptyBook(book)) => {
                warn!(book = %book, "skipping book without single-token fragments");
                skip_count += 1;
            }
            Err(e) => {
                bar.suspend(|| eprintln!("Error processing {}: {}", book_dir.display(), e));
                error_count += 1;
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    if !args.quiet {
        ProgressTracker::print_summary(books.len(), ok_count, skip_count, error_count);
        println!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    }

    if error_count > 0 {
        bail!("{} book(s) failed to process", error_count);
    }

    Ok(())
}

// ============ Helper Functions ============

/// Only options given on the command line override the config file
fn create_cli_overrides(args: &ReconstructArgs) -> CliOverrides {
    let mut overrides = CliOverrides::new();

    overrides.threshold_factor = args.threshold_factor;
    overrides.noise_height_threshold = args.noise_height;
    overrides.title_phrases = args.title_phrases.clone();
    if args.no_page_reset {
        overrides.reset_at_page_boundary = Some(false);
    }
    overrides.format = args.format;
    overrides.threads = args.threads;

    overrides
}

/// Print execution plan for dry-run mode
fn print_execution_plan(args: &ReconstructArgs, books: &[PathBuf], config: &PipelineConfig) {
    let pipeline = BookPipeline::new(config.clone());

    println!("=== Dry Run - Execution Plan ===");
    println!();
    println!("Input: {}", args.input.display());
    println!("Output: {}", args.output.display());
    println!("Books to process: {}", books.len());
    println!();
    println!("Pipeline Configuration:");
    println!(
        "  1. Line Building (threshold factor: {}, reset at page boundary: {})",
        config.lines.threshold_factor,
        if config.lines.reset_at_page_boundary { "YES" } else { "NO" }
    );
    println!(
        "  2. Noise Filter (height > {}, title phrases: {})",
        config.filter.noise_height_threshold,
        config.filter.title_phrases.len()
    );
    println!(
        "  3. Classification (terminator: {}, page-aware lookahead: {})",
        config.classifier.verse_terminator,
        if config.classifier.page_aware_lookahead { "YES" } else { "NO" }
    );
    println!("  4. Output ({})", config.format.name());
    println!();
    println!("Processing Options:");
    println!("  Threads: {}", config.threads.unwrap_or_else(num_cpus::get));
    println!("  Verbose: {}", args.verbose);
    println!();
    println!("Effective settings: {}", config.to_json());
    println!();
    println!("Books:");
    for (i, book) in books.iter().enumerate() {
        println!(
            "  {}. {} -> {}",
            i + 1,
            book.display(),
            pipeline.output_path(book, &args.output).display()
        );
    }
}

// ============ Info Command ============

fn run_info() -> Result<()> {
    println!("bhashya-reader v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("System Information:");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Arch: {}", std::env::consts::ARCH);
    println!("  CPUs: {}", num_cpus::get());

    println!();
    println!("Config File Locations:");
    for path in Config::search_paths() {
        let status = if path.is_file() { "found" } else { "not found" };
        println!("  {} ({})", path.display(), status);
    }

    println!();
    println!("Default Settings:");
    let defaults = Config::default()
        .to_toml()
        .context("Failed to render default settings")?;
    for line in defaults.lines() {
        println!("  {}", line);
    }

    Ok(())
}

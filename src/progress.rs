//! Progress tracking for book reconstruction.
//!
//! Stage display on stdout and an indicatif bar over the books of a run.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::cell::Cell;
use std::fmt;
use std::time::Instant;

use crate::pipeline::ProgressCallback;

/// Processing stages of one book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingStage {
    #[default]
    Initializing,
    /// Reading OCR annotation files
    Loading,
    /// Splitting fragments into tokens
    Tokenizing,
    /// Clustering tokens into lines
    BuildingLines,
    /// Dropping noise lines
    Filtering,
    /// Tagging root verse and commentary lines
    Classifying,
    /// Grouping lines into pages
    BuildingPages,
    /// Writing the output file
    Writing,
    Completed,
}

impl ProcessingStage {
    pub fn name(&self) -> &'static str {
        match self {
            ProcessingStage::Initializing => "Initializing",
            ProcessingStage::Loading => "Loading",
            ProcessingStage::Tokenizing => "Tokenizing",
            ProcessingStage::BuildingLines => "BuildingLines",
            ProcessingStage::Filtering => "Filtering",
            ProcessingStage::Classifying => "Classifying",
            ProcessingStage::BuildingPages => "BuildingPages",
            ProcessingStage::Writing => "Writing",
            ProcessingStage::Completed => "Completed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProcessingStage::Initializing => "preparing",
            ProcessingStage::Loading => "reading OCR annotations",
            ProcessingStage::Tokenizing => "splitting fragments into tokens",
            ProcessingStage::BuildingLines => "clustering tokens into lines",
            ProcessingStage::Filtering => "dropping noise lines",
            ProcessingStage::Classifying => "tagging verse and commentary",
            ProcessingStage::BuildingPages => "grouping lines into pages",
            ProcessingStage::Writing => "writing output",
            ProcessingStage::Completed => "done",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.description())
    }
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// No output
    Quiet,
    /// Progress bar and summary
    #[default]
    Normal,
    /// Stage display per book
    Verbose,
    /// Debug messages as well
    VeryVerbose,
}

impl OutputMode {
    /// Mode for `-v` count and `-q`
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            OutputMode::Quiet
        } else {
            Self::from_verbosity(verbose)
        }
    }

    pub fn from_verbosity(level: u8) -> Self {
        match level {
            0 => OutputMode::Normal,
            1 => OutputMode::Verbose,
            _ => OutputMode::VeryVerbose,
        }
    }

    /// Check if output should be shown at this mode
    pub fn should_show(&self, required: OutputMode) -> bool {
        use OutputMode::*;
        match (self, required) {
            (Quiet, _) => false,
            (Normal, Quiet | Normal) => true,
            (Verbose, Quiet | Normal | Verbose) => true,
            (VeryVerbose, _) => true,
            _ => false,
        }
    }
}

/// indicatif bar over the books of a run, hidden unless in normal mode
pub fn book_progress_bar(total_books: usize, mode: OutputMode) -> ProgressBar {
    let bar = ProgressBar::new(total_books as u64);
    if mode != OutputMode::Normal {
        bar.set_draw_target(ProgressDrawTarget::hidden());
        return bar;
    }
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg} ({elapsed})")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

/// Progress tracker over the books of a run
#[derive(Debug)]
pub struct ProgressTracker {
    /// Current book number (1-based)
    pub current_book: usize,
    pub total_books: usize,
    pub current_name: String,
    current_stage: Cell<ProcessingStage>,
    start_time: Instant,
    output_mode: OutputMode,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(1, OutputMode::Normal)
    }
}

impl ProgressTracker {
    pub fn new(total_books: usize, output_mode: OutputMode) -> Self {
        Self {
            current_book: 0,
            total_books,
            current_name: String::new(),
            current_stage: Cell::new(ProcessingStage::Initializing),
            start_time: Instant::now(),
            output_mode,
        }
    }

    /// Start processing a new book
    pub fn start_book(&mut self, book_number: usize, name: &str) {
        self.current_book = book_number;
        self.current_name = name.to_string();
        self.current_stage.set(ProcessingStage::Initializing);
        self.start_time = Instant::now();

        if self.output_mode.should_show(OutputMode::Verbose) {
            self.print_book_header();
        }
    }

    /// Mark the current book as complete
    pub fn complete_book(&mut self) {
        self.current_stage.set(ProcessingStage::Completed);

        if self.output_mode.should_show(OutputMode::Verbose) {
            println!("  Completed in {:.2}s", self.elapsed_secs());
        }
    }

    pub fn current_stage(&self) -> ProcessingStage {
        self.current_stage.get()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// `[Book i/n] name`
    pub fn book_label(&self) -> String {
        format!(
            "[Book {}/{}] {}",
            self.current_book, self.total_books, self.current_name
        )
    }

    fn print_book_header(&self) {
        println!();
        println!("{}", "=".repeat(80));
        println!("{}", self.book_label());
        println!("{}", "=".repeat(80));
    }

    /// Print final summary
    pub fn print_summary(
        total_books: usize,
        ok_count: usize,
        skip_count: usize,
        error_count: usize,
    ) {
        println!();
        println!("{}", "=".repeat(80));
        println!("Processing Summary");
        println!("{}", "=".repeat(80));
        println!("  Total books:  {}", total_books);
        println!("  Succeeded:    {}", ok_count);
        println!("  Skipped:      {}", skip_count);
        println!("  Errors:       {}", error_count);
        println!("{}", "=".repeat(80));
        println!();
    }
}

/// Stage notifications of the running book
impl ProgressCallback for ProgressTracker {
    fn on_step_start(&self, stage: ProcessingStage) {
        self.current_stage.set(stage);
        if self.output_mode.should_show(OutputMode::Verbose) {
            println!("  Stage: {}", stage);
        }
    }

    fn on_step_complete(&self, stage: ProcessingStage, message: &str) {
        if self.output_mode.should_show(OutputMode::Verbose) {
            println!("    {}: {}", stage.name(), message);
        }
    }

    fn on_debug(&self, message: &str) {
        if self.output_mode.should_show(OutputMode::VeryVerbose) {
            println!("    [DEBUG] {}", message);
        }
    }
}

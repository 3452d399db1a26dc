//! Command-line interface module for dirdump.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing for both binaries
//! - Merging command-line overrides into the loaded configuration
//! - Running the tree printer and the file merger
//! - Reporting results on the console

use crate::config::{DirdumpConfig, MergeSettings, TreeSettings};
use crate::error::Result;
use crate::file_merger::{FileMerger, MergeReport};
use crate::output::OutputFormatter;
use crate::tree_printer::{EntryOrder, TreePrinter, TreeReport};
use clap::Parser;
use std::path::PathBuf;

/// Arguments for `dirdump-tree`.
///
/// Every flag is optional; without flags the configured (or default) settings
/// are used as they are.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "dirdump-tree",
    version,
    about = "Write an indented tree of a directory's structure to a text file"
)]
pub struct TreeArgs {
    /// Configuration file (defaults to .dirdumprc.toml, then ~/.config/dirdump/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory to render
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path prefix to skip; replaces the configured list (repeatable)
    #[arg(short, long = "ignore", value_name = "PREFIX")]
    pub ignore: Vec<String>,

    /// Sort entries by name instead of directory listing order
    #[arg(long)]
    pub sorted: bool,
}

impl TreeArgs {
    /// Loads the configuration and applies the command-line overrides.
    pub fn resolve(&self) -> Result<TreeSettings> {
        let mut settings = DirdumpConfig::load(self.config.as_deref())?.tree;
        if let Some(root) = &self.root {
            settings.root_dir = root.clone();
        }
        if let Some(output) = &self.output {
            settings.output_file = output.clone();
        }
        if !self.ignore.is_empty() {
            settings.ignored_paths = self.ignore.clone();
        }
        if self.sorted {
            settings.sort_entries = true;
        }
        Ok(settings)
    }
}

/// Arguments for `dirdump-merge`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "dirdump-merge",
    version,
    about = "Merge the text of a project's files into a single file"
)]
pub struct MergeArgs {
    /// Configuration file (defaults to .dirdumprc.toml, then ~/.config/dirdump/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory to merge
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path prefix to skip; replaces the configured list (repeatable)
    #[arg(short, long = "ignore", value_name = "PREFIX")]
    pub ignore: Vec<String>,

    /// Extension to include, without the dot; replaces the configured list (repeatable)
    #[arg(short, long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Include every file regardless of extension
    #[arg(long, conflicts_with = "extensions")]
    pub all_extensions: bool,

    /// Hide the progress spinner
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print encoding conversions and a file count before the completion message
    #[arg(short, long)]
    pub verbose: bool,
}

/// How much `run_merge` prints besides the completion message and warnings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// No progress spinner.
    Quiet,
    /// Progress spinner while merging, cleared afterwards.
    #[default]
    Normal,
    /// Spinner plus per-file encoding notes and a summary line.
    Verbose,
}

impl MergeArgs {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Loads the configuration and applies the command-line overrides.
    pub fn resolve(&self) -> Result<MergeSettings> {
        let mut settings = DirdumpConfig::load(self.config.as_deref())?.merge;
        if let Some(root) = &self.root {
            settings.root_dir = root.clone();
        }
        if let Some(output) = &self.output {
            settings.output_file = output.clone();
        }
        if !self.ignore.is_empty() {
            settings.ignored_paths = self.ignore.clone();
        }
        if self.all_extensions {
            settings.allowed_extensions.clear();
        } else if !self.extensions.is_empty() {
            settings.allowed_extensions = self.extensions.clone();
        }
        Ok(settings)
    }
}

/// Writes the directory tree described by `settings`.
///
/// # Examples
///
/// ```no_run
/// use dirdump::cli::run_tree;
/// use dirdump::config::TreeSettings;
///
/// match run_tree(&TreeSettings::default()) {
///     Ok(report) => println!("{} entries", report.directories + report.files),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_tree(settings: &TreeSettings) -> Result<TreeReport> {
    let order = if settings.sort_entries {
        EntryOrder::Name
    } else {
        EntryOrder::Listing
    };

    let report = TreePrinter::new(&settings.root_dir, settings.ignore_list())
        .with_order(order)
        .print(&settings.output_file)?;

    OutputFormatter::success(&format!(
        "Directory structure has been written to {}.",
        settings.output_file.display()
    ));
    Ok(report)
}

/// Merges the files described by `settings`.
///
/// Unreadable files do not fail the run; they are listed as warnings once the
/// merge is complete. Below [`Verbosity::Verbose`] nothing else is printed
/// before the completion message.
pub fn run_merge(settings: &MergeSettings, verbosity: Verbosity) -> Result<MergeReport> {
    let mut merger = FileMerger::new(
        &settings.root_dir,
        settings.extension_set(),
        settings.ignore_list(),
    );

    let spinner = (verbosity != Verbosity::Quiet).then(OutputFormatter::create_spinner);
    if let Some(spinner) = &spinner {
        merger = merger.with_progress(spinner.clone());
    }

    let result = merger.merge(&settings.output_file);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = result?;

    for note in merge_notes(&report, verbosity) {
        OutputFormatter::info(&note);
    }
    for path in &report.unreadable {
        OutputFormatter::warning(&format!("Could not read {}", path.display()));
    }

    OutputFormatter::success(&format!(
        "All files have been merged into {} with absolute paths only.",
        settings.output_file.display()
    ));
    Ok(report)
}

/// Lines printed ahead of the completion message at the given verbosity.
fn merge_notes(report: &MergeReport, verbosity: Verbosity) -> Vec<String> {
    if verbosity != Verbosity::Verbose {
        return Vec::new();
    }

    let mut notes: Vec<String> = report
        .transcoded
        .iter()
        .map(|(path, encoding)| format!("Converted {} from {}", path.display(), encoding))
        .collect();
    notes.extend(report.fallback.iter().map(|path| {
        format!(
            "Converted {} with byte-wise Latin-1 fallback",
            path.display()
        )
    }));
    notes.push(format!(
        "Merged {} {}, skipped {} by extension",
        report.merged,
        if report.merged == 1 { "file" } else { "files" },
        report.skipped
    ));
    notes
}

//! dirdump - project snapshots as plain text
//!
//! This library provides the two utilities behind the `dirdump-tree` and
//! `dirdump-merge` binaries: rendering a directory's structure as an indented
//! tree, and merging the text of selected files into one document with path
//! headers and separators. Both walk the tree depth-first and skip paths that
//! start with a configured prefix.

pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod file_merger;
pub mod ignore;
pub mod output;
pub mod output_file;
pub mod tree_printer;

pub use config::{ConfigError, DirdumpConfig, MergeSettings, TreeSettings};
pub use error::{Error, Result};
pub use file_merger::{FileMerger, MergeError, MergeReport, merge_files};
pub use ignore::IgnoreList;
pub use tree_printer::{EntryOrder, TreeError, TreePrinter, TreeReport, print_tree};

pub use cli::{MergeArgs, TreeArgs, Verbosity, run_merge, run_tree};

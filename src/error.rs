//! Top-level error type returned by the CLI entry points.

use crate::config::ConfigError;
use crate::file_merger::MergeError;
use crate::tree_printer::TreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error loading configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Merge(#[from] MergeError),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Renders a directory's structure as an indented box-drawing tree.
//!
//! The output starts with a short header followed by the root directory on its
//! own line, then one line per entry:
//!
//! ```text
//! Directory Structure for project
//! ========================================
//!
//! project
//! ├── src
//! │   └── main.py
//! └── README.txt
//! ```

use crate::ignore::IgnoreList;
use crate::output_file::OutputFile;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

/// Errors that abort a tree printing run.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A directory could not be listed (missing, permission denied, removed mid-walk).
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDir { path: PathBuf, source: io::Error },
    /// The output file could not be created or appended to.
    #[error("Failed to write output file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

pub type TreeResult<T> = Result<T, TreeError>;

/// Order in which sibling entries are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryOrder {
    /// Whatever order the directory listing returns.
    #[default]
    Listing,
    /// Sorted by file name.
    Name,
}

/// Indentation state handed down to each recursive step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalContext {
    pub prefix: String,
    pub is_last: bool,
}

impl TraversalContext {
    /// Context for the immediate children of the root directory.
    pub fn root() -> Self {
        Self {
            prefix: String::new(),
            is_last: true,
        }
    }

    /// Connector drawn in front of an entry at this position.
    pub fn connector(&self) -> &'static str {
        if self.is_last { LAST_BRANCH } else { BRANCH }
    }

    /// Context for the entry at position `index` of `count` siblings.
    fn entry(&self, index: usize, count: usize) -> Self {
        Self {
            prefix: self.prefix.clone(),
            is_last: index + 1 == count,
        }
    }

    /// Context for the children of the entry this context describes.
    fn descend(&self) -> Self {
        let indent = if self.is_last { SPACE_INDENT } else { PIPE_INDENT };
        Self {
            prefix: format!("{}{}", self.prefix, indent),
            is_last: true,
        }
    }

    fn line(&self, name: &str) -> String {
        format!("{}{}{}\n", self.prefix, self.connector(), name)
    }
}

/// Counts of the entries written to the tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeReport {
    pub directories: usize,
    pub files: usize,
}

/// Writes the directory tree of a root directory to an output file.
#[derive(Debug, Clone)]
pub struct TreePrinter {
    root_dir: PathBuf,
    ignore: IgnoreList,
    order: EntryOrder,
}

impl TreePrinter {
    pub fn new(root_dir: impl Into<PathBuf>, ignore: IgnoreList) -> Self {
        Self {
            root_dir: root_dir.into(),
            ignore,
            order: EntryOrder::default(),
        }
    }

    pub fn with_order(mut self, order: EntryOrder) -> Self {
        self.order = order;
        self
    }

    /// Recreates `output_path` and writes the header and the whole tree to it.
    ///
    /// A directory that cannot be listed stops the run; lines written up to
    /// that point stay in the output file.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirdump::ignore::IgnoreList;
    /// use dirdump::tree_printer::TreePrinter;
    /// use std::path::Path;
    ///
    /// let printer = TreePrinter::new("project", IgnoreList::new(["project/target"]));
    /// let report = printer.print(Path::new("directory_structure.txt")).unwrap();
    /// println!("{} directories, {} files", report.directories, report.files);
    /// ```
    pub fn print(&self, output_path: &Path) -> TreeResult<TreeReport> {
        let output = OutputFile::create(output_path).map_err(|e| write_error(output_path, e))?;
        let root = self.root_dir.to_string_lossy();

        output
            .append(&format!(
                "Directory Structure for {}\n{}\n\n{}\n",
                root,
                "=".repeat(40),
                root
            ))
            .map_err(|e| write_error(output_path, e))?;

        let mut report = TreeReport::default();
        self.print_dir(&self.root_dir, &TraversalContext::root(), &output, &mut report)?;
        Ok(report)
    }

    fn print_dir(
        &self,
        dir: &Path,
        context: &TraversalContext,
        output: &OutputFile,
        report: &mut TreeReport,
    ) -> TreeResult<()> {
        let children = self.list_children(dir)?;
        let count = children.len();

        for (index, path) in children.iter().enumerate() {
            let entry = context.entry(index, count);
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            output
                .append(&entry.line(&name))
                .map_err(|e| write_error(output.path(), e))?;

            if path.is_dir() {
                report.directories += 1;
                self.print_dir(path, &entry.descend(), output, report)?;
            } else {
                report.files += 1;
            }
        }

        Ok(())
    }

    /// Lists the non-ignored children of `dir`.
    fn list_children(&self, dir: &Path) -> TreeResult<Vec<PathBuf>> {
        let read_error = |source: io::Error| TreeError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut children = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();
            if !self.ignore.is_ignored(&path) {
                children.push(path);
            }
        }

        if self.order == EntryOrder::Name {
            children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        }

        Ok(children)
    }
}

fn write_error(path: &Path, source: io::Error) -> TreeError {
    TreeError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes the tree of `root_dir` to `output_path`, skipping ignored paths.
pub fn print_tree(
    root_dir: &Path,
    output_path: &Path,
    ignore: &IgnoreList,
) -> TreeResult<TreeReport> {
    TreePrinter::new(root_dir, ignore.clone()).print(output_path)
}

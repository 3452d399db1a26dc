//! Merges the text of a project's files into one document.
//!
//! Every included file contributes a record:
//!
//! ```text
//! # project/src/main.py
//! <content, minus a leading "# relative/path.py" comment line>
//!
//! # --------------------------------------------------------------------------------
//!
//! ```
//!
//! A file that cannot be read gets an inline `# ERROR` marker instead of its
//! content and the run carries on. A directory that cannot be listed aborts it.

use crate::encoding::{self, SourceEncoding};
use crate::ignore::IgnoreList;
use crate::output_file::OutputFile;
use chrono::Local;
use indicatif::ProgressBar;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Shape of a relative-path comment left at the top of a file by an earlier tool run.
/// Whitespace is ASCII only.
static PATH_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?-u:\s)+[A-Za-z0-9_/.]+$").expect("valid path comment regex")
});

/// Characters trimmed from both ends of a line before matching a path comment.
const TRIMMED: [char; 6] = [' ', '\t', '\n', '\r', '\0', '\x0B'];

const READ_ERROR_MARKER: &str = "# ERROR: Could not read file content\n\n";

/// Errors that abort a merge run.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A directory could not be listed.
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDir { path: PathBuf, source: io::Error },
    /// The output file could not be created or appended to.
    #[error("Failed to write output file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

pub type MergeResult<T> = Result<T, MergeError>;

/// Summary of a merge run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Files whose content was written to the output.
    pub merged: usize,
    /// Files left out by the extension filter.
    pub skipped: usize,
    /// Files that got an error marker instead of content.
    pub unreadable: Vec<PathBuf>,
    /// Files converted from a non-UTF-8 encoding.
    pub transcoded: Vec<(PathBuf, SourceEncoding)>,
    /// Files no candidate encoding accepted.
    pub fallback: Vec<PathBuf>,
}

/// Walks a root directory and appends every allowed file to one output file.
#[derive(Clone)]
pub struct FileMerger {
    root_dir: PathBuf,
    allowed_extensions: HashSet<String>,
    ignore: IgnoreList,
    progress: Option<ProgressBar>,
}

impl FileMerger {
    /// An empty `allowed_extensions` set admits every file.
    pub fn new(
        root_dir: impl Into<PathBuf>,
        allowed_extensions: HashSet<String>,
        ignore: IgnoreList,
    ) -> Self {
        Self {
            root_dir: root_dir.into(),
            allowed_extensions,
            ignore,
            progress: None,
        }
    }

    /// Ticks `progress` once per included file.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Recreates `output_path`, writes the header and merges every included file.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirdump::file_merger::FileMerger;
    /// use dirdump::ignore::IgnoreList;
    /// use std::collections::HashSet;
    /// use std::path::Path;
    ///
    /// let extensions: HashSet<String> = ["py", "txt"].iter().map(|e| e.to_string()).collect();
    /// let merger = FileMerger::new("project", extensions, IgnoreList::default());
    /// let report = merger.merge(Path::new("merged_output.txt")).unwrap();
    /// println!("merged {} files", report.merged);
    /// ```
    pub fn merge(&self, output_path: &Path) -> MergeResult<MergeReport> {
        let output = OutputFile::create(output_path).map_err(|e| write_error(output_path, e))?;

        output
            .append(&format!(
                "# Project Files Merger\n# Generated on: {}\n# Root directory: {}\n# {}\n\n",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                self.root_dir.to_string_lossy(),
                "=".repeat(80)
            ))
            .map_err(|e| write_error(output_path, e))?;

        let mut report = MergeReport::default();
        self.merge_dir(&self.root_dir, &output, &mut report)?;
        Ok(report)
    }

    fn merge_dir(
        &self,
        dir: &Path,
        output: &OutputFile,
        report: &mut MergeReport,
    ) -> MergeResult<()> {
        let read_error = |source: io::Error| MergeError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        for entry in fs::read_dir(dir).map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();

            if self.ignore.is_ignored(&path) {
                continue;
            }

            if path.is_dir() {
                self.merge_dir(&path, output, report)?;
            } else if path.is_file() {
                if self.is_allowed(&path) {
                    self.merge_file(&path, output, report)?;
                } else {
                    report.skipped += 1;
                }
            }
        }

        Ok(())
    }

    fn merge_file(
        &self,
        path: &Path,
        output: &OutputFile,
        report: &mut MergeReport,
    ) -> MergeResult<()> {
        if let Some(progress) = &self.progress {
            progress.set_message(path.to_string_lossy().into_owned());
            progress.inc(1);
        }

        self.write_record(path, fs::read(path), output, report)
    }

    /// Appends the record for `path` given the result of reading its content.
    fn write_record(
        &self,
        path: &Path,
        content: io::Result<Vec<u8>>,
        output: &OutputFile,
        report: &mut MergeReport,
    ) -> MergeResult<()> {
        let append = |text: &str| {
            output
                .append(text)
                .map_err(|e| write_error(output.path(), e))
        };

        append(&format!("# {}\n", path.to_string_lossy()))?;

        let bytes = match content {
            Ok(bytes) => bytes,
            Err(_) => {
                append(READ_ERROR_MARKER)?;
                report.unreadable.push(path.to_path_buf());
                return Ok(());
            }
        };

        let decoded = encoding::decode_to_utf8(&bytes);
        match decoded.encoding {
            Some(SourceEncoding::Utf8) => {}
            Some(other) => report.transcoded.push((path.to_path_buf(), other)),
            None => report.fallback.push(path.to_path_buf()),
        }

        append(&format!("{}\n\n", strip_path_comment(&decoded.text)))?;
        append(&format!("# {}\n\n", "-".repeat(80)))?;

        report.merged += 1;
        Ok(())
    }

    fn is_allowed(&self, path: &Path) -> bool {
        self.allowed_extensions.is_empty()
            || self.allowed_extensions.contains(file_extension(path))
    }
}

fn write_error(path: &Path, source: io::Error) -> MergeError {
    MergeError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Merges the allowed files under `root_dir` into `output_path`.
pub fn merge_files(
    root_dir: &Path,
    output_path: &Path,
    allowed_extensions: &HashSet<String>,
    ignore: &IgnoreList,
) -> MergeResult<MergeReport> {
    FileMerger::new(root_dir, allowed_extensions.clone(), ignore.clone()).merge(output_path)
}

/// Text after the last `.` of the file name, or `""` if there is none.
///
/// Dot files count as all-extension: `.gitignore` yields `gitignore`.
pub fn file_extension(path: &Path) -> &str {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .unwrap_or("")
}

/// Returns true for a line like `# src/module/file.py`.
pub fn is_path_comment(line: &str) -> bool {
    PATH_COMMENT.is_match(line.trim_matches(TRIMMED))
}

/// Drops the first line of `text` if it is a relative-path comment.
pub fn strip_path_comment(text: &str) -> String {
    let mut lines = text.split('\n');
    match lines.next() {
        Some(first) if is_path_comment(first) => lines.collect::<Vec<_>>().join("\n"),
        _ => text.to_string(),
    }
}

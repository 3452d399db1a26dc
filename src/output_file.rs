//! Append-only destination file for a tree or merge run.
//!
//! The file is deleted and recreated when a run starts and afterwards only
//! appended to. Each append opens the file, takes an exclusive advisory lock,
//! writes the whole chunk and closes it again, so two runs pointed at the same
//! path never interleave partial writes.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct OutputFile {
    path: PathBuf,
}

impl OutputFile {
    /// Deletes `path` if it exists and creates it again, empty.
    ///
    /// A missing previous output is not an error.
    pub fn create(path: &Path) -> io::Result<Self> {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        File::create(path)?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Appends `text` while holding an exclusive lock on the file.
    pub fn append(&self, text: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.lock()?;
        let written = file.write_all(text.as_bytes()).and_then(|()| file.flush());
        file.unlock()?;
        written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

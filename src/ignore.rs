//! Path-prefix ignore list shared by the tree printer and the file merger.
//!
//! Matching is purely textual: a path is ignored when its string form starts
//! with any configured prefix. It does not respect path boundaries, so the
//! prefix `src/a` also hides `src/abc`.

use std::path::Path;

/// An ordered list of path prefixes to skip during traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    prefixes: Vec<String>,
}

impl IgnoreList {
    /// Builds an ignore list from any collection of prefix strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirdump::ignore::IgnoreList;
    /// use std::path::Path;
    ///
    /// let ignore = IgnoreList::new(["project/__pycache__"]);
    /// assert!(ignore.is_ignored(Path::new("project/__pycache__/main.pyc")));
    /// assert!(!ignore.is_ignored(Path::new("project/main.py")));
    /// ```
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `path` starts with any of the configured prefixes.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

use dirdump::file_merger::{MergeError, merge_files};
use dirdump::ignore::IgnoreList;
use dirdump::tree_printer::{EntryOrder, TreeError, TreePrinter, print_tree};
/// Integration tests for dirdump
///
/// These tests build small project trees in a temporary directory and check
/// the exact text both utilities write.
///
/// Test categories:
/// 1. Tree layout and connectors
/// 2. Ignore list semantics
/// 3. Merge records and first-line stripping
/// 4. Extension filtering
/// 5. Re-runs and idempotence
/// 6. Error scenarios
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary project directory plus a place to write output files.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("project")).expect("Failed to create project root");
        TestFixture { temp_dir }
    }

    /// The project root that gets scanned.
    fn root(&self) -> PathBuf {
        self.temp_dir.path().join("project")
    }

    /// A path next to (not inside) the project root.
    fn output(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Create a file under the project root, creating parent directories.
    fn create_file(&self, rel_path: &str, content: &[u8]) {
        let path = self.root().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    fn create_text_file(&self, rel_path: &str, content: &str) {
        self.create_file(rel_path, content.as_bytes());
    }

    fn create_subdir(&self, rel_path: &str) {
        fs::create_dir_all(self.root().join(rel_path)).expect("Failed to create subdirectory");
    }

    /// The ignore prefix for a path relative to the project root.
    fn prefix(&self, rel_path: &str) -> String {
        self.root().join(rel_path).to_string_lossy().into_owned()
    }

    /// Header line the merger writes for a file under the project root.
    fn merge_header(&self, rel_path: &str) -> String {
        format!("# {}\n", self.root().join(rel_path).to_string_lossy())
    }

    /// Print the tree sorted by name and return the lines after the header.
    fn sorted_tree(&self, ignore: IgnoreList) -> Vec<String> {
        let output = self.output("tree.txt");
        TreePrinter::new(self.root(), ignore)
            .with_order(EntryOrder::Name)
            .print(&output)
            .expect("Failed to print tree");
        tree_body(&output)
    }

    fn merge(&self, extensions: &[&str], ignore: &IgnoreList) -> String {
        let output = self.output("merged.txt");
        merge_files(&self.root(), &output, &extension_set(extensions), ignore)
            .expect("Failed to merge files");
        fs::read_to_string(&output).expect("Failed to read merged output")
    }
}

fn extension_set(extensions: &[&str]) -> HashSet<String> {
    extensions.iter().map(|e| e.to_string()).collect()
}

/// Tree output minus the four header lines.
fn tree_body(output: &Path) -> Vec<String> {
    fs::read_to_string(output)
        .expect("Failed to read tree output")
        .lines()
        .skip(4)
        .map(str::to_string)
        .collect()
}

/// Merge output without the generation timestamp line.
fn without_timestamp(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.starts_with("# Generated on: "))
        .collect::<Vec<_>>()
        .join("\n")
}

fn separator() -> String {
    format!("# {}\n\n", "-".repeat(80))
}

// ============================================================================
// Test Suite 1: Tree Layout
// ============================================================================

#[test]
fn test_tree_connectors_follow_position() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a", "");
    fixture.create_text_file("b", "");
    fixture.create_text_file("c", "");

    assert_eq!(
        fixture.sorted_tree(IgnoreList::default()),
        vec!["├── a", "├── b", "└── c"]
    );
}

#[test]
fn test_tree_listing_order_marks_only_last_entry() {
    let fixture = TestFixture::new();
    for name in ["alpha", "beta", "gamma", "delta"] {
        fixture.create_text_file(name, "");
    }
    let output = fixture.output("tree.txt");

    print_tree(&fixture.root(), &output, &IgnoreList::default()).expect("Failed to print tree");

    let lines = tree_body(&output);
    assert_eq!(lines.len(), 4);
    for line in &lines[..3] {
        assert!(line.starts_with("├── "), "unexpected line: {}", line);
    }
    assert!(lines[3].starts_with("└── "));

    let mut names: Vec<&str> = lines.iter().map(|l| &l["├── ".len()..]).collect();
    names.sort();
    assert_eq!(names, vec!["alpha", "beta", "delta", "gamma"]);
}

#[test]
fn test_tree_nested_prefixes() {
    let fixture = TestFixture::new();
    fixture.create_text_file("entities/player.py", "");
    fixture.create_text_file("entities/weapons/sword.py", "");
    fixture.create_text_file("main.py", "");
    fixture.create_subdir("ui");

    assert_eq!(
        fixture.sorted_tree(IgnoreList::default()),
        vec![
            "├── entities",
            "│   ├── player.py",
            "│   └── weapons",
            "│       └── sword.py",
            "├── main.py",
            "└── ui",
        ]
    );
}

#[test]
fn test_tree_header() {
    let fixture = TestFixture::new();
    let output = fixture.output("tree.txt");

    print_tree(&fixture.root(), &output, &IgnoreList::default()).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    let root = fixture.root().to_string_lossy().into_owned();
    assert_eq!(lines[0], format!("Directory Structure for {}", root));
    assert_eq!(lines[1], "=".repeat(40));
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], root);
    assert_eq!(lines.len(), 4);
}

// ============================================================================
// Test Suite 2: Ignore List
// ============================================================================

#[test]
fn test_tree_ignores_exact_and_nested_paths() {
    let fixture = TestFixture::new();
    fixture.create_text_file("__pycache__/main.pyc", "");
    fixture.create_text_file("ui/__pycache__/menu.pyc", "");
    fixture.create_text_file("ui/menu.py", "");
    fixture.create_text_file("main.py", "");

    let ignore = IgnoreList::new([fixture.prefix("__pycache__"), fixture.prefix("ui/__pycache__")]);

    assert_eq!(
        fixture.sorted_tree(ignore),
        vec!["├── main.py", "└── ui", "    └── menu.py"]
    );
}

#[test]
fn test_ignore_prefix_is_textual() {
    let fixture = TestFixture::new();
    fixture.create_text_file("build/out.txt", "");
    fixture.create_text_file("build_tools/gen.txt", "");
    fixture.create_text_file("builder.txt", "");
    fixture.create_text_file("src.txt", "");

    let ignore = IgnoreList::new([fixture.prefix("build")]);

    assert_eq!(fixture.sorted_tree(ignore.clone()), vec!["└── src.txt"]);

    let merged = fixture.merge(&[], &ignore);
    assert!(merged.contains(&fixture.merge_header("src.txt")));
    assert!(!merged.contains(&fixture.merge_header("build/out.txt")));
    assert!(!merged.contains(&fixture.merge_header("build_tools/gen.txt")));
    assert!(!merged.contains(&fixture.merge_header("builder.txt")));
}

#[test]
fn test_merge_skips_ignored_directory_but_keeps_siblings() {
    let fixture = TestFixture::new();
    fixture.create_text_file("cache/data.txt", "cached");
    fixture.create_text_file("docs/readme.txt", "read me");

    let merged = fixture.merge(&["txt"], &IgnoreList::new([fixture.prefix("cache")]));

    assert!(!merged.contains("cached"));
    assert!(merged.contains(&fixture.merge_header("docs/readme.txt")));
    assert!(merged.contains("read me\n\n"));
}

// ============================================================================
// Test Suite 3: Merge Records
// ============================================================================

#[test]
fn test_merge_strips_relative_path_comment() {
    let fixture = TestFixture::new();
    fixture.create_text_file("src/foo.py", "# src/foo.py\nimport os\nprint(os.name)\n");

    let merged = fixture.merge(&["py"], &IgnoreList::default());

    let record = format!(
        "{}import os\nprint(os.name)\n\n\n{}",
        fixture.merge_header("src/foo.py"),
        separator()
    );
    assert!(merged.ends_with(&record), "unexpected output:\n{}", merged);
    assert!(!merged.contains("# src/foo.py\n"));
}

#[test]
fn test_merge_keeps_ordinary_first_line() {
    let fixture = TestFixture::new();
    fixture.create_text_file("main.py", "import sys\n# main.py\n");
    fixture.create_text_file("todo.py", "# TODO: write this\npass");

    let merged = fixture.merge(&["py"], &IgnoreList::default());

    assert!(merged.contains(&format!(
        "{}import sys\n# main.py\n\n\n",
        fixture.merge_header("main.py")
    )));
    assert!(merged.contains(&format!(
        "{}# TODO: write this\npass\n\n",
        fixture.merge_header("todo.py")
    )));
}

#[test]
fn test_merge_header_block() {
    let fixture = TestFixture::new();

    let merged = fixture.merge(&[], &IgnoreList::default());

    let expected = format!(
        "# Project Files Merger\n# Root directory: {}\n# {}\n",
        fixture.root().to_string_lossy(),
        "=".repeat(80)
    );
    assert_eq!(without_timestamp(&merged), expected);
    assert!(merged.contains("\n# Generated on: "));
}

#[test]
fn test_merge_converts_legacy_encodings() {
    let fixture = TestFixture::new();
    fixture.create_file("latin1.txt", b"na\xefve");
    fixture.create_file("cp1252.txt", b"\x93hi\x94");
    fixture.create_file("broken.txt", b"x\x81y");

    let output = fixture.output("merged.txt");
    let report = merge_files(
        &fixture.root(),
        &output,
        &extension_set(&["txt"]),
        &IgnoreList::default(),
    )
    .unwrap();

    let merged = fs::read_to_string(&output).expect("Merged output should be valid UTF-8");
    assert!(merged.contains("naïve\n\n"));
    assert!(merged.contains("\u{201C}hi\u{201D}\n\n"));
    assert!(merged.contains("x\u{81}y\n\n"));
    assert_eq!(report.merged, 3);
    assert_eq!(report.transcoded.len(), 2);
    assert_eq!(report.fallback, vec![fixture.root().join("broken.txt")]);
}

// ============================================================================
// Test Suite 4: Extension Filtering
// ============================================================================

#[test]
fn test_extension_filter_excludes_entirely() {
    let fixture = TestFixture::new();
    fixture.create_text_file("script.py", "print(1)");
    fixture.create_text_file("notes.txt", "notes");
    fixture.create_text_file("README.md", "# Readme");

    let output = fixture.output("merged.txt");
    let report = merge_files(
        &fixture.root(),
        &output,
        &extension_set(&["py", "txt"]),
        &IgnoreList::default(),
    )
    .unwrap();
    let merged = fs::read_to_string(&output).unwrap();

    assert!(!merged.contains("README.md"));
    assert!(!merged.contains("# Readme"));
    assert!(!merged.contains("ERROR"));
    assert!(merged.contains(&format!(
        "{}print(1)\n\n{}",
        fixture.merge_header("script.py"),
        separator()
    )));
    assert_eq!(report.merged, 2);
    assert_eq!(report.skipped, 1);
}

#[test]
fn test_empty_allow_list_includes_everything() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Makefile", "all:");
    fixture.create_text_file(".env", "KEY=1");
    fixture.create_text_file("deep/nested/data.json", "{}");

    let merged = fixture.merge(&[], &IgnoreList::default());

    assert!(merged.contains(&fixture.merge_header("Makefile")));
    assert!(merged.contains(&fixture.merge_header(".env")));
    assert!(merged.contains(&fixture.merge_header("deep/nested/data.json")));
}

#[test]
fn test_directories_are_not_extension_filtered() {
    let fixture = TestFixture::new();
    fixture.create_text_file("pkg.d/module.py", "x = 1");

    let merged = fixture.merge(&["py"], &IgnoreList::default());

    assert!(merged.contains(&fixture.merge_header("pkg.d/module.py")));
}

// ============================================================================
// Test Suite 5: Re-runs
// ============================================================================

#[test]
fn test_merge_is_idempotent_modulo_timestamp() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.py", "# a.py\nA = 1\n");
    fixture.create_text_file("sub/b.py", "B = 2\n");
    fixture.create_text_file("sub/c.txt", "c");

    let first = fixture.merge(&["py", "txt"], &IgnoreList::default());
    let second = fixture.merge(&["py", "txt"], &IgnoreList::default());

    assert_eq!(without_timestamp(&first), without_timestamp(&second));
}

#[test]
fn test_tree_rerun_replaces_output() {
    let fixture = TestFixture::new();
    fixture.create_text_file("only.txt", "");
    let output = fixture.output("tree.txt");

    print_tree(&fixture.root(), &output, &IgnoreList::default()).unwrap();
    let first = fs::read_to_string(&output).unwrap();
    print_tree(&fixture.root(), &output, &IgnoreList::default()).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), first);
}

#[test]
fn test_rerun_after_deleting_output() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.py", "A = 1");
    let output = fixture.output("merged.txt");
    let extensions = extension_set(&["py"]);

    merge_files(&fixture.root(), &output, &extensions, &IgnoreList::default()).unwrap();
    fs::remove_file(&output).unwrap();

    let result = merge_files(&fixture.root(), &output, &extensions, &IgnoreList::default());

    assert!(result.is_ok());
    assert!(output.exists());
}

// ============================================================================
// Test Suite 6: Errors
// ============================================================================

#[test]
fn test_tree_missing_root_is_fatal() {
    let fixture = TestFixture::new();
    let missing = fixture.root().join("missing");

    let result = print_tree(&missing, &fixture.output("tree.txt"), &IgnoreList::default());

    assert!(matches!(result, Err(TreeError::ReadDir { .. })));
}

#[test]
fn test_merge_missing_root_is_fatal() {
    let fixture = TestFixture::new();
    let missing = fixture.root().join("missing");

    let result = merge_files(
        &missing,
        &fixture.output("merged.txt"),
        &HashSet::new(),
        &IgnoreList::default(),
    );

    match result {
        Err(MergeError::ReadDir { path, .. }) => assert_eq!(path, missing),
        other => panic!("Expected ReadDir error, got {:?}", other),
    }
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_gets_error_marker() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = TestFixture::new();
    fixture.create_text_file("locked.txt", "secret");
    fixture.create_text_file("open.txt", "visible");
    let locked = fixture.root().join("locked.txt");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read the file anyway; nothing to check then.
    if fs::read(&locked).is_ok() {
        return;
    }

    let output = fixture.output("merged.txt");
    let report = merge_files(
        &fixture.root(),
        &output,
        &extension_set(&["txt"]),
        &IgnoreList::default(),
    )
    .expect("Unreadable file should not abort the merge");
    let merged = fs::read_to_string(&output).unwrap();

    assert!(merged.contains(&format!(
        "{}# ERROR: Could not read file content\n\n",
        fixture.merge_header("locked.txt")
    )));
    assert!(merged.contains("visible\n\n"));
    assert_eq!(report.unreadable, vec![locked.clone()]);
    assert_eq!(report.merged, 1);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
}

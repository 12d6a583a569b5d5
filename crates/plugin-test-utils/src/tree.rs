//! [`PackageTree`] builder for on-disk package layout scenarios.
//!
//! Extracted from the integration test suite to enable reuse across all
//! crates in the workspace.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// A temporary directory tree of package and manifest files with helper
/// methods for test setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use plugin_test_utils::PackageTree;
///
/// let tree = PackageTree::new();
/// tree.package("addons/frob.pkg", "frob", "1.2.0", "modern:5.0");
/// tree.manifest("main.plugins", &["addons/"]);
/// ```
pub struct PackageTree {
    temp_dir: TempDir,
}

impl Default for PackageTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("PackageTree::new: failed to create temp dir"),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write an arbitrary file at `rel`, creating parent directories.
    pub fn file(&self, rel: &str, content: &str) {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("PackageTree::file: mkdir {}: {e}", parent.display()));
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("PackageTree::file: write {}: {e}", path.display()));
    }

    /// Create an empty directory at `rel`.
    pub fn dir(&self, rel: &str) {
        let path = self.root().join(rel);
        fs::create_dir_all(&path)
            .unwrap_or_else(|e| panic!("PackageTree::dir: mkdir {}: {e}", path.display()));
    }

    /// Write a minimal valid package file (identity and platform only) at
    /// `rel`.
    pub fn package(&self, rel: &str, name: &str, version: &str, platform: &str) {
        self.file(
            rel,
            &format!(
                r#"[package]
name = "{name}"
version = "{version}"
platform = "{platform}"
"#
            ),
        );
    }

    /// Write a package file at `rel` providing one extension bound to an
    /// explicit extension-point path.
    pub fn extension_package(
        &self,
        rel: &str,
        name: &str,
        version: &str,
        platform: &str,
        type_name: &str,
        point_path: &str,
    ) {
        self.file(
            rel,
            &format!(
                r#"[package]
name = "{name}"
version = "{version}"
platform = "{platform}"

[[extension]]
type = "{type_name}"
path = "{point_path}"
"#
            ),
        );
    }

    /// Write a manifest file at `rel` with one entry per line.
    pub fn manifest(&self, rel: &str, entries: &[&str]) {
        let mut content = String::new();
        for entry in entries {
            content.push_str(entry);
            content.push('\n');
        }
        self.file(rel, &content);
    }

    /// Assert that `rel` exists under the root.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, rel: &str) {
        let full_path = self.root().join(rel);
        assert!(
            full_path.exists(),
            "Expected path to exist: {}",
            full_path.display()
        );
    }
}

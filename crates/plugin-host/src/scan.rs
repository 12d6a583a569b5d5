//! Manifest-driven candidate enumeration.
//!
//! A scanned directory is first checked for manifest files
//! (`*.plugins`). If any exist, only their contents are trusted — raw
//! `*.pkg` files in that directory are ignored. If none exist, every
//! package file directly in the directory is treated as a candidate.
//!
//! Manifest lines ending in `/` are directory references, resolved
//! through the pattern matcher and scanned recursively; all other lines
//! are file patterns producing candidate paths. Candidates reached
//! through wildcard expansion degrade gracefully on read failures;
//! explicitly-specified paths are held to strict error semantics.

use std::path::{Path, PathBuf};

use plugin_meta::MetadataReader;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::tracker::{CandidatePackage, CandidateTracker};
use crate::{MANIFEST_EXTENSION, PACKAGE_EXTENSION};

/// Feeds discovered candidate files into a [`CandidateTracker`].
pub struct PackageScanner<'a> {
    reader: &'a dyn MetadataReader,
    tracker: &'a mut CandidateTracker,
}

impl<'a> PackageScanner<'a> {
    pub fn new(reader: &'a dyn MetadataReader, tracker: &'a mut CandidateTracker) -> Self {
        Self { reader, tracker }
    }

    /// Scan a directory for candidate packages.
    ///
    /// `from_wildcard` records how this directory was reached and governs
    /// the failure strictness of the candidates found beneath it.
    pub fn scan_directory(&mut self, dir: &Path, from_wildcard: bool) -> Result<()> {
        info!(directory = %dir.display(), "scanning directory for extensions");

        if self.process_manifest_files(dir, from_wildcard)? == 0 {
            // No manifest: every package file directly here is a
            // candidate, admitted with exploratory (wildcard) strictness.
            for file in files_with_extension(dir, PACKAGE_EXTENSION)? {
                self.process_candidate(&file, true)?;
            }
        }

        Ok(())
    }

    /// Process all manifest files in a directory, returning how many
    /// were found.
    fn process_manifest_files(&mut self, dir: &Path, from_wildcard: bool) -> Result<usize> {
        let manifests = files_with_extension(dir, MANIFEST_EXTENSION)?;
        for manifest in &manifests {
            self.process_manifest(dir, manifest, from_wildcard)?;
        }
        Ok(manifests.len())
    }

    /// Process one manifest file: one entry per line, `#` starts a
    /// trailing comment, blank lines are ignored.
    fn process_manifest(
        &mut self,
        base_dir: &Path,
        manifest: &Path,
        from_wildcard: bool,
    ) -> Result<()> {
        info!(manifest = %manifest.display(), "processing manifest file");
        let content = std::fs::read_to_string(manifest)?;

        for raw_line in content.lines() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let line = line.replace('\\', "/");

            let is_wild = from_wildcard || line.contains(['*', '?']);
            if line.ends_with('/') {
                for dir in plugin_fs::resolve_directories(base_dir, &line)? {
                    self.scan_directory(&dir, is_wild)?;
                }
            } else {
                for file in plugin_fs::resolve_files(base_dir, &line)? {
                    self.process_candidate(&file, is_wild)?;
                }
            }
        }

        Ok(())
    }

    /// Evaluate one candidate file path.
    ///
    /// Paths already visited are skipped. Malformed packages are fatal
    /// only when the path was specified explicitly; wildcard-reached
    /// candidates are logged and dropped.
    pub fn process_candidate(&mut self, path: &Path, from_wildcard: bool) -> Result<()> {
        let key = canonical_key(path);
        if !self.tracker.visit(&key) {
            debug!(path = %path.display(), "candidate already visited");
            return Ok(());
        }

        let candidate = self
            .reader
            .read(path)
            .and_then(|metadata| CandidatePackage::new(path.to_path_buf(), metadata, from_wildcard));

        match candidate {
            Ok(candidate) => {
                self.tracker.add_or_update(candidate);
                Ok(())
            }
            Err(source) if from_wildcard => {
                warn!(path = %path.display(), error = %source, "skipping malformed package");
                Ok(())
            }
            Err(source) => Err(Error::MalformedPackage {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Canonical key for the visited-path set, so the same file reached
/// through different spellings is evaluated once.
fn canonical_key(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Files directly in `dir` with the given extension, sorted.
fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !dir.is_dir() {
        return Ok(files);
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|e| e == extension) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

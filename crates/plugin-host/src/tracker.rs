//! Tracking of candidate packages during discovery.
//!
//! The tracker keeps a set of file paths already evaluated (so a file
//! reachable through multiple manifest entries or glob expansions is
//! considered once) and a name-indexed map of candidates that is
//! duplicate-free by package name at all times: a higher version replaces
//! an existing entry, ties keep the first one seen.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use plugin_meta::{PackageIdentity, PackageMetadata, PlatformTag};
use tracing::debug;

/// A package file on disk considered for extension scanning.
#[derive(Debug, Clone)]
pub struct CandidatePackage {
    path: PathBuf,
    identity: PackageIdentity,
    platform: PlatformTag,
    metadata: PackageMetadata,
    from_wildcard: bool,
}

impl CandidatePackage {
    /// Materialize a candidate from a file path and its metadata.
    ///
    /// Fails when the metadata's identity or platform tag is unreadable;
    /// the caller decides whether that is fatal based on how the path was
    /// reached.
    pub fn new(
        path: PathBuf,
        metadata: PackageMetadata,
        from_wildcard: bool,
    ) -> plugin_meta::Result<Self> {
        let identity = metadata.identity()?;
        let platform = metadata.platform_tag()?;
        Ok(Self {
            path,
            identity,
            platform,
            metadata,
            from_wildcard,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn version(&self) -> &semver::Version {
        &self.identity.version
    }

    pub fn identity(&self) -> &PackageIdentity {
        &self.identity
    }

    pub fn platform_tag(&self) -> &PlatformTag {
        &self.platform
    }

    pub fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    /// Whether this candidate was reached through wildcard expansion
    /// rather than an explicitly-specified path. Governs error strictness.
    pub fn from_wildcard(&self) -> bool {
        self.from_wildcard
    }

    /// Whether this candidate should replace `other` in the tracker:
    /// strictly higher versions win, ties keep the incumbent.
    fn is_better_version_of(&self, other: &Self) -> bool {
        self.version() > other.version()
    }
}

/// Visited-path set plus name-indexed candidate map.
#[derive(Debug, Default)]
pub struct CandidateTracker {
    visited: HashSet<PathBuf>,
    by_name: HashMap<String, CandidatePackage>,
}

impl CandidateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a path as evaluated. Returns `false` if it was already
    /// visited, in which case the caller must not evaluate it again.
    pub fn visit(&mut self, path: &Path) -> bool {
        self.visited.insert(path.to_path_buf())
    }

    /// Whether a path has already been evaluated.
    pub fn is_visited(&self, path: &Path) -> bool {
        self.visited.contains(path)
    }

    /// Merge a candidate into the name-indexed map.
    ///
    /// No existing entry with the same name: insert. Existing entry with a
    /// lower version: replace. Existing entry with an equal or higher
    /// version: keep the existing entry and discard the candidate.
    pub fn add_or_update(&mut self, candidate: CandidatePackage) {
        match self.by_name.get(candidate.name()) {
            Some(existing) if !candidate.is_better_version_of(existing) => {
                debug!(
                    package = candidate.name(),
                    version = %candidate.version(),
                    kept = %existing.version(),
                    "duplicate candidate ignored"
                );
            }
            previous => {
                if previous.is_some() {
                    debug!(
                        package = candidate.name(),
                        version = %candidate.version(),
                        "duplicate candidate replacing lower version"
                    );
                } else {
                    debug!(package = candidate.name(), version = %candidate.version(), "candidate added");
                }
                self.by_name
                    .insert(candidate.name().to_string(), candidate);
            }
        }
    }

    /// All tracked candidates, duplicate-free by package name.
    pub fn candidates(&self) -> impl Iterator<Item = &CandidatePackage> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

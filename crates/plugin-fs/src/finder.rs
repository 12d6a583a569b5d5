//! Extended wildcard selection of directories and files.
//!
//! Patterns are `/`-separated sequences of path-segment patterns. Each
//! segment may be `.` (skipped), `..` (parent), `**` (the directory itself
//! plus every descendant directory), a glob like `net-*`, or a literal
//! name. Resolution expands the working set of directories one segment at
//! a time, left to right.

use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Resolve a directory pattern against a base directory.
///
/// Platform separators are normalized to `/` before matching. Segments
/// that are empty (from repeated separators or a trailing `/`) or `.` are
/// skipped. A `..` segment moves to the parent of each current directory;
/// directories without a parent are silently dropped.
///
/// Returns the matched directories in sorted order per expansion step.
pub fn resolve_directories(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if pattern.is_empty() {
        return Err(Error::EmptyPattern);
    }

    let pattern = pattern.replace('\\', "/");
    let mut dirs = vec![base.to_path_buf()];

    for segment in pattern.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        dirs = expand_one_step(&dirs, segment)?;
    }

    Ok(dirs)
}

/// Resolve a file pattern against a base directory.
///
/// The pattern is split at its last `/`: the leading part is resolved with
/// [`resolve_directories`], the trailing component is a file-name glob
/// applied within each resulting directory. A pattern without `/` is a
/// direct file glob against `base`.
pub fn resolve_files(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if pattern.is_empty() {
        return Err(Error::EmptyPattern);
    }

    let pattern = pattern.replace('\\', "/");

    let (dir_pattern, file_pattern) = match pattern.rfind('/') {
        Some(sep) => (Some(&pattern[..sep]), &pattern[sep + 1..]),
        None => (None, pattern.as_str()),
    };
    if file_pattern.is_empty() {
        return Err(Error::EmptyPattern);
    }

    let dirs = match dir_pattern {
        Some(dp) => resolve_directories(base, dp)?,
        None => vec![base.to_path_buf()],
    };

    let matcher = compile(file_pattern)?;
    let mut files = Vec::new();
    for dir in &dirs {
        files.extend(matching_entries(dir, &matcher, EntryKind::File)?);
    }

    Ok(files)
}

/// Expand every directory in the working set by one pattern segment.
fn expand_one_step(dirs: &[PathBuf], segment: &str) -> Result<Vec<PathBuf>> {
    let mut expanded = Vec::new();

    for dir in dirs {
        match segment {
            ".." => {
                if let Some(parent) = dir.parent() {
                    expanded.push(parent.to_path_buf());
                }
            }
            // ** means zero or more intervening levels, so the directory
            // itself starts the expansion.
            "**" => {
                expanded.push(dir.clone());
                expanded.extend(descendant_directories(dir));
            }
            _ => {
                if is_wildcard(segment) {
                    let matcher = compile(segment)?;
                    expanded.extend(matching_entries(dir, &matcher, EntryKind::Dir)?);
                } else {
                    let candidate = dir.join(segment);
                    if candidate.is_dir() {
                        expanded.push(candidate);
                    }
                }
            }
        }
    }

    Ok(expanded)
}

/// All descendant directories of `dir` at any depth, sorted.
fn descendant_directories(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .collect()
}

#[derive(Clone, Copy, PartialEq)]
enum EntryKind {
    Dir,
    File,
}

/// Direct children of `dir` of the given kind whose names match, sorted.
fn matching_entries(dir: &Path, matcher: &Pattern, kind: EntryKind) -> Result<Vec<PathBuf>> {
    let mut matched = Vec::new();

    if !dir.is_dir() {
        return Ok(matched);
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let is_dir = entry.file_type()?.is_dir();
        if (kind == EntryKind::Dir) != is_dir {
            continue;
        }
        if matcher.matches(&entry.file_name().to_string_lossy()) {
            matched.push(entry.path());
        }
    }

    matched.sort();
    Ok(matched)
}

fn is_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?', '['])
}

fn compile(segment: &str) -> Result<Pattern> {
    Pattern::new(segment).map_err(|source| Error::InvalidPattern {
        component: segment.to_string(),
        source,
    })
}

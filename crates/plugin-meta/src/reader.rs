//! The seam through which package files are interpreted.
//!
//! The discovery engine is decoupled from any particular metadata syntax:
//! it reads candidate files through a [`MetadataReader`] and only ever
//! sees [`PackageMetadata`] values. [`TomlMetadataReader`] is the default
//! implementation for `.pkg` TOML files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::package::PackageMetadata;

/// Reads package metadata from a candidate file.
pub trait MetadataReader: Send {
    /// Read and validate the metadata stored at `path`.
    fn read(&self, path: &Path) -> Result<PackageMetadata>;
}

/// Reads packages whose metadata is the file's TOML content.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlMetadataReader;

impl MetadataReader for TomlMetadataReader {
    fn read(&self, path: &Path) -> Result<PackageMetadata> {
        if !path.exists() {
            return Err(Error::PackageNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        PackageMetadata::from_toml(&content)
    }
}

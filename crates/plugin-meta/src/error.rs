use std::path::PathBuf;

/// Errors that can occur while reading or validating package metadata.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to parse package metadata TOML.
    #[error("failed to parse package metadata: {0}")]
    MetadataParse(#[from] toml::de::Error),

    /// Package file not found at the expected path.
    #[error("package file not found: {0}")]
    PackageNotFound(PathBuf),

    /// Invalid semver version string.
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Invalid package name.
    #[error("invalid package name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Invalid platform tag string.
    #[error("invalid platform tag '{tag}': {reason}")]
    InvalidPlatformTag { tag: String, reason: String },

    /// Invalid extension declaration within a package.
    #[error("invalid extension declaration in package '{package}': {reason}")]
    InvalidDeclaration { package: String, reason: String },

    /// I/O error reading a package file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

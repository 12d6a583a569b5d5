use std::path::PathBuf;

/// Errors surfaced by the discovery engine.
///
/// Configuration errors (duplicate extension-point path, a host declaring
/// itself portable, an undeducible or unknown extension point) are always
/// fatal and never retried. A malformed package is fatal only when its
/// path was specified explicitly; candidates reached through wildcard
/// expansion are logged and skipped instead. Platform incompatibility and
/// unmet host-version requirements are never errors — those candidates
/// are skipped with a log entry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A second extension point claimed an already-registered path.
    #[error("the path '{path}' is already in use for another extension point")]
    DuplicateExtensionPoint { path: String },

    /// The host declared itself portable. A portable platform has no
    /// independent runtime and can never host anything.
    #[error("a host may not declare a portable platform tag")]
    PortableHost,

    /// No extension point could be deduced for an extension that declares
    /// no explicit path.
    #[error(
        "unable to deduce an extension point for type '{type_name}'; declare an explicit path on the extension to resolve"
    )]
    UndeduciblePoint { type_name: String },

    /// An explicitly-specified extension declared a path that names no
    /// registered extension point.
    #[error("extension '{type_name}' declares unknown extension point path '{path}'")]
    UnknownExtensionPath { type_name: String, path: String },

    /// An explicitly-specified candidate file could not be read as a
    /// package.
    #[error("specified package {path} could not be read")]
    MalformedPackage {
        path: PathBuf,
        #[source]
        source: plugin_meta::Error,
    },

    /// A candidate source directory does not exist.
    #[error("candidate source directory not found: {0}")]
    SourceNotFound(PathBuf),

    /// Pattern resolution failed while processing a manifest entry.
    #[error(transparent)]
    Pattern(#[from] plugin_fs::Error),

    /// Invalid metadata handed directly to the manager (not read from a
    /// candidate file).
    #[error(transparent)]
    Metadata(#[from] plugin_meta::Error),

    /// I/O error during directory scanning.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Package metadata model and reader for the plugin host.
//!
//! This crate defines the typed declaration model consumed by the
//! discovery engine: package identity, platform tags, extension and
//! extension-point declarations, and the [`MetadataReader`] seam through
//! which package files are interpreted. The engine itself never parses
//! files directly; it only sees [`PackageMetadata`] values.

pub mod error;
pub mod package;
pub mod platform;
pub mod reader;
pub mod version;

pub use error::{Error, Result};
pub use package::{
    ExtensionDecl, ExtensionPointDecl, PackageIdentity, PackageInfo, PackageMetadata,
};
pub use platform::{PlatformTag, RuntimeFamily};
pub use reader::{MetadataReader, TomlMetadataReader};

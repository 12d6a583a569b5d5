//! Plugin discovery and compatibility-resolution engine.
//!
//! Given a set of declared extension points and candidate component
//! packages found on disk, this crate discovers which packages provide
//! extensions, binds each extension to the correct extension point,
//! filters out packages that cannot run on the current host platform,
//! deduplicates competing versions of the same package, and exposes a
//! lazily-materialized registry of usable extension objects.
//!
//! The entry point is [`ExtensionManager`].

pub mod compat;
pub mod error;
pub mod manager;
pub mod node;
pub mod registry;
pub mod scan;
pub mod tracker;
pub mod typegraph;

/// File extension for candidate package files.
pub const PACKAGE_EXTENSION: &str = "pkg";

/// File extension for manifest files listing directories and file
/// patterns to scan for candidates.
pub const MANIFEST_EXTENSION: &str = "plugins";

pub use compat::can_host_load;
pub use error::{Error, Result};
pub use manager::{ExtensionManager, DEFAULT_TYPE_EXTENSIONS_PREFIX};
pub use node::{ConstructionError, ExtensionFactory, ExtensionNode, ExtensionObject, LoadStatus};
pub use registry::{ExtensionPoint, ExtensionPointRegistry};
pub use tracker::{CandidatePackage, CandidateTracker};
pub use typegraph::{TypeGraph, UNIVERSAL_ROOT};

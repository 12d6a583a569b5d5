//! Extended wildcard path resolution for plugin discovery.
//!
//! Less than a full-fledged globbing utility and more than standard
//! wildcard use: each `/`-separated pattern component may contain wildcard
//! characters, and a `**` component matches all directories recursively.

pub mod error;
pub mod finder;

pub use error::{Error, Result};
pub use finder::{resolve_directories, resolve_files};

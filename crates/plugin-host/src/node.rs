//! Extension nodes: one discovered extension, lazily instantiable.

use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

/// The object produced when an extension is instantiated.
pub type ExtensionObject = Box<dyn Any + Send>;

/// Constructs extension objects on demand.
///
/// There is no runtime reflection here: the embedding application decides
/// how a (package path, type name) pair becomes a live object — loading a
/// shared library, dispatching on a static table, or anything else.
pub trait ExtensionFactory: Send {
    /// Create the extension object for `type_name` found in the package
    /// at `package_path`.
    fn create(
        &self,
        package_path: &Path,
        type_name: &str,
    ) -> std::result::Result<ExtensionObject, Box<dyn std::error::Error + Send + Sync>>;
}

/// A failure while constructing an extension object, preserving the
/// original failure as its cause.
#[derive(Debug, thiserror::Error)]
#[error("error constructing extension object for '{type_name}'")]
pub struct ConstructionError {
    pub type_name: String,
    #[source]
    pub cause: Box<dyn std::error::Error + Send + Sync>,
}

/// Observable load state of an extension node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Unloaded,
    Loaded,
    Error,
}

/// Internal tagged state: the memoized object or the captured failure.
#[derive(Debug)]
enum LoadState {
    Unloaded,
    Loaded(ExtensionObject),
    Error(ConstructionError),
}

/// A single discovered extension installed on an extension point,
/// storing what is needed to activate the extension object just in time.
#[derive(Debug)]
pub struct ExtensionNode {
    package_path: PathBuf,
    package_version: semver::Version,
    type_name: String,
    path: Option<String>,
    description: Option<String>,
    enabled: bool,
    properties: HashMap<String, Vec<String>>,
    state: LoadState,
}

impl ExtensionNode {
    /// Construct a node for an extension found in the package at
    /// `package_path`. Nodes start enabled and unloaded.
    pub fn new(
        package_path: PathBuf,
        package_version: semver::Version,
        type_name: String,
    ) -> Self {
        Self {
            package_path,
            package_version,
            type_name,
            path: None,
            description: None,
            enabled: true,
            properties: HashMap::new(),
            state: LoadState::Unloaded,
        }
    }

    pub fn package_path(&self) -> &Path {
        &self.package_path
    }

    pub fn package_version(&self) -> &semver::Version {
        &self.package_version
    }

    /// Fully-qualified name of the extension type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The extension-point path this node is bound to. `None` only until
    /// discovery resolves it.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub(crate) fn set_path(&mut self, path: String) {
        self.path = Some(path);
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(crate) fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Names of all properties attached to this node.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Values of a named property. Unknown names yield an empty slice.
    pub fn property_values(&self, name: &str) -> &[String] {
        self.properties
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn add_property(&mut self, name: &str, value: String) {
        self.properties
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    /// Current load status.
    pub fn status(&self) -> LoadStatus {
        match self.state {
            LoadState::Unloaded => LoadStatus::Unloaded,
            LoadState::Loaded(_) => LoadStatus::Loaded,
            LoadState::Error(_) => LoadStatus::Error,
        }
    }

    /// The captured construction failure, present only when
    /// `status() == LoadStatus::Error`.
    pub fn last_error(&self) -> Option<&ConstructionError> {
        match &self.state {
            LoadState::Error(err) => Some(err),
            _ => None,
        }
    }

    /// The extension object, created through `factory` on first access
    /// and memoized. Construction failures are captured into the node's
    /// state rather than propagated; once failed, the node stays in the
    /// error state and this returns `None` without retrying.
    pub fn extension_object(&mut self, factory: &dyn ExtensionFactory) -> Option<&ExtensionObject> {
        if matches!(self.state, LoadState::Unloaded) {
            match factory.create(&self.package_path, &self.type_name) {
                Ok(object) => self.state = LoadState::Loaded(object),
                Err(cause) => {
                    warn!(
                        type_name = %self.type_name,
                        error = %cause,
                        "extension object construction failed"
                    );
                    self.state = LoadState::Error(ConstructionError {
                        type_name: self.type_name.clone(),
                        cause,
                    });
                }
            }
        }

        match &self.state {
            LoadState::Loaded(object) => Some(object),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExtensionNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            self.type_name,
            self.path.as_deref().unwrap_or("<unresolved>")
        )
    }
}

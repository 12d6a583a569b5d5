//! The orchestrator wiring discovery, tracking, compatibility, and the
//! extension point registry behind one public API.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use plugin_meta::version::parse_lenient;
use plugin_meta::{MetadataReader, PackageMetadata, PlatformTag, TomlMetadataReader};
use tracing::{debug, info, warn};

use crate::compat;
use crate::error::{Error, Result};
use crate::node::{ExtensionFactory, ExtensionNode, ExtensionObject};
use crate::registry::{ExtensionPoint, ExtensionPointRegistry};
use crate::scan::PackageScanner;
use crate::tracker::{CandidatePackage, CandidateTracker};
use crate::typegraph::TypeGraph;

/// Prefix used to derive a default path for extension points declared
/// without one: prefix plus the capability's short name.
pub const DEFAULT_TYPE_EXTENSIONS_PREFIX: &str = "/Host/TypeExtensions/";

/// Discovers, filters, and indexes extensions found on local storage.
///
/// All state is owned by the instance; an embedding application may hold
/// any number of independent managers. Discovery across tracked
/// candidates runs exactly once, on first access to the extension list.
/// The `&mut self` receiver is the single-flight gate: a manager shared
/// between threads belongs behind a `Mutex`, and reads are freely
/// shareable once discovery has completed.
pub struct ExtensionManager {
    registry: ExtensionPointRegistry,
    nodes: Vec<ExtensionNode>,
    tracker: CandidateTracker,
    sources: HashSet<PathBuf>,
    host: Option<PlatformTag>,
    reader: Box<dyn MetadataReader>,
    factory: Box<dyn ExtensionFactory>,
    type_graph: TypeGraph,
    default_prefix: String,
    discovered: bool,
}

impl ExtensionManager {
    /// Create a manager with the given extension object factory, reading
    /// package metadata as TOML and performing no host compatibility
    /// filtering until a host tag is supplied.
    pub fn new(factory: Box<dyn ExtensionFactory>) -> Self {
        Self {
            registry: ExtensionPointRegistry::new(),
            nodes: Vec::new(),
            tracker: CandidateTracker::new(),
            sources: HashSet::new(),
            host: None,
            reader: Box::new(TomlMetadataReader),
            factory,
            type_graph: TypeGraph::new(),
            default_prefix: DEFAULT_TYPE_EXTENSIONS_PREFIX.to_string(),
            discovered: false,
        }
    }

    /// Set the host platform tag candidates are gated against. Without
    /// one, compatibility checking short-circuits to allowed.
    pub fn with_host(mut self, host: PlatformTag) -> Self {
        self.host = Some(host);
        self
    }

    /// Replace the metadata reader.
    pub fn with_metadata_reader(mut self, reader: Box<dyn MetadataReader>) -> Self {
        self.reader = reader;
        self
    }

    /// Replace the default extension-point path prefix.
    pub fn with_default_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.default_prefix = prefix.into();
        self
    }

    /// The capability graph used for extension-point deduction. Hosts may
    /// pre-seed it; discovered declarations are merged in automatically.
    pub fn type_graph_mut(&mut self) -> &mut TypeGraph {
        &mut self.type_graph
    }

    // --- extension points ---

    /// Register the extension points declared by the given packages.
    ///
    /// A declaration without a path gets the default prefix plus the
    /// capability's short name. Fails on a duplicate path.
    pub fn register_extension_points<'m>(
        &mut self,
        packages: impl IntoIterator<Item = &'m PackageMetadata>,
    ) -> Result<()> {
        for package in packages {
            let identity = package.identity()?;
            info!(package = %identity, "registering extension points");

            for decl in &package.extension_points {
                let path = decl
                    .path
                    .clone()
                    .unwrap_or_else(|| format!("{}{}", self.default_prefix, short_name(&decl.capability)));

                let point = ExtensionPoint::new(
                    path,
                    decl.capability.clone(),
                    decl.description.clone(),
                    Some(identity.clone()),
                );
                info!(path = point.path(), capability = point.capability(), "found extension point");
                self.registry.register(point)?;
            }
        }

        Ok(())
    }

    /// All registered extension points, in registration order.
    pub fn extension_points(&self) -> impl Iterator<Item = &ExtensionPoint> {
        self.registry.iter()
    }

    /// Look up an extension point by path.
    pub fn get_extension_point(&self, path: &str) -> Option<&ExtensionPoint> {
        self.registry.get(path)
    }

    /// Look up an extension point by its required capability type.
    pub fn get_extension_point_by_capability(&self, capability: &str) -> Option<&ExtensionPoint> {
        self.registry.get_by_capability(capability)
    }

    // --- candidate sources ---

    /// Scan a root directory for candidate packages. Idempotent per
    /// canonical path; a missing directory is an error since sources are
    /// explicit configuration.
    pub fn add_candidate_source(&mut self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Err(Error::SourceNotFound(dir.to_path_buf()));
        }

        let key = dunce::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        if !self.sources.insert(key) {
            debug!(directory = %dir.display(), "candidate source already added");
            return Ok(());
        }

        PackageScanner::new(&*self.reader, &mut self.tracker).scan_directory(dir, false)
    }

    /// The tracked candidates, duplicate-free by package name.
    pub fn candidates(&self) -> impl Iterator<Item = &CandidatePackage> {
        self.tracker.candidates()
    }

    // --- extensions ---

    /// All discovered extension nodes, triggering the one-time discovery
    /// pass across tracked candidates on first access.
    pub fn extensions(&mut self) -> Result<&[ExtensionNode]> {
        self.ensure_discovered()?;
        Ok(&self.nodes)
    }

    /// The first node installed on the point at `path`, if any.
    pub fn get_extension_node(&mut self, path: &str) -> Result<Option<&ExtensionNode>> {
        Ok(self.get_extension_nodes(path, false)?.into_iter().next())
    }

    /// The nodes installed on the point at `path`, in installation
    /// order. Disabled nodes are filtered out unless requested. An
    /// unknown path yields an empty list.
    pub fn get_extension_nodes(
        &mut self,
        path: &str,
        include_disabled: bool,
    ) -> Result<Vec<&ExtensionNode>> {
        self.ensure_discovered()?;
        Ok(self.nodes_of(self.registry.index_of(path), include_disabled))
    }

    /// Like [`ExtensionManager::get_extension_nodes`], addressing the
    /// point by required capability type.
    pub fn get_extension_nodes_by_capability(
        &mut self,
        capability: &str,
        include_disabled: bool,
    ) -> Result<Vec<&ExtensionNode>> {
        self.ensure_discovered()?;
        Ok(self.nodes_of(self.registry.index_by_capability(capability), include_disabled))
    }

    fn nodes_of(&self, point_idx: Option<usize>, include_disabled: bool) -> Vec<&ExtensionNode> {
        let Some(idx) = point_idx else {
            return Vec::new();
        };
        self.registry
            .point(idx)
            .installed()
            .iter()
            .map(|&node_idx| &self.nodes[node_idx])
            .filter(|node| include_disabled || node.is_enabled())
            .collect()
    }

    /// Enable or disable every extension with the given type name.
    pub fn enable_extension(&mut self, type_name: &str, enabled: bool) -> Result<()> {
        self.ensure_discovered()?;
        for node in &mut self.nodes {
            if node.type_name() == type_name {
                node.set_enabled(enabled);
            }
        }
        Ok(())
    }

    /// The extension object for the named type, constructed on first
    /// access. Returns `Ok(None)` when no such extension exists or its
    /// construction failed; consult the node's status and last error in
    /// the latter case.
    pub fn extension_object(&mut self, type_name: &str) -> Result<Option<&ExtensionObject>> {
        self.ensure_discovered()?;
        let factory = &*self.factory;
        Ok(self
            .nodes
            .iter_mut()
            .find(|node| node.type_name() == type_name)
            .and_then(|node| node.extension_object(factory)))
    }

    // --- discovery ---

    /// Run the one-time discovery pass if it has not happened yet.
    ///
    /// The flag is set before the walk: configuration errors are
    /// surfaced to the triggering caller once and never retried.
    fn ensure_discovered(&mut self) -> Result<()> {
        if self.discovered {
            return Ok(());
        }
        self.discovered = true;

        // Sorted walk so installation order does not depend on map order.
        let mut candidates: Vec<CandidatePackage> = self.tracker.candidates().cloned().collect();
        candidates.sort_by(|a, b| a.name().cmp(b.name()));

        info!(candidates = candidates.len(), "discovering extensions");
        for candidate in &candidates {
            self.discover_candidate(candidate)?;
        }

        Ok(())
    }

    fn discover_candidate(&mut self, candidate: &CandidatePackage) -> Result<()> {
        if let Some(host) = &self.host {
            if !compat::can_host_load(host, candidate.platform_tag())? {
                info!(
                    package = candidate.name(),
                    platform = %candidate.platform_tag(),
                    "candidate cannot be loaded on this host platform"
                );
                return Ok(());
            }
        }

        // Declared capability information feeds the deduction graph.
        for decl in &candidate.metadata().extensions {
            self.type_graph.insert(
                &decl.type_name,
                decl.implements.iter().cloned(),
                decl.inherits.clone(),
            );
        }

        for decl in &candidate.metadata().extensions {
            self.install_extension(candidate, decl)?;
        }

        Ok(())
    }

    fn install_extension(
        &mut self,
        candidate: &CandidatePackage,
        decl: &plugin_meta::ExtensionDecl,
    ) -> Result<()> {
        let point_idx = match &decl.path {
            Some(path) => match self.registry.index_of(path) {
                Some(idx) => idx,
                None if candidate.from_wildcard() => {
                    warn!(
                        type_name = %decl.type_name,
                        path = %path,
                        "skipping extension with unknown point path"
                    );
                    return Ok(());
                }
                None => {
                    return Err(Error::UnknownExtensionPath {
                        type_name: decl.type_name.clone(),
                        path: path.clone(),
                    });
                }
            },
            None => match self.registry.deduce_index(&self.type_graph, &decl.type_name) {
                Some(idx) => {
                    debug!(
                        type_name = %decl.type_name,
                        path = self.registry.point(idx).path(),
                        "deduced extension point"
                    );
                    idx
                }
                None => {
                    return Err(Error::UndeduciblePoint {
                        type_name: decl.type_name.clone(),
                    });
                }
            },
        };

        if let Some(ref required) = decl.requires_host {
            let required = parse_lenient(required)?;
            let declared_by = self.registry.point(point_idx).declared_by();
            if let Some(identity) = declared_by {
                if required > identity.version {
                    warn!(
                        type_name = %decl.type_name,
                        required = %required,
                        host = %identity,
                        "ignoring extension, host version requirement not met"
                    );
                    return Ok(());
                }
            }
        }

        let mut node = ExtensionNode::new(
            candidate.path().to_path_buf(),
            candidate.version().clone(),
            decl.type_name.clone(),
        );
        node.set_path(self.registry.point(point_idx).path().to_string());
        node.set_description(decl.description.clone());
        node.set_enabled(decl.enabled);

        // Sorted for deterministic property order across runs.
        let mut property_names: Vec<&String> = decl.properties.keys().collect();
        property_names.sort();
        for name in property_names {
            for value in &decl.properties[name] {
                node.add_property(name, value.clone());
            }
        }

        info!(type_name = %decl.type_name, path = node.path().unwrap_or(""), "installed extension");
        let node_idx = self.nodes.len();
        self.nodes.push(node);
        self.registry.install(point_idx, node_idx);

        Ok(())
    }
}

/// The short name of a fully-qualified type: the text after the last
/// `.` or `::` separator.
fn short_name(type_name: &str) -> &str {
    type_name
        .rsplit(['.', ':'])
        .next()
        .unwrap_or(type_name)
}

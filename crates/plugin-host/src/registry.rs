//! Extension points and the path-indexed registry over them.

use std::collections::{HashMap, HashSet};

use plugin_meta::PackageIdentity;

use crate::error::{Error, Result};
use crate::typegraph::TypeGraph;

/// A named slot, identified by a unique tree-structured path, into which
/// extensions implementing a required capability may be installed.
///
/// Immutable after registration except for its list of installed nodes,
/// which grows monotonically during extension discovery.
#[derive(Debug, Clone)]
pub struct ExtensionPoint {
    path: String,
    capability: String,
    description: Option<String>,
    declared_by: Option<PackageIdentity>,
    installed: Vec<usize>,
}

impl ExtensionPoint {
    pub fn new(
        path: String,
        capability: String,
        description: Option<String>,
        declared_by: Option<PackageIdentity>,
    ) -> Self {
        Self {
            path,
            capability,
            description,
            declared_by,
            installed: Vec::new(),
        }
    }

    /// The unique path identifying this extension point.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The fully-qualified capability name extensions must satisfy.
    pub fn capability(&self) -> &str {
        &self.capability
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Identity of the package that declared this point, when known.
    pub fn declared_by(&self) -> Option<&PackageIdentity> {
        self.declared_by.as_ref()
    }

    /// Indices into the manager's flat node list, in installation order.
    pub fn installed(&self) -> &[usize] {
        &self.installed
    }
}

/// Path- and capability-indexed registry of extension points.
#[derive(Debug, Default)]
pub struct ExtensionPointRegistry {
    points: Vec<ExtensionPoint>,
    path_index: HashMap<String, usize>,
}

impl ExtensionPointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extension point. Fails if its path is already in use.
    pub fn register(&mut self, point: ExtensionPoint) -> Result<()> {
        if self.path_index.contains_key(point.path()) {
            return Err(Error::DuplicateExtensionPoint {
                path: point.path().to_string(),
            });
        }
        self.path_index
            .insert(point.path().to_string(), self.points.len());
        self.points.push(point);
        Ok(())
    }

    /// Look up a point by path. Unknown paths return `None`.
    pub fn get(&self, path: &str) -> Option<&ExtensionPoint> {
        self.index_of(path).map(|idx| &self.points[idx])
    }

    /// Look up a point by its required capability type. Unknown types
    /// return `None`.
    pub fn get_by_capability(&self, capability: &str) -> Option<&ExtensionPoint> {
        self.index_by_capability(capability)
            .map(|idx| &self.points[idx])
    }

    pub(crate) fn index_of(&self, path: &str) -> Option<usize> {
        self.path_index.get(path).copied()
    }

    pub(crate) fn index_by_capability(&self, capability: &str) -> Option<usize> {
        self.points.iter().position(|p| p.capability == capability)
    }

    pub(crate) fn point(&self, idx: usize) -> &ExtensionPoint {
        &self.points[idx]
    }

    /// Install a node (by flat-list index) into a point.
    pub(crate) fn install(&mut self, point_idx: usize, node_idx: usize) {
        self.points[point_idx].installed.push(node_idx);
    }

    /// Deduce the extension point for a type that declares no explicit
    /// path, walking the type's capability hierarchy through `graph`.
    ///
    /// The type itself is checked first, then its implemented interfaces
    /// depth-first in declaration order, then its supertype chain (the
    /// universal root excluded). The first match wins. Returns `None`
    /// when nothing in the hierarchy satisfies a registered point.
    pub fn deduce(&self, graph: &TypeGraph, type_name: &str) -> Option<&ExtensionPoint> {
        self.deduce_index(graph, type_name)
            .map(|idx| &self.points[idx])
    }

    pub(crate) fn deduce_index(&self, graph: &TypeGraph, type_name: &str) -> Option<usize> {
        let mut seen = HashSet::new();
        self.deduce_walk(graph, type_name, &mut seen)
    }

    fn deduce_walk<'t>(
        &self,
        graph: &'t TypeGraph,
        type_name: &'t str,
        seen: &mut HashSet<&'t str>,
    ) -> Option<usize> {
        // Declared graphs may contain cycles; visit each type once.
        if !seen.insert(type_name) {
            return None;
        }

        if let Some(idx) = self.index_by_capability(type_name) {
            return Some(idx);
        }

        for iface in graph.interfaces_of(type_name) {
            if let Some(idx) = self.deduce_walk(graph, iface, seen) {
                return Some(idx);
            }
        }

        graph
            .base_of(type_name)
            .and_then(|base| self.deduce_walk(graph, base, seen))
    }

    /// All registered points, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ExtensionPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

//! An explicit interfaces-of / base-of graph over type names.
//!
//! Extension-point deduction needs to walk an extension type's capability
//! hierarchy. Rather than introspecting a real type system, the engine
//! consults this injected graph, seeded from host registrations and from
//! the `implements` / `inherits` fields of discovered declarations.

use std::collections::HashMap;

/// The universal root type. The supertype chain is walked up to, but
/// never including, this type.
pub const UNIVERSAL_ROOT: &str = "Object";

/// A capability graph: which interfaces each type implements (in
/// declaration order) and what its supertype is.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    interfaces: HashMap<String, Vec<String>>,
    bases: HashMap<String, String>,
}

impl TypeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a type's implemented interfaces and optional supertype.
    ///
    /// Repeated inserts for the same type merge: interfaces not yet known
    /// are appended in order, and the base is set if not already known.
    pub fn insert(
        &mut self,
        type_name: &str,
        implements: impl IntoIterator<Item = String>,
        inherits: Option<String>,
    ) {
        let known = self.interfaces.entry(type_name.to_string()).or_default();
        for iface in implements {
            if !known.contains(&iface) {
                known.push(iface);
            }
        }
        if let Some(base) = inherits {
            self.bases.entry(type_name.to_string()).or_insert(base);
        }
    }

    /// The interfaces a type implements, in declaration order.
    pub fn interfaces_of(&self, type_name: &str) -> &[String] {
        self.interfaces
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The supertype of a type, if one is known and it is not the
    /// universal root.
    pub fn base_of(&self, type_name: &str) -> Option<&str> {
        self.bases
            .get(type_name)
            .map(String::as_str)
            .filter(|base| *base != UNIVERSAL_ROOT)
    }
}

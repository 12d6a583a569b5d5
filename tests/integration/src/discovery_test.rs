//! End-to-end integration tests for the discovery pipeline
//!
//! These tests exercise the complete flow: extension-point registration ->
//! manifest-driven scanning -> platform gating -> point binding -> lazy
//! extension object construction.

use std::path::Path;

use plugin_host::{Error, ExtensionFactory, ExtensionManager, ExtensionObject, LoadStatus};
use plugin_meta::PackageMetadata;
use plugin_test_utils::PackageTree;
use pretty_assertions::assert_eq;

struct StringFactory;

impl ExtensionFactory for StringFactory {
    fn create(
        &self,
        _package_path: &Path,
        type_name: &str,
    ) -> Result<ExtensionObject, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Box::new(type_name.to_string()))
    }
}

struct RefusingFactory;

impl ExtensionFactory for RefusingFactory {
    fn create(
        &self,
        _package_path: &Path,
        _type_name: &str,
    ) -> Result<ExtensionObject, Box<dyn std::error::Error + Send + Sync>> {
        Err("no objects today".into())
    }
}

const HOST_TOML: &str = r#"
[package]
name = "host-app"
version = "3.1.0"
platform = "modern:5.0"

[[extension_point]]
path = "/Host/TypeExtensions/IReporter"
capability = "host.IReporter"
description = "Result reporting slot"

[[extension_point]]
path = "/Host/TypeExtensions/IImporter"
capability = "host.IImporter"
"#;

fn host_manager() -> ExtensionManager {
    let host = PackageMetadata::from_toml(HOST_TOML).unwrap();
    let mut mgr =
        ExtensionManager::new(Box::new(StringFactory)).with_host("modern:5.0".parse().unwrap());
    mgr.register_extension_points([&host]).unwrap();
    mgr
}

/// The complete happy path: a manifest fans out over addin directories,
/// packages bind to points, objects materialize lazily.
#[test]
fn test_full_discovery_flow() {
    let tree = PackageTree::new();
    tree.file(
        "addons/reporter.pkg",
        r#"
[package]
name = "fancy-reporter"
version = "2.0.0"
platform = "modern:5.0"

[[extension]]
type = "fancy.Reporter"
path = "/Host/TypeExtensions/IReporter"
description = "Renders results"

[extension.properties]
format = ["html", "text"]
"#,
    );
    tree.file(
        "addons/importer.pkg",
        r#"
[package]
name = "csv-importer"
version = "1.4.0"
platform = "portable:2.1"

[[extension]]
type = "csv.Importer"
implements = ["host.IImporter"]
"#,
    );
    tree.manifest("main.plugins", &["addons/"]);

    let mut mgr = host_manager();
    mgr.add_candidate_source(tree.root()).unwrap();

    assert_eq!(mgr.extensions().unwrap().len(), 2);

    let reporters = mgr
        .get_extension_nodes("/Host/TypeExtensions/IReporter", false)
        .unwrap();
    assert_eq!(reporters.len(), 1);
    assert_eq!(reporters[0].type_name(), "fancy.Reporter");
    assert_eq!(reporters[0].description(), Some("Renders results"));
    assert_eq!(reporters[0].property_values("format"), ["html", "text"]);
    assert_eq!(
        reporters[0].package_version(),
        &semver::Version::new(2, 0, 0)
    );

    // The importer declared no path; the point is deduced from its
    // implemented capability.
    let importers = mgr
        .get_extension_nodes_by_capability("host.IImporter", false)
        .unwrap();
    assert_eq!(importers.len(), 1);
    assert_eq!(importers[0].path(), Some("/Host/TypeExtensions/IImporter"));

    let object = mgr.extension_object("fancy.Reporter").unwrap().unwrap();
    assert_eq!(object.downcast_ref::<String>().unwrap(), "fancy.Reporter");
}

/// Wildcard manifest entries reach versioned sibling directories; the
/// highest version of a package wins regardless of scan order.
#[test]
fn test_version_dedup_across_wildcard_directories() {
    let tree = PackageTree::new();
    tree.extension_package(
        "reporter-v1/reporter.pkg",
        "fancy-reporter",
        "1.0.0",
        "modern:5.0",
        "fancy.Reporter",
        "/Host/TypeExtensions/IReporter",
    );
    tree.extension_package(
        "reporter-v2/reporter.pkg",
        "fancy-reporter",
        "2.3.0",
        "modern:5.0",
        "fancy.Reporter",
        "/Host/TypeExtensions/IReporter",
    );
    tree.manifest("main.plugins", &["reporter-*/"]);

    let mut mgr = host_manager();
    mgr.add_candidate_source(tree.root()).unwrap();

    let nodes = mgr.extensions().unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].package_version(), &semver::Version::new(2, 3, 0));
}

/// A `**` manifest entry descends arbitrarily deep.
#[test]
fn test_recursive_wildcard_manifest_entry() {
    let tree = PackageTree::new();
    tree.extension_package(
        "vendor/a/deep/reporter.pkg",
        "deep-reporter",
        "1.0.0",
        "modern:5.0",
        "deep.Reporter",
        "/Host/TypeExtensions/IReporter",
    );
    tree.manifest("main.plugins", &["vendor/**/"]);

    let mut mgr = host_manager();
    mgr.add_candidate_source(tree.root()).unwrap();
    assert_eq!(mgr.extensions().unwrap().len(), 1);
}

/// Platform gating: a modern host ignores legacy candidates but accepts
/// portable ones.
#[test]
fn test_platform_gating_filters_candidates() {
    let tree = PackageTree::new();
    tree.extension_package(
        "old.pkg",
        "old-reporter",
        "1.0.0",
        "legacy:4.8",
        "old.Reporter",
        "/Host/TypeExtensions/IReporter",
    );
    tree.extension_package(
        "portable.pkg",
        "portable-reporter",
        "1.0.0",
        "portable:2.1",
        "portable.Reporter",
        "/Host/TypeExtensions/IReporter",
    );

    let mut mgr = host_manager();
    mgr.add_candidate_source(tree.root()).unwrap();

    let nodes = mgr
        .get_extension_nodes("/Host/TypeExtensions/IReporter", false)
        .unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].type_name(), "portable.Reporter");
}

/// Disabled-by-default extensions stay invisible until enabled at runtime.
#[test]
fn test_enable_disable_round_trip() {
    let tree = PackageTree::new();
    tree.file(
        "sleepy.pkg",
        r#"
[package]
name = "sleepy"
version = "1.0.0"
platform = "modern:5.0"

[[extension]]
type = "sleepy.Reporter"
path = "/Host/TypeExtensions/IReporter"
enabled = false
"#,
    );

    let mut mgr = host_manager();
    mgr.add_candidate_source(tree.root()).unwrap();

    let path = "/Host/TypeExtensions/IReporter";
    assert!(mgr.get_extension_nodes(path, false).unwrap().is_empty());
    assert_eq!(mgr.get_extension_nodes(path, true).unwrap().len(), 1);

    mgr.enable_extension("sleepy.Reporter", true).unwrap();
    assert_eq!(mgr.get_extension_nodes(path, false).unwrap().len(), 1);

    mgr.enable_extension("sleepy.Reporter", false).unwrap();
    assert!(mgr.get_extension_nodes(path, false).unwrap().is_empty());
}

/// Discovery happens once; packages dropped in afterwards are not seen
/// until a fresh manager scans them.
#[test]
fn test_discovery_is_single_shot() {
    let tree = PackageTree::new();
    tree.extension_package(
        "first.pkg",
        "first",
        "1.0.0",
        "modern:5.0",
        "first.Reporter",
        "/Host/TypeExtensions/IReporter",
    );

    let mut mgr = host_manager();
    mgr.add_candidate_source(tree.root()).unwrap();
    assert_eq!(mgr.extensions().unwrap().len(), 1);

    tree.extension_package(
        "second.pkg",
        "second",
        "1.0.0",
        "modern:5.0",
        "second.Reporter",
        "/Host/TypeExtensions/IReporter",
    );
    assert_eq!(mgr.extensions().unwrap().len(), 1);

    let mut fresh = host_manager();
    fresh.add_candidate_source(tree.root()).unwrap();
    assert_eq!(fresh.extensions().unwrap().len(), 2);
}

/// A factory failure is captured on the node and never torn down the
/// whole manager.
#[test]
fn test_factory_failure_is_isolated_to_the_node() {
    let tree = PackageTree::new();
    tree.extension_package(
        "reporter.pkg",
        "fancy-reporter",
        "1.0.0",
        "modern:5.0",
        "fancy.Reporter",
        "/Host/TypeExtensions/IReporter",
    );

    let host = PackageMetadata::from_toml(HOST_TOML).unwrap();
    let mut mgr = ExtensionManager::new(Box::new(RefusingFactory));
    mgr.register_extension_points([&host]).unwrap();
    mgr.add_candidate_source(tree.root()).unwrap();

    assert!(mgr.extension_object("fancy.Reporter").unwrap().is_none());

    let node = mgr
        .get_extension_node("/Host/TypeExtensions/IReporter")
        .unwrap()
        .unwrap();
    assert_eq!(node.status(), LoadStatus::Error);
    let err = node.last_error().unwrap();
    assert_eq!(err.type_name, "fancy.Reporter");
    assert_eq!(err.cause.to_string(), "no objects today");
}

/// A manifest lists an explicit package path that is malformed: the whole
/// scan fails loudly instead of silently dropping the entry.
#[test]
fn test_explicit_malformed_entry_fails_the_scan() {
    let tree = PackageTree::new();
    tree.file("broken.pkg", "this is not toml [[[");
    tree.manifest("main.plugins", &["broken.pkg"]);

    let mut mgr = host_manager();
    let err = mgr.add_candidate_source(tree.root()).unwrap_err();
    assert!(matches!(err, Error::MalformedPackage { .. }));
}

/// The same tree added through two spellings of the path is scanned once.
#[test]
fn test_source_added_twice_counts_once() {
    let tree = PackageTree::new();
    tree.extension_package(
        "reporter.pkg",
        "fancy-reporter",
        "1.0.0",
        "modern:5.0",
        "fancy.Reporter",
        "/Host/TypeExtensions/IReporter",
    );

    let mut mgr = host_manager();
    mgr.add_candidate_source(tree.root()).unwrap();
    mgr.add_candidate_source(&tree.root().join(".")).unwrap();

    assert_eq!(mgr.candidates().count(), 1);
    assert_eq!(mgr.extensions().unwrap().len(), 1);
}

//! Package metadata declarations loaded from `.pkg` files.
//!
//! A package file is TOML describing the package's identity and platform,
//! the extension points it declares (host packages), and the extensions it
//! provides (plugin packages).
//!
//! # Example TOML
//!
//! ```toml
//! [package]
//! name = "frobnicator"
//! version = "1.2.0"
//! platform = "modern:5.0"
//!
//! [[extension]]
//! type = "frobnicator.CoolExtension"
//! path = "/Host/TypeExtensions/IFrobnicator"
//! description = "Frobnicates on demand"
//! implements = ["host.IFrobnicator"]
//!
//! [extension.properties]
//! priority = ["1"]
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::platform::PlatformTag;
use crate::version::parse_lenient;

/// Default minimum runtime assumed when a package declares neither a
/// platform tag nor a minimum runtime version.
fn default_min_runtime() -> semver::Version {
    semver::Version::new(4, 0, 0)
}

/// Complete metadata for one candidate package.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PackageMetadata {
    /// Package identity and platform.
    pub package: PackageInfo,
    /// Extension points declared by this package.
    #[serde(default, rename = "extension_point")]
    pub extension_points: Vec<ExtensionPointDecl>,
    /// Extensions provided by this package.
    #[serde(default, rename = "extension")]
    pub extensions: Vec<ExtensionDecl>,
}

/// The `[package]` table: identity plus platform information.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PackageInfo {
    /// Package name. Candidates are deduplicated by name.
    pub name: String,
    /// Full semver version string.
    pub version: String,
    /// Platform tag, `<family>:<version>` (e.g. `modern:5.0`).
    #[serde(default)]
    pub platform: Option<String>,
    /// Minimum runtime version, used to derive an implicit legacy tag
    /// when no platform is declared.
    #[serde(default)]
    pub min_runtime: Option<String>,
}

/// One `[[extension_point]]` declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionPointDecl {
    /// Unique tree-structured identifier. When omitted, the host derives
    /// a default path from the capability's short name.
    #[serde(default)]
    pub path: Option<String>,
    /// Fully-qualified name of the capability extensions must satisfy.
    pub capability: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
}

/// One `[[extension]]` declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionDecl {
    /// Fully-qualified name of the extension type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Target extension-point path. When omitted, the host deduces the
    /// point from the type's capability set.
    #[serde(default)]
    pub path: Option<String>,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the extension starts enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Minimum host version required by this extension.
    #[serde(default)]
    pub requires_host: Option<String>,
    /// Capabilities the extension type implements, in declaration order.
    #[serde(default)]
    pub implements: Vec<String>,
    /// Supertype of the extension type, if any.
    #[serde(default)]
    pub inherits: Option<String>,
    /// Named multi-valued properties attached to the extension.
    #[serde(default)]
    pub properties: HashMap<String, Vec<String>>,
}

fn default_true() -> bool {
    true
}

/// A package identity: name plus version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageIdentity {
    pub name: String,
    pub version: semver::Version,
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

impl PackageMetadata {
    /// Parse package metadata from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let metadata: Self = toml::from_str(content)?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// The package's identity (name, parsed version).
    ///
    /// `validate` guarantees the version parses, so this never fails after
    /// construction through [`PackageMetadata::from_toml`].
    pub fn identity(&self) -> Result<PackageIdentity> {
        let version = semver::Version::parse(&self.package.version).map_err(|e| {
            Error::InvalidVersion {
                version: self.package.version.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(PackageIdentity {
            name: self.package.name.clone(),
            version,
        })
    }

    /// The package's platform tag.
    ///
    /// Declared tags are parsed as written. A package without a declared
    /// platform gets an implicit legacy tag at its minimum runtime version
    /// (default 4.0 when that is also absent).
    pub fn platform_tag(&self) -> Result<PlatformTag> {
        if let Some(ref tag) = self.package.platform {
            return tag.parse();
        }

        let min_runtime = match self.package.min_runtime {
            Some(ref v) => parse_lenient(v)?,
            None => default_min_runtime(),
        };
        Ok(PlatformTag::implicit_legacy(min_runtime))
    }

    /// Validate the metadata fields.
    fn validate(&self) -> Result<()> {
        let name = &self.package.name;
        if name.is_empty() {
            return Err(Error::InvalidName {
                name: name.clone(),
                reason: "package name must not be empty".to_string(),
            });
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(Error::InvalidName {
                name: name.clone(),
                reason: "package name must contain only alphanumeric characters, hyphens, underscores, or dots".to_string(),
            });
        }

        semver::Version::parse(&self.package.version).map_err(|e| Error::InvalidVersion {
            version: self.package.version.clone(),
            reason: e.to_string(),
        })?;

        // Platform tag and runtime fallback must parse if declared.
        self.platform_tag()?;

        for point in &self.extension_points {
            if point.capability.is_empty() {
                return Err(Error::InvalidDeclaration {
                    package: name.clone(),
                    reason: "extension point capability must not be empty".to_string(),
                });
            }
            validate_path(name, point.path.as_deref())?;
        }

        for ext in &self.extensions {
            if ext.type_name.is_empty() {
                return Err(Error::InvalidDeclaration {
                    package: name.clone(),
                    reason: "extension type must not be empty".to_string(),
                });
            }
            validate_path(name, ext.path.as_deref())?;
            if let Some(ref required) = ext.requires_host {
                parse_lenient(required)?;
            }
        }

        Ok(())
    }
}

fn validate_path(package: &str, path: Option<&str>) -> Result<()> {
    if let Some(p) = path {
        if !p.starts_with('/') {
            return Err(Error::InvalidDeclaration {
                package: package.to_string(),
                reason: format!("path '{p}' must start with '/'"),
            });
        }
    }
    Ok(())
}

//! Platform tags describing which runtime family a package or host targets.
//!
//! A tag is written `<family>:<version>`, e.g. `legacy:4.0`, `modern:5.0`,
//! `portable:2.1`. The version is lenient (`major.minor` allowed).

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::version::parse_lenient;

/// The runtime family a platform tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeFamily {
    /// The older runtime line. Versioned by major release.
    Legacy,
    /// The current runtime line. Versioned by major release.
    Modern,
    /// A version-only compatibility surface with no independent runtime.
    /// A portable package can be hosted, but can never itself host.
    Portable,
}

impl RuntimeFamily {
    fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Modern => "modern",
            Self::Portable => "portable",
        }
    }
}

impl fmt::Display for RuntimeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed platform tag: runtime family plus version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTag {
    pub family: RuntimeFamily,
    pub version: semver::Version,
}

impl PlatformTag {
    pub fn new(family: RuntimeFamily, version: semver::Version) -> Self {
        Self { family, version }
    }

    /// The implicit tag for a package whose metadata declares no platform:
    /// a legacy tag at the package's minimum runtime version.
    pub fn implicit_legacy(min_runtime: semver::Version) -> Self {
        Self::new(RuntimeFamily::Legacy, min_runtime)
    }
}

impl FromStr for PlatformTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (family_str, version_str) =
            s.split_once(':')
                .ok_or_else(|| Error::InvalidPlatformTag {
                    tag: s.to_string(),
                    reason: "expected '<family>:<version>'".to_string(),
                })?;

        let family = match family_str.trim() {
            "legacy" => RuntimeFamily::Legacy,
            "modern" => RuntimeFamily::Modern,
            "portable" => RuntimeFamily::Portable,
            other => {
                return Err(Error::InvalidPlatformTag {
                    tag: s.to_string(),
                    reason: format!(
                        "unknown runtime family '{other}' (expected legacy, modern, or portable)"
                    ),
                });
            }
        };

        let version = parse_lenient(version_str).map_err(|_| Error::InvalidPlatformTag {
            tag: s.to_string(),
            reason: format!("invalid version '{}'", version_str.trim()),
        })?;

        Ok(Self { family, version })
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.family, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("legacy:4.0", RuntimeFamily::Legacy, 4, 0, 0)]
    #[case("modern:5.0", RuntimeFamily::Modern, 5, 0, 0)]
    #[case("portable:2.1", RuntimeFamily::Portable, 2, 1, 0)]
    #[case("legacy:4.7.2", RuntimeFamily::Legacy, 4, 7, 2)]
    #[case(" modern :6", RuntimeFamily::Modern, 6, 0, 0)]
    fn test_parse(
        #[case] input: &str,
        #[case] family: RuntimeFamily,
        #[case] major: u64,
        #[case] minor: u64,
        #[case] patch: u64,
    ) {
        let tag: PlatformTag = input.parse().unwrap();
        assert_eq!(tag.family, family);
        assert_eq!(tag.version, semver::Version::new(major, minor, patch));
    }

    #[rstest]
    #[case("legacy")] // missing version
    #[case("legacy:abc")]
    #[case("net:4.0")] // unknown family
    #[case("")]
    fn test_parse_rejects(#[case] input: &str) {
        assert!(matches!(
            input.parse::<PlatformTag>(),
            Err(Error::InvalidPlatformTag { .. })
        ));
    }

    #[test]
    fn test_display_round_trip() {
        let tag: PlatformTag = "legacy:4.7.2".parse().unwrap();
        assert_eq!(tag.to_string(), "legacy:4.7.2");
    }

    #[test]
    fn test_implicit_legacy() {
        let tag = PlatformTag::implicit_legacy(semver::Version::new(2, 0, 0));
        assert_eq!(tag.family, RuntimeFamily::Legacy);
        assert_eq!(tag.version.major, 2);
    }
}

//! Lenient version parsing.
//!
//! Platform tags and host version requirements are commonly written as
//! `major.minor` (e.g. `4.0`, `4.7.2` is also fine). Missing components
//! default to zero.

use crate::error::{Error, Result};

/// Parse a version string, tolerating missing minor/patch components.
///
/// - `"4"` -> `4.0.0`
/// - `"4.7"` -> `4.7.0`
/// - `"4.7.2"` -> `4.7.2`
pub fn parse_lenient(s: &str) -> Result<semver::Version> {
    let s = s.trim();

    if let Ok(v) = semver::Version::parse(s) {
        return Ok(v);
    }

    // Append zero components for short forms.
    for suffix in [".0", ".0.0"] {
        let padded = format!("{s}{suffix}");
        if let Ok(v) = semver::Version::parse(&padded) {
            return Ok(v);
        }
    }

    Err(Error::InvalidVersion {
        version: s.to_string(),
        reason: "expected major[.minor[.patch]]".to_string(),
    })
}

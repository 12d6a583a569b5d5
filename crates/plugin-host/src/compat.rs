//! The host/candidate platform compatibility decision matrix.

use plugin_meta::{PlatformTag, RuntimeFamily};

use crate::error::{Error, Result};

/// Minimum portable-spec version a legacy host can load.
fn legacy_portable_floor() -> semver::Version {
    semver::Version::new(4, 7, 2)
}

/// Decide whether a host can load a candidate package.
///
/// | Host     | Candidate          | Result |
/// |----------|--------------------|--------|
/// | portable | any                | configuration error |
/// | modern   | modern or portable | allowed |
/// | modern   | legacy             | rejected |
/// | legacy   | legacy             | allowed iff host major = 4 or candidate major < 4 |
/// | legacy   | portable           | allowed iff candidate >= 4.7.2 |
/// | legacy   | modern             | rejected |
///
/// A portable host is a hard configuration error rather than a rejection:
/// portable platforms have no independent runtime and can never host.
pub fn can_host_load(host: &PlatformTag, candidate: &PlatformTag) -> Result<bool> {
    match host.family {
        RuntimeFamily::Portable => Err(Error::PortableHost),
        RuntimeFamily::Modern => Ok(matches!(
            candidate.family,
            RuntimeFamily::Modern | RuntimeFamily::Portable
        )),
        RuntimeFamily::Legacy => Ok(match candidate.family {
            RuntimeFamily::Legacy => {
                host.version.major == 4 || candidate.version.major < 4
            }
            RuntimeFamily::Portable => candidate.version >= legacy_portable_floor(),
            RuntimeFamily::Modern => false,
        }),
    }
}

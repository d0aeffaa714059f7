//! Host library version, as seen by extensions at install time.

use crate::error::SpaceError;
use serde::{Deserialize, Serialize};

/// Version string of this crate, reported to extensions as the host version.
pub const HOST_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A `major.minor.patch` version triple.
///
/// Ordering is lexicographic over the three components. Pre-release and
/// build suffixes (`-rc.1`, `+sha`) are accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HostVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl HostVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The version of the running host.
    pub fn current() -> Self {
        HOST_VERSION
            .parse()
            .unwrap_or(Self::new(0, 0, 0))
    }
}

impl std::fmt::Display for HostVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl std::str::FromStr for HostVersion {
    type Err = SpaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SpaceError::InvalidVersion(s.to_string());
        let core = s
            .trim()
            .split(['-', '+'])
            .next()
            .ok_or_else(invalid)?;
        let mut parts = core.split('.');
        let mut next = || -> Result<u32, SpaceError> {
            parts
                .next()
                .ok_or_else(invalid)?
                .parse::<u32>()
                .map_err(|_| invalid())
        };
        let version = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

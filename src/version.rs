//! Release version parsing

use semver::Version;
use std::fmt;
use std::str::FromStr;

use crate::error::{ReleaseError, Result};

/// A validated release version.
///
/// Parsing is strict SemVer 2.0: `0.13.0` and `1.0.0-rc.1+build.5` are accepted,
/// `0.13` and `v0.13.0` are not. The input string is kept verbatim so that every
/// artifact receives exactly the string the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
    /// Parsed semantic version
    pub version: Version,
    raw: String,
}

impl ReleaseVersion {
    /// Parse and validate a version string
    pub fn parse(version_str: &str) -> Result<Self> {
        let version = Version::parse(version_str)
            .map_err(|e| ReleaseError::InvalidVersion(format!("{version_str}: {e}")))?;
        Ok(Self {
            version,
            raw: version_str.to_string(),
        })
    }

    /// The version string as written into artifacts
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when the version carries neither pre-release nor build metadata
    pub fn is_plain_release(&self) -> bool {
        self.version.pre.is_empty() && self.version.build.is_empty()
    }
}

impl FromStr for ReleaseVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.version.cmp(&other.version)
    }
}

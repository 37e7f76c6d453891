//! Three-part version parsing and ordering.

use std::fmt;
use std::str::FromStr;

use super::error::UpdateError;

/// Current version of aw.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A `major.minor.patch` version.
///
/// Field order gives the derived `Ord` its major-then-minor-then-patch
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemanticVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SemanticVersion {
    type Err = UpdateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_version(s)
    }
}

/// Parse `X.Y.Z` or `vX.Y.Z` into a [`SemanticVersion`].
pub fn parse_version(input: &str) -> Result<SemanticVersion, UpdateError> {
    let invalid = |reason: String| UpdateError::InvalidFormat {
        input: input.to_string(),
        reason,
    };

    let trimmed = input.strip_prefix('v').unwrap_or(input);
    let parts: Vec<&str> = trimmed.split('.').collect();
    if parts.len() != 3 {
        return Err(invalid(format!(
            "expected X.Y.Z, found {} segment(s)",
            parts.len()
        )));
    }

    let mut numbers = [0u64; 3];
    for (slot, (label, part)) in numbers
        .iter_mut()
        .zip(["major", "minor", "patch"].into_iter().zip(parts))
    {
        // u64::from_str accepts a leading '+', which is not a version digit.
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(format!("invalid {} version {:?}", label, part)));
        }
        *slot = part
            .parse()
            .map_err(|e| invalid(format!("invalid {} version {:?}: {}", label, part, e)))?;
    }

    Ok(SemanticVersion::new(numbers[0], numbers[1], numbers[2]))
}

/// Returns true if `latest` is strictly newer than `current`.
pub fn is_newer(latest: &str, current: &str) -> Result<bool, UpdateError> {
    let latest = parse_version(latest)?;
    let current = parse_version(current)?;
    Ok(latest > current)
}

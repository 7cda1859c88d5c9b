// src/version/mod.rs

//! Version handling and constraint satisfaction for package distributions
//!
//! Provides a generic `epoch:version-release` version scheme and the
//! constraint predicates used to decide whether a distribution satisfies a
//! requirement. The scheme is ecosystem-neutral: any implementer plugging a
//! `Distribution` into the resolver gets a version ordering consistent with
//! its own precedence rules, as long as versions round-trip through this
//! format.

use crate::error::{ResolverError, Result};
use semver::Version as SemverVersion;
use std::cmp::Ordering;
use std::fmt;

/// A parsed version with epoch, version, and release components.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub epoch: u64,
    pub version: String,
    pub release: Option<String>,
}

impl Version {
    /// Parse a version string.
    ///
    /// Format: `[epoch:]version[-release]`
    /// Examples:
    /// - "1.2.3" -> epoch=0, version="1.2.3", release=None
    /// - "2:1.2.3" -> epoch=2, version="1.2.3", release=None
    /// - "1.2.3-4" -> epoch=0, version="1.2.3", release=Some("4")
    pub fn parse(s: &str) -> Result<Self> {
        let (epoch_str, rest) = if let Some(colon_pos) = s.find(':') {
            let (e, r) = s.split_at(colon_pos);
            (e, &r[1..])
        } else {
            ("0", s)
        };

        let epoch = if epoch_str.is_empty() {
            0 // empty epoch (e.g. ":1.0.0") defaults to 0
        } else {
            epoch_str
                .parse::<u64>()
                .map_err(|e| ResolverError::InvalidVersion(format!("invalid epoch in '{s}': {e}")))?
        };

        let (version, release) = if let Some(dash_pos) = rest.find('-') {
            let (v, r) = rest.split_at(dash_pos);
            (v.to_string(), Some(r[1..].to_string()))
        } else {
            (rest.to_string(), None)
        };

        if version.is_empty() {
            return Err(ResolverError::InvalidVersion(format!(
                "empty version component in '{s}'"
            )));
        }

        Ok(Self {
            epoch,
            version,
            release,
        })
    }

    /// Convert to a `semver::Version` for comparison, normalizing loosely
    /// versioned strings (e.g. "2.1" or "9") into major.minor.patch.
    fn to_semver(&self) -> SemverVersion {
        if let Ok(v) = SemverVersion::parse(&self.version) {
            return v;
        }
        let parts: Vec<&str> = self.version.split('.').collect();
        let major = parts
            .first()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);
        let minor = parts.get(1).and_then(|s| s.parse::<u64>().ok()).unwrap_or(0);
        let patch = parts.get(2).and_then(|s| s.parse::<u64>().ok()).unwrap_or(0);
        SemverVersion::new(major, minor, patch)
    }

    fn compare(&self, other: &Version) -> Ordering {
        match self.epoch.cmp(&other.epoch) {
            Ordering::Equal => {}
            ord => return ord,
        }

        match self.to_semver().cmp(&other.to_semver()) {
            Ordering::Equal => {}
            ord => return ord,
        }

        self.release.cmp(&other.release)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch > 0 {
            write!(f, "{}:", self.epoch)?;
        }
        write!(f, "{}", self.version)?;
        if let Some(ref release) = self.release {
            write!(f, "-{release}")?;
        }
        Ok(())
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One `(operator, version)` clause of a version spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Exact(Version),
    GreaterThan(Version),
    GreaterOrEqual(Version),
    LessThan(Version),
    LessOrEqual(Version),
    NotEqual(Version),
}

impl Clause {
    fn satisfies(&self, version: &Version) -> bool {
        match self {
            Clause::Exact(v) => version == v,
            Clause::GreaterThan(v) => version > v,
            Clause::GreaterOrEqual(v) => version >= v,
            Clause::LessThan(v) => version < v,
            Clause::LessOrEqual(v) => version <= v,
            Clause::NotEqual(v) => version != v,
        }
    }

    fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix(">=") {
            Ok(Clause::GreaterOrEqual(Version::parse(rest.trim())?))
        } else if let Some(rest) = s.strip_prefix("<=") {
            Ok(Clause::LessOrEqual(Version::parse(rest.trim())?))
        } else if let Some(rest) = s.strip_prefix("!=") {
            Ok(Clause::NotEqual(Version::parse(rest.trim())?))
        } else if let Some(rest) = s.strip_prefix("==") {
            Ok(Clause::Exact(Version::parse(rest.trim())?))
        } else if let Some(rest) = s.strip_prefix('>') {
            Ok(Clause::GreaterThan(Version::parse(rest.trim())?))
        } else if let Some(rest) = s.strip_prefix('<') {
            Ok(Clause::LessThan(Version::parse(rest.trim())?))
        } else if let Some(rest) = s.strip_prefix('=') {
            Ok(Clause::Exact(Version::parse(rest.trim())?))
        } else {
            // no operator means exact match
            Ok(Clause::Exact(Version::parse(s)?))
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Exact(v) => write!(f, "=={v}"),
            Clause::GreaterThan(v) => write!(f, ">{v}"),
            Clause::GreaterOrEqual(v) => write!(f, ">={v}"),
            Clause::LessThan(v) => write!(f, "<{v}"),
            Clause::LessOrEqual(v) => write!(f, "<={v}"),
            Clause::NotEqual(v) => write!(f, "!={v}"),
        }
    }
}

/// A predicate over versions, built from zero or more comma-conjoined
/// `(op, version)` clauses. An empty clause list matches every version.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionSpec {
    clauses: Vec<Clause>,
}

impl VersionSpec {
    /// A spec that accepts any version.
    pub fn any() -> Self {
        Self::default()
    }

    /// Parse a (possibly empty) comma-separated list of clauses.
    ///
    /// Examples: "", "*", ">=1.2.0", ">=1.0.0,<2.0.0". The caller is
    /// expected to have already stripped any `[extras]` bracket before
    /// handing the remainder here.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s == "*" {
            return Ok(Self::any());
        }
        let clauses = s
            .split(',')
            .map(Clause::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { clauses })
    }

    /// Check if a version satisfies every clause in this spec.
    pub fn satisfies(&self, version: &Version) -> bool {
        self.clauses.iter().all(|c| c.satisfies(version))
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return write!(f, "*");
        }
        let joined = self
            .clauses
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{joined}")
    }
}

// src/resolver/requirement.rs

//! Requirement parsing: `name[extra1,extra2] <op><version>(,<op><version>)*`

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{ResolverError, Result};
use crate::version::VersionSpec;

/// `(name, version_spec, extras)` — a single constraint on a distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub spec: VersionSpec,
    pub extras: BTreeSet<String>,
}

impl Requirement {
    pub fn new(name: impl Into<String>, spec: VersionSpec, extras: BTreeSet<String>) -> Self {
        Self {
            name: canonical(&name.into()),
            spec,
            extras,
        }
    }

    /// Parse `"fabric[ssh]>=0.9,<1.0"`-style requirement strings.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let name_end = s
            .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || c == '.'))
            .unwrap_or(s.len());
        let name = &s[..name_end];
        if name.is_empty() {
            return Err(ResolverError::InvalidRequirement(s.to_string()));
        }

        let rest = s[name_end..].trim_start();
        let (extras, rest) = if let Some(after_bracket) = rest.strip_prefix('[') {
            let close = after_bracket
                .find(']')
                .ok_or_else(|| ResolverError::InvalidRequirement(s.to_string()))?;
            let extras = after_bracket[..close]
                .split(',')
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
            (extras, after_bracket[close + 1..].trim_start())
        } else {
            (BTreeSet::new(), rest)
        };

        let spec = VersionSpec::parse(rest)?;
        Ok(Self::new(name, spec, extras))
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.iter().cloned().collect::<Vec<_>>().join(","))?;
        }
        if self.spec != VersionSpec::any() {
            write!(f, "{}", self.spec)?;
        }
        Ok(())
    }
}

/// Lowercase a distribution name into its canonical identity key.
pub fn canonical(name: &str) -> String {
    name.to_lowercase()
}

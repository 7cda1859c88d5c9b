// src/resolver/distribution.rs

//! The distribution contract consumed by the resolver, and the two
//! collaborator traits it is injected with (repository + installed-set).
//!
//! These are "abstract methods" in the source's terms: the resolver holds
//! them by reference and never owns or constructs them.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use super::requirement::Requirement;
use crate::version::Version;

/// A single resolvable distribution (one name, one version).
pub trait Distribution: fmt::Debug {
    /// Canonical (lowercased) name.
    fn name(&self) -> &str;

    /// The version this distribution record represents.
    fn version(&self) -> &Version;

    /// The totally-ordered key the resolver compares distributions by.
    ///
    /// Separate from `version()` in the external contract (so an
    /// implementer could in principle normalize a display-only version
    /// string into a stricter ordering key), but `Version` is already that
    /// ordering key, so the default just reuses it.
    fn version_key(&self) -> &Version {
        self.version()
    }

    /// `"{name}-{version}"`, used only for display.
    fn full_name(&self) -> String {
        format!("{}-{}", self.name(), self.version())
    }

    /// The union of default requirements (unless `exclude_default`) and
    /// those contributed by `extras`.
    fn requirements(&self, extras: &BTreeSet<String>, exclude_default: bool) -> Vec<Requirement>;
}

/// Returns at most one distribution per canonical name: the set currently
/// installed on the system.
pub trait InstalledDistributions {
    fn installed(&self) -> Vec<Rc<dyn Distribution>>;
}

/// Returns every release of `name` available to install, sorted newest-first
/// by version. An empty vec means the name is unknown to the repository.
pub trait AvailableDistributions {
    fn available(&self, name: &str) -> Vec<Rc<dyn Distribution>>;
}

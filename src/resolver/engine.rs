// src/resolver/engine.rs

//! The two graph mutation entry points: `add_requirement` and
//! `remove_package`. Everything here is built out of the mark primitives in
//! `graph.rs`; this module only ever reads/writes node state through them.

use tracing::warn;

use super::distribution::AvailableDistributions;
use super::graph::{ChangeOutcome, DepGraph};
use super::requirement::Requirement;
use crate::error::{ResolverError, Result};

impl DepGraph {
    /// Add a new requirement to the graph, recursively satisfying whatever
    /// it in turn requires.
    ///
    /// Returns `Ok(true)` unless `requirement` (and everything it pulls in)
    /// was already satisfied by what's installed or already pending.
    /// Returns `Err(RequirementNotFound)` if no available distribution
    /// satisfies it (or the combined constraints already recorded against
    /// its name).
    pub fn add_requirement(
        &mut self,
        requirement: &Requirement,
        available: &dyn AvailableDistributions,
        nodeps: bool,
    ) -> Result<bool> {
        self.add_requirement_inner(requirement, available, nodeps, None)
    }

    /// Convenience wrapper over [`DepGraph::add_requirement`] for callers
    /// holding a raw requirement string rather than an already-parsed
    /// [`Requirement`].
    pub fn add_requirement_str(
        &mut self,
        requirement: &str,
        available: &dyn AvailableDistributions,
        nodeps: bool,
    ) -> Result<bool> {
        let requirement = Requirement::parse(requirement)?;
        self.add_requirement(&requirement, available, nodeps)
    }

    fn add_requirement_inner(
        &mut self,
        requirement: &Requirement,
        available: &dyn AvailableDistributions,
        nodeps: bool,
        required_by: Option<&str>,
    ) -> Result<bool> {
        let name = requirement.name.clone();
        let node_exists = self.has_package(&name);

        let mut to_satisfy = vec![requirement.clone()];
        if node_exists {
            to_satisfy.extend(self.requirements_for(&name));
        }

        let releases = available.available(&name);
        if releases.is_empty() {
            return Err(ResolverError::RequirementNotFound {
                requirement: requirement.to_string(),
                required_by: required_by.map(String::from),
            });
        }

        let candidate = releases
            .into_iter()
            .find(|p| to_satisfy.iter().all(|r| r.spec.satisfies(p.version())))
            .ok_or_else(|| ResolverError::RequirementNotFound {
                requirement: combined(&to_satisfy),
                required_by: required_by.map(String::from),
            })?;

        let mut applied;

        if node_exists {
            let node_pkg = self
                .active_distribution(&name)
                .expect("node exists in the graph but has neither an installed nor pending distribution");

            let mut change = node_pkg.version() != candidate.version();
            if change && node_pkg.version() > candidate.version() {
                // installed/pending release is newer: only downgrade if it
                // no longer satisfies everything required of it.
                change = !to_satisfy.iter().all(|r| r.spec.satisfies(node_pkg.version()));
            }

            if change {
                let outcome = self.mark_for_change(candidate.clone());
                self.record_edge_or_root(required_by, requirement);
                applied = outcome == ChangeOutcome::Applied;
                if applied && !nodeps {
                    let before = node_pkg.requirements(&requirement.extras, false);
                    let after = candidate.requirements(&requirement.extras, false);
                    if before != after {
                        warn!(
                            "requirements for \"{name}\" differ between {} and {}; the newly \
                             pulled-in version's requirements are not automatically re-expanded",
                            node_pkg.version(),
                            candidate.version()
                        );
                    }
                }
            } else {
                applied = false;
                self.record_edge_or_root(required_by, requirement);
            }
        } else {
            self.mark_for_install(candidate.clone());
            self.record_edge_or_root(required_by, requirement);
            applied = true;
        }

        if !nodeps {
            let pkg = self
                .active_distribution(&name)
                .expect("node must exist once marked for install or change");
            for sub_requirement in pkg.requirements(&requirement.extras, false) {
                let child_applied =
                    self.add_requirement_inner(&sub_requirement, available, nodeps, Some(&name))?;
                applied = applied || child_applied;
            }
        }

        Ok(applied)
    }

    /// Record `requirement` against the node it targets: as a reverse edge
    /// from `required_by` if this call came from resolving another
    /// package's dependency, or as a direct (root) requirement otherwise.
    ///
    /// A bare user-supplied requirement with no parent still has to survive
    /// across separate `add_requirement` calls — e.g. a direct
    /// `pycrypto>=2.3` request must still be on record the next time
    /// something else pulls in a `pycrypto` constraint — so it cannot be
    /// dropped just because there's no requirer node to attribute it to.
    fn record_edge_or_root(&mut self, required_by: Option<&str>, requirement: &Requirement) {
        match required_by {
            Some(parent) => self.record_requirement(parent, requirement),
            None => self.record_root_requirement(requirement),
        }
    }

    /// Mark `name`, and (unless `nodeps`) everything currently depending on
    /// it, for removal.
    ///
    /// Precondition: `name` must already be a node in the graph (installed
    /// or pending). Calling this for an unknown name is a programming
    /// error, not a recoverable runtime condition — see `mark_for_removal`.
    pub fn remove_package(&mut self, name: &str, nodeps: bool) {
        let outcome = self.mark_for_removal(name);
        if outcome == super::graph::MarkOutcome::Marked && !nodeps {
            for dependent in self.dependents_of(name) {
                self.remove_package(&dependent, nodeps);
            }
        }
    }
}

fn combined(requirements: &[Requirement]) -> String {
    requirements
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

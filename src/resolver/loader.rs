// src/resolver/loader.rs

//! Three-pass population of a freshly constructed graph from the
//! currently-installed distributions. Pass 1 (node construction) happens in
//! `DepGraph::new`'s caller before this runs; this module is passes 2 and 3:
//! recording the edges those installed distributions impose on each other,
//! including the deferred "extras" sub-requirements.

use std::collections::{BTreeSet, HashSet};

use super::distribution::InstalledDistributions;
use super::graph::DepGraph;
use super::requirement::canonical;

impl DepGraph {
    /// Record the dependency edges among the installed distributions already
    /// seeded as nodes. A requirement whose target isn't among the installed
    /// distributions is silently dropped — the graph never carries an edge
    /// to an unknown name.
    pub(crate) fn load_edges(&mut self, installed: &dyn InstalledDistributions) {
        // pass 2: base (no-extras) requirements of every installed
        // distribution, deferring anything that names an extra for pass 3.
        let mut deferred: HashSet<(String, String, String)> = HashSet::new();
        for dist in installed.installed() {
            let dependent = dist.name().to_string();
            for req in dist.requirements(&BTreeSet::new(), false) {
                let dependency = canonical(&req.name);
                if !self.has_package(&dependency) {
                    continue;
                }
                self.record_requirement(&dependent, &req);
                for extra in &req.extras {
                    deferred.insert((dependency.clone(), extra.clone(), dependent.clone()));
                }
            }
        }

        // pass 3: for each deferred (dependency, extra, dependent) triple,
        // pull the dependency's extras-only sub-requirements (excluding its
        // default set) and record them as indirect edges against the
        // dependent that asked for the extra.
        for (dependency, extra, dependent) in deferred {
            let Some(dependency_dist) = self
                .get_node(&dependency)
                .and_then(|node| node.installed.clone())
            else {
                continue;
            };
            let mut extras = BTreeSet::new();
            extras.insert(extra);
            for sub_requirement in dependency_dist.requirements(&extras, true) {
                let sub_name = canonical(&sub_requirement.name);
                if self.has_package(&sub_name) {
                    self.record_requirement(&dependent, &sub_requirement);
                }
            }
        }
    }
}

// src/resolver/graph.rs

//! The dependency graph itself: per-package nodes, their pending state, the
//! requirement edges that justify them, and the low-level "mark" primitives
//! that mutate a node while keeping the edge and ordering bookkeeping
//! consistent. `add_requirement`/`remove_package` (in `engine.rs`) are built
//! entirely out of these primitives.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};

use super::distribution::{Distribution, InstalledDistributions};
use super::order::Order;
use super::requirement::Requirement;

/// What, if anything, is pending for a node beyond its installed state.
#[derive(Debug, Clone)]
pub enum Pending {
    /// Nothing pending; the node is settled at `installed` (or untouched).
    None,
    /// Not currently installed; pending installation of this distribution.
    Install(Rc<dyn Distribution>),
    /// Currently installed; pending a change to this distribution.
    Change(Rc<dyn Distribution>),
    /// Currently installed; pending removal.
    Remove,
}

/// One package's state in the graph.
///
/// Invariants (enforced by construction in this module, never by the
/// caller): a node with `installed: None` may only carry `Pending::None` or
/// `Pending::Install`; it can never be `Pending::Remove` or
/// `Pending::Change` (there would be nothing installed to remove or
/// change).
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub installed: Option<Rc<dyn Distribution>>,
    pub pending: Pending,
}

impl Node {
    fn new_uninstalled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            installed: None,
            pending: Pending::None,
        }
    }

    fn new_installed(dist: Rc<dyn Distribution>) -> Self {
        Self {
            name: dist.name().to_string(),
            installed: Some(dist),
            pending: Pending::None,
        }
    }
}

/// Whether a mark primitive actually changed the node's pending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked,
    AlreadyMarked,
}

/// Whether a change request was applied or collapsed into a no-op because
/// the requested distribution matches what's already there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    Applied,
    Collapsed,
}

/// The full in-memory resolver state: one node per known package name, the
/// requirement edges recorded against each, and the causal order the graph
/// discovered them in.
///
/// `Clone` is derived deliberately: callers needing transactional
/// all-or-nothing semantics over a batch of `add_requirement`/
/// `remove_package` calls can cheaply snapshot a graph, attempt the batch,
/// and discard the snapshot (or the working copy) on error instead of the
/// resolver itself reverting partial mutations.
#[derive(Debug, Clone)]
pub struct DepGraph {
    nodes: HashMap<String, Node>,
    /// required -> requirer -> the requirements the requirer placed on it.
    /// Keyed by the required package first so that removing a package can
    /// look up everyone depending on it in one step.
    edges: HashMap<String, HashMap<String, Vec<Requirement>>>,
    /// Requirements placed directly by a caller of `add_requirement` (i.e.
    /// with no `required_by` parent), keyed by name. Tracked separately
    /// from `edges` rather than under some synthetic requirer key: a
    /// top-level request isn't "required by" any package in the graph, so
    /// folding it into `edges` would make it visible to `dependents_of` and
    /// corrupt `remove_package`'s cascade. Kept so that a later call adding
    /// the same name (directly, or transitively pulling it back in) still
    /// has to satisfy every constraint the user ever asked for directly.
    root_requirements: HashMap<String, Vec<Requirement>>,
    /// Discovery order of names newly marked for install (including the
    /// generalized "replace a still-pending install" case below).
    order_new: Order,
    /// Discovery order of names marked for an upgrade/downgrade of an
    /// already-installed distribution.
    order_change: Order,
    /// Discovery order of names marked for removal.
    order_remove: Order,
}

impl DepGraph {
    /// Build a graph seeded with the currently installed distributions.
    /// Loading cannot fail: `installed` already hands back constructed
    /// `Distribution` objects, not strings that might fail to parse.
    pub fn new(installed: &dyn InstalledDistributions) -> Self {
        let mut nodes = HashMap::new();
        for dist in installed.installed() {
            let name = dist.name().to_string();
            nodes.insert(name, Node::new_installed(dist));
        }
        let mut graph = Self {
            nodes,
            edges: HashMap::new(),
            root_requirements: HashMap::new(),
            order_new: Order::new(),
            order_change: Order::new(),
            order_remove: Order::new(),
        };
        graph.load_edges(installed);
        graph
    }

    pub fn has_package(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn get_node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub(crate) fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    pub(crate) fn order_new(&self) -> &Order {
        &self.order_new
    }

    pub(crate) fn order_change(&self) -> &Order {
        &self.order_change
    }

    pub(crate) fn order_remove(&self) -> &Order {
        &self.order_remove
    }

    /// The distribution a node is effectively at right now: whatever is
    /// pending (install or change) if anything, else what's installed.
    pub(crate) fn active_distribution(&self, name: &str) -> Option<Rc<dyn Distribution>> {
        self.nodes.get(name).and_then(|node| {
            active_pending(&node.pending)
                .cloned()
                .or_else(|| node.installed.clone())
        })
    }

    /// Every requirement ever recorded against `required`, from any
    /// requirer plus any direct (parent-less) requests, flattened. Used to
    /// widen the constraint set a candidate distribution must satisfy once
    /// a node already exists.
    pub(crate) fn requirements_for(&self, required: &str) -> Vec<Requirement> {
        let from_requirers = self
            .edges
            .get(required)
            .into_iter()
            .flat_map(|requirers| requirers.values().flatten().cloned());
        let from_root = self
            .root_requirements
            .get(required)
            .into_iter()
            .flatten()
            .cloned();
        from_requirers.chain(from_root).collect()
    }

    /// Record a requirement the caller of `add_requirement` placed directly
    /// (no parent package in the graph to attribute it to).
    pub(crate) fn record_root_requirement(&mut self, requirement: &Requirement) {
        self.root_requirements
            .entry(requirement.name.clone())
            .or_default()
            .push(requirement.clone());
    }

    /// Every package that currently depends on `required` (the reverse
    /// edges), used to cascade `remove_package`.
    pub(crate) fn dependents_of(&self, required: &str) -> Vec<String> {
        self.edges
            .get(required)
            .map(|requirers| requirers.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Record that `requirer` placed `requirement` against `required`'s
    /// node. Edges are append-only and monotone: if `required`'s
    /// distribution later changes and no longer matches a recorded
    /// requirement, the stale edge is merely logged, never removed, so a
    /// later `remove_package` walk still finds every requirer that was
    /// ever satisfied through this name.
    pub(crate) fn record_requirement(&mut self, requirer: &str, requirement: &Requirement) {
        let required = &requirement.name;
        if let Some(node) = self.nodes.get(required) {
            if let Some(active) = node.installed.as_ref().or(active_pending(&node.pending)) {
                if !requirement.spec.satisfies(active.version()) {
                    warn!(
                        "requirement \"{requirement}\" from \"{requirer}\" does not match the \
                         version of \"{required}\" already pending in the graph; the existing \
                         edge is kept as-is"
                    );
                }
            }
        }
        self.edges
            .entry(required.clone())
            .or_default()
            .entry(requirer.to_string())
            .or_default()
            .push(requirement.clone());
    }

    /// Mark `name` for installation of `dist`. No-op if `name` is already
    /// installed or already pending installation of the same version.
    pub(crate) fn mark_for_install(&mut self, dist: Rc<dyn Distribution>) -> MarkOutcome {
        let name = dist.name().to_string();
        let outcome = match self.nodes.get(&name) {
            Some(node) if node.installed.is_some() => MarkOutcome::AlreadyMarked,
            Some(Node {
                pending: Pending::Install(current),
                ..
            }) if current.version() == dist.version() => MarkOutcome::AlreadyMarked,
            _ => {
                debug!("marking \"{name}\" for install at {}", dist.version());
                self.nodes.insert(
                    name.clone(),
                    Node {
                        name: name.clone(),
                        installed: None,
                        pending: Pending::Install(dist),
                    },
                );
                self.order_new.push(&name);
                MarkOutcome::Marked
            }
        };
        outcome
    }

    /// Mark `name` for a change to `dist`.
    ///
    /// When `name` is already installed, this mirrors the source directly:
    /// compare against the installed distribution, collapse to a no-op if
    /// the version already matches, otherwise pend the change.
    ///
    /// When `name` is only pending installation (never actually installed
    /// yet), there is no installed distribution to diff against and no
    /// "change" state is reachable without installing first — a node with
    /// `installed: None` can never legally hold `Pending::Change` (see the
    /// invariant on `Node`). In that case the pending install target is
    /// compared instead, and on a version difference the pending install
    /// is simply replaced in place.
    pub(crate) fn mark_for_change(&mut self, dist: Rc<dyn Distribution>) -> ChangeOutcome {
        let name = dist.name().to_string();

        // Read the node's current classification into owned data first, so
        // the mutation below never has to fight an active borrow of it.
        enum Existing {
            Installed(Rc<dyn Distribution>),
            PendingInstall(Rc<dyn Distribution>),
            Other,
            Unknown,
        }
        let existing = match self.nodes.get(&name) {
            None => Existing::Unknown,
            Some(node) => match (&node.installed, &node.pending) {
                (Some(installed), _) => Existing::Installed(installed.clone()),
                (None, Pending::Install(current)) => Existing::PendingInstall(current.clone()),
                (None, _) => Existing::Other,
            },
        };

        match existing {
            Existing::Installed(installed) => {
                let outcome = if installed.version() == dist.version() {
                    // same version requested again: revert any stale
                    // pending change rather than leave it dangling.
                    self.nodes.get_mut(&name).unwrap().pending = Pending::None;
                    ChangeOutcome::Collapsed
                } else {
                    debug!("marking \"{name}\" for change to {}", dist.version());
                    self.nodes.get_mut(&name).unwrap().pending = Pending::Change(dist);
                    ChangeOutcome::Applied
                };
                self.order_change.push(&name);
                outcome
            }
            Existing::PendingInstall(current) => {
                let outcome = if current.version() == dist.version() {
                    ChangeOutcome::Collapsed
                } else {
                    debug!(
                        "replacing pending install of \"{name}\" with {}",
                        dist.version()
                    );
                    self.nodes.get_mut(&name).unwrap().pending = Pending::Install(dist);
                    ChangeOutcome::Applied
                };
                // still headed for an install, not a change: keep it in the
                // install-order bucket so `get_marks` sequences it there.
                self.order_new.push(&name);
                outcome
            }
            Existing::Other => {
                debug!(
                    "marking \"{name}\" for install at {} (not previously installed or pending)",
                    dist.version()
                );
                self.nodes.get_mut(&name).unwrap().pending = Pending::Install(dist);
                self.order_new.push(&name);
                ChangeOutcome::Applied
            }
            Existing::Unknown => {
                debug!("marking \"{name}\" for install at {} (new node)", dist.version());
                let mut node = Node::new_uninstalled(&name);
                node.pending = Pending::Install(dist);
                self.nodes.insert(name.clone(), node);
                self.order_new.push(&name);
                ChangeOutcome::Applied
            }
        }
    }

    /// Mark `name` for removal. Precondition (caller-enforced, violating it
    /// is a programming error): `name` must currently be installed or
    /// pending a change. Marking an uninstalled, never-pended name for
    /// removal is meaningless and indicates a bug in the caller, not a
    /// recoverable runtime condition.
    pub(crate) fn mark_for_removal(&mut self, name: &str) -> MarkOutcome {
        let node = self
            .nodes
            .get_mut(name)
            .expect("mark_for_removal called on a name with no node");
        let outcome = match node.pending {
            Pending::Remove => MarkOutcome::AlreadyMarked,
            _ => {
                debug_assert!(
                    node.installed.is_some(),
                    "mark_for_removal called on \"{name}\" which was never installed"
                );
                debug!("marking \"{name}\" for removal");
                node.pending = Pending::Remove;
                self.order_remove.push(name);
                MarkOutcome::Marked
            }
        };
        outcome
    }
}

fn active_pending(pending: &Pending) -> Option<&Rc<dyn Distribution>> {
    match pending {
        Pending::Install(d) | Pending::Change(d) => Some(d),
        Pending::None | Pending::Remove => None,
    }
}

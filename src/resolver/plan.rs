// src/resolver/plan.rs

//! Extracting an installable/removable plan out of a graph's current marks.

use std::rc::Rc;

use super::distribution::Distribution;
use super::graph::{DepGraph, Pending};

/// What a graph's current marks amount to, bucketed and ordered so that
/// applying `install` and `change` in list order never installs a
/// dependent before its dependency, and applying `remove` in list order
/// never removes a package while something still pending stays dependent
/// on it.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub install: Vec<Rc<dyn Distribution>>,
    pub change: Vec<(Rc<dyn Distribution>, Rc<dyn Distribution>)>,
    pub remove: Vec<Rc<dyn Distribution>>,
}

impl DepGraph {
    /// Snapshot every node currently marked for install, change, or
    /// removal into an ordered `Plan`.
    pub fn get_marks(&self) -> Plan {
        let mut install = Vec::new();
        let mut change = Vec::new();
        let mut remove = Vec::new();

        for name in self.node_names() {
            let node = self.get_node(name).expect("name came from node_names");
            match (&node.installed, &node.pending) {
                (_, Pending::Remove) => {
                    remove.push(
                        node.installed
                            .clone()
                            .expect("Pending::Remove always has an installed distribution"),
                    );
                }
                (Some(installed), Pending::Change(target)) => {
                    change.push((installed.clone(), target.clone()));
                }
                (None, Pending::Install(target)) => {
                    install.push(target.clone());
                }
                _ => {}
            }
        }

        // Installs and changes run dependency-first: whichever name was
        // discovered latest (deepest in the recursive add_requirement
        // walk) sorts first.
        self.order_new().rearrange(&mut install, |d| d.name(), true);
        self.order_change()
            .rearrange(&mut change, |(installed, _)| installed.name(), true);
        // Removals run dependents-first: a cascaded dependent is stamped
        // after the package that triggered its removal, so reversing the
        // discovery order puts it ahead of what it depended on.
        self.order_remove().rearrange(&mut remove, |d| d.name(), true);

        Plan {
            install,
            change,
            remove,
        }
    }
}

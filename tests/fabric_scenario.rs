// tests/fabric_scenario.rs

//! End-to-end scenario reproducing the fabric/pycrypto/paramiko/virtualenv
//! worked example: a catalog where fabric-0.9.1 (installed) requires
//! pycrypto, pycrypto-2.1 is installed standalone, virtualenv-1.4.0 is
//! installed with no requirements, and the repository additionally offers
//! fabric-0.9.2 (requiring `pycrypto<=2.1,paramiko`), paramiko-0.9
//! (requiring pycrypto), and pycrypto-2.3.

use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use depgraph_core::{
    AvailableDistributions, DepGraph, Distribution, InstalledDistributions, Requirement,
    ResolverError, Version,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("depgraph_core=debug")),
        )
        .with_test_writer()
        .try_init();
}

#[derive(Debug)]
struct FixtureDist {
    name: &'static str,
    version: Version,
    requires: Vec<&'static str>,
}

impl Distribution for FixtureDist {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> &Version {
        &self.version
    }

    fn requirements(&self, _extras: &BTreeSet<String>, exclude_default: bool) -> Vec<Requirement> {
        if exclude_default {
            return Vec::new();
        }
        self.requires
            .iter()
            .map(|r| Requirement::parse(r).unwrap())
            .collect()
    }
}

fn dist(name: &'static str, version: &'static str, requires: Vec<&'static str>) -> Rc<dyn Distribution> {
    Rc::new(FixtureDist {
        name,
        version: Version::parse(version).unwrap(),
        requires,
    })
}

struct FixtureCatalog {
    installed: Vec<Rc<dyn Distribution>>,
    available: HashMap<&'static str, Vec<Rc<dyn Distribution>>>,
}

impl FixtureCatalog {
    fn new() -> Self {
        let installed = vec![
            dist("fabric", "0.9.1", vec!["pycrypto"]),
            dist("pycrypto", "2.1", vec![]),
            dist("virtualenv", "1.4.0", vec![]),
        ];

        let mut available = HashMap::new();
        available.insert(
            "fabric",
            vec![
                // newest-first, as the repository collaborator contract requires
                dist("fabric", "0.9.2", vec!["pycrypto<=2.1", "paramiko"]),
                dist("fabric", "0.9.1", vec!["pycrypto"]),
            ],
        );
        available.insert("paramiko", vec![dist("paramiko", "0.9", vec!["pycrypto"])]);
        available.insert(
            "pycrypto",
            vec![dist("pycrypto", "2.3", vec![]), dist("pycrypto", "2.1", vec![])],
        );

        Self { installed, available }
    }
}

impl InstalledDistributions for FixtureCatalog {
    fn installed(&self) -> Vec<Rc<dyn Distribution>> {
        self.installed.clone()
    }
}

impl AvailableDistributions for FixtureCatalog {
    fn available(&self, name: &str) -> Vec<Rc<dyn Distribution>> {
        self.available.get(name).cloned().unwrap_or_default()
    }
}

#[test]
fn adding_fabric_upgrades_it_and_installs_paramiko_but_keeps_pycrypto() {
    init_tracing();
    let catalog = FixtureCatalog::new();
    let mut graph = DepGraph::new(&catalog);

    let changed = graph
        .add_requirement_str("fabric", &catalog, false)
        .unwrap();
    assert!(changed);

    let plan = graph.get_marks();

    let installed_names: Vec<_> = plan.install.iter().map(|d| d.name().to_string()).collect();
    assert_eq!(installed_names, vec!["paramiko".to_string()]);

    assert_eq!(plan.change.len(), 1);
    assert_eq!(plan.change[0].0.version(), &Version::parse("0.9.1").unwrap());
    assert_eq!(plan.change[0].1.version(), &Version::parse("0.9.2").unwrap());

    // pycrypto stays at 2.1: fabric-0.9.2 requires pycrypto<=2.1, and the
    // installed 2.1 satisfies that, so no change is marked for it.
    assert!(plan.remove.is_empty());
    assert!(!plan
        .change
        .iter()
        .any(|(installed, _)| installed.name() == "pycrypto"));
}

#[test]
fn requesting_a_newer_pycrypto_first_then_fabric_conflicts() {
    init_tracing();
    let catalog = FixtureCatalog::new();
    let mut graph = DepGraph::new(&catalog);

    // pycrypto>=2.3 alone does not conflict with fabric-0.9.1's loose
    // "pycrypto" requirement, so it resolves to a plain upgrade.
    let changed = graph
        .add_requirement_str("pycrypto>=2.3", &catalog, false)
        .unwrap();
    assert!(changed);
    let plan = graph.get_marks();
    assert_eq!(plan.change.len(), 1);
    assert_eq!(plan.change[0].1.version(), &Version::parse("2.3").unwrap());

    // Now asking for fabric combines {fabric default, pycrypto<=2.1 (from
    // fabric-0.9.2), pycrypto>=2.3 (already recorded)} — unsatisfiable.
    let result = graph.add_requirement_str("fabric", &catalog, false);
    assert!(matches!(result, Err(ResolverError::RequirementNotFound { .. })));
}

#[test]
fn requesting_an_older_pycrypto_than_any_available_release_conflicts() {
    init_tracing();
    let catalog = FixtureCatalog::new();
    let mut graph = DepGraph::new(&catalog);

    let result = graph.add_requirement_str("pycrypto<2.0", &catalog, false);
    assert!(matches!(result, Err(ResolverError::RequirementNotFound { .. })));
}

#[test]
fn requesting_the_installed_version_is_a_same_version_collapse() {
    init_tracing();
    let catalog = FixtureCatalog::new();
    let mut graph = DepGraph::new(&catalog);

    let changed = graph
        .add_requirement_str("pycrypto==2.1", &catalog, false)
        .unwrap();
    assert!(!changed);

    let plan = graph.get_marks();
    assert!(plan.install.is_empty());
    assert!(plan.change.is_empty());
    assert!(plan.remove.is_empty());
}

#[test]
fn removing_pycrypto_cascades_to_remove_fabric_dependents_first() {
    init_tracing();
    let catalog = FixtureCatalog::new();
    let mut graph = DepGraph::new(&catalog);

    graph.remove_package("pycrypto", false);

    let plan = graph.get_marks();
    let removed_names: Vec<_> = plan.remove.iter().map(|d| d.name().to_string()).collect();
    assert_eq!(removed_names, vec!["fabric".to_string(), "pycrypto".to_string()]);
}

#[test]
fn nodeps_install_skips_transitive_paramiko() {
    init_tracing();
    let catalog = FixtureCatalog::new();
    let mut graph = DepGraph::new(&catalog);

    let changed = graph
        .add_requirement_str("fabric", &catalog, true)
        .unwrap();
    assert!(changed);

    let plan = graph.get_marks();
    assert!(plan.install.is_empty(), "paramiko must not be pulled in under nodeps");
    assert_eq!(plan.change.len(), 1);
    assert_eq!(plan.change[0].1.version(), &Version::parse("0.9.2").unwrap());
}

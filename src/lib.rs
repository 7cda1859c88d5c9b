// src/lib.rs

//! `depgraph-core` — an in-memory dependency graph for a language-package
//! ecosystem.
//!
//! Given a set of currently-installed distributions and a repository
//! collaborator that enumerates available ones, [`resolver::DepGraph`]
//! decides which packages must be installed, upgraded, downgraded, or
//! removed to satisfy a set of user requirements (honoring version
//! constraints and "extras" sub-requirements), and produces an ordered
//! install/remove/change plan via [`resolver::Plan`].
//!
//! The crate does not fetch packages, read a local package database, or
//! execute a plan: those are external collaborators, injected as trait
//! objects ([`resolver::InstalledDistributions`],
//! [`resolver::AvailableDistributions`]).

pub mod error;
pub mod resolver;
pub mod version;

pub use error::{ResolverError, Result};
pub use resolver::{
    canonical, AvailableDistributions, ChangeOutcome, DepGraph, Distribution,
    InstalledDistributions, MarkOutcome, Node, Order, Pending, Plan, Requirement,
};
pub use version::{Clause, Version, VersionSpec};

// src/resolver/mod.rs

//! The in-memory dependency graph and its two mutation algorithms.
//!
//! [`graph::DepGraph`] holds one node per canonical distribution name plus
//! the requirement edges and discovery-order bookkeeping needed to turn a
//! sequence of [`engine`] calls into a safe install/remove [`plan::Plan`].
//! [`loader`] seeds a fresh graph from whatever is currently installed;
//! [`engine::DepGraph::add_requirement`] and
//! [`engine::DepGraph::remove_package`] are the only ways to mutate it
//! afterward.

mod distribution;
mod engine;
mod graph;
mod loader;
mod order;
mod plan;
mod requirement;

pub use distribution::{AvailableDistributions, Distribution, InstalledDistributions};
pub use graph::{ChangeOutcome, DepGraph, MarkOutcome, Node, Pending};
pub use order::Order;
pub use plan::Plan;
pub use requirement::{canonical, Requirement};

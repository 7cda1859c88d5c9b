// src/error.rs

//! Error types for the dependency resolver

use thiserror::Error;

/// Result type used throughout the resolver
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Errors that can occur while resolving or parsing requirements
#[derive(Error, Debug)]
pub enum ResolverError {
    /// No distribution among the releases returned by the repository
    /// collaborator satisfies the combined constraint set for a name.
    #[error(
        "no distribution for \"{requirement}\" found{}",
        required_by.as_ref().map(|p| format!("; required by \"{p}\"")).unwrap_or_default()
    )]
    RequirementNotFound {
        requirement: String,
        required_by: Option<String>,
    },

    /// A requirement string did not match the accepted grammar.
    #[error("invalid requirement string: {0}")]
    InvalidRequirement(String),

    /// A version string did not parse.
    #[error("invalid version: {0}")]
    InvalidVersion(String),
}

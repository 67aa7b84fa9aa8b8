//! Failure taxonomy.
//!
//! Fatal failures abort a resolve/check call with no partial result.
//! [`ConformanceViolation`]s are non-fatal and are collected into a report.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ImportStatement, NodeId};

/// Fatal failure of [`Resolver::resolve`](crate::resolver::Resolver::resolve).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "error_kind", rename_all = "snake_case")]
pub enum ResolutionFailure {
    #[error("unresolved import: {import}")]
    UnresolvedImport { import: ImportStatement },

    #[error("unresolved type reference '{type_name}' at {context}")]
    UnresolvedTypeReference { type_name: String, context: NodeId },

    /// Two top-level or lane elements of one process share a node id.
    #[error("duplicate declaration of node {id}")]
    DuplicateDeclaration { id: NodeId },

    /// Only produced under [`LookupErrorPolicy::Propagate`](crate::config::LookupErrorPolicy).
    #[error("class diagram lookup failed for '{path}': {reason}")]
    LookupFailed { path: String, reason: String },
}

/// Fatal failure of [`ConformanceChecker::check`](crate::conformance::ConformanceChecker::check).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "error_kind", rename_all = "snake_case")]
pub enum ConformanceFailure {
    #[error("reference process not found: {name}")]
    ReferenceProcessNotFound { name: String },

    /// Only produced under [`LookupErrorPolicy::Propagate`](crate::config::LookupErrorPolicy).
    #[error("workflow lookup failed for '{name}': {reason}")]
    LookupFailed { name: String, reason: String },
}

/// Non-fatal finding recorded in a conformance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "error_kind", rename_all = "snake_case")]
pub enum ConformanceViolation {
    #[error("task {task} does not incarnate any reference task")]
    TaskNotIncarnated { task: NodeId },

    #[error("parallel branches from {split} are closed by exclusive gateway {merge}")]
    ParallelBranchesClosedWithXor { split: NodeId, merge: NodeId },
}

/// Repository failures of the in-memory unit store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "error_kind", rename_all = "snake_case")]
pub enum StoreError {
    #[error("not found: {fqn}")]
    NotFound { fqn: String },

    #[error("already exists: {fqn}")]
    AlreadyExists { fqn: String },
}

/// Every failure kind this layer can surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowFailure {
    #[error(transparent)]
    Resolution(#[from] ResolutionFailure),

    #[error(transparent)]
    Conformance(#[from] ConformanceFailure),

    #[error(transparent)]
    Violation(#[from] ConformanceViolation),

    #[error(transparent)]
    Store(#[from] StoreError),
}

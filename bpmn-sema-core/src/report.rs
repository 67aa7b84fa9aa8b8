use serde::{Deserialize, Serialize};

use crate::error::ConformanceViolation;
use crate::model::NodeId;

/// One verified correspondence between a concrete task and the reference task it incarnates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncarnationMapping {
    pub concrete_task: NodeId,
    pub reference_task: NodeId,
}

/// Immutable outcome of a conformance check.
///
/// `reference_process_fqn` is empty when the concrete process declares no
/// incarnations at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceReport {
    concrete_process_fqn: String,
    reference_process_fqn: String,
    mappings: Vec<IncarnationMapping>,
    violations: Vec<ConformanceViolation>,
}

impl ConformanceReport {
    pub fn new(
        concrete_process_fqn: impl Into<String>,
        reference_process_fqn: impl Into<String>,
        mappings: Vec<IncarnationMapping>,
        violations: Vec<ConformanceViolation>,
    ) -> Self {
        Self {
            concrete_process_fqn: concrete_process_fqn.into(),
            reference_process_fqn: reference_process_fqn.into(),
            mappings,
            violations,
        }
    }

    /// Report for a process with nothing to compare against.
    pub fn vacuous(concrete_process_fqn: impl Into<String>) -> Self {
        Self::new(concrete_process_fqn, "", Vec::new(), Vec::new())
    }

    pub fn concrete_process_fqn(&self) -> &str {
        &self.concrete_process_fqn
    }

    pub fn reference_process_fqn(&self) -> &str {
        &self.reference_process_fqn
    }

    pub fn mappings(&self) -> &[IncarnationMapping] {
        &self.mappings
    }

    pub fn violations(&self) -> &[ConformanceViolation] {
        &self.violations
    }

    pub fn is_conformant(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn mapping_for(&self, concrete_task: &NodeId) -> Option<&IncarnationMapping> {
        self.mappings.iter().find(|m| &m.concrete_task == concrete_task)
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        let reference = if self.reference_process_fqn.is_empty() {
            "<none>"
        } else {
            &self.reference_process_fqn
        };
        format!(
            "{} -> {}: {} mapping(s), {} violation(s)",
            self.concrete_process_fqn,
            reference,
            self.mappings.len(),
            self.violations.len()
        )
    }
}

//! Reference-process conformance.
//!
//! A concrete task declares the reference task it stands for with
//! `<<incarnates="Target">>`. The checker:
//!
//! 1. Collects tasks via [`Process::tasks`](crate::model::Process::tasks). No
//!    incarnations at all → vacuous report, no lookup is made.
//! 2. Tries each distinct incarnation target, in order of first appearance, as the
//!    fqn of a stored workflow. The first hit is the reference process.
//! 3. Maps every concrete task whose target is a task id of the reference process;
//!    every other task is a `TaskNotIncarnated` violation.
//! 4. Appends violations from registered structural checks.
//!
//! Only reference discovery is fatal. Violations never abort the check.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::{LookupErrorPolicy, SemaConfig};
use crate::error::{ConformanceFailure, ConformanceViolation};
use crate::lookup::WorkflowLookup;
use crate::model::{NodeId, Task, WorkflowCompilationUnit};
use crate::report::{ConformanceReport, IncarnationMapping};
use crate::structural::{StructuralCheck, StructuralValidator};

pub struct ConformanceChecker {
    workflows: Arc<dyn WorkflowLookup>,
    structural: StructuralValidator,
    config: SemaConfig,
}

impl ConformanceChecker {
    pub fn new(workflows: Arc<dyn WorkflowLookup>) -> Self {
        Self::with_config(workflows, SemaConfig::default())
    }

    pub fn with_config(workflows: Arc<dyn WorkflowLookup>, config: SemaConfig) -> Self {
        Self {
            workflows,
            structural: StructuralValidator::new(),
            config,
        }
    }

    /// Register a structural check whose findings are appended to every report.
    pub fn with_check(mut self, check: impl StructuralCheck + 'static) -> Self {
        self.structural = self.structural.with_check(check);
        self
    }

    pub fn with_validator(mut self, validator: StructuralValidator) -> Self {
        self.structural = validator;
        self
    }

    #[tracing::instrument(skip_all, fields(unit = %concrete.fqn()))]
    pub async fn check(
        &self,
        concrete: &WorkflowCompilationUnit,
    ) -> Result<ConformanceReport, ConformanceFailure> {
        let concrete_fqn = concrete.fqn();
        let tasks: Vec<&Task> = concrete.process.tasks().collect();

        let candidates = incarnation_targets(&tasks);
        if candidates.is_empty() {
            tracing::debug!("No incarnations declared; nothing to compare");
            return Ok(ConformanceReport::vacuous(concrete_fqn));
        }

        let reference = self.find_reference(&candidates).await?;
        let reference_fqn = reference.fqn();
        let reference_tasks: HashSet<&str> = reference
            .process
            .tasks()
            .map(|t| t.id.as_str())
            .collect();

        let mut mappings = Vec::new();
        let mut violations = Vec::new();
        for task in &tasks {
            match task.incarnation() {
                Some(target) if reference_tasks.contains(target) => {
                    mappings.push(IncarnationMapping {
                        concrete_task: task.id.clone(),
                        reference_task: NodeId::new(target),
                    });
                }
                _ => violations.push(ConformanceViolation::TaskNotIncarnated {
                    task: task.id.clone(),
                }),
            }
        }

        self.structural.inspect_into(&concrete.process, &mut violations);

        let report = ConformanceReport::new(concrete_fqn, reference_fqn, mappings, violations);
        tracing::info!(summary = %report.summary(), "Conformance check complete");
        Ok(report)
    }

    /// First candidate that names a stored workflow wins.
    async fn find_reference(
        &self,
        candidates: &[&str],
    ) -> Result<WorkflowCompilationUnit, ConformanceFailure> {
        for &name in candidates {
            match self.workflows.find_by_id(name).await {
                Ok(Some(unit)) => {
                    tracing::debug!(candidate = name, "Reference process found");
                    return Ok(unit);
                }
                Ok(None) => {
                    tracing::debug!(candidate = name, "No workflow under candidate name");
                }
                Err(e) => {
                    return Err(match self.config.lookup_errors {
                        LookupErrorPolicy::Collapse => {
                            tracing::warn!(candidate = name, error = %e, "Workflow lookup failed");
                            ConformanceFailure::ReferenceProcessNotFound {
                                name: name.to_string(),
                            }
                        }
                        LookupErrorPolicy::Propagate => ConformanceFailure::LookupFailed {
                            name: name.to_string(),
                            reason: format!("{:#}", e),
                        },
                    });
                }
            }
        }

        // `candidates` is non-empty here.
        Err(ConformanceFailure::ReferenceProcessNotFound {
            name: candidates[0].to_string(),
        })
    }
}

/// Distinct incarnation targets in order of first appearance.
fn incarnation_targets<'a>(tasks: &[&'a Task]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    tasks
        .iter()
        .copied()
        .filter_map(Task::incarnation)
        .filter(|target| seen.insert(*target))
        .collect()
}

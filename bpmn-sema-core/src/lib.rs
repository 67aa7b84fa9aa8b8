//! bpmn-sema-core: semantic resolution for BPMN-Lite workflow units.
//!
//! Sits between the front end (which parses `.bpmn-lite` and `.cd` sources
//! into compilation units) and downstream tooling:
//! - [`Resolver`] binds type names in a workflow to classifiers exported by
//!   imported class diagrams and indexes local declarations into a [`SymbolTable`]
//! - [`ConformanceChecker`] maps the tasks of a concrete process onto the
//!   reference process they incarnate and reports violations
//!
//! Units are fetched through the [`ClassDiagramLookup`] and [`WorkflowLookup`]
//! traits; [`MemoryUnitStore`] implements both.

pub mod config;
pub mod conformance;
pub mod error;
pub mod lookup;
pub mod memory;
pub mod model;
pub mod report;
pub mod resolver;
pub mod structural;
pub mod symbols;
pub mod yaml;

pub use config::{LookupErrorPolicy, SemaConfig};
pub use conformance::ConformanceChecker;
pub use error::{
    ConformanceFailure, ConformanceViolation, ResolutionFailure, StoreError, WorkflowFailure,
};
pub use lookup::{ClassDiagramLookup, WorkflowLookup};
pub use memory::MemoryUnitStore;
pub use model::{NodeId, WorkflowCompilationUnit};
pub use report::{ConformanceReport, IncarnationMapping};
pub use resolver::Resolver;
pub use structural::{ParallelXorMergeCheck, StructuralCheck, StructuralValidator};
pub use symbols::{ResolvedWorkflowUnit, SymbolTable};
pub use yaml::{parse_class_diagram_yaml, parse_workflow_yaml};

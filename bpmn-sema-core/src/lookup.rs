use crate::model::{ClassDiagramUnit, WorkflowCompilationUnit};
use anyhow::Result;
use async_trait::async_trait;

/// Resolves import paths to class diagrams.
///
/// Implementations strip a trailing `.*` before matching against a diagram's
/// fully-qualified name. `Ok(None)` means no diagram matched.
#[async_trait]
pub trait ClassDiagramLookup: Send + Sync {
    async fn find_by_import_path(&self, path: &str) -> Result<Option<ClassDiagramUnit>>;
}

/// Exact-match lookup of workflow units by fully-qualified process name.
#[async_trait]
pub trait WorkflowLookup: Send + Sync {
    async fn find_by_id(&self, name: &str) -> Result<Option<WorkflowCompilationUnit>>;
}

use crate::error::StoreError;
use crate::lookup::{ClassDiagramLookup, WorkflowLookup};
use crate::model::{ClassDiagramUnit, WorkflowCompilationUnit};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory repository of compilation units, keyed by fully-qualified name.
///
/// Backs both lookup traits, so a front end can populate it once and hand the
/// same store to the resolver and the conformance checker.
///
/// - `save_*` refuses to overwrite an existing fqn (`StoreError::AlreadyExists`)
/// - `replace_*` overwrites unconditionally
/// - `remove_*` of an unknown fqn fails with `StoreError::NotFound`
pub struct MemoryUnitStore {
    diagrams: RwLock<HashMap<String, ClassDiagramUnit>>,
    workflows: RwLock<HashMap<String, WorkflowCompilationUnit>>,
}

impl MemoryUnitStore {
    pub fn new() -> Self {
        Self {
            diagrams: RwLock::new(HashMap::new()),
            workflows: RwLock::new(HashMap::new()),
        }
    }

    pub fn save_class_diagram(&self, unit: ClassDiagramUnit) -> Result<()> {
        let fqn = unit.fqn();
        let mut store = self.diagrams.write().map_err(|e| anyhow!("Lock: {}", e))?;
        if store.contains_key(&fqn) {
            return Err(StoreError::AlreadyExists { fqn }.into());
        }
        store.insert(fqn, unit);
        Ok(())
    }

    pub fn replace_class_diagram(&self, unit: ClassDiagramUnit) -> Result<()> {
        let mut store = self.diagrams.write().map_err(|e| anyhow!("Lock: {}", e))?;
        store.insert(unit.fqn(), unit);
        Ok(())
    }

    pub fn remove_class_diagram(&self, fqn: &str) -> Result<ClassDiagramUnit> {
        let mut store = self.diagrams.write().map_err(|e| anyhow!("Lock: {}", e))?;
        store.remove(fqn).ok_or_else(|| {
            StoreError::NotFound {
                fqn: fqn.to_string(),
            }
            .into()
        })
    }

    pub fn save_workflow(&self, unit: WorkflowCompilationUnit) -> Result<()> {
        let fqn = unit.fqn();
        let mut store = self.workflows.write().map_err(|e| anyhow!("Lock: {}", e))?;
        if store.contains_key(&fqn) {
            return Err(StoreError::AlreadyExists { fqn }.into());
        }
        store.insert(fqn, unit);
        Ok(())
    }

    pub fn replace_workflow(&self, unit: WorkflowCompilationUnit) -> Result<()> {
        let mut store = self.workflows.write().map_err(|e| anyhow!("Lock: {}", e))?;
        store.insert(unit.fqn(), unit);
        Ok(())
    }

    pub fn remove_workflow(&self, fqn: &str) -> Result<WorkflowCompilationUnit> {
        let mut store = self.workflows.write().map_err(|e| anyhow!("Lock: {}", e))?;
        store.remove(fqn).ok_or_else(|| {
            StoreError::NotFound {
                fqn: fqn.to_string(),
            }
            .into()
        })
    }
}

impl Default for MemoryUnitStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClassDiagramLookup for MemoryUnitStore {
    async fn find_by_import_path(&self, path: &str) -> Result<Option<ClassDiagramUnit>> {
        let store = self.diagrams.read().map_err(|e| anyhow!("Lock: {}", e))?;

        // Wildcards name a diagram exactly; only single-type paths fall back.
        if let Some(target) = path.strip_suffix(".*") {
            return Ok(store.get(target).cloned());
        }

        // `a.b.Diagram.Type` names a classifier inside diagram `a.b.Diagram`
        let found = store.get(path).or_else(|| {
            path.rsplit_once('.')
                .and_then(|(diagram, _)| store.get(diagram))
        });
        Ok(found.cloned())
    }
}

#[async_trait]
impl WorkflowLookup for MemoryUnitStore {
    async fn find_by_id(&self, name: &str) -> Result<Option<WorkflowCompilationUnit>> {
        let store = self.workflows.read().map_err(|e| anyhow!("Lock: {}", e))?;
        Ok(store.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classifier, ClassifierKind, ImportStatement, Process};

    fn diagram(package: &str, name: &str, classifiers: &[&str]) -> ClassDiagramUnit {
        ClassDiagramUnit {
            package: package.to_string(),
            name: name.to_string(),
            imports: vec![],
            classifiers: classifiers
                .iter()
                .map(|c| Classifier::new(*c, ClassifierKind::Class))
                .collect(),
        }
    }

    fn workflow(package: &str, name: &str) -> WorkflowCompilationUnit {
        WorkflowCompilationUnit {
            package: package.to_string(),
            imports: vec![],
            process: Process {
                name: name.to_string(),
                items: vec![],
                flows: vec![],
            },
        }
    }

    #[tokio::test]
    async fn wildcard_path_matches_diagram_fqn() {
        let store = MemoryUnitStore::new();
        store
            .save_class_diagram(diagram("de.shop", "Orders", &["Order"]))
            .unwrap();

        let found = store.find_by_import_path("de.shop.Orders.*").await.unwrap();
        assert_eq!(found.map(|d| d.name), Some("Orders".to_string()));
        assert!(store
            .find_by_import_path("de.shop.*")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn wildcard_of_missing_diagram_ignores_parent() {
        let store = MemoryUnitStore::new();
        store
            .save_class_diagram(diagram("de", "shop", &["Coupon"]))
            .unwrap();
        store
            .save_class_diagram(diagram("de.shop", "Orders", &["Order"]))
            .unwrap();

        let import = ImportStatement::wildcard("de.shop.Missing");
        assert!(store
            .find_by_import_path(import.path())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn single_type_path_falls_back_to_parent_diagram() {
        let store = MemoryUnitStore::new();
        store
            .save_class_diagram(diagram("de.shop", "Orders", &["Order"]))
            .unwrap();

        let found = store
            .find_by_import_path("de.shop.Orders.Order")
            .await
            .unwrap();
        assert_eq!(found.map(|d| d.fqn()), Some("de.shop.Orders".to_string()));
        assert!(store
            .find_by_import_path("de.other.Orders.Order")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_save_is_rejected() {
        let store = MemoryUnitStore::new();
        store.save_workflow(workflow("ref", "Fulfilment")).unwrap();

        let err = store.save_workflow(workflow("ref", "Fulfilment")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<StoreError>(),
            Some(&StoreError::AlreadyExists {
                fqn: "ref.Fulfilment".into()
            })
        );

        store.replace_workflow(workflow("ref", "Fulfilment")).unwrap();
        assert!(store.find_by_id("ref.Fulfilment").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn remove_unknown_is_not_found() {
        let store = MemoryUnitStore::new();
        let err = store.remove_class_diagram("de.shop.Orders").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::NotFound { .. })
        ));

        store.save_workflow(workflow("", "Standalone")).unwrap();
        let removed = store.remove_workflow("Standalone").unwrap();
        assert_eq!(removed.process.name, "Standalone");
        assert!(store.find_by_id("Standalone").await.unwrap().is_none());
    }
}

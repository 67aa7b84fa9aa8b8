//! Symbol resolution for workflow units.
//!
//! Two sequential phases, first failure wins:
//!
//! 1. **Imports**: each import is looked up in declaration order and its
//!    classifiers merged into one `name → Classifier` map. Later imports
//!    override earlier ones on name collision.
//! 2. **Type references**: every data object and notification reachable
//!    through [`Process::elements`](crate::model::Process::elements) must name a builtin type or a merged
//!    classifier.
//!
//! On success the same element walk indexes the unit's declarations into a
//! [`SymbolTable`].

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::config::{LookupErrorPolicy, SemaConfig};
use crate::error::ResolutionFailure;
use crate::lookup::ClassDiagramLookup;
use crate::model::{Classifier, ImportStatement, Process, WorkflowCompilationUnit};
use crate::symbols::{ResolvedWorkflowUnit, SymbolTable};

pub struct Resolver {
    diagrams: Arc<dyn ClassDiagramLookup>,
    config: SemaConfig,
}

impl Resolver {
    pub fn new(diagrams: Arc<dyn ClassDiagramLookup>) -> Self {
        Self::with_config(diagrams, SemaConfig::default())
    }

    pub fn with_config(diagrams: Arc<dyn ClassDiagramLookup>, config: SemaConfig) -> Self {
        Self { diagrams, config }
    }

    pub fn config(&self) -> &SemaConfig {
        &self.config
    }

    /// Resolve `unit` into a unit plus symbol table. The input is cloned, never modified.
    #[tracing::instrument(skip_all, fields(unit = %unit.fqn()))]
    pub async fn resolve(
        &self,
        unit: &WorkflowCompilationUnit,
    ) -> Result<ResolvedWorkflowUnit, ResolutionFailure> {
        let types = self.resolve_imports(&unit.imports).await?;
        self.verify_type_references(&unit.process, &types)?;
        reject_duplicate_ids(&unit.process)?;

        let symbol_table = SymbolTable::build(types, unit.process.elements());
        tracing::info!(
            types = symbol_table.types().len(),
            data_objects = symbol_table.data_objects().len(),
            notifications = symbol_table.notifications().len(),
            operations = symbol_table.operations().len(),
            "Resolved workflow unit"
        );

        Ok(ResolvedWorkflowUnit {
            unit: unit.clone(),
            symbol_table,
        })
    }

    async fn resolve_imports(
        &self,
        imports: &[ImportStatement],
    ) -> Result<BTreeMap<String, Classifier>, ResolutionFailure> {
        let mut types = BTreeMap::new();

        // Sequential: a later import may shadow an earlier one.
        for import in imports {
            let diagram = match self.diagrams.find_by_import_path(import.path()).await {
                Ok(Some(diagram)) => diagram,
                Ok(None) => {
                    return Err(ResolutionFailure::UnresolvedImport {
                        import: import.clone(),
                    })
                }
                Err(e) => return Err(self.lookup_error(import, e)),
            };

            if import.is_wildcard() {
                tracing::debug!(
                    import = %import,
                    diagram = %diagram.fqn(),
                    classifiers = diagram.classifiers.len(),
                    "Wildcard import"
                );
                for classifier in diagram.classifiers {
                    types.insert(classifier.name.clone(), classifier);
                }
            } else {
                let name = import.simple_name();
                match diagram.classifier(name) {
                    Some(classifier) => {
                        tracing::debug!(
                            import = %import,
                            diagram = %diagram.fqn(),
                            "Single-type import"
                        );
                        types.insert(name.to_string(), classifier.clone());
                    }
                    None => {
                        // Not a failure here; a reference to `name` fails in phase 2.
                        tracing::warn!(
                            import = %import,
                            diagram = %diagram.fqn(),
                            "Imported classifier not exported by diagram; ignoring"
                        );
                    }
                }
            }
        }

        Ok(types)
    }

    fn lookup_error(&self, import: &ImportStatement, err: anyhow::Error) -> ResolutionFailure {
        match self.config.lookup_errors {
            LookupErrorPolicy::Collapse => {
                tracing::warn!(import = %import, error = %err, "Class diagram lookup failed");
                ResolutionFailure::UnresolvedImport {
                    import: import.clone(),
                }
            }
            LookupErrorPolicy::Propagate => ResolutionFailure::LookupFailed {
                path: import.path().to_string(),
                reason: format!("{:#}", err),
            },
        }
    }

    fn verify_type_references(
        &self,
        process: &Process,
        types: &BTreeMap<String, Classifier>,
    ) -> Result<(), ResolutionFailure> {
        for element in process.elements() {
            let Some(type_name) = element.type_name() else {
                continue;
            };
            if self.config.is_builtin(type_name) || types.contains_key(type_name) {
                continue;
            }
            return Err(ResolutionFailure::UnresolvedTypeReference {
                type_name: type_name.to_string(),
                context: element.id().clone(),
            });
        }
        Ok(())
    }
}

/// The symbol table is keyed by node id, so a repeated id would hide an element.
fn reject_duplicate_ids(process: &Process) -> Result<(), ResolutionFailure> {
    let mut seen = HashSet::new();
    for element in process.elements() {
        if !seen.insert(element.id()) {
            return Err(ResolutionFailure::DuplicateDeclaration {
                id: element.id().clone(),
            });
        }
    }
    Ok(())
}

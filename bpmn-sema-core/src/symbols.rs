//! Resolved scope of a single workflow unit.
//!
//! A [`SymbolTable`] is built once per resolution and never updated in place.
//! It indexes four symbol classes:
//!
//! - imported classifiers, by simple name
//! - data objects, notifications and operations, by node id
//!
//! Keys are unique within each class. `BTreeMap` keeps iteration stable and
//! lets [`SymbolTable::EMPTY`] be a true constant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{
    Classifier, DataObject, FlowElement, NodeId, Notification, Operation, WorkflowCompilationUnit,
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    types: BTreeMap<String, Classifier>,
    data_objects: BTreeMap<NodeId, DataObject>,
    notifications: BTreeMap<NodeId, Notification>,
    operations: BTreeMap<NodeId, Operation>,
}

impl SymbolTable {
    pub const EMPTY: SymbolTable = SymbolTable {
        types: BTreeMap::new(),
        data_objects: BTreeMap::new(),
        notifications: BTreeMap::new(),
        operations: BTreeMap::new(),
    };

    /// Index `elements` alongside an already-merged classifier map.
    ///
    /// Non-symbol elements (tasks, gateways, events, subprocesses) are skipped.
    /// Ids are assumed unique, as [`Resolver::resolve`](crate::resolver::Resolver::resolve)
    /// guarantees; a repeated id keeps only the last element.
    pub fn build<'a>(
        types: BTreeMap<String, Classifier>,
        elements: impl IntoIterator<Item = &'a FlowElement>,
    ) -> Self {
        let mut table = SymbolTable {
            types,
            ..SymbolTable::EMPTY
        };
        for element in elements {
            match element {
                FlowElement::DataObject(d) => {
                    table.data_objects.insert(d.id.clone(), d.clone());
                }
                FlowElement::Notification(n) => {
                    table.notifications.insert(n.id.clone(), n.clone());
                }
                FlowElement::Operation(o) => {
                    table.operations.insert(o.id.clone(), o.clone());
                }
                _ => {}
            }
        }
        table
    }

    pub fn resolve_type(&self, name: &str) -> Option<&Classifier> {
        self.types.get(name)
    }

    pub fn data_object(&self, id: &NodeId) -> Option<&DataObject> {
        self.data_objects.get(id)
    }

    pub fn notification(&self, id: &NodeId) -> Option<&Notification> {
        self.notifications.get(id)
    }

    pub fn operation(&self, id: &NodeId) -> Option<&Operation> {
        self.operations.get(id)
    }

    pub fn types(&self) -> &BTreeMap<String, Classifier> {
        &self.types
    }

    pub fn data_objects(&self) -> &BTreeMap<NodeId, DataObject> {
        &self.data_objects
    }

    pub fn notifications(&self) -> &BTreeMap<NodeId, Notification> {
        &self.notifications
    }

    pub fn operations(&self) -> &BTreeMap<NodeId, Operation> {
        &self.operations
    }

    /// Total entries across all four symbol classes.
    pub fn size(&self) -> usize {
        self.types.len() + self.data_objects.len() + self.notifications.len() + self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

/// A workflow unit paired with its resolved scope. The unit is kept as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedWorkflowUnit {
    pub unit: WorkflowCompilationUnit,
    pub symbol_table: SymbolTable,
}

impl ResolvedWorkflowUnit {
    pub fn fqn(&self) -> String {
        self.unit.fqn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassifierKind, Task};

    fn sample_elements() -> Vec<FlowElement> {
        vec![
            FlowElement::DataObject(DataObject {
                id: NodeId::new("orderDoc"),
                type_name: "Order".into(),
            }),
            FlowElement::Task(Task::new("review")),
            FlowElement::Notification(Notification {
                id: NodeId::new("shipped"),
                type_name: "String".into(),
            }),
            FlowElement::Operation(Operation {
                id: NodeId::new("charge"),
                name: "chargeCard".into(),
            }),
            FlowElement::DataObject(DataObject {
                id: NodeId::new("invoiceDoc"),
                type_name: "Invoice".into(),
            }),
        ]
    }

    #[test]
    fn empty_constant() {
        assert_eq!(SymbolTable::EMPTY.size(), 0);
        assert!(SymbolTable::EMPTY.is_empty());
        assert_eq!(SymbolTable::default(), SymbolTable::EMPTY);
    }

    #[test]
    fn every_indexed_element_is_found_by_its_id() {
        let elements = sample_elements();
        let table = SymbolTable::build(BTreeMap::new(), &elements);

        assert_eq!(table.size(), 4);
        for element in &elements {
            let id = element.id();
            let found = match element {
                FlowElement::DataObject(d) => table.data_object(id) == Some(d),
                FlowElement::Notification(n) => table.notification(id) == Some(n),
                FlowElement::Operation(o) => table.operation(id) == Some(o),
                _ => continue,
            };
            assert!(found, "{} missing from symbol table", id);
        }
    }

    #[test]
    fn size_counts_types_and_declarations() {
        let mut types = BTreeMap::new();
        types.insert(
            "Order".to_string(),
            Classifier::new("Order", ClassifierKind::Class),
        );
        let table = SymbolTable::build(types, &sample_elements());

        assert_eq!(table.size(), 5);
        assert!(table.resolve_type("Order").is_some());
        assert!(table.resolve_type("Invoice").is_none());
        assert!(table.data_object(&NodeId::new("review")).is_none());
    }
}

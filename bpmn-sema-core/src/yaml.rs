use crate::model::{ClassDiagramUnit, WorkflowCompilationUnit};
use anyhow::Result;

/// Parse a YAML string into a WorkflowCompilationUnit.
///
/// Nothing is resolved here. Hand the unit to `Resolver::resolve()` or
/// `ConformanceChecker::check()`.
pub fn parse_workflow_yaml(yaml_str: &str) -> Result<WorkflowCompilationUnit> {
    let unit: WorkflowCompilationUnit = serde_yaml::from_str(yaml_str)?;
    Ok(unit)
}

/// Parse a YAML string into a ClassDiagramUnit.
pub fn parse_class_diagram_yaml(yaml_str: &str) -> Result<ClassDiagramUnit> {
    let unit: ClassDiagramUnit = serde_yaml::from_str(yaml_str)?;
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;

    #[test]
    fn test_workflow_with_lane_and_stereotypes() {
        let yaml = r#"
package: de.shop.flows
imports:
  - path: de.shop.Orders.*
    wildcard: true
  - path: de.shop.Billing.Invoice
process:
  name: Checkout
  items:
    - kind: Event
      id: start
      event: Start
    - kind: DataObject
      id: orderDoc
      type_name: Order
    - lane: billing
      elements:
        - kind: Task
          id: charge
          task_kind: Service
          stereotypes:
            - name: incarnates
              value: Pay
        - kind: Notification
          id: paid
          type_name: String
    - kind: Gateway
      id: fork
      gateway: Parallel
  flows:
    - from: start
      to: fork
"#;
        let unit = parse_workflow_yaml(yaml).unwrap();
        assert_eq!(unit.fqn(), "de.shop.flows.Checkout");
        assert_eq!(unit.imports.len(), 2);
        assert!(unit.imports[0].is_wildcard());
        assert!(!unit.imports[1].is_wildcard());

        let ids: Vec<&str> = unit.process.elements().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, vec!["start", "orderDoc", "charge", "paid", "fork"]);

        let charge = unit.process.tasks().next().unwrap();
        assert_eq!(charge.task_kind, TaskKind::Service);
        assert_eq!(charge.incarnation(), Some("Pay"));
        assert_eq!(unit.process.flows.len(), 1);
    }

    #[test]
    fn test_class_diagram() {
        let yaml = r#"
package: de.shop
name: Orders
classifiers:
  - name: Order
    attributes:
      - name: total
        type_name: double
  - name: Status
    kind: Enum
"#;
        let unit = parse_class_diagram_yaml(yaml).unwrap();
        assert_eq!(unit.fqn(), "de.shop.Orders");
        assert_eq!(unit.classifiers.len(), 2);
        assert_eq!(unit.classifier("Order").map(|c| c.kind), Some(ClassifierKind::Class));
        assert_eq!(unit.classifier("Status").map(|c| c.kind), Some(ClassifierKind::Enum));
    }

    /// Element kinds must be tagged; a bare id is not an element.
    #[test]
    fn test_untagged_element_fails() {
        let yaml = r#"
process:
  name: Broken
  items:
    - id: orphan
"#;
        assert!(parse_workflow_yaml(yaml).is_err());
    }
}

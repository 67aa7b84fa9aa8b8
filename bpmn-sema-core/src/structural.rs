//! Pluggable structural checks over a process's sequence-flow graph.
//!
//! The conformance checker appends their findings after task mapping; the
//! [`StructuralValidator`] runs the same checks stand-alone.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use petgraph::Direction;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ConformanceViolation;
use crate::model::{FlowElement, Gateway, GatewayKind, NodeId, Process};

pub trait StructuralCheck: Send + Sync {
    fn name(&self) -> &str;

    /// Append every finding for `process` to `out`. Must not remove entries.
    fn inspect(&self, process: &Process, out: &mut Vec<ConformanceViolation>);
}

/// Ordered set of structural checks.
#[derive(Clone, Default)]
pub struct StructuralValidator {
    checks: Vec<Arc<dyn StructuralCheck>>,
}

impl StructuralValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_check(mut self, check: impl StructuralCheck + 'static) -> Self {
        self.push(Arc::new(check));
        self
    }

    pub fn push(&mut self, check: Arc<dyn StructuralCheck>) {
        self.checks.push(check);
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run all checks in registration order, appending to `out`.
    pub fn inspect_into(&self, process: &Process, out: &mut Vec<ConformanceViolation>) {
        for check in &self.checks {
            let before = out.len();
            check.inspect(process, out);
            if out.len() > before {
                tracing::debug!(
                    check = check.name(),
                    process = %process.name,
                    found = out.len() - before,
                    "Structural check reported violations"
                );
            }
        }
    }

    pub fn validate(&self, process: &Process) -> Vec<ConformanceViolation> {
        let mut out = Vec::new();
        self.inspect_into(process, &mut out);
        out
    }
}

/// Sequence-flow graph of a process. Flows to or from unknown nodes are dropped.
struct FlowGraph<'a> {
    graph: DiGraph<&'a FlowElement, ()>,
}

impl<'a> FlowGraph<'a> {
    fn build(process: &'a Process) -> Self {
        let mut graph = DiGraph::new();
        let mut node_index_map: HashMap<&NodeId, NodeIndex> = HashMap::new();

        for element in process.elements() {
            let idx = graph.add_node(element);
            node_index_map.insert(element.id(), idx);
        }
        for flow in &process.flows {
            if let (Some(&from), Some(&to)) =
                (node_index_map.get(&flow.from), node_index_map.get(&flow.to))
            {
                graph.add_edge(from, to, ());
            }
        }
        Self { graph }
    }

    /// Nearest node, in BFS order from `split`, that every outgoing branch reaches.
    fn merge_of(&self, split: NodeIndex) -> Option<NodeIndex> {
        let branches: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(split, Direction::Outgoing)
            .collect();
        if branches.len() < 2 {
            return None;
        }

        let mut reached_by: HashMap<NodeIndex, usize> = HashMap::new();
        for &branch in &branches {
            let mut bfs = Bfs::new(&self.graph, branch);
            while let Some(node) = bfs.next(&self.graph) {
                *reached_by.entry(node).or_default() += 1;
            }
        }

        let mut bfs = Bfs::new(&self.graph, split);
        while let Some(node) = bfs.next(&self.graph) {
            if node != split && reached_by.get(&node) == Some(&branches.len()) {
                return Some(node);
            }
        }
        None
    }
}

fn is_gateway(element: &FlowElement, kind: GatewayKind) -> bool {
    matches!(element, FlowElement::Gateway(Gateway { gateway, .. }) if *gateway == kind)
}

/// Flags parallel splits whose branches first reconverge at an exclusive gateway.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelXorMergeCheck;

impl StructuralCheck for ParallelXorMergeCheck {
    fn name(&self) -> &str {
        "parallel-xor-merge"
    }

    fn inspect(&self, process: &Process, out: &mut Vec<ConformanceViolation>) {
        let flow = FlowGraph::build(process);
        for split in flow.graph.node_indices() {
            if !is_gateway(flow.graph[split], GatewayKind::Parallel) {
                continue;
            }
            let Some(merge) = flow.merge_of(split) else {
                continue;
            };
            if is_gateway(flow.graph[merge], GatewayKind::Exclusive) {
                out.push(ConformanceViolation::ParallelBranchesClosedWithXor {
                    split: flow.graph[split].id().clone(),
                    merge: flow.graph[merge].id().clone(),
                });
            }
        }
    }
}

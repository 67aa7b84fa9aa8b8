//! Compilation-unit data model.
//!
//! These are the in-memory shapes an external front end produces for
//! workflow (`.bpmn-lite`) and class-diagram (`.cd`) sources. Nothing in this
//! crate mutates them; resolution and conformance only borrow.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stereotype name that marks a task as incarnating a reference task.
pub const INCARNATES: &str = "incarnates";

// ─── Identifiers ──────────────────────────────────────────────

/// Identifier of a flow node, unique within its process.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}

// ─── Imports ──────────────────────────────────────────────────

/// An `import a.b.C;` or `import a.b.C.*;` statement.
///
/// A wildcard import always carries the trailing `.*` in its path. The two
/// are kept in step by the constructors and by `Deserialize`, so the flag and
/// the path can never disagree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawImport")]
pub struct ImportStatement {
    path: String,
    wildcard: bool,
}

/// Import as written in a unit file. `wildcard` may be omitted when the path
/// ends in `.*`.
#[derive(Deserialize)]
struct RawImport {
    path: String,
    #[serde(default)]
    wildcard: Option<bool>,
}

impl TryFrom<RawImport> for ImportStatement {
    type Error = String;

    fn try_from(raw: RawImport) -> Result<Self, Self::Error> {
        let suffixed = raw.path.ends_with(".*");
        match raw.wildcard {
            Some(false) if suffixed => Err(format!(
                "import `{}` ends in `.*` but is marked wildcard: false",
                raw.path
            )),
            Some(true) => Ok(Self::wildcard(raw.path)),
            _ if suffixed => Ok(Self::wildcard(raw.path)),
            _ => Ok(Self::single(raw.path)),
        }
    }
}

impl ImportStatement {
    pub fn single(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            wildcard: false,
        }
    }

    pub fn wildcard(path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.ends_with(".*") {
            path.push_str(".*");
        }
        Self {
            path,
            wildcard: true,
        }
    }

    /// Dotted path as written, including the trailing `.*` for wildcards.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// The path with any trailing `.*` removed.
    pub fn target_path(&self) -> &str {
        self.path.strip_suffix(".*").unwrap_or(&self.path)
    }

    /// Last dot-separated segment of the target path.
    pub fn simple_name(&self) -> &str {
        let target = self.target_path();
        target.rsplit('.').next().unwrap_or(target)
    }
}

impl fmt::Display for ImportStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

// ─── Class diagrams ───────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifierKind {
    #[default]
    Class,
    Enum,
    Interface,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub type_name: String,
}

/// A named type exported by a class diagram. Identity is `name` within the diagram.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifier {
    pub name: String,
    #[serde(default)]
    pub kind: ClassifierKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

impl Classifier {
    pub fn new(name: impl Into<String>, kind: ClassifierKind) -> Self {
        Self {
            name: name.into(),
            kind,
            attributes: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassDiagramUnit {
    #[serde(default)]
    pub package: String,
    pub name: String,
    #[serde(default)]
    pub imports: Vec<ImportStatement>,
    #[serde(default)]
    pub classifiers: Vec<Classifier>,
}

impl ClassDiagramUnit {
    pub fn fqn(&self) -> String {
        qualify(&self.package, &self.name)
    }

    pub fn classifier(&self, name: &str) -> Option<&Classifier> {
        self.classifiers.iter().find(|c| c.name == name)
    }
}

// ─── Workflow units ───────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowCompilationUnit {
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub imports: Vec<ImportStatement>,
    pub process: Process,
}

impl WorkflowCompilationUnit {
    /// Fully-qualified process name, the key workflow lookups match on.
    pub fn fqn(&self) -> String {
        qualify(&self.package, &self.process.name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub name: String,
    #[serde(default)]
    pub items: Vec<ProcessItem>,
    #[serde(default)]
    pub flows: Vec<SequenceFlow>,
}

impl Process {
    /// Elements declared directly in the process plus those of its lanes, in
    /// declaration order. Subprocess bodies are not entered.
    pub fn elements(&self) -> impl Iterator<Item = &FlowElement> + '_ {
        self.items.iter().flat_map(|item| match item {
            ProcessItem::Element(el) => std::slice::from_ref(el).iter(),
            ProcessItem::Lane(lane) => lane.elements.iter(),
        })
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.elements().filter_map(|el| match el {
            FlowElement::Task(task) => Some(task),
            _ => None,
        })
    }

    pub fn element(&self, id: &NodeId) -> Option<&FlowElement> {
        self.elements().find(|el| el.id() == id)
    }
}

/// A top-level entry of a process body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessItem {
    Lane(Lane),
    Element(FlowElement),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub lane: String,
    #[serde(default)]
    pub elements: Vec<FlowElement>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceFlow {
    pub from: NodeId,
    pub to: NodeId,
}

// ─── Flow elements ────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FlowElement {
    Task(Task),
    DataObject(DataObject),
    Notification(Notification),
    Operation(Operation),
    Gateway(Gateway),
    Event(Event),
    SubProcess(SubProcess),
}

impl FlowElement {
    pub fn id(&self) -> &NodeId {
        match self {
            FlowElement::Task(Task { id, .. })
            | FlowElement::DataObject(DataObject { id, .. })
            | FlowElement::Notification(Notification { id, .. })
            | FlowElement::Operation(Operation { id, .. })
            | FlowElement::Gateway(Gateway { id, .. })
            | FlowElement::Event(Event { id, .. })
            | FlowElement::SubProcess(SubProcess { id, .. }) => id,
        }
    }

    /// Declared type name for typed elements (data objects and notifications).
    pub fn type_name(&self) -> Option<&str> {
        match self {
            FlowElement::DataObject(d) => Some(&d.type_name),
            FlowElement::Notification(n) => Some(&n.type_name),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    #[default]
    Abstract,
    Service,
    User,
    Script,
    Send,
    Receive,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stereotype {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: NodeId,
    #[serde(default)]
    pub task_kind: TaskKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stereotypes: Vec<Stereotype>,
}

impl Task {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(id),
            task_kind: TaskKind::Abstract,
            stereotypes: Vec::new(),
        }
    }

    pub fn incarnating(mut self, target: impl Into<String>) -> Self {
        self.stereotypes.push(Stereotype {
            name: INCARNATES.to_string(),
            value: Some(target.into()),
        });
        self
    }

    /// Target of the `<<incarnates="...">>` stereotype, if present and non-empty.
    pub fn incarnation(&self) -> Option<&str> {
        self.stereotypes
            .iter()
            .find(|s| s.name == INCARNATES)
            .and_then(|s| s.value.as_deref())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataObject {
    pub id: NodeId,
    pub type_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NodeId,
    pub type_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayKind {
    Exclusive,
    Parallel,
    Inclusive,
    EventBased,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    pub id: NodeId,
    pub gateway: GatewayKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Start,
    Intermediate,
    End,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: NodeId,
    pub event: EventKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubProcess {
    pub id: NodeId,
    #[serde(default)]
    pub elements: Vec<FlowElement>,
}

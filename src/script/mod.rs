//! Animation scripts
//!
//! This module holds the data a walkthrough is made of:
//! - [`step`]: the [`Step`] schema, one variant per operation kind
//! - [`value`]: [`ScalarValue`], the JSON scalars used for variables and labels
//! - [`document`]: problem files bundling a script per solution language
//!
//! An [`AnimationScript`] is immutable once loaded. It is a passthrough
//! container: nothing is validated, and every optional field may be missing.

pub mod document;
pub mod step;
pub mod value;

pub use document::{ProblemDocument, SessionContext, Solution};
pub use step::{ElementId, HighlightStyle, Position, Step, StepAction};
pub use value::{ScalarValue, VariableMap};

use serde::Deserialize;
use std::fmt;

/// Which renderer lays out the initial snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum DataStructureKind {
    Array,
    LinkedList,
    Stack,
    Queue,
    Tree,
    Graph,
    #[default]
    Generic,
}

impl DataStructureKind {
    /// Parse a category name. Unknown names map to `Generic`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "array" => DataStructureKind::Array,
            "linkedlist" | "linked-list" | "list" => DataStructureKind::LinkedList,
            "stack" => DataStructureKind::Stack,
            "queue" => DataStructureKind::Queue,
            "tree" => DataStructureKind::Tree,
            "graph" => DataStructureKind::Graph,
            _ => DataStructureKind::Generic,
        }
    }

    /// Id prefix for structures addressed by slot (`element-0`, `node-2`, ...)
    pub fn slot_prefix(self) -> Option<&'static str> {
        match self {
            DataStructureKind::Array => Some("element"),
            DataStructureKind::LinkedList => Some("node"),
            DataStructureKind::Stack => Some("stack"),
            DataStructureKind::Queue => Some("queue"),
            _ => None,
        }
    }

    /// Whether elements are laid out in a single ordered row or column
    pub fn is_linear(self) -> bool {
        self.slot_prefix().is_some()
    }
}

impl From<String> for DataStructureKind {
    fn from(name: String) -> Self {
        DataStructureKind::from_name(&name)
    }
}

impl fmt::Display for DataStructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataStructureKind::Array => "Array",
            DataStructureKind::LinkedList => "Linked List",
            DataStructureKind::Stack => "Stack (LIFO)",
            DataStructureKind::Queue => "Queue (FIFO)",
            DataStructureKind::Tree => "Binary Tree",
            DataStructureKind::Graph => "Graph",
            DataStructureKind::Generic => "Algorithm Steps",
        };
        f.write_str(name)
    }
}

/// A binary tree node as written in a script
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeNode {
    pub value: ScalarValue,
    #[serde(default)]
    pub left: Option<Box<TreeNode>>,
    #[serde(default)]
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    pub fn leaf(value: impl Into<ScalarValue>) -> Self {
        TreeNode {
            value: value.into(),
            left: None,
            right: None,
        }
    }

    pub fn with_children(
        value: impl Into<ScalarValue>,
        left: Option<TreeNode>,
        right: Option<TreeNode>,
    ) -> Self {
        TreeNode {
            value: value.into(),
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphNode {
    pub id: ScalarValue,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphEdge {
    pub from: ScalarValue,
    pub to: ScalarValue,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

/// Initial data-structure snapshot; its shape depends on the structure kind
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InitialData {
    Sequence(Vec<ScalarValue>),
    Graph(GraphData),
    Tree(TreeNode),
}

/// A named pointer marker for array-like views
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PointerDecl {
    pub name: String,
}

/// A variable shown in the tracker panel
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDecl {
    pub name: String,
    #[serde(default)]
    pub initial_value: Option<ScalarValue>,
}

/// A complete walkthrough: steps plus everything needed to draw step 0
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationScript {
    pub steps: Vec<Step>,
    pub initial_variables: VariableMap,
    pub initial_data: Option<InitialData>,
    pub pointers: Vec<PointerDecl>,
    /// Tracker declarations; only used to seed the variable panel
    pub variables: Vec<VariableDecl>,
    pub time_complexity: Option<String>,
    pub space_complexity: Option<String>,
}

impl AnimationScript {
    /// Parse a script from its JSON text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_script_parses() {
        let script = AnimationScript::from_json(r#"{"steps": []}"#).unwrap();
        assert!(script.is_empty());
        assert!(script.initial_data.is_none());
        assert!(script.pointers.is_empty());
        assert!(script.initial_variables.is_empty());
    }

    #[test]
    fn test_initial_data_shapes() {
        let seq: InitialData = serde_json::from_str("[5, 2, 8]").unwrap();
        assert_eq!(
            seq,
            InitialData::Sequence(vec![
                ScalarValue::Int(5),
                ScalarValue::Int(2),
                ScalarValue::Int(8)
            ])
        );

        let tree: InitialData =
            serde_json::from_str(r#"{"value": 1, "left": {"value": 2}}"#).unwrap();
        assert_eq!(
            tree,
            InitialData::Tree(TreeNode::with_children(1, Some(TreeNode::leaf(2)), None))
        );

        let graph: InitialData = serde_json::from_str(
            r#"{"nodes": [{"id": "A", "x": 1, "y": 2}], "edges": [{"from": "A", "to": "B"}]}"#,
        )
        .unwrap();
        match graph {
            InitialData::Graph(g) => {
                assert_eq!(g.nodes.len(), 1);
                assert_eq!(g.edges.len(), 1);
            }
            other => panic!("Expected graph, got {:?}", other),
        }
    }

    #[test]
    fn test_full_script_fields() {
        let script = AnimationScript::from_json(
            r#"{
                "steps": [{"type": "highlight", "target": "element-0"}],
                "initialVariables": {"left": 0, "right": 5},
                "initialData": [1, 2, 3],
                "pointers": [{"name": "left"}, {"name": "right"}],
                "variables": [{"name": "left", "initialValue": 0}],
                "timeComplexity": "O(n)"
            }"#,
        )
        .unwrap();
        assert_eq!(script.len(), 1);
        assert_eq!(script.initial_variables.len(), 2);
        assert_eq!(script.pointers[1].name, "right");
        assert_eq!(script.variables[0].initial_value, Some(ScalarValue::Int(0)));
        assert_eq!(script.time_complexity.as_deref(), Some("O(n)"));
        assert!(script.space_complexity.is_none());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(DataStructureKind::from_name("linkedlist"), DataStructureKind::LinkedList);
        assert_eq!(DataStructureKind::from_name("hashing"), DataStructureKind::Generic);
        assert_eq!(DataStructureKind::Array.slot_prefix(), Some("element"));
        assert!(!DataStructureKind::Tree.is_linear());
    }
}

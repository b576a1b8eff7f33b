//! Initial view rendering
//!
//! [`Renderer`] turns a script's initial snapshot into a [`View`]. Ids are a
//! pure function of the snapshot, so rendering the same script twice gives
//! identical addresses; replaying steps after a reset depends on this.
//!
//! # Layout
//!
//! - Array, linked list, queue: one slot per value, left to right
//! - Stack: slot 0 is the bottom; the top is the last slot
//! - Tree: root centred, children offset by a spacing that shrinks by 0.6
//!   per level and one fixed row height down
//! - Graph: coordinates come from the snapshot; edges first, then nodes

use super::element::{ElementKind, VisualElement, VisualElementSet};
use super::{Point, PointerMarkers, Surface, VariableTracker, View, ViewContent};
use crate::config::LayoutConfig;
use crate::script::{
    AnimationScript, DataStructureKind, GraphData, GraphEdge, GraphNode, InitialData, ScalarValue,
    TreeNode,
};

/// Spacing factor applied per tree level
const TREE_SPACING_DECAY: f32 = 0.6;

/// Builds initial views from scripts
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    layout: LayoutConfig,
}

impl Renderer {
    pub fn new(layout: LayoutConfig) -> Self {
        Renderer { layout }
    }

    /// Render the full initial view for `script`, or the placeholder if there is none
    pub fn render(
        &self,
        surface: Surface,
        script: Option<&AnimationScript>,
        kind: DataStructureKind,
    ) -> View {
        let Some(script) = script else {
            return View::unavailable(surface);
        };

        let content = if kind == DataStructureKind::Generic {
            ViewContent::StepListing(
                script
                    .steps
                    .iter()
                    .map(|step| {
                        step.description
                            .clone()
                            .unwrap_or_else(|| "Processing...".to_string())
                    })
                    .collect(),
            )
        } else {
            ViewContent::Structure(self.render_initial(
                kind,
                script.initial_data.as_ref(),
                surface,
            ))
        };

        let mut pointers = PointerMarkers::default();
        if kind.is_linear() {
            for decl in &script.pointers {
                pointers.declare(&decl.name);
            }
        }

        let mut tracker = VariableTracker::from_declarations(&script.variables);
        tracker.sync(&script.initial_variables);

        View {
            surface,
            content,
            pointers,
            code_line: None,
            narration: None,
            narration_fresh: false,
            tracker,
        }
    }

    /// Build one visual element per structural unit of `snapshot`.
    /// A missing snapshot uses the kind's default example data.
    pub fn render_initial(
        &self,
        kind: DataStructureKind,
        snapshot: Option<&InitialData>,
        surface: Surface,
    ) -> VisualElementSet {
        let fallback;
        let snapshot = match snapshot {
            Some(data) => data,
            None => match default_snapshot(kind) {
                Some(data) => {
                    fallback = data;
                    &fallback
                }
                None => return VisualElementSet::new(kind),
            },
        };

        match (kind, snapshot) {
            (_, InitialData::Sequence(values)) if kind.is_linear() => {
                render_sequence(kind, values)
            }
            (DataStructureKind::Tree, InitialData::Tree(root)) => self.render_tree(root, surface),
            (DataStructureKind::Graph, InitialData::Graph(graph)) => render_graph(graph),
            (_, data) => {
                log::warn!(
                    "initial data does not fit a {} view ({}); rendering it empty",
                    kind,
                    data_shape(data)
                );
                VisualElementSet::new(kind)
            }
        }
    }

    fn render_tree(&self, root: &TreeNode, surface: Surface) -> VisualElementSet {
        let mut set = VisualElementSet::new(DataStructureKind::Tree);

        // Spacing scales with the surface width relative to the configured one
        let scale = surface.width / self.layout.surface_width.max(1.0);
        let layout = TreeLayout {
            row_height: self.layout.tree_row_height,
        };
        layout.place(
            &mut set,
            root,
            String::new(),
            None,
            Point::new(surface.width / 2.0, self.layout.tree_root_y),
            self.layout.tree_spacing * scale,
        );
        set
    }
}

struct TreeLayout {
    row_height: f32,
}

impl TreeLayout {
    /// Pre-order placement. A node gets `tree-node-<value>`, or the first
    /// free `tree-node-<value>-<k>` (k = 2, 3, ...) if that id is taken.
    fn place(
        &self,
        set: &mut VisualElementSet,
        node: &TreeNode,
        path: String,
        parent: Option<String>,
        at: Point,
        spacing: f32,
    ) {
        let label = node.value.to_string();
        let mut id = format!("tree-node-{}", label);
        let mut k = 2;
        while set.contains(&id) {
            id = format!("tree-node-{}-{}", label, k);
            k += 1;
        }

        let alias = if path.is_empty() {
            "tree-path-root".to_string()
        } else {
            format!("tree-path-{}", path)
        };

        if !set.push(
            VisualElement::new(id.clone(), ElementKind::TreeNode { parent }, label).at(at),
        ) {
            log::warn!("tree node '{}' could not be placed; skipping its subtree", id);
            return;
        }
        set.add_alias(alias, id.clone());

        let child_y = at.y + self.row_height;
        let next_spacing = spacing * TREE_SPACING_DECAY;
        if let Some(left) = &node.left {
            self.place(
                set,
                left,
                format!("{}L", path),
                Some(id.clone()),
                Point::new(at.x - spacing, child_y),
                next_spacing,
            );
        }
        if let Some(right) = &node.right {
            self.place(
                set,
                right,
                format!("{}R", path),
                Some(id),
                Point::new(at.x + spacing, child_y),
                next_spacing,
            );
        }
    }
}

fn render_sequence(kind: DataStructureKind, values: &[ScalarValue]) -> VisualElementSet {
    let mut set = VisualElementSet::new(kind);
    let (Some(prefix), Some(element_kind)) = (kind.slot_prefix(), ElementKind::for_structure(kind))
    else {
        return set;
    };
    for (index, value) in values.iter().enumerate() {
        set.push(VisualElement::new(
            format!("{}-{}", prefix, index),
            element_kind.clone(),
            value.to_string(),
        ));
    }
    set
}

fn render_graph(graph: &GraphData) -> VisualElementSet {
    let mut set = VisualElementSet::new(DataStructureKind::Graph);
    let find = |id: &ScalarValue| graph.nodes.iter().find(|node| node.id == *id);

    for edge in &graph.edges {
        if let (Some(from), Some(to)) = (find(&edge.from), find(&edge.to)) {
            let mid = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
            set.push(
                VisualElement::new(
                    format!("edge-{}-{}", edge.from, edge.to),
                    ElementKind::Edge {
                        from: graph_node_id(&from.id),
                        to: graph_node_id(&to.id),
                    },
                    "",
                )
                .at(mid),
            );
        } else {
            log::debug!("edge {}-{} references a missing node; skipped", edge.from, edge.to);
        }
    }

    for node in &graph.nodes {
        set.push(
            VisualElement::new(graph_node_id(&node.id), ElementKind::GraphNode, node.id.to_string())
                .at(Point::new(node.x, node.y)),
        );
    }
    set
}

pub fn graph_node_id(id: &ScalarValue) -> String {
    format!("graph-node-{}", id)
}

fn data_shape(data: &InitialData) -> &'static str {
    match data {
        InitialData::Sequence(_) => "a sequence",
        InitialData::Tree(_) => "a tree",
        InitialData::Graph(_) => "a graph",
    }
}

/// Example data shown when a script has no `initialData`
pub fn default_snapshot(kind: DataStructureKind) -> Option<InitialData> {
    let seq = |values: &[i32]| {
        InitialData::Sequence(values.iter().map(|v| ScalarValue::from(*v)).collect())
    };
    match kind {
        DataStructureKind::Array => Some(seq(&[5, 2, 8, 1, 9, 3])),
        DataStructureKind::LinkedList => Some(seq(&[1, 2, 3, 4])),
        DataStructureKind::Stack => Some(seq(&[1, 2, 3])),
        DataStructureKind::Queue => Some(seq(&[1, 2, 3, 4])),
        DataStructureKind::Tree => Some(InitialData::Tree(TreeNode::with_children(
            1,
            Some(TreeNode::with_children(
                2,
                Some(TreeNode::leaf(4)),
                Some(TreeNode::leaf(5)),
            )),
            Some(TreeNode::with_children(
                3,
                Some(TreeNode::leaf(6)),
                Some(TreeNode::leaf(7)),
            )),
        ))),
        DataStructureKind::Graph => {
            let node = |id: &str, x: f32, y: f32| GraphNode {
                id: ScalarValue::from(id),
                x,
                y,
            };
            let edge = |from: &str, to: &str| GraphEdge {
                from: ScalarValue::from(from),
                to: ScalarValue::from(to),
            };
            Some(InitialData::Graph(GraphData {
                nodes: vec![
                    node("A", 100.0, 100.0),
                    node("B", 200.0, 100.0),
                    node("C", 300.0, 100.0),
                    node("D", 150.0, 200.0),
                    node("E", 250.0, 200.0),
                ],
                edges: vec![
                    edge("A", "B"),
                    edge("B", "C"),
                    edge("A", "D"),
                    edge("B", "E"),
                    edge("D", "E"),
                ],
            }))
        }
        DataStructureKind::Generic => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::PointerDecl;
    use crate::view::element::SLOT_PITCH;

    fn renderer() -> Renderer {
        Renderer::new(LayoutConfig::default())
    }

    fn seq(values: &[i32]) -> InitialData {
        InitialData::Sequence(values.iter().map(|v| ScalarValue::from(*v)).collect())
    }

    #[test]
    fn test_array_ids_follow_index() {
        let set = renderer().render_initial(
            DataStructureKind::Array,
            Some(&seq(&[5, 2, 8])),
            Surface::default(),
        );
        assert_eq!(set.ids(), ["element-0", "element-1", "element-2"]);
        assert_eq!(set.get("element-2").unwrap().label, "8");
        assert_eq!(set.get("element-1").unwrap().position, Point::new(SLOT_PITCH, 0.0));
    }

    #[test]
    fn test_stack_bottom_is_slot_zero() {
        let set = renderer().render_initial(
            DataStructureKind::Stack,
            Some(&seq(&[1, 2, 3])),
            Surface::default(),
        );
        assert_eq!(set.get("stack-0").unwrap().label, "1");
        assert_eq!(set.slot_of("stack-2"), Some(2));
        assert_eq!(set.get("stack-2").unwrap().position, Point::new(0.0, 2.0 * SLOT_PITCH));
    }

    #[test]
    fn test_tree_layout_and_ids() {
        let set = renderer().render_initial(DataStructureKind::Tree, None, Surface::default());
        assert_eq!(set.len(), 7);

        let root = set.get("tree-node-1").unwrap();
        assert_eq!(root.position, Point::new(200.0, 50.0));

        let left = set.get("tree-node-2").unwrap();
        assert_eq!(left.position, Point::new(100.0, 110.0));
        assert_eq!(left.kind, ElementKind::TreeNode { parent: Some("tree-node-1".to_string()) });

        // Second level uses 0.6 of the spacing
        let left_right = set.get("tree-path-LR").unwrap();
        assert_eq!(left_right.id, "tree-node-5");
        assert_eq!(left_right.position, Point::new(160.0, 170.0));
    }

    #[test]
    fn test_tree_duplicate_values_get_distinct_ids() {
        let tree = InitialData::Tree(TreeNode::with_children(
            2,
            Some(TreeNode::leaf(2)),
            Some(TreeNode::leaf(2)),
        ));
        let set = renderer().render_initial(DataStructureKind::Tree, Some(&tree), Surface::default());
        assert_eq!(set.ids(), ["tree-node-2", "tree-node-2-2", "tree-node-2-3"]);
        assert_eq!(set.get("tree-path-R").unwrap().id, "tree-node-2-3");

        // A value that spells out a suffixed id still gets its own element
        let tree = InitialData::Tree(TreeNode::with_children(
            2,
            Some(TreeNode::leaf(2)),
            Some(TreeNode::leaf("2-2")),
        ));
        let set = renderer().render_initial(DataStructureKind::Tree, Some(&tree), Surface::default());
        assert_eq!(set.ids(), ["tree-node-2", "tree-node-2-2", "tree-node-2-2-2"]);
        assert_eq!(set.get("tree-path-R").unwrap().label, "2-2");
        assert_eq!(set.get("tree-path-L").unwrap().label, "2");

        let tree = InitialData::Tree(TreeNode::with_children(
            "2-2",
            Some(TreeNode::leaf(2)),
            Some(TreeNode::leaf(2)),
        ));
        let set = renderer().render_initial(DataStructureKind::Tree, Some(&tree), Surface::default());
        assert_eq!(set.ids(), ["tree-node-2-2", "tree-node-2", "tree-node-2-3"]);
    }

    #[test]
    fn test_graph_edges_then_nodes() {
        let set = renderer().render_initial(DataStructureKind::Graph, None, Surface::default());
        assert_eq!(set.len(), 10);
        assert_eq!(set.ids()[0], "edge-A-B");
        assert_eq!(set.get("graph-node-D").unwrap().position, Point::new(150.0, 200.0));
    }

    #[test]
    fn test_mismatched_data_renders_empty() {
        let set = renderer().render_initial(
            DataStructureKind::Tree,
            Some(&seq(&[1, 2])),
            Surface::default(),
        );
        assert!(set.is_empty());
    }

    #[test]
    fn test_render_is_deterministic() {
        let script = AnimationScript {
            initial_data: Some(seq(&[3, 1, 2])),
            pointers: vec![PointerDecl {
                name: "i".to_string(),
            }],
            ..Default::default()
        };
        let a = renderer().render(Surface::default(), Some(&script), DataStructureKind::Array);
        let b = renderer().render(Surface::default(), Some(&script), DataStructureKind::Array);
        assert_eq!(a, b);
        assert!(a.pointers.is_declared("i"));
    }

    #[test]
    fn test_generic_and_missing_script() {
        let view = renderer().render(Surface::default(), None, DataStructureKind::Array);
        assert_eq!(view.content, ViewContent::Unavailable);

        let script: AnimationScript =
            serde_json::from_str(r#"{"steps": [{"type": "x", "description": "look"}, {"type": "y"}]}"#)
                .unwrap();
        let view = renderer().render(Surface::default(), Some(&script), DataStructureKind::Generic);
        assert_eq!(
            view.content,
            ViewContent::StepListing(vec!["look".to_string(), "Processing...".to_string()])
        );
    }
}

//! Step executor
//!
//! Applies one [`Step`] to the live variable table and the view. Every step
//! first merges its variables, then performs its action, then refreshes the
//! narration and the variable tracker. An operation whose target does not
//! resolve is skipped; the rest of the step still happens.
//!
//! Transient effects (the swap and compare styles, the tracker and narration
//! cues) are not undone here. They come back as [`FollowUp`]s that the
//! controller schedules on its timer queue.

use super::TimerTask;
use crate::config::PlaybackConfig;
use crate::script::{
    DataStructureKind, ElementId, HighlightStyle, Position, ScalarValue, Step, StepAction,
    VariableMap,
};
use crate::view::{ElementKind, Point, VisualElement, VisualElementSet, View};
use std::time::Duration;

/// A task to schedule after a step has been applied
#[derive(Debug, Clone, PartialEq)]
pub struct FollowUp {
    pub delay: Duration,
    pub task: TimerTask,
}

impl FollowUp {
    fn new(delay: Duration, task: TimerTask) -> Self {
        FollowUp { delay, task }
    }
}

/// How long each transient cue stays visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueTimings {
    pub swap: Duration,
    pub compare: Duration,
    pub variable: Duration,
    pub narration: Duration,
}

impl Default for CueTimings {
    fn default() -> Self {
        CueTimings::from(&PlaybackConfig::default())
    }
}

impl From<&PlaybackConfig> for CueTimings {
    fn from(config: &PlaybackConfig) -> Self {
        CueTimings {
            swap: Duration::from_millis(config.swap_highlight_ms),
            compare: Duration::from_millis(config.compare_highlight_ms),
            variable: Duration::from_millis(config.variable_cue_ms),
            narration: Duration::from_millis(config.narration_cue_ms),
        }
    }
}

/// Applies steps to a view
#[derive(Debug, Clone, Default)]
pub struct StepExecutor {
    timings: CueTimings,
}

impl StepExecutor {
    pub fn new(timings: CueTimings) -> Self {
        StepExecutor { timings }
    }

    /// Apply `step`. Returns the transient clears to schedule.
    pub fn apply(&self, step: &Step, variables: &mut VariableMap, view: &mut View) -> Vec<FollowUp> {
        let mut follow_ups = Vec::new();

        if let Some(updates) = &step.variables {
            for (name, value) in updates {
                variables.insert(name.clone(), value.clone());
            }
        }

        self.apply_action(&step.action, view, &mut follow_ups);

        if let Some(description) = &step.description {
            view.narration = Some(description.clone());
            view.narration_fresh = true;
            follow_ups.push(FollowUp::new(
                self.timings.narration,
                TimerTask::ClearNarrationCue,
            ));
        }

        for name in view.tracker.refresh(variables) {
            follow_ups.push(FollowUp::new(
                self.timings.variable,
                TimerTask::ClearVariableCue(name),
            ));
        }

        follow_ups
    }

    /// Undo a transient effect. Advances are not the executor's business and
    /// are ignored.
    pub fn expire(&self, task: &TimerTask, view: &mut View) {
        match task {
            TimerTask::ClearStyle { element, style } => {
                if let Some(e) = view.elements_mut().and_then(|set| set.get_mut(element)) {
                    e.styles.remove(*style);
                }
            }
            TimerTask::ClearVariableCue(name) => view.tracker.clear_cue(name),
            TimerTask::ClearNarrationCue => view.narration_fresh = false,
            TimerTask::Advance => {}
        }
    }

    fn apply_action(&self, action: &StepAction, view: &mut View, follow_ups: &mut Vec<FollowUp>) {
        match action {
            StepAction::Highlight { target, style } => {
                with_element(view, target, "highlight", |e| e.styles.set_exclusive(*style));
            }
            StepAction::Unhighlight { target } => {
                with_element(view, target, "unhighlight", |e| e.styles.clear());
            }
            StepAction::Traverse { target } => {
                with_element(view, target, "traverse", |e| {
                    e.styles.set_exclusive(HighlightStyle::Visited)
                });
            }
            StepAction::Swap { targets } => self.swap(targets, view, follow_ups),
            StepAction::Compare { targets } => self.compare(targets, view, follow_ups),
            StepAction::Move { target, position } => move_element(view, target, *position),
            StepAction::Insert {
                target,
                value,
                position,
            } => insert_element(view, target.as_deref(), value.as_ref(), *position),
            StepAction::Delete { target } => delete_element(view, target),
            StepAction::Pointer { pointer, position } => {
                point_at(view, pointer.as_deref(), *position)
            }
            StepAction::CodeHighlight { line_number } => match line_number {
                Some(line) => view.code_line = Some(*line),
                None => log::debug!("codeHighlight without a line number; skipped"),
            },
            StepAction::Unknown { kind } => {
                log::debug!(
                    "no visual effect for step type '{}'",
                    kind.as_deref().unwrap_or("<none>")
                );
            }
        }
    }

    fn swap(&self, targets: &[ElementId], view: &mut View, follow_ups: &mut Vec<FollowUp>) {
        let [a, b, ..] = targets else {
            log::debug!("swap needs two targets, got {}", targets.len());
            return;
        };
        let Some(set) = view.elements_mut() else {
            return;
        };
        let (Some(a), Some(b)) = (set.resolve(a).cloned(), set.resolve(b).cloned()) else {
            log::debug!("swap {} <-> {}: target missing; skipped", a, b);
            return;
        };

        set.swap_labels(&a, &b);
        for id in [a, b] {
            if let Some(e) = set.get_mut(&id) {
                e.styles.insert(HighlightStyle::Swapping);
            }
            follow_ups.push(FollowUp::new(
                self.timings.swap,
                TimerTask::ClearStyle {
                    element: id,
                    style: HighlightStyle::Swapping,
                },
            ));
        }
    }

    fn compare(&self, targets: &[ElementId], view: &mut View, follow_ups: &mut Vec<FollowUp>) {
        let Some(set) = view.elements_mut() else {
            return;
        };
        for target in targets {
            let Some(e) = set.get_mut(target) else {
                log::debug!("compare: no element '{}'; skipped", target);
                continue;
            };
            e.styles.insert(HighlightStyle::Comparing);
            follow_ups.push(FollowUp::new(
                self.timings.compare,
                TimerTask::ClearStyle {
                    element: e.id.clone(),
                    style: HighlightStyle::Comparing,
                },
            ));
        }
    }
}

/// Run `f` on the element named by `target`, or log and skip
fn with_element(
    view: &mut View,
    target: &Option<ElementId>,
    op: &str,
    f: impl FnOnce(&mut VisualElement),
) {
    let Some(target) = target else {
        log::debug!("{} without a target; skipped", op);
        return;
    };
    match view.elements_mut().and_then(|set| set.get_mut(target)) {
        Some(element) => f(element),
        None => log::debug!("{}: no element '{}'; skipped", op, target),
    }
}

fn move_element(view: &mut View, target: &Option<ElementId>, position: Option<Position>) {
    let (Some(target), Some(position)) = (target, position) else {
        log::debug!("move needs a target and a position; skipped");
        return;
    };
    let Some(set) = view.elements_mut() else {
        return;
    };
    let linear = set.kind().is_linear();
    let moved = match position {
        Position::Index(slot) if linear => set.move_to_slot(target, slot),
        Position::Point { x, y } if !linear => match set.get_mut(target) {
            Some(e) => {
                e.position = Point::new(x, y);
                true
            }
            None => false,
        },
        _ => {
            log::debug!("move: position {:?} does not fit a {} view", position, set.kind());
            return;
        }
    };
    if !moved {
        log::debug!("move: no element '{}'; skipped", target);
    }
}

fn insert_element(
    view: &mut View,
    target: Option<&str>,
    value: Option<&ScalarValue>,
    position: Option<Position>,
) {
    let Some(set) = view.elements_mut() else {
        return;
    };
    let kind = set.kind();
    let (Some(prefix), Some(element_kind)) = (id_prefix(kind), ElementKind::for_structure(kind))
    else {
        return;
    };

    let id = match target {
        Some(id) => id.to_string(),
        None => set.fresh_id(prefix),
    };
    if set.contains(&id) {
        log::debug!("insert: '{}' already exists; skipped", id);
        return;
    }

    let label = value.map(ToString::to_string).unwrap_or_default();
    let element = VisualElement::new(id, element_kind, label);
    match position {
        Some(Position::Index(slot)) if kind.is_linear() => set.insert_at(slot, element),
        Some(Position::Point { x, y }) if !kind.is_linear() => {
            set.push(element.at(Point::new(x, y)))
        }
        _ => set.push(element),
    };
}

fn delete_element(view: &mut View, target: &Option<ElementId>) {
    let Some(target) = target else {
        log::debug!("delete without a target; skipped");
        return;
    };
    let Some(set) = view.elements_mut() else {
        return;
    };
    let Some(removed) = set.remove(target) else {
        log::debug!("delete: no element '{}'; skipped", target);
        return;
    };

    let edges = if set.kind() == DataStructureKind::Graph {
        remove_edges_touching(set, &removed.id)
    } else {
        Vec::new()
    };
    view.pointers.detach(&removed.id);
    for id in &edges {
        view.pointers.detach(id);
    }
}

/// Drop every edge with `node` as an endpoint. Returns their ids.
fn remove_edges_touching(set: &mut VisualElementSet, node: &str) -> Vec<ElementId> {
    let edges: Vec<ElementId> = set
        .iter()
        .filter(|e| matches!(&e.kind, ElementKind::Edge { from, to } if from == node || to == node))
        .map(|e| e.id.clone())
        .collect();
    for id in &edges {
        set.remove(id);
    }
    edges
}

fn point_at(view: &mut View, pointer: Option<&str>, position: Option<usize>) {
    let (Some(name), Some(position)) = (pointer, position) else {
        log::debug!("pointer step needs a pointer name and a slot; skipped");
        return;
    };
    if !view.pointers.is_declared(name) {
        log::debug!("pointer '{}' is not declared; skipped", name);
        return;
    }
    let Some(set) = view.elements() else {
        return;
    };
    let Some(prefix) = set.kind().slot_prefix() else {
        return;
    };
    let anchor = set.resolve(&format!("{}-{}", prefix, position)).cloned();
    match anchor {
        Some(id) => {
            view.pointers.point_at(name, id);
        }
        None => log::debug!("pointer '{}': no element at slot {}; skipped", name, position),
    }
}

/// Prefix for ids of elements created by `insert`
fn id_prefix(kind: DataStructureKind) -> Option<&'static str> {
    match kind {
        DataStructureKind::Tree => Some("tree-node"),
        DataStructureKind::Graph => Some("graph-node"),
        other => other.slot_prefix(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::script::{AnimationScript, InitialData, PointerDecl};
    use crate::view::{Renderer, Surface};

    fn view_of(kind: DataStructureKind, data: InitialData, pointers: &[&str]) -> View {
        let script = AnimationScript {
            initial_data: Some(data),
            pointers: pointers
                .iter()
                .map(|name| PointerDecl {
                    name: name.to_string(),
                })
                .collect(),
            ..Default::default()
        };
        Renderer::new(LayoutConfig::default()).render(Surface::default(), Some(&script), kind)
    }

    fn array(values: &[i32], pointers: &[&str]) -> View {
        view_of(
            DataStructureKind::Array,
            InitialData::Sequence(values.iter().map(|v| ScalarValue::from(*v)).collect()),
            pointers,
        )
    }

    fn target(id: &str) -> Option<ElementId> {
        Some(id.to_string())
    }

    fn styles_of(view: &View, id: &str) -> Vec<HighlightStyle> {
        view.elements().unwrap().get(id).unwrap().styles.iter().collect()
    }

    fn run(view: &mut View, action: StepAction) -> Vec<FollowUp> {
        let mut vars = VariableMap::new();
        StepExecutor::default().apply(&Step::new(action), &mut vars, view)
    }

    #[test]
    fn test_highlight_is_exclusive() {
        let mut view = array(&[1, 2], &[]);
        run(
            &mut view,
            StepAction::Highlight {
                target: target("element-0"),
                style: HighlightStyle::Comparing,
            },
        );
        run(
            &mut view,
            StepAction::Highlight {
                target: target("element-0"),
                style: HighlightStyle::Sorted,
            },
        );
        assert_eq!(styles_of(&view, "element-0"), vec![HighlightStyle::Sorted]);

        run(&mut view, StepAction::Unhighlight { target: target("element-0") });
        assert!(styles_of(&view, "element-0").is_empty());
    }

    #[test]
    fn test_swap_schedules_style_clear() {
        let mut view = array(&[5, 2, 8], &[]);
        let follow_ups = run(
            &mut view,
            StepAction::Swap {
                targets: vec!["element-0".to_string(), "element-1".to_string()],
            },
        );
        let set = view.elements().unwrap();
        assert_eq!(set.get("element-0").unwrap().label, "2");
        assert_eq!(set.get("element-1").unwrap().label, "5");
        assert_eq!(styles_of(&view, "element-1"), vec![HighlightStyle::Swapping]);
        assert_eq!(follow_ups.len(), 2);
        assert!(follow_ups.iter().all(|f| f.delay == Duration::from_millis(300)));

        let executor = StepExecutor::default();
        for follow_up in &follow_ups {
            executor.expire(&follow_up.task, &mut view);
        }
        assert!(styles_of(&view, "element-0").is_empty());
    }

    #[test]
    fn test_swap_with_missing_target_changes_nothing() {
        let mut view = array(&[5, 2], &[]);
        let before = view.snapshot();
        let follow_ups = run(
            &mut view,
            StepAction::Swap {
                targets: vec!["element-0".to_string(), "element-7".to_string()],
            },
        );
        assert!(follow_ups.is_empty());
        assert_eq!(view.snapshot(), before);
    }

    #[test]
    fn test_compare_marks_all_targets() {
        let mut view = array(&[5, 2, 8], &[]);
        let follow_ups = run(
            &mut view,
            StepAction::Compare {
                targets: vec![
                    "element-0".to_string(),
                    "element-2".to_string(),
                    "element-9".to_string(),
                ],
            },
        );
        assert_eq!(follow_ups.len(), 2);
        assert_eq!(styles_of(&view, "element-2"), vec![HighlightStyle::Comparing]);
        assert!(follow_ups
            .iter()
            .all(|f| f.delay == Duration::from_millis(500)));
    }

    #[test]
    fn test_insert_and_delete_linear() {
        let mut view = array(&[1, 2], &["i"]);
        run(
            &mut view,
            StepAction::Pointer {
                pointer: Some("i".to_string()),
                position: Some(1),
            },
        );
        run(
            &mut view,
            StepAction::Insert {
                target: None,
                value: Some(ScalarValue::Int(9)),
                position: Some(Position::Index(0)),
            },
        );
        let set = view.elements().unwrap();
        assert_eq!(set.ids(), ["element-2", "element-0", "element-1"]);
        assert_eq!(set.get("element-2").unwrap().label, "9");

        run(&mut view, StepAction::Delete { target: target("element-1") });
        assert_eq!(view.elements().unwrap().len(), 2);
        assert_eq!(view.pointers.anchor("i"), None);
    }

    #[test]
    fn test_move_by_slot_and_point() {
        let mut view = array(&[1, 2, 3], &[]);
        run(
            &mut view,
            StepAction::Move {
                target: target("element-0"),
                position: Some(Position::Index(2)),
            },
        );
        assert_eq!(view.elements().unwrap().slot_of("element-0"), Some(2));

        let mut tree = view_of(
            DataStructureKind::Tree,
            InitialData::Tree(crate::script::TreeNode::leaf(4)),
            &[],
        );
        run(
            &mut tree,
            StepAction::Move {
                target: target("tree-node-4"),
                position: Some(Position::Point { x: 12.0, y: 30.0 }),
            },
        );
        assert_eq!(
            tree.elements().unwrap().get("tree-node-4").unwrap().position,
            Point::new(12.0, 30.0)
        );
    }

    #[test]
    fn test_deleting_graph_node_drops_its_edges() {
        let mut view = view_of(
            DataStructureKind::Graph,
            serde_json::from_str(
                r#"{"nodes": [{"id": 1}, {"id": 2}, {"id": 3}],
                    "edges": [{"from": 1, "to": 2}, {"from": 2, "to": 3}]}"#,
            )
            .unwrap(),
            &[],
        );
        run(&mut view, StepAction::Delete { target: target("graph-node-3") });
        assert_eq!(view.elements().unwrap().ids(), ["edge-1-2", "graph-node-1", "graph-node-2"]);
    }

    #[test]
    fn test_undeclared_pointer_is_noop() {
        let mut view = array(&[1, 2], &["left"]);
        let before = view.snapshot();
        run(
            &mut view,
            StepAction::Pointer {
                pointer: Some("right".to_string()),
                position: Some(0),
            },
        );
        assert_eq!(view.snapshot(), before);
    }

    #[test]
    fn test_variables_and_narration() {
        let mut view = array(&[1], &[]);
        let mut vars = VariableMap::new();
        let mut updates = VariableMap::new();
        updates.insert("i".to_string(), ScalarValue::Int(3));
        let step = Step {
            action: StepAction::Highlight {
                target: target("element-42"),
                style: HighlightStyle::Current,
            },
            variables: Some(updates),
            description: Some("look at i".to_string()),
        };

        let follow_ups = StepExecutor::default().apply(&step, &mut vars, &mut view);
        assert_eq!(vars.get("i"), Some(&ScalarValue::Int(3)));
        assert_eq!(view.tracker.shown("i"), Some("3"));
        assert_eq!(view.narration.as_deref(), Some("look at i"));
        assert!(view.narration_fresh);
        assert!(follow_ups.contains(&FollowUp::new(
            Duration::from_millis(800),
            TimerTask::ClearVariableCue("i".to_string())
        )));
        assert!(follow_ups.contains(&FollowUp::new(
            Duration::from_millis(500),
            TimerTask::ClearNarrationCue
        )));
    }

    #[test]
    fn test_code_highlight_replaces_line() {
        let mut view = array(&[1], &[]);
        run(&mut view, StepAction::CodeHighlight { line_number: Some(3) });
        run(&mut view, StepAction::CodeHighlight { line_number: Some(5) });
        assert_eq!(view.code_line, Some(5));
    }
}

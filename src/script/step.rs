//! Visualization steps
//!
//! A step file entry is a loose JSON object discriminated by `type`. It is
//! read into a private [`RawStep`] that accepts any combination of fields and
//! then narrowed into [`StepAction`], which only carries the operands that
//! matter for its kind. Nothing here rejects a step: missing or badly shaped
//! operands become `None`, and an unknown `type` (or a step that is not an
//! object at all) becomes [`StepAction::Unknown`].

use super::value::{ScalarValue, VariableMap};
use serde::Deserialize;
use serde_json::Value;

/// Stable identifier of a visual element (e.g. `element-3`, `tree-node-7`)
pub type ElementId = String;

/// Highlight classes an element can carry. At most one of them is set by a
/// `highlight` step; `swap` and `compare` add theirs on top for a short while.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightStyle {
    Current,
    Comparing,
    Swapping,
    Visited,
    Sorted,
}

impl HighlightStyle {
    pub const ALL: [HighlightStyle; 5] = [
        HighlightStyle::Current,
        HighlightStyle::Comparing,
        HighlightStyle::Swapping,
        HighlightStyle::Visited,
        HighlightStyle::Sorted,
    ];

    /// Parse a style name. Unknown names fall back to `current`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "comparing" => HighlightStyle::Comparing,
            "swapping" => HighlightStyle::Swapping,
            "visited" => HighlightStyle::Visited,
            "sorted" => HighlightStyle::Sorted,
            "current" => HighlightStyle::Current,
            other => {
                log::debug!("unknown highlight style '{}', using 'current'", other);
                HighlightStyle::Current
            }
        }
    }

    pub(crate) fn bit(self) -> u8 {
        match self {
            HighlightStyle::Current => 1,
            HighlightStyle::Comparing => 1 << 1,
            HighlightStyle::Swapping => 1 << 2,
            HighlightStyle::Visited => 1 << 3,
            HighlightStyle::Sorted => 1 << 4,
        }
    }
}

/// Where a `move` or `insert` step places its element
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// Slot index in an array-like structure
    Index(usize),
    /// Explicit layout coordinate (tree and graph views)
    Point { x: f32, y: f32 },
}

impl Position {
    fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_u64().map(|i| Position::Index(i as usize)),
            serde_json::Value::Object(map) => {
                let x = map.get("x")?.as_f64()?;
                let y = map.get("y")?.as_f64()?;
                Some(Position::Point {
                    x: x as f32,
                    y: y as f32,
                })
            }
            _ => None,
        }
    }
}

/// The operation a step performs on the view
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    Highlight {
        target: Option<ElementId>,
        style: HighlightStyle,
    },
    Unhighlight {
        target: Option<ElementId>,
    },
    Swap {
        targets: Vec<ElementId>,
    },
    Move {
        target: Option<ElementId>,
        position: Option<Position>,
    },
    Compare {
        targets: Vec<ElementId>,
    },
    Insert {
        target: Option<ElementId>,
        value: Option<ScalarValue>,
        position: Option<Position>,
    },
    Delete {
        target: Option<ElementId>,
    },
    Traverse {
        target: Option<ElementId>,
    },
    Pointer {
        pointer: Option<String>,
        position: Option<usize>,
    },
    CodeHighlight {
        line_number: Option<usize>,
    },
    /// A `type` outside the known set; only the universal effects apply
    Unknown {
        kind: Option<String>,
    },
}

impl StepAction {
    /// The `type` name as written in script files
    pub fn type_name(&self) -> &str {
        match self {
            StepAction::Highlight { .. } => "highlight",
            StepAction::Unhighlight { .. } => "unhighlight",
            StepAction::Swap { .. } => "swap",
            StepAction::Move { .. } => "move",
            StepAction::Compare { .. } => "compare",
            StepAction::Insert { .. } => "insert",
            StepAction::Delete { .. } => "delete",
            StepAction::Traverse { .. } => "traverse",
            StepAction::Pointer { .. } => "pointer",
            StepAction::CodeHighlight { .. } => "codeHighlight",
            StepAction::Unknown { kind } => kind.as_deref().unwrap_or("unknown"),
        }
    }
}

/// One addressable mutation in an animation script
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct Step {
    pub action: StepAction,
    /// Applied to the variable table before the visual effect
    pub variables: Option<VariableMap>,
    pub description: Option<String>,
}

impl Step {
    pub fn new(action: StepAction) -> Self {
        Step {
            action,
            variables: None,
            description: None,
        }
    }
}

/// Every field any step type may use, all optional and untyped. Operands are
/// narrowed one by one, so a badly shaped field only loses that operand.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawStep {
    #[serde(rename = "type")]
    kind: Option<Value>,
    target: Option<Value>,
    targets: Option<Value>,
    style: Option<Value>,
    position: Option<Value>,
    value: Option<ScalarValue>,
    pointer: Option<Value>,
    line_number: Option<Value>,
    variables: Option<Value>,
    description: Option<Value>,
}

/// A string operand. Numbers are accepted as their decimal text.
fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        other => {
            log::debug!("ignoring non-text operand {}", other);
            None
        }
    }
}

impl RawStep {
    /// `targets`, or the single `target` when no list was given
    fn target_list(&mut self) -> Vec<ElementId> {
        let list: Vec<ElementId> = match self.targets.take() {
            Some(Value::Array(items)) => items.into_iter().filter_map(|v| text(Some(v))).collect(),
            Some(single) => text(Some(single)).into_iter().collect(),
            None => Vec::new(),
        };
        if list.is_empty() {
            text(self.target.take()).into_iter().collect()
        } else {
            list
        }
    }

    fn variables(&mut self) -> Option<VariableMap> {
        match self.variables.take()? {
            Value::Object(map) => Some(
                map.into_iter()
                    .filter_map(|(name, value)| {
                        serde_json::from_value(value).ok().map(|v| (name, v))
                    })
                    .collect(),
            ),
            Value::Null => None,
            other => {
                log::debug!("ignoring step variables that are not an object: {}", other);
                None
            }
        }
    }
}

impl From<Value> for Step {
    fn from(value: Value) -> Self {
        let raw = serde_json::from_value::<RawStep>(value).unwrap_or_else(|e| {
            log::debug!("step is not an object ({}); treating it as empty", e);
            RawStep::default()
        });
        Step::from(raw)
    }
}

impl From<RawStep> for Step {
    fn from(mut raw: RawStep) -> Self {
        let position = raw.position.as_ref().and_then(Position::from_json);
        let kind = text(raw.kind.take());

        let action = match kind.as_deref() {
            Some("highlight") => StepAction::Highlight {
                target: text(raw.target.take()),
                style: text(raw.style.take())
                    .as_deref()
                    .map_or(HighlightStyle::Current, HighlightStyle::from_name),
            },
            Some("unhighlight") => StepAction::Unhighlight {
                target: text(raw.target.take()),
            },
            Some("swap") => StepAction::Swap {
                targets: raw.target_list(),
            },
            Some("move") => StepAction::Move {
                target: text(raw.target.take()),
                position,
            },
            Some("compare") => StepAction::Compare {
                targets: raw.target_list(),
            },
            Some("insert") => StepAction::Insert {
                target: text(raw.target.take()),
                value: raw.value.take(),
                position,
            },
            Some("delete") => StepAction::Delete {
                target: text(raw.target.take()),
            },
            Some("traverse") => StepAction::Traverse {
                target: text(raw.target.take()),
            },
            Some("pointer") => StepAction::Pointer {
                pointer: text(raw.pointer.take()),
                position: match position {
                    Some(Position::Index(i)) => Some(i),
                    _ => None,
                },
            },
            Some("codeHighlight") => StepAction::CodeHighlight {
                line_number: raw
                    .line_number
                    .take()
                    .and_then(|v| v.as_u64())
                    .map(|n| n as usize),
            },
            _ => StepAction::Unknown { kind: kind.clone() },
        };

        Step {
            action,
            variables: raw.variables(),
            description: text(raw.description.take()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Step {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_highlight_defaults_to_current() {
        let step = parse(r#"{"type": "highlight", "target": "element-0"}"#);
        assert_eq!(
            step.action,
            StepAction::Highlight {
                target: Some("element-0".to_string()),
                style: HighlightStyle::Current,
            }
        );
        assert!(step.variables.is_none());
        assert!(step.description.is_none());
    }

    #[test]
    fn test_swap_keeps_target_order() {
        let step = parse(r#"{"type": "swap", "targets": ["element-2", "element-0"]}"#);
        match step.action {
            StepAction::Swap { targets } => assert_eq!(targets, vec!["element-2", "element-0"]),
            other => panic!("Expected swap, got {:?}", other),
        }
    }

    #[test]
    fn test_compare_accepts_single_target() {
        let step = parse(r#"{"type": "compare", "target": "node-1"}"#);
        assert_eq!(
            step.action,
            StepAction::Compare {
                targets: vec!["node-1".to_string()]
            }
        );
    }

    #[test]
    fn test_positions() {
        let step = parse(r#"{"type": "move", "target": "graph-node-A", "position": {"x": 10, "y": 20.5}}"#);
        assert_eq!(
            step.action,
            StepAction::Move {
                target: Some("graph-node-A".to_string()),
                position: Some(Position::Point { x: 10.0, y: 20.5 }),
            }
        );

        let step = parse(r#"{"type": "pointer", "pointer": "left", "position": 3}"#);
        assert_eq!(
            step.action,
            StepAction::Pointer {
                pointer: Some("left".to_string()),
                position: Some(3),
            }
        );

        // A negative slot is not an address; the operand is simply absent
        let step = parse(r#"{"type": "move", "target": "element-1", "position": -1}"#);
        assert_eq!(
            step.action,
            StepAction::Move {
                target: Some("element-1".to_string()),
                position: None,
            }
        );
    }

    #[test]
    fn test_code_highlight_and_universal_fields() {
        let step = parse(
            r#"{"type": "codeHighlight", "lineNumber": 4, "variables": {"i": 3}, "description": "loop"}"#,
        );
        assert_eq!(step.action, StepAction::CodeHighlight { line_number: Some(4) });
        assert_eq!(
            step.variables.unwrap().get("i"),
            Some(&ScalarValue::Int(3))
        );
        assert_eq!(step.description.as_deref(), Some("loop"));
    }

    #[test]
    fn test_unknown_and_missing_type_still_parse() {
        let step = parse(r#"{"type": "rotate", "description": "spin"}"#);
        assert_eq!(
            step.action,
            StepAction::Unknown {
                kind: Some("rotate".to_string())
            }
        );
        assert_eq!(step.action.type_name(), "rotate");

        let step = parse(r#"{"description": "just words"}"#);
        assert_eq!(step.action, StepAction::Unknown { kind: None });
    }

    #[test]
    fn test_unknown_style_falls_back() {
        assert_eq!(HighlightStyle::from_name("glowing"), HighlightStyle::Current);
        assert_eq!(HighlightStyle::from_name("Sorted"), HighlightStyle::Sorted);
    }

    #[test]
    fn test_badly_shaped_operands_only_lose_themselves() {
        let step = parse(r#"{"type": "highlight", "target": 3, "description": "x"}"#);
        assert_eq!(
            step.action,
            StepAction::Highlight {
                target: Some("3".to_string()),
                style: HighlightStyle::Current,
            }
        );
        assert_eq!(step.description.as_deref(), Some("x"));

        let step = parse(r#"{"type": "swap", "targets": null}"#);
        assert_eq!(step.action, StepAction::Swap { targets: vec![] });

        let step = parse(r#"{"type": "compare", "targets": ["element-0", false, 2]}"#);
        assert_eq!(
            step.action,
            StepAction::Compare {
                targets: vec!["element-0".to_string(), "2".to_string()]
            }
        );

        let step = parse(r#"{"type": "codeHighlight", "lineNumber": -1, "variables": {"i": 2}}"#);
        assert_eq!(step.action, StepAction::CodeHighlight { line_number: None });
        assert_eq!(step.variables.unwrap().get("i"), Some(&ScalarValue::Int(2)));

        let step = parse(r#"{"type": "codeHighlight", "lineNumber": 2.5, "variables": [1]}"#);
        assert_eq!(step.action, StepAction::CodeHighlight { line_number: None });
        assert!(step.variables.is_none());
    }

    #[test]
    fn test_non_object_step_becomes_empty_unknown() {
        let step = parse("42");
        assert_eq!(step.action, StepAction::Unknown { kind: None });
        assert!(step.variables.is_none());
    }
}

//! Rendered view state
//!
//! This module owns everything the executor mutates and the UI draws:
//! - [`element`]: [`VisualElement`]s and the id -> element map
//! - [`render`]: builds the initial view for a structure kind
//! - [`tracker`]: the variable tracker rows
//!
//! The view is plain data. Drawing it to a terminal lives in [`crate::ui`].

pub mod element;
pub mod render;
pub mod tracker;

pub use element::{ElementKind, StyleSet, VisualElement, VisualElementSet};
pub use render::Renderer;
pub use tracker::{TrackedVariable, VariableTracker};

use crate::script::{ElementId, HighlightStyle};
use rustc_hash::FxHashMap;

/// A layout coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

/// The drawing area a view is laid out for, in layout units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub const fn new(width: f32, height: f32) -> Self {
        Surface { width, height }
    }

    /// Approximate layout size of a terminal area (cells are about twice as
    /// tall as they are wide)
    pub fn from_cells(columns: u16, rows: u16) -> Self {
        Surface::new(f32::from(columns) * 5.0, f32::from(rows) * 10.0)
    }
}

impl Default for Surface {
    fn default() -> Self {
        Surface::new(400.0, 300.0)
    }
}

/// Named pointer markers; each hovers under one element or is hidden
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerMarkers {
    order: Vec<String>,
    anchors: FxHashMap<String, Option<ElementId>>,
}

impl PointerMarkers {
    pub fn declare(&mut self, name: &str) {
        if !self.anchors.contains_key(name) {
            self.order.push(name.to_string());
            self.anchors.insert(name.to_string(), None);
        }
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.anchors.contains_key(name)
    }

    /// Anchor a declared pointer under `element`. Unknown pointers are ignored.
    pub fn point_at(&mut self, name: &str, element: ElementId) -> bool {
        match self.anchors.get_mut(name) {
            Some(anchor) => {
                *anchor = Some(element);
                true
            }
            None => false,
        }
    }

    /// Hide every pointer anchored under `element`
    pub fn detach(&mut self, element: &str) {
        for anchor in self.anchors.values_mut() {
            if anchor.as_deref() == Some(element) {
                *anchor = None;
            }
        }
    }

    pub fn anchor(&self, name: &str) -> Option<&str> {
        self.anchors.get(name)?.as_deref()
    }

    /// (name, anchor) in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.order
            .iter()
            .map(|name| (name.as_str(), self.anchor(name)))
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// What the structure area shows
#[derive(Debug, Clone, PartialEq)]
pub enum ViewContent {
    /// A rendered data structure
    Structure(VisualElementSet),
    /// Generic fallback: the step descriptions as a numbered list
    StepListing(Vec<String>),
    /// No script for the current selection
    Unavailable,
}

/// Everything visible for one loaded script
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub surface: Surface,
    pub content: ViewContent,
    pub pointers: PointerMarkers,
    /// Line marked as currently executing in the code display
    pub code_line: Option<usize>,
    /// Description of the last applied step
    pub narration: Option<String>,
    /// Set while the narration update cue is visible
    pub narration_fresh: bool,
    pub tracker: VariableTracker,
}

impl View {
    /// The placeholder view shown when no script is available
    pub fn unavailable(surface: Surface) -> Self {
        View {
            surface,
            content: ViewContent::Unavailable,
            pointers: PointerMarkers::default(),
            code_line: None,
            narration: None,
            narration_fresh: false,
            tracker: VariableTracker::default(),
        }
    }

    pub fn elements(&self) -> Option<&VisualElementSet> {
        match &self.content {
            ViewContent::Structure(set) => Some(set),
            _ => None,
        }
    }

    pub fn elements_mut(&mut self) -> Option<&mut VisualElementSet> {
        match &mut self.content {
            ViewContent::Structure(set) => Some(set),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.content, ViewContent::Unavailable)
    }

    /// Take over element styles and the time-limited cues of `other`, a
    /// view of the same step laid out for another surface
    pub fn carry_cues_from(&mut self, other: &View) {
        if let (Some(set), Some(old)) = (self.elements_mut(), other.elements()) {
            for element in old.iter() {
                if let Some(e) = set.get_mut(&element.id) {
                    e.styles = element.styles;
                }
            }
        }
        self.narration_fresh = other.narration_fresh;
        self.tracker.carry_cues_from(&other.tracker);
    }

    /// Comparable picture of the persistent view state. Time-limited cues
    /// (variable change, narration update) are left out.
    pub fn snapshot(&self) -> ViewSnapshot {
        let elements = self
            .elements()
            .map(|set| {
                set.iter()
                    .map(|e| ElementSnapshot {
                        id: e.id.clone(),
                        label: e.label.clone(),
                        position: e.position,
                        styles: e.styles.iter().collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        ViewSnapshot {
            elements,
            pointers: self
                .pointers
                .iter()
                .map(|(name, anchor)| (name.to_string(), anchor.map(str::to_string)))
                .collect(),
            code_line: self.code_line,
            narration: self.narration.clone(),
            variables: self.tracker.values(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementSnapshot {
    pub id: ElementId,
    pub label: String,
    pub position: Point,
    pub styles: Vec<HighlightStyle>,
}

/// Persistent view state, in display order
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub elements: Vec<ElementSnapshot>,
    pub pointers: Vec<(String, Option<String>)>,
    pub code_line: Option<usize>,
    pub narration: Option<String>,
    pub variables: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_markers() {
        let mut pointers = PointerMarkers::default();
        pointers.declare("left");
        pointers.declare("right");
        pointers.declare("left");

        assert!(pointers.point_at("left", "element-0".to_string()));
        assert!(!pointers.point_at("mid", "element-1".to_string()));
        assert_eq!(pointers.anchor("left"), Some("element-0"));
        assert_eq!(pointers.anchor("right"), None);

        pointers.detach("element-0");
        assert_eq!(pointers.anchor("left"), None);
        assert_eq!(pointers.iter().count(), 2);
    }
}

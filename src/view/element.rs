//! Visual elements and the id -> element map
//!
//! The renderer builds a [`VisualElementSet`] from the initial snapshot and
//! the executor mutates it by id. Elements are owned by the set; nothing is
//! ever looked up through the drawing layer.
//!
//! # Addressing
//!
//! - Primary ids come from snapshot position (`element-0`, `stack-2`, ...)
//!   or from node values (`tree-node-7`, `graph-node-A`).
//! - Aliases map extra names onto a primary id (`tree-path-LR`). Lookups go
//!   through [`VisualElementSet::resolve`], which accepts either.

use super::Point;
use crate::script::{DataStructureKind, ElementId, HighlightStyle};
use rustc_hash::FxHashMap;

/// Distance between neighbouring slots of a linear structure, in layout units
pub const SLOT_PITCH: f32 = 60.0;

/// Set of highlight styles on one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleSet(u8);

impl StyleSet {
    pub fn contains(self, style: HighlightStyle) -> bool {
        self.0 & style.bit() != 0
    }

    pub fn insert(&mut self, style: HighlightStyle) {
        self.0 |= style.bit();
    }

    pub fn remove(&mut self, style: HighlightStyle) {
        self.0 &= !style.bit();
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Clear every style, then set `style`
    pub fn set_exclusive(&mut self, style: HighlightStyle) {
        self.0 = style.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = HighlightStyle> {
        HighlightStyle::ALL
            .into_iter()
            .filter(move |style| self.contains(*style))
    }
}

/// What structural unit an element draws
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Cell,
    ListNode,
    StackSlot,
    QueueSlot,
    TreeNode { parent: Option<ElementId> },
    GraphNode,
    Edge { from: ElementId, to: ElementId },
}

impl ElementKind {
    /// Kind of element stored in a structure of `kind`
    pub fn for_structure(kind: DataStructureKind) -> Option<Self> {
        match kind {
            DataStructureKind::Array => Some(ElementKind::Cell),
            DataStructureKind::LinkedList => Some(ElementKind::ListNode),
            DataStructureKind::Stack => Some(ElementKind::StackSlot),
            DataStructureKind::Queue => Some(ElementKind::QueueSlot),
            DataStructureKind::Tree => Some(ElementKind::TreeNode { parent: None }),
            DataStructureKind::Graph => Some(ElementKind::GraphNode),
            DataStructureKind::Generic => None,
        }
    }
}

/// One addressable on-screen unit
#[derive(Debug, Clone, PartialEq)]
pub struct VisualElement {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Displayed value
    pub label: String,
    pub position: Point,
    pub styles: StyleSet,
}

impl VisualElement {
    pub fn new(id: impl Into<ElementId>, kind: ElementKind, label: impl Into<String>) -> Self {
        VisualElement {
            id: id.into(),
            kind,
            label: label.into(),
            position: Point::default(),
            styles: StyleSet::default(),
        }
    }

    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }
}

/// All elements of one rendered structure, in display order
#[derive(Debug, Clone, PartialEq)]
pub struct VisualElementSet {
    kind: DataStructureKind,
    elements: FxHashMap<ElementId, VisualElement>,
    order: Vec<ElementId>,
    aliases: FxHashMap<String, ElementId>,
}

impl VisualElementSet {
    pub fn new(kind: DataStructureKind) -> Self {
        VisualElementSet {
            kind,
            elements: FxHashMap::default(),
            order: Vec::new(),
            aliases: FxHashMap::default(),
        }
    }

    pub fn kind(&self) -> DataStructureKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Append an element at the end of the display order.
    /// Returns false (and changes nothing) if the id is taken.
    pub fn push(&mut self, element: VisualElement) -> bool {
        let slot = self.order.len();
        self.insert_at(slot, element)
    }

    /// Insert an element at display slot `slot` (clamped to the end)
    pub fn insert_at(&mut self, slot: usize, element: VisualElement) -> bool {
        if self.contains(&element.id) {
            return false;
        }
        let slot = slot.min(self.order.len());
        self.order.insert(slot, element.id.clone());
        self.elements.insert(element.id.clone(), element);
        if self.kind.is_linear() {
            self.relayout();
        }
        true
    }

    /// Register `alias` as another name for `id`
    pub fn add_alias(&mut self, alias: impl Into<String>, id: impl Into<ElementId>) {
        self.aliases.insert(alias.into(), id.into());
    }

    /// Map an id or alias to the primary id of an existing element
    pub fn resolve(&self, id: &str) -> Option<&ElementId> {
        if let Some((key, _)) = self.elements.get_key_value(id) {
            return Some(key);
        }
        self.aliases
            .get(id)
            .filter(|primary| self.elements.contains_key(primary.as_str()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.resolve(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&VisualElement> {
        let primary = self.resolve(id)?;
        self.elements.get(primary)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut VisualElement> {
        let primary = self.resolve(id)?.clone();
        self.elements.get_mut(&primary)
    }

    /// Remove an element. Aliases pointing at it stop resolving.
    pub fn remove(&mut self, id: &str) -> Option<VisualElement> {
        let primary = self.resolve(id)?.clone();
        let element = self.elements.remove(&primary)?;
        self.order.retain(|other| *other != primary);
        self.aliases.retain(|_, target| *target != primary);
        if self.kind.is_linear() {
            self.relayout();
        }
        Some(element)
    }

    /// Display slot of an element
    pub fn slot_of(&self, id: &str) -> Option<usize> {
        let primary = self.resolve(id)?;
        self.order.iter().position(|other| other == primary)
    }

    /// Move an element to display slot `slot` (clamped to the last slot)
    pub fn move_to_slot(&mut self, id: &str, slot: usize) -> bool {
        let Some(from) = self.slot_of(id) else {
            return false;
        };
        let primary = self.order.remove(from);
        let slot = slot.min(self.order.len());
        self.order.insert(slot, primary);
        self.relayout();
        true
    }

    /// Exchange the displayed values of two elements; identities stay put
    pub fn swap_labels(&mut self, a: &str, b: &str) -> bool {
        let (Some(a), Some(b)) = (self.resolve(a).cloned(), self.resolve(b).cloned()) else {
            return false;
        };
        if a == b {
            return true;
        }
        let label_a = self.elements.get(&a).map(|e| e.label.clone()).unwrap_or_default();
        let label_b = self.elements.get(&b).map(|e| e.label.clone()).unwrap_or_default();
        if let Some(element) = self.elements.get_mut(&a) {
            element.label = label_b;
        }
        if let Some(element) = self.elements.get_mut(&b) {
            element.label = label_a;
        }
        true
    }

    /// Next free `<prefix>-<n>` id
    pub fn fresh_id(&self, prefix: &str) -> ElementId {
        let mut n = self.order.len();
        loop {
            let candidate = format!("{}-{}", prefix, n);
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Elements in display order
    pub fn iter(&self) -> impl Iterator<Item = &VisualElement> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    #[cfg(test)]
    pub(crate) fn ids(&self) -> &[ElementId] {
        &self.order
    }

    /// Recompute slot positions for linear structures
    fn relayout(&mut self) {
        let vertical = self.kind == DataStructureKind::Stack;
        for (slot, id) in self.order.iter().enumerate() {
            if let Some(element) = self.elements.get_mut(id) {
                let offset = slot as f32 * SLOT_PITCH;
                element.position = if vertical {
                    Point::new(0.0, offset)
                } else {
                    Point::new(offset, 0.0)
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(values: &[i32]) -> VisualElementSet {
        let mut set = VisualElementSet::new(DataStructureKind::Array);
        for (i, v) in values.iter().enumerate() {
            set.push(VisualElement::new(format!("element-{}", i), ElementKind::Cell, v.to_string()));
        }
        set
    }

    #[test]
    fn test_style_set_exclusive() {
        let mut styles = StyleSet::default();
        styles.insert(HighlightStyle::Swapping);
        styles.insert(HighlightStyle::Visited);
        styles.set_exclusive(HighlightStyle::Sorted);
        assert_eq!(styles.iter().collect::<Vec<_>>(), vec![HighlightStyle::Sorted]);
        styles.remove(HighlightStyle::Sorted);
        assert!(styles.is_empty());
    }

    #[test]
    fn test_swap_labels_keeps_identity() {
        let mut set = array(&[5, 2, 8]);
        assert!(set.swap_labels("element-0", "element-1"));
        assert_eq!(set.get("element-0").unwrap().label, "2");
        assert_eq!(set.get("element-1").unwrap().label, "5");
        assert_eq!(set.slot_of("element-0"), Some(0));
        assert!(!set.swap_labels("element-0", "element-9"));
    }

    #[test]
    fn test_move_and_remove_relayout() {
        let mut set = array(&[1, 2, 3]);
        assert!(set.move_to_slot("element-0", 10));
        assert_eq!(set.ids(), ["element-1", "element-2", "element-0"]);
        assert_eq!(set.get("element-0").unwrap().position, Point::new(2.0 * SLOT_PITCH, 0.0));

        set.remove("element-1");
        assert_eq!(set.slot_of("element-2"), Some(0));
        assert_eq!(set.get("element-2").unwrap().position, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_aliases_resolve_and_die_with_element() {
        let mut set = VisualElementSet::new(DataStructureKind::Tree);
        set.push(VisualElement::new("tree-node-1", ElementKind::TreeNode { parent: None }, "1"));
        set.add_alias("tree-path-root", "tree-node-1");
        assert_eq!(set.get("tree-path-root").unwrap().label, "1");

        set.remove("tree-path-root");
        assert!(!set.contains("tree-node-1"));
        assert!(!set.contains("tree-path-root"));
    }

    #[test]
    fn test_duplicate_push_rejected() {
        let mut set = array(&[1]);
        assert!(!set.push(VisualElement::new("element-0", ElementKind::Cell, "9")));
        assert_eq!(set.len(), 1);
        assert_eq!(set.fresh_id("element"), "element-1");
    }
}

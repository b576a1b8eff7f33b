//! Variable tracker panel state

use crate::script::{VariableDecl, VariableMap};

/// One row of the tracker
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedVariable {
    pub name: String,
    /// Text currently on display
    pub shown: String,
    /// Set while the change cue is visible
    pub changed: bool,
}

/// Displayed values of the live variable table.
///
/// Declared variables come first, in declaration order; anything else the
/// script assigns is appended the first time it appears.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableTracker {
    rows: Vec<TrackedVariable>,
}

impl VariableTracker {
    pub fn from_declarations(decls: &[VariableDecl]) -> Self {
        let rows = decls
            .iter()
            .map(|decl| TrackedVariable {
                name: decl.name.clone(),
                shown: decl
                    .initial_value
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                changed: false,
            })
            .collect();
        VariableTracker { rows }
    }

    pub fn rows(&self) -> &[TrackedVariable] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn shown(&self, name: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.name == name)
            .map(|row| row.shown.as_str())
    }

    /// Show the current table. Returns the names whose displayed text
    /// changed; those rows get the change cue.
    pub fn refresh(&mut self, variables: &VariableMap) -> Vec<String> {
        let mut changed = Vec::new();
        for (name, value) in variables {
            let text = value.to_string();
            match self.rows.iter_mut().find(|row| row.name == *name) {
                Some(row) if row.shown == text => {}
                Some(row) => {
                    row.shown = text;
                    row.changed = true;
                    changed.push(name.clone());
                }
                None => {
                    self.rows.push(TrackedVariable {
                        name: name.clone(),
                        shown: text,
                        changed: true,
                    });
                    changed.push(name.clone());
                }
            }
        }
        changed
    }

    /// Show the current table without change cues
    pub fn sync(&mut self, variables: &VariableMap) {
        for name in self.refresh(variables) {
            self.clear_cue(&name);
        }
    }

    pub fn clear_cue(&mut self, name: &str) {
        if let Some(row) = self.rows.iter_mut().find(|row| row.name == name) {
            row.changed = false;
        }
    }

    /// Copy the change cue of every row `other` also shows
    pub fn carry_cues_from(&mut self, other: &VariableTracker) {
        for row in &mut self.rows {
            if let Some(old) = other.rows.iter().find(|old| old.name == row.name) {
                row.changed = old.changed;
            }
        }
    }

    /// Name -> displayed text, in row order
    pub fn values(&self) -> Vec<(String, String)> {
        self.rows
            .iter()
            .map(|row| (row.name.clone(), row.shown.clone()))
            .collect()
    }
}

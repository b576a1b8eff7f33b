//! Problem documents and the playback session context
//!
//! A problem file holds one problem with a solution per language. Each
//! solution may carry an animation script; one without a script shows the
//! "not available" placeholder instead of failing.

use super::{AnimationScript, DataStructureKind};
use crate::error::LoadError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One language's solution to a problem
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Solution {
    pub code: Option<String>,
    pub time_complexity: Option<String>,
    pub space_complexity: Option<String>,
    pub animation_data: Option<AnimationScript>,
}

impl Solution {
    /// The solution's script, with complexities filled in from the solution
    /// when the script does not state its own
    pub fn script(&self) -> Option<AnimationScript> {
        let mut script = self.animation_data.clone()?;
        if script.time_complexity.is_none() {
            script.time_complexity = self.time_complexity.clone();
        }
        if script.space_complexity.is_none() {
            script.space_complexity = self.space_complexity.clone();
        }
        Some(script)
    }
}

/// A problem with its per-language solutions
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProblemDocument {
    pub title: String,
    pub difficulty: Option<String>,
    pub category: DataStructureKind,
    pub solutions: BTreeMap<String, Solution>,
}

impl ProblemDocument {
    /// Parse a problem document from JSON text
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a problem document from disk
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let document: ProblemDocument =
            serde_json::from_str(&text).map_err(|source| LoadError::ScriptParse {
                path: Some(path.to_path_buf()),
                source,
            })?;
        log::info!(
            "loaded problem '{}' ({} solution(s)) from {}",
            document.title,
            document.solutions.len(),
            path.display()
        );
        Ok(document)
    }

    /// Solution languages in display order
    pub fn languages(&self) -> Vec<String> {
        self.solutions.keys().cloned().collect()
    }

    pub fn solution(&self, language: &str) -> Option<&Solution> {
        self.solutions.get(language)
    }

    /// Build the session for `language`, or the first language when `None`
    pub fn session(&self, language: Option<&str>) -> Result<SessionContext, LoadError> {
        let languages = self.languages();
        let selected = match language {
            Some(lang) if self.solutions.contains_key(lang) => lang.to_string(),
            Some(lang) => {
                return Err(LoadError::UnknownLanguage {
                    language: lang.to_string(),
                    available: languages,
                })
            }
            None => languages.first().cloned().ok_or_else(|| LoadError::NoSolutions {
                title: self.title.clone(),
            })?,
        };

        Ok(SessionContext {
            title: self.title.clone(),
            kind: self.category,
            language: selected,
            languages,
        })
    }
}

/// The current problem/language selection, owned by the front-end
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub title: String,
    pub kind: DataStructureKind,
    pub language: String,
    pub languages: Vec<String>,
}

impl SessionContext {
    /// Select the next language, wrapping around. Returns the new language.
    pub fn cycle_language(&mut self) -> &str {
        if let Some(pos) = self.languages.iter().position(|l| *l == self.language) {
            let next = (pos + 1) % self.languages.len();
            self.language = self.languages[next].clone();
        }
        &self.language
    }
}

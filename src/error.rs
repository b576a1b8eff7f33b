//! Load-time error types
//!
//! [`LoadError`] covers everything that can go wrong before playback starts:
//! reading files, parsing problem documents and config files, and picking a
//! solution language. Playback itself never fails; a step that addresses a
//! missing element is skipped rather than reported.

use std::fmt;
use std::path::PathBuf;

/// Errors raised while loading problem documents or configuration
#[derive(Debug)]
pub enum LoadError {
    /// A file could not be read
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A problem document is not valid JSON for the expected shape
    ScriptParse {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },

    /// A config file is not valid TOML for the expected shape
    ConfigParse { path: PathBuf, message: String },

    /// The problem document has no solutions at all
    NoSolutions { title: String },

    /// The requested language has no solution in the document
    UnknownLanguage {
        language: String,
        available: Vec<String>,
    },
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "Cannot read '{}': {}", path.display(), source)
            }
            LoadError::ScriptParse {
                path: Some(path),
                source,
            } => {
                write!(f, "Invalid problem file '{}': {}", path.display(), source)
            }
            LoadError::ScriptParse { path: None, source } => {
                write!(f, "Invalid problem data: {}", source)
            }
            LoadError::ConfigParse { path, message } => {
                write!(f, "Invalid config file '{}': {}", path.display(), message)
            }
            LoadError::NoSolutions { title } => {
                write!(f, "Problem '{}' has no solutions", title)
            }
            LoadError::UnknownLanguage {
                language,
                available,
            } => {
                write!(
                    f,
                    "No solution in '{}' (available: {})",
                    language,
                    available.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::ScriptParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(source: serde_json::Error) -> Self {
        LoadError::ScriptParse { path: None, source }
    }
}

//! Scalar values carried by scripts
//!
//! Variables, inserted element values, node labels and graph node ids are all
//! plain JSON scalars in a script file. [`ScalarValue`] keeps the source
//! flavour (integer, real, boolean or text) so the variable tracker can show
//! exactly what the author wrote. Anything else (`null`, arrays, objects) is
//! kept as raw JSON and shown as JSON text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A scalar script value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Int(i64),
    Real(f64),
    Bool(bool),
    Text(String),
    /// Non-scalar JSON such as `null` or `["(", "["]`
    Json(serde_json::Value),
}

/// Variable name -> value, ordered by name
pub type VariableMap = BTreeMap<String, ScalarValue>;

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Int(n) => write!(f, "{}", n),
            // f64's Display already drops a trailing ".0"
            ScalarValue::Real(x) => write!(f, "{}", x),
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Text(s) => f.write_str(s),
            ScalarValue::Json(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for ScalarValue {
    fn from(n: i64) -> Self {
        ScalarValue::Int(n)
    }
}

impl From<i32> for ScalarValue {
    fn from(n: i32) -> Self {
        ScalarValue::Int(i64::from(n))
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::Text(s.to_string())
    }
}

use std::fmt;

use serde_json::Value;

/// A typed leaf value
///
/// `Display` gives the canonical text form, which is also the form list
/// keys are stored and compared in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LeafValue {
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
}

impl LeafValue {
    pub fn to_json(&self) -> Value {
        match self {
            LeafValue::String(s) => Value::String(s.clone()),
            LeafValue::Bool(b) => Value::Bool(*b),
            LeafValue::Int(i) => Value::from(*i),
            LeafValue::Uint(u) => Value::from(*u),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LeafValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for LeafValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafValue::String(s) => f.write_str(s),
            LeafValue::Bool(b) => write!(f, "{}", b),
            LeafValue::Int(i) => write!(f, "{}", i),
            LeafValue::Uint(u) => write!(f, "{}", u),
        }
    }
}

impl From<&str> for LeafValue {
    fn from(s: &str) -> Self {
        LeafValue::String(s.to_string())
    }
}

impl From<u64> for LeafValue {
    fn from(u: u64) -> Self {
        LeafValue::Uint(u)
    }
}

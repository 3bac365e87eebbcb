use serde_json::Value;

use crate::errors::{BindError, Result};
use crate::path::strip_module_prefix;
use crate::tree::LeafValue;

/// Value type of a leaf or leaf-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafType {
    String,
    Boolean,
    Int { min: i64, max: i64 },
    Uint { max: u64 },
    /// Allowed names; payload values may carry a `module:` prefix
    Enumeration(Vec<String>),
    /// Absolute (`/a/b/c`) or relative (`../config/name`) schema path;
    /// `target` is the referenced leaf's type, filled in at registration
    Leafref {
        path: String,
        target: Option<Box<LeafType>>,
    },
}

impl LeafType {
    pub fn uint8() -> Self {
        LeafType::Uint {
            max: u64::from(u8::MAX),
        }
    }

    pub fn uint16() -> Self {
        LeafType::Uint {
            max: u64::from(u16::MAX),
        }
    }

    pub fn uint32() -> Self {
        LeafType::Uint {
            max: u64::from(u32::MAX),
        }
    }

    pub fn int32() -> Self {
        LeafType::Int {
            min: i64::from(i32::MIN),
            max: i64::from(i32::MAX),
        }
    }

    pub fn enumeration(values: &[&str]) -> Self {
        LeafType::Enumeration(values.iter().map(|v| v.to_string()).collect())
    }

    pub fn leafref(path: impl Into<String>) -> Self {
        LeafType::Leafref {
            path: path.into(),
            target: None,
        }
    }

    /// The type values are actually checked against (leafrefs resolve through)
    pub fn effective(&self) -> &LeafType {
        match self {
            LeafType::Leafref {
                target: Some(target),
                ..
            } => target.effective(),
            other => other,
        }
    }

    /// Convert a JSON scalar into a typed value, enforcing this type
    ///
    /// 64-bit style numeric strings (`"42"`) are accepted for integer types.
    /// Leafref leaves convert through their resolved target type, or accept
    /// any scalar when the target type is unknown; the referenced data itself
    /// is checked during validation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` naming `field` when the value does not conform.
    pub fn from_json(&self, field: &str, value: &Value) -> Result<LeafValue> {
        let ty = self.effective();
        let converted = match (ty, value) {
            (LeafType::String, Value::String(s)) => LeafValue::String(s.clone()),
            (LeafType::Boolean, Value::Bool(b)) => LeafValue::Bool(*b),
            (LeafType::Int { .. }, Value::Number(n)) => match n.as_i64() {
                Some(i) => LeafValue::Int(i),
                None => return Err(invalid(field, format!("{} is not an integer", n))),
            },
            (LeafType::Int { .. }, Value::String(s)) => LeafValue::Int(
                s.parse()
                    .map_err(|_| invalid(field, format!("'{}' is not an integer", s)))?,
            ),
            (LeafType::Uint { .. }, Value::Number(n)) => match n.as_u64() {
                Some(u) => LeafValue::Uint(u),
                None => {
                    return Err(invalid(
                        field,
                        format!("{} is not an unsigned integer", n),
                    ))
                }
            },
            (LeafType::Uint { .. }, Value::String(s)) => LeafValue::Uint(s.parse().map_err(
                |_| invalid(field, format!("'{}' is not an unsigned integer", s)),
            )?),
            (LeafType::Enumeration(_), Value::String(s)) => {
                LeafValue::String(strip_module_prefix(s).to_string())
            }
            (LeafType::Leafref { .. }, Value::String(s)) => LeafValue::String(s.clone()),
            (LeafType::Leafref { .. }, Value::Bool(b)) => LeafValue::Bool(*b),
            (LeafType::Leafref { .. }, Value::Number(n)) => match (n.as_u64(), n.as_i64()) {
                (Some(u), _) => LeafValue::Uint(u),
                (None, Some(i)) => LeafValue::Int(i),
                _ => return Err(invalid(field, format!("{} is not an integer", n))),
            },
            (_, other) => {
                return Err(invalid(
                    field,
                    format!("{} does not match type {}", json_kind(other), ty.name()),
                ))
            }
        };
        ty.check(field, &converted)?;
        Ok(converted)
    }

    /// Convert a path predicate value into a typed value
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` when the text does not parse as this type.
    pub fn from_key(&self, field: &str, raw: &str) -> Result<LeafValue> {
        let ty = self.effective();
        let value = match ty {
            LeafType::String | LeafType::Leafref { .. } => LeafValue::String(raw.to_string()),
            LeafType::Enumeration(_) => LeafValue::String(strip_module_prefix(raw).to_string()),
            LeafType::Boolean => match raw {
                "true" => LeafValue::Bool(true),
                "false" => LeafValue::Bool(false),
                _ => return Err(invalid(field, format!("'{}' is not a boolean", raw))),
            },
            LeafType::Int { .. } => LeafValue::Int(
                raw.parse()
                    .map_err(|_| invalid(field, format!("'{}' is not an integer", raw)))?,
            ),
            LeafType::Uint { .. } => LeafValue::Uint(raw.parse().map_err(|_| {
                invalid(field, format!("'{}' is not an unsigned integer", raw))
            })?),
        };
        ty.check(field, &value)?;
        Ok(value)
    }

    /// Check range and enumeration membership of an already typed value
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` when the value falls outside this type.
    pub fn check(&self, field: &str, value: &LeafValue) -> Result<()> {
        match (self.effective(), value) {
            (LeafType::Int { min, max }, LeafValue::Int(i)) if i < min || i > max => Err(
                invalid(field, format!("{} outside range {}..={}", i, min, max)),
            ),
            (LeafType::Uint { max }, LeafValue::Uint(u)) if u > max => {
                Err(invalid(field, format!("{} exceeds maximum {}", u, max)))
            }
            (LeafType::Enumeration(allowed), LeafValue::String(s))
                if !allowed.iter().any(|a| a == s) =>
            {
                Err(invalid(
                    field,
                    format!("'{}' is not one of [{}]", s, allowed.join(", ")),
                ))
            }
            _ => Ok(()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LeafType::String => "string",
            LeafType::Boolean => "boolean",
            LeafType::Int { .. } => "int",
            LeafType::Uint { .. } => "uint",
            LeafType::Enumeration(_) => "enumeration",
            LeafType::Leafref { .. } => "leafref",
        }
    }
}

/// A leafref path split into its navigation parts
///
/// `../../config/name` has `up == 2` and names `["config", "name"]`.
/// Module prefixes are stripped and predicates are ignored, so a leafref
/// with predicates matches every entry of the lists it crosses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafrefPath {
    pub absolute: bool,
    pub up: usize,
    pub names: Vec<String>,
}

impl LeafrefPath {
    pub fn parse(raw: &str) -> Self {
        let absolute = raw.starts_with('/');
        let mut up = 0;
        let mut rest = raw.trim_start_matches('/');
        if !absolute {
            loop {
                if let Some(r) = rest.strip_prefix("../") {
                    up += 1;
                    rest = r;
                } else if rest == ".." {
                    up += 1;
                    rest = "";
                } else if let Some(r) = rest.strip_prefix("./") {
                    rest = r;
                } else {
                    break;
                }
            }
        }
        let names = crate::path::Path::parse(rest)
            .segments()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        Self {
            absolute,
            up,
            names,
        }
    }
}

fn invalid(field: &str, reason: String) -> BindError {
    BindError::InvalidValue {
        field: field.to_string(),
        reason,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

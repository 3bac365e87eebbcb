//! Request opcodes

use std::fmt;
use std::str::FromStr;

use crate::errors::BindError;

/// CRUD-style operation a request is bound with
///
/// Declaration order is the wire order (`GET` = 0 .. `DELETE` = 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Opcode {
    Get,
    Create,
    Replace,
    Update,
    Delete,
}

impl Opcode {
    pub const ALL: [Opcode; 5] = [
        Opcode::Get,
        Opcode::Create,
        Opcode::Replace,
        Opcode::Update,
        Opcode::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Opcode::Get => "GET",
            Opcode::Create => "CREATE",
            Opcode::Replace => "REPLACE",
            Opcode::Update => "UPDATE",
            Opcode::Delete => "DELETE",
        }
    }

    /// Opcodes that decode a payload into the bound node
    pub fn carries_payload(&self) -> bool {
        matches!(self, Opcode::Create | Opcode::Replace | Opcode::Update)
    }

    /// Opcodes whose write anchor moves up when the target is an un-keyed list
    pub fn reanchors_collections(&self) -> bool {
        matches!(self, Opcode::Replace | Opcode::Update)
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, Opcode::Get)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Opcode {
    type Err = BindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Opcode::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BindError::UnsupportedOperation {
                opcode: s.to_string(),
            })
    }
}

impl TryFrom<u8> for Opcode {
    type Error = BindError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Opcode::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| BindError::UnsupportedOperation {
                opcode: value.to_string(),
            })
    }
}

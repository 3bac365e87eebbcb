//! Built-in schema models
//!
//! Hand-registered subsets of the OpenConfig ACL and system modules. They
//! cover the node kinds the binder handles: nested containers, single- and
//! multi-key lists, enumerations, ranged integers, leaf-lists and both
//! relative and absolute leafrefs.

mod acl;
mod system;

use crate::errors::Result;
use crate::schema::Schema;

pub use acl::{openconfig_acl, ACL_MODULE};
pub use system::{openconfig_system, SYSTEM_MODULE};

/// Schema with every built-in module registered
///
/// # Errors
///
/// Returns `InternalSchema` if a model is inconsistent.
pub fn builtin_schema() -> Result<Schema> {
    Schema::new([openconfig_acl(), openconfig_system()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_schema_registers() {
        let schema = builtin_schema().unwrap();
        assert_eq!(schema.modules(), vec![ACL_MODULE, SYSTEM_MODULE]);
    }
}

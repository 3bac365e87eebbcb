use std::sync::Arc;

use yangbind_core::models::builtin_schema;
use yangbind_core::{bind, render_scoped, Binding, DataTree, Opcode};

pub const ACL_SET: &str = "/acl/acl-sets/acl-set[name=MyACL1][type=ACL_IPV4]";

/// One ACL entry under `acl-entries`, sequence 10
pub const ACL_ENTRIES_PAYLOAD: &str = r#"{
    "openconfig-acl:acl-entries": {
        "acl-entry": [
            {
                "sequence-id": 10,
                "config": {"sequence-id": 10, "description": "permit ssh"},
                "transport": {"config": {"destination-port": 22}},
                "actions": {"config": {"forwarding-action": "openconfig-acl:ACCEPT"}}
            }
        ]
    }
}"#;

/// Empty tree over the built-in models
#[allow(dead_code)]
pub fn new_tree() -> DataTree {
    DataTree::new(Arc::new(builtin_schema().unwrap()))
}

/// Bind and panic with the error on failure
#[allow(dead_code)]
pub fn bind_ok(tree: &mut DataTree, path: &str, opcode: Opcode, payload: &str) -> Binding {
    bind(tree, path, opcode, payload.as_bytes())
        .unwrap_or_else(|e| panic!("{} {} failed: {}", opcode, path, e))
}

/// Scoped render as a string
#[allow(dead_code)]
pub fn render(tree: &DataTree, path: &str) -> String {
    let body = render_scoped(tree, path).unwrap_or_else(|e| panic!("render {} failed: {}", path, e));
    String::from_utf8(body).unwrap()
}

/// Tree holding `MyACL1` with one entry
#[allow(dead_code)]
pub fn acl_tree() -> DataTree {
    let mut tree = new_tree();
    bind_ok(&mut tree, &format!("{}/", ACL_SET), Opcode::Replace, ACL_ENTRIES_PAYLOAD);
    tree
}

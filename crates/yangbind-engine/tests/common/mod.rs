use yangbind_core::{DataTree, Opcode};
use yangbind_engine::registry::new_tree;
use yangbind_engine::{process, EngineConfig, Request, Response};

pub const ACL_SET: &str = "/openconfig-acl:acl/acl-sets/acl-set[name=MyACL1][type=ACL_IPV4]";

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

#[allow(dead_code)]
pub fn tree() -> DataTree {
    new_tree().expect("schema registers")
}

/// Process with default config, panicking with the error on failure
#[allow(dead_code)]
pub fn run(tree: &mut DataTree, opcode: Opcode, path: &str, payload: &str) -> Response {
    let request = Request::new(opcode, path).with_payload(payload);
    process(&request, tree, &EngineConfig::default())
        .unwrap_or_else(|e| panic!("{} {} failed: {}", opcode, path, e))
}

/// Tree holding `MyACL1` with sequence 10
#[allow(dead_code)]
pub fn acl_tree() -> DataTree {
    let mut tree = tree();
    run(
        &mut tree,
        Opcode::Replace,
        &format!("{}/", ACL_SET),
        ACL_ENTRIES_PAYLOAD,
    );
    tree
}

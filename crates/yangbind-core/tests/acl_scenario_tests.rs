#![allow(clippy::unwrap_used, clippy::expect_used)]

/// End-to-end ACL scenarios over the built-in openconfig-acl model
mod common;

use serde_json::{json, Value};
use yangbind_core::{bind, ExErrorKind, NodeShape, Opcode};

use common::{acl_tree, bind_ok, new_tree, render, ACL_ENTRIES_PAYLOAD, ACL_SET};

#[test]
fn test_replace_at_keyed_acl_set_then_get_entries() {
    // GIVEN an empty tree
    let mut tree = new_tree();

    // WHEN replacing at the fully keyed acl-set with one acl-entries child
    let binding = bind_ok(
        &mut tree,
        &format!("{}/", ACL_SET),
        Opcode::Replace,
        ACL_ENTRIES_PAYLOAD,
    );

    // THEN the single entry is the target and the anchor did not move
    assert_eq!(binding.target.shape(), NodeShape::Entry);
    assert!(!binding.reanchored);
    assert_eq!(binding.anchor.to_string(), ACL_SET);

    // AND a GET on acl-entries renders exactly the decoded entry
    bind_ok(&mut tree, &format!("{}/acl-entries", ACL_SET), Opcode::Get, "");
    let body = render(&tree, &format!("{}/acl-entries", ACL_SET));
    assert!(!body.contains('\n'));

    let doc: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        doc,
        json!({
            "acl-entries": {
                "acl-entry": [{
                    "sequence-id": 10,
                    "config": {"sequence-id": 10, "description": "permit ssh"},
                    "transport": {"config": {"destination-port": 22}},
                    "actions": {"config": {"forwarding-action": "ACCEPT"}}
                }]
            }
        })
    );
}

#[test]
fn test_replace_on_acl_set_collection_anchors_at_acl_sets() {
    let mut tree = new_tree();
    let binding = bind_ok(
        &mut tree,
        "/acl/acl-sets/acl-set",
        Opcode::Replace,
        r#"{"acl-set": [{"name": "A", "type": "ACL_IPV6", "config": {"name": "A", "type": "ACL_IPV6"}}]}"#,
    );
    assert!(binding.reanchored);
    assert_eq!(binding.anchor.to_string(), "/acl/acl-sets");

    let body = render(&tree, "/acl/acl-sets/acl-set[name=A][type=ACL_IPV6]/config/type");
    assert_eq!(body, r#"{"type":"ACL_IPV6"}"#);
}

#[test]
fn test_partial_keys_on_acl_set_reanchor_too() {
    let mut tree = new_tree();
    let binding = bind_ok(
        &mut tree,
        "/acl/acl-sets/acl-set[name=A]",
        Opcode::Update,
        r#"{"acl-set": [{"name": "A", "type": "ACL_L2"}]}"#,
    );
    assert!(binding.reanchored);
    assert_eq!(binding.anchor.to_string(), "/acl/acl-sets");
}

#[test]
fn test_create_on_acl_entry_collection_fails_with_missing_keys() {
    let mut tree = acl_tree();
    let err = bind(
        &mut tree,
        &format!("{}/acl-entries/acl-entry", ACL_SET),
        Opcode::Create,
        br#"{"acl-entry": []}"#,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidPath);
    assert!(err.to_string().contains("Missing keys"));
}

#[test]
fn test_create_single_entry() {
    let mut tree = acl_tree();
    bind_ok(
        &mut tree,
        &format!("{}/acl-entries/acl-entry[sequence-id=20]", ACL_SET),
        Opcode::Create,
        r#"{"config": {"sequence-id": 20}, "actions": {"config": {"forwarding-action": "DROP"}}}"#,
    );
    let body = render(
        &tree,
        &format!("{}/acl-entries/acl-entry[sequence-id=20]/actions", ACL_SET),
    );
    assert_eq!(body, r#"{"actions":{"config":{"forwarding-action":"DROP"}}}"#);
}

#[test]
fn test_empty_payload_rejected_for_every_decoding_opcode() {
    let paths = [
        "/acl".to_string(),
        format!("{}/acl-entries", ACL_SET),
        "/acl/acl-sets/acl-set".to_string(),
        format!("{}/config/description", ACL_SET),
    ];
    for opcode in [Opcode::Create, Opcode::Update, Opcode::Replace] {
        for path in &paths {
            let mut tree = acl_tree();
            let before = tree.root().clone();
            let err = bind(&mut tree, path, opcode, b"").unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::EmptyInput, "{} {}", opcode, path);
            assert_eq!(tree.root(), &before, "{} {}", opcode, path);
        }
    }
}

#[test]
fn test_interface_binding_checks_absolute_leafref() {
    let mut tree = acl_tree();
    bind_ok(
        &mut tree,
        ACL_SET,
        Opcode::Update,
        r#"{"config": {"name": "MyACL1", "type": "ACL_IPV4"}}"#,
    );

    let good = "/acl/interfaces/interface[id=eth0]/ingress-acl-sets/ingress-acl-set[set-name=MyACL1][type=ACL_IPV4]";
    bind_ok(
        &mut tree,
        good,
        Opcode::Update,
        r#"{"config": {"set-name": "MyACL1", "type": "ACL_IPV4"}}"#,
    );

    let bad = "/acl/interfaces/interface[id=eth0]/ingress-acl-sets/ingress-acl-set[set-name=Nope][type=ACL_IPV4]";
    let before = tree.root().clone();
    let err = bind(
        &mut tree,
        bad,
        Opcode::Update,
        br#"{"config": {"set-name": "Nope", "type": "ACL_IPV4"}}"#,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ValidationFailed);
    assert!(err.to_string().contains("Nope"));

    // AND the rejected binding left nothing behind
    assert_eq!(tree.root(), &before);
    bind_ok(&mut tree, "/acl/interfaces", Opcode::Get, "");
}

#[test]
fn test_enum_out_of_set_rejected_in_payload() {
    let mut tree = acl_tree();
    let before = tree.root().clone();
    let err = bind(
        &mut tree,
        &format!("{}/acl-entries/acl-entry[sequence-id=10]/actions", ACL_SET),
        Opcode::Update,
        br#"{"config": {"forwarding-action": "BOUNCE"}}"#,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidPayload);
    assert_eq!(tree.root(), &before);
}

#[test]
fn test_delete_entry_then_get_is_not_found() {
    let mut tree = acl_tree();
    let entry = format!("{}/acl-entries/acl-entry[sequence-id=10]", ACL_SET);

    let binding = bind_ok(&mut tree, &entry, Opcode::Delete, "");
    assert!(tree.remove(&binding.target).unwrap());

    let err = bind(&mut tree, &entry, Opcode::Get, b"").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_unknown_key_name_is_invalid_path() {
    let mut tree = new_tree();
    let err = bind(
        &mut tree,
        "/acl/acl-sets/acl-set[label=x]",
        Opcode::Update,
        b"{}",
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidPath);
}

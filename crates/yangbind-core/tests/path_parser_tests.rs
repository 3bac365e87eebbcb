#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use yangbind_core::path::{parse, template, Path};

#[test]
fn test_duplicate_keys_numbered_in_encounter_order() {
    let t = template("/a[x=1]/b[y=2]/c[x=3]");
    assert_eq!(t.template, "/a{}/b{}/c{}");
    assert_eq!(t.vars.len(), 3);
    assert_eq!(t.vars["x"], "1");
    assert_eq!(t.vars["y"], "2");
    assert_eq!(t.vars["x#2"], "3");
}

#[test]
fn test_third_occurrence_numbered() {
    let t = template("/a[k=1]/b[k=2]/c[k=3]");
    assert_eq!(t.vars["k"], "1");
    assert_eq!(t.vars["k#2"], "2");
    assert_eq!(t.vars["k#3"], "3");
}

#[test]
fn test_empty_path_parses_to_nothing() {
    let parsed = parse("");
    assert_eq!(parsed.template, "");
    assert!(parsed.vars.is_empty());
    assert!(parsed.path.is_empty());
}

#[test]
fn test_acl_path_both_views() {
    let parsed = parse("/openconfig-acl:acl/acl-sets/acl-set[name=MyACL1][type=ACL_IPV4]/acl-entries");
    assert_eq!(
        parsed.template,
        "/openconfig-acl:acl/acl-sets/acl-set{}/acl-entries"
    );
    assert_eq!(parsed.vars["name"], "MyACL1");
    assert_eq!(parsed.vars["type"], "ACL_IPV4");

    let names: Vec<_> = parsed.path.segments().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["acl", "acl-sets", "acl-set", "acl-entries"]);
    assert_eq!(parsed.path.segments()[2].predicates.len(), 2);
}

#[test]
fn test_same_path_same_template() {
    let a = template("/x[k=1]/y");
    let b = template("/x[k=1]/y");
    assert_eq!(a, b);
}

fn segment_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,8}"
}

fn predicate() -> impl Strategy<Value = (String, String)> {
    ("[a-z][a-z-]{0,5}", "[A-Za-z0-9_./:-]{0,8}")
}

fn segment() -> impl Strategy<Value = (String, Vec<(String, String)>)> {
    (segment_name(), prop::collection::vec(predicate(), 0..3))
}

fn render_path(segments: &[(String, Vec<(String, String)>)]) -> String {
    let mut out = String::new();
    for (name, preds) in segments {
        out.push('/');
        out.push_str(name);
        for (k, v) in preds {
            out.push_str(&format!("[{}={}]", k, v));
        }
    }
    out
}

proptest! {
    #[test]
    fn prop_template_idempotent(segments in prop::collection::vec(segment(), 0..6)) {
        let raw = render_path(&segments);
        let once = template(&raw);
        let twice = template(&once.template);
        prop_assert_eq!(&twice.template, &once.template);
        prop_assert!(twice.vars.is_empty());
    }

    #[test]
    fn prop_every_predicate_value_lands_in_vars(segments in prop::collection::vec(segment(), 1..6)) {
        let raw = render_path(&segments);
        let t = template(&raw);
        let total: usize = segments.iter().map(|(_, p)| p.len()).sum();
        prop_assert_eq!(t.vars.len(), total);
    }

    #[test]
    fn prop_display_reparses_to_same_path(segments in prop::collection::vec(segment(), 0..6)) {
        let path = Path::parse(&render_path(&segments));
        prop_assert_eq!(Path::parse(&path.to_string()), path);
    }

    #[test]
    fn prop_predicates_kept_in_order(segments in prop::collection::vec(segment(), 1..6)) {
        let path = Path::parse(&render_path(&segments));
        prop_assert_eq!(path.len(), segments.len());
        for (parsed, (_, preds)) in path.segments().iter().zip(&segments) {
            let keys: Vec<_> = parsed.predicates.iter().map(|p| p.key.clone()).collect();
            let expected: Vec<_> = preds.iter().map(|(k, _)| k.clone()).collect();
            prop_assert_eq!(keys, expected);
        }
    }
}

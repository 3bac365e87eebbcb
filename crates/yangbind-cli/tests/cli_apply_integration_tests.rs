//! CLI integration tests
//!
//! Drive the built binary against a scratch data file.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

const ACL_SET: &str = "/openconfig-acl:acl/acl-sets/acl-set[name=MyACL1][type=ACL_IPV4]";

fn yangbind(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_yangbind"))
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_update_then_get_round_trips_through_data_file() {
    // GIVEN a scratch directory with no data file
    let temp_dir = TempDir::new().unwrap();

    // WHEN the hostname is written and read back
    let update = yangbind(
        temp_dir.path(),
        &[
            "apply",
            "update",
            "/system/config",
            "--data",
            "tree.json",
            "--payload",
            r#"{"hostname": "cli-1"}"#,
        ],
    );
    assert!(update.status.success(), "{}", String::from_utf8_lossy(&update.stderr));

    let get = yangbind(
        temp_dir.path(),
        &["apply", "GET", "/system/config/hostname", "--data", "tree.json"],
    );

    // THEN the scoped body is printed and the file holds the whole tree
    assert!(get.status.success());
    assert_eq!(stdout(&get).trim(), r#"{"hostname":"cli-1"}"#);

    let stored: Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("tree.json")).unwrap())
            .unwrap();
    assert_eq!(
        stored,
        json!({"openconfig-system:system": {"config": {"hostname": "cli-1"}}})
    );
}

#[test]
fn test_payload_file_and_delete() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("entries.json"),
        r#"{"acl-entries": {"acl-entry": [{"sequence-id": 10, "config": {"sequence-id": 10}}]}}"#,
    )
    .unwrap();

    let replace_path = format!("{}/", ACL_SET);
    let replace = yangbind(
        temp_dir.path(),
        &[
            "apply",
            "REPLACE",
            &replace_path,
            "--data",
            "tree.json",
            "--payload-file",
            "entries.json",
        ],
    );
    assert!(replace.status.success(), "{}", String::from_utf8_lossy(&replace.stderr));

    let entry = format!("{}/acl-entries/acl-entry[sequence-id=10]", ACL_SET);
    let delete = yangbind(
        temp_dir.path(),
        &["apply", "DELETE", &entry, "--data", "tree.json"],
    );
    assert!(delete.status.success());

    let get = yangbind(temp_dir.path(), &["apply", "GET", &entry, "--data", "tree.json"]);
    assert!(!get.status.success());
    assert!(String::from_utf8_lossy(&get.stderr).contains("Error:"));
}

#[test]
fn test_dry_run_leaves_file_alone() {
    let temp_dir = TempDir::new().unwrap();
    let output = yangbind(
        temp_dir.path(),
        &[
            "apply",
            "UPDATE",
            "/system/config",
            "--data",
            "tree.json",
            "--payload",
            r#"{"hostname": "x"}"#,
            "--dry-run",
        ],
    );
    assert!(output.status.success());
    assert!(!temp_dir.path().join("tree.json").exists());
}

#[test]
fn test_unknown_opcode_rejected_by_parser() {
    let temp_dir = TempDir::new().unwrap();
    let output = yangbind(
        temp_dir.path(),
        &["apply", "PATCH", "/system", "--data", "tree.json"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("PATCH"));
}

#[test]
fn test_bad_config_aborts_before_binding() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("engine.toml"), "[binding]\nbogus = 1\n").unwrap();
    let output = yangbind(
        temp_dir.path(),
        &[
            "apply",
            "GET",
            "/system",
            "--data",
            "tree.json",
            "--config",
            "engine.toml",
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid config"));
}

#[test]
fn test_template_prints_vars() {
    let temp_dir = TempDir::new().unwrap();
    let output = yangbind(
        temp_dir.path(),
        &["template", "/acl-set[name=A][type=ACL_IPV4]/entry[id=1]"],
    );
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "/acl-set{}/entry{}\nid=1\nname=A\ntype=ACL_IPV4\n"
    );
}

//! Whole-document load and dump

#![allow(clippy::result_large_err)]

use yangbind_core::{
    bind_with, emit_tree, log_op_end, log_op_error, log_op_start, DataTree, EmitOptions, ExError,
    JsonCodec, Opcode,
};

use crate::config::EngineConfig;

/// Merge a full JSON document into `tree`, as a REPLACE at the root
///
/// # Errors
///
/// `EmptyInput` for an empty document, otherwise codec and validation
/// failures as for any REPLACE.
pub fn load_document(
    tree: &mut DataTree,
    document: &[u8],
    config: &EngineConfig,
) -> Result<(), ExError> {
    log_op_start!("load_document", payload_len = document.len() as u64);
    let start = std::time::Instant::now();

    bind_with(
        tree,
        "/",
        Opcode::Replace,
        document,
        &JsonCodec,
        &config.bind_options(),
    )
    .map_err(|e| {
        let err = ExError::from(e).with_op("load_document");
        log_op_error!(
            "load_document",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        err
    })?;

    log_op_end!(
        "load_document",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(())
}

/// Emit the whole tree as pretty JSON
///
/// # Errors
///
/// `Serialization` when emission fails.
pub fn dump_document(tree: &DataTree, config: &EngineConfig) -> Result<String, ExError> {
    let options = EmitOptions {
        skip_validation: true,
        module_qualify: config.render.module_qualify,
        pretty: true,
    };
    emit_tree(tree, &options).map_err(|e| ExError::from(e).with_op("dump_document"))
}

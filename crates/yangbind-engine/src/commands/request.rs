//! Request processing
//!
//! The engine layer owns lifecycle logging for requests:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Core only emits `tracing::debug!()` for internal details.

#![allow(clippy::result_large_err)]

use yangbind_core_types::RequestContext;
use yangbind_core::{
    bind_with, log_op_end, log_op_error, log_op_start, render_scoped_with, BindError, DataTree,
    ExError, JsonCodec, Opcode, PayloadCodec,
};

use crate::config::EngineConfig;

const OP: &str = "process_request";

/// One inbound request, as a transport hands it over
#[derive(Debug, Clone)]
pub struct Request {
    pub ctx: RequestContext,
    pub path: String,
    pub opcode: Opcode,
    pub payload: Vec<u8>,
}

impl Request {
    pub fn new(opcode: Opcode, path: impl Into<String>) -> Self {
        Self {
            ctx: RequestContext::new(),
            path: path.into(),
            opcode,
            payload: Vec::new(),
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_context(mut self, ctx: RequestContext) -> Self {
        self.ctx = ctx;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub opcode: Opcode,
    /// Canonical form of the bound target path
    pub path: String,
    /// Where the payload was written and validation ran
    pub anchor: String,
    /// Scoped JSON document, GET only
    pub body: Option<Vec<u8>>,
    /// Whether DELETE removed data
    pub removed: bool,
}

impl Response {
    pub fn body_str(&self) -> Option<&str> {
        self.body.as_deref().and_then(|b| std::str::from_utf8(b).ok())
    }
}

/// Process a request with the JSON codec
///
/// # Errors
///
/// See [`process_with_codec`].
pub fn process(
    request: &Request,
    tree: &mut DataTree,
    config: &EngineConfig,
) -> Result<Response, ExError> {
    process_with_codec(request, tree, config, &JsonCodec)
}

/// Bind a request into `tree` and carry out its opcode
///
/// GET renders the target scoped to its parent. DELETE removes the target
/// once binding has checked it. CREATE, REPLACE and UPDATE leave their
/// effect in `tree`.
///
/// # Errors
///
/// Any binding, removal or rendering failure, as an `ExError` carrying the
/// request's literal path, opcode and correlation ids.
pub fn process_with_codec(
    request: &Request,
    tree: &mut DataTree,
    config: &EngineConfig,
    codec: &dyn PayloadCodec,
) -> Result<Response, ExError> {
    log_op_start!(
        OP,
        path = request.path.as_str(),
        opcode = request.opcode.as_str(),
        payload_len = request.payload.len() as u64,
        request_id = request.ctx.request_id.as_str()
    );
    let start = std::time::Instant::now();

    let result = process_impl(request, tree, config, codec).map_err(|e| {
        let err = with_request_context(ExError::from(e), request);
        log_op_error!(
            OP,
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = request.ctx.request_id.as_str()
        );
        err
    })?;

    log_op_end!(
        OP,
        duration_ms = start.elapsed().as_millis() as u64,
        anchor = result.anchor.as_str(),
        removed = result.removed,
        request_id = request.ctx.request_id.as_str()
    );

    Ok(result)
}

fn process_impl(
    request: &Request,
    tree: &mut DataTree,
    config: &EngineConfig,
    codec: &dyn PayloadCodec,
) -> Result<Response, BindError> {
    let binding = bind_with(
        tree,
        &request.path,
        request.opcode,
        &request.payload,
        codec,
        &config.bind_options(),
    )?;

    let mut body = None;
    let mut removed = false;
    match request.opcode {
        Opcode::Get => {
            body = Some(render_scoped_with(
                tree,
                &request.path,
                config.render.module_qualify,
            )?);
        }
        Opcode::Delete => removed = tree.remove(&binding.target)?,
        Opcode::Create | Opcode::Replace | Opcode::Update => {}
    }

    Ok(Response {
        opcode: binding.opcode,
        path: binding.target.path().to_string(),
        anchor: binding.anchor.to_string(),
        body,
        removed,
    })
}

fn with_request_context(err: ExError, request: &Request) -> ExError {
    let err = err
        .with_op(OP)
        .with_opcode(request.opcode.as_str())
        .with_path(request.path.clone())
        .with_request_id(request.ctx.request_id.clone());
    match &request.ctx.trace_id {
        Some(trace_id) => err.with_trace_id(trace_id.clone()),
        None => err,
    }
}

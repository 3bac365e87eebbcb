use yangbind_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using BindError
pub type Result<T> = std::result::Result<T, BindError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure raised while binding or rendering a request is classified
/// into exactly one of these kinds. Each kind maps to a stable error code
/// that callers (and tests) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Empty path, or empty payload for an opcode that decodes one
    EmptyInput,
    /// Path does not parse against the schema (unknown node, bad key set)
    InvalidPath,
    /// Well-formed path addresses a location with no data
    NotFound,
    /// Structural or cross-reference constraint violation
    ValidationFailed,
    /// Opcode is not one of GET/CREATE/REPLACE/UPDATE/DELETE
    UnsupportedOperation,
    /// Schema registration is inconsistent with the data it describes
    InternalSchema,
    /// Payload rejected by the codec (unknown field, bad value, bad JSON)
    InvalidPayload,
    /// Emission or JSON handling failed
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::EmptyInput => "ERR_EMPTY_INPUT",
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::ValidationFailed => "ERR_VALIDATION_FAILED",
            ExErrorKind::UnsupportedOperation => "ERR_UNSUPPORTED_OPERATION",
            ExErrorKind::InternalSchema => "ERR_INTERNAL_SCHEMA",
            ExErrorKind::InvalidPayload => "ERR_INVALID_PAYLOAD",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the request context (operation, path,
/// opcode, correlation ids) needed to reproduce the failure.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    opcode: Option<String>,
    field: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            opcode: None,
            field: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the literal request path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add the opcode the request was bound with
    pub fn with_opcode(mut self, opcode: impl Into<String>) -> Self {
        self.opcode = Some(opcode.into());
        self
    }

    /// Add the offending field, segment or key name
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn opcode(&self) -> Option<&str> {
        self.opcode.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(opcode) = &self.opcode {
            write!(f, " (opcode: {})", opcode)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for binding, codec, validation and rendering
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    // ===== Input =====
    /// Request path was empty
    #[error("Path is empty")]
    EmptyPath,

    /// An opcode that decodes a payload was given none
    #[error("Payload is empty for {opcode} at {path}")]
    EmptyPayload { path: String, opcode: String },

    // ===== Path resolution =====
    /// Path could not be resolved against the schema
    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// A path segment names no schema node under its parent
    #[error("Unknown node '{segment}' in path {path}")]
    UnknownNode { path: String, segment: String },

    /// A predicate names a key the list does not declare
    #[error("Unknown key '{key}' for list '{list}' in path {path}")]
    UnknownKey {
        path: String,
        list: String,
        key: String,
    },

    /// A list reference does not pin a single entry where one is required
    #[error("Missing keys for list '{list}' in path {path}")]
    MissingKeys { path: String, list: String },

    /// No data exists at the requested location
    #[error("No data found at {path}")]
    NotFound { path: String },

    // ===== Validation =====
    /// Generic structural constraint violation
    #[error("Validation failed at {path}: {reason}")]
    ValidationFailed { path: String, reason: String },

    /// List entry key leaf disagrees with the key the entry is stored under
    #[error("Key '{key}' at {path} holds '{found}' but entry is keyed by '{expected}'")]
    KeyMismatch {
        path: String,
        key: String,
        expected: String,
        found: String,
    },

    /// Leafref value matches none of the referenced nodes
    #[error("Leafref at {path} with value '{value}' matches no node at {target}")]
    LeafrefViolation {
        path: String,
        value: String,
        target: String,
    },

    // ===== Operation =====
    #[error("Unsupported operation: {opcode}")]
    UnsupportedOperation { opcode: String },

    // ===== Codec =====
    /// Payload names a field the node's schema does not have
    #[error("Unknown field '{field}' in '{node}'")]
    UnknownField { node: String, field: String },

    /// Payload value does not conform to the leaf's type
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Payload is not well-formed for the target node
    #[error("Malformed payload: {reason}")]
    MalformedPayload { reason: String },

    // ===== Internal =====
    /// Schema registration is inconsistent
    #[error("Schema error: {message}")]
    InternalSchema { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl BindError {
    /// Classify this error into the canonical taxonomy
    pub fn kind(&self) -> ExErrorKind {
        match self {
            BindError::EmptyPath | BindError::EmptyPayload { .. } => ExErrorKind::EmptyInput,
            BindError::InvalidPath { .. }
            | BindError::UnknownNode { .. }
            | BindError::UnknownKey { .. }
            | BindError::MissingKeys { .. } => ExErrorKind::InvalidPath,
            BindError::NotFound { .. } => ExErrorKind::NotFound,
            BindError::ValidationFailed { .. }
            | BindError::KeyMismatch { .. }
            | BindError::LeafrefViolation { .. } => ExErrorKind::ValidationFailed,
            BindError::UnsupportedOperation { .. } => ExErrorKind::UnsupportedOperation,
            BindError::UnknownField { .. }
            | BindError::InvalidValue { .. }
            | BindError::MalformedPayload { .. } => ExErrorKind::InvalidPayload,
            BindError::InternalSchema { .. } => ExErrorKind::InternalSchema,
            BindError::Serialization { .. } => ExErrorKind::Serialization,
        }
    }
}

/// Conversion from BindError to ExError
///
/// Path-carrying variants populate `path`; field-carrying variants populate
/// `field`. The rendered BindError message becomes the ExError message.
impl From<BindError> for ExError {
    fn from(err: BindError) -> Self {
        let message = err.to_string();
        let base = ExError::new(err.kind()).with_message(message);
        match err {
            BindError::EmptyPayload { path, opcode } => base.with_path(path).with_opcode(opcode),
            BindError::InvalidPath { path, .. }
            | BindError::NotFound { path }
            | BindError::ValidationFailed { path, .. } => base.with_path(path),
            BindError::UnknownNode { path, segment } => base.with_path(path).with_field(segment),
            BindError::UnknownKey { path, key, .. } => base.with_path(path).with_field(key),
            BindError::MissingKeys { path, list } => base.with_path(path).with_field(list),
            BindError::KeyMismatch { path, key, .. } => base.with_path(path).with_field(key),
            BindError::LeafrefViolation { path, .. } => base.with_path(path),
            BindError::UnsupportedOperation { opcode } => base.with_opcode(opcode),
            BindError::UnknownField { field, .. } | BindError::InvalidValue { field, .. } => {
                base.with_field(field)
            }
            BindError::EmptyPath
            | BindError::MalformedPayload { .. }
            | BindError::InternalSchema { .. }
            | BindError::Serialization { .. } => base,
        }
    }
}

/// Conversion from serde_json::Error to BindError
impl From<serde_json::Error> for BindError {
    fn from(err: serde_json::Error) -> Self {
        BindError::Serialization {
            message: err.to_string(),
        }
    }
}

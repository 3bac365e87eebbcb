//! yangbind core - schema-driven binding of resource paths to data trees
//!
//! This crate provides:
//! - Path parsing into navigation segments and dispatch templates
//! - Schema trees with module ownership, keyed lists and typed leaves
//! - Data trees with path resolution, allocation, validation and removal
//! - The binder applying GET/CREATE/REPLACE/UPDATE/DELETE at a path
//! - Scoped JSON rendering of a node inside its parent
//! - The shared error and logging facilities
//!
//! ```
//! use std::sync::Arc;
//! use yangbind_core::{bind, models, render_scoped, DataTree, Opcode};
//!
//! let schema = Arc::new(models::builtin_schema().unwrap());
//! let mut tree = DataTree::new(schema);
//! bind(
//!     &mut tree,
//!     "/openconfig-system:system/config",
//!     Opcode::Update,
//!     br#"{"hostname": "r1"}"#,
//! )
//! .unwrap();
//! let body = render_scoped(&tree, "/system/config/hostname").unwrap();
//! assert_eq!(body, br#"{"hostname":"r1"}"#);
//! ```

pub mod binder;
pub mod codec;
pub mod emit;
pub mod errors;
pub mod introspect;
pub mod logging_facility;
pub mod models;
pub mod opcode;
pub mod path;
pub mod schema;
pub mod scoper;
pub mod tree;

pub use yangbind_core_types as core_types;

// Re-export commonly used types
pub use binder::{bind, bind_with, BindOptions, Binding};
pub use codec::{JsonCodec, PayloadCodec};
pub use emit::{emit_container, emit_tree, EmitOptions};
pub use errors::{BindError, ExError, ExErrorKind, Result};
pub use introspect::NodeShape;
pub use opcode::Opcode;
pub use path::{parse, template, ParsedPath, Path, PathTemplate, VarMap};
pub use schema::{LeafType, NodeKind, Schema, SchemaNode};
pub use scoper::{render_scoped, render_scoped_with};
pub use tree::{DataNode, DataTree, LeafValue, NodeRef, ValidateOptions};

use crate::schema::{LeafType, SchemaNode};

pub const SYSTEM_MODULE: &str = "openconfig-system";

/// `openconfig-system:system`
pub fn openconfig_system() -> SchemaNode {
    SchemaNode::container("system")
        .in_module(SYSTEM_MODULE)
        .with_children([
            SchemaNode::container("config").with_children([
                SchemaNode::leaf("hostname", LeafType::String),
                SchemaNode::leaf("domain-name", LeafType::String),
                SchemaNode::leaf("login-banner", LeafType::String),
            ]),
            SchemaNode::container("dns").with_children([
                SchemaNode::container("config")
                    .with_child(SchemaNode::leaf_list("search", LeafType::String)),
                SchemaNode::container("servers").with_child(
                    SchemaNode::list("server", &["address"]).with_children([
                        SchemaNode::leaf("address", LeafType::leafref("../config/address")),
                        SchemaNode::container("config").with_children([
                            SchemaNode::leaf("address", LeafType::String),
                            SchemaNode::leaf("port", LeafType::uint16()),
                        ]),
                    ]),
                ),
            ]),
            SchemaNode::container("ntp").with_child(
                SchemaNode::container("config")
                    .with_child(SchemaNode::leaf("enabled", LeafType::Boolean)),
            ),
        ])
}

use crate::schema::{LeafType, SchemaNode};

pub const ACL_MODULE: &str = "openconfig-acl";

const ACL_TYPES: &[&str] = &["ACL_IPV4", "ACL_IPV6", "ACL_L2", "ACL_MIXED"];

fn acl_type() -> LeafType {
    LeafType::enumeration(ACL_TYPES)
}

fn config(children: impl IntoIterator<Item = SchemaNode>) -> SchemaNode {
    SchemaNode::container("config").with_children(children)
}

fn acl_entry() -> SchemaNode {
    SchemaNode::list("acl-entry", &["sequence-id"]).with_children([
        SchemaNode::leaf("sequence-id", LeafType::leafref("../config/sequence-id")),
        config([
            SchemaNode::leaf("sequence-id", LeafType::uint32()),
            SchemaNode::leaf("description", LeafType::String),
        ]),
        SchemaNode::container("ipv4").with_child(config([
            SchemaNode::leaf("source-address", LeafType::String),
            SchemaNode::leaf("destination-address", LeafType::String),
            SchemaNode::leaf("protocol", LeafType::uint8()),
        ])),
        SchemaNode::container("transport").with_child(config([
            SchemaNode::leaf("source-port", LeafType::uint16()),
            SchemaNode::leaf("destination-port", LeafType::uint16()),
        ])),
        SchemaNode::container("actions").with_child(config([
            SchemaNode::leaf(
                "forwarding-action",
                LeafType::enumeration(&["ACCEPT", "DROP", "REJECT"]),
            ),
            SchemaNode::leaf("log-action", LeafType::enumeration(&["LOG_SYSLOG", "LOG_NONE"])),
        ])),
    ])
}

fn acl_set() -> SchemaNode {
    SchemaNode::list("acl-set", &["name", "type"]).with_children([
        SchemaNode::leaf("name", LeafType::leafref("../config/name")),
        SchemaNode::leaf("type", LeafType::leafref("../config/type")),
        config([
            SchemaNode::leaf("name", LeafType::String),
            SchemaNode::leaf("type", acl_type()),
            SchemaNode::leaf("description", LeafType::String),
        ]),
        SchemaNode::container("acl-entries").with_child(acl_entry()),
    ])
}

/// Binding of one ACL set to an interface, ingress or egress
fn interface_acl_set(container: &str, list: &str) -> SchemaNode {
    SchemaNode::container(container).with_child(
        SchemaNode::list(list, &["set-name", "type"]).with_children([
            SchemaNode::leaf("set-name", LeafType::leafref("../config/set-name")),
            SchemaNode::leaf("type", LeafType::leafref("../config/type")),
            config([
                SchemaNode::leaf(
                    "set-name",
                    LeafType::leafref("/oc-acl:acl/oc-acl:acl-sets/oc-acl:acl-set/oc-acl:config/oc-acl:name"),
                ),
                SchemaNode::leaf("type", acl_type()),
            ]),
        ]),
    )
}

fn interface() -> SchemaNode {
    SchemaNode::list("interface", &["id"]).with_children([
        SchemaNode::leaf("id", LeafType::leafref("../config/id")),
        config([SchemaNode::leaf("id", LeafType::String)]),
        interface_acl_set("ingress-acl-sets", "ingress-acl-set"),
        interface_acl_set("egress-acl-sets", "egress-acl-set"),
    ])
}

/// `openconfig-acl:acl`
pub fn openconfig_acl() -> SchemaNode {
    SchemaNode::container("acl").in_module(ACL_MODULE).with_children([
        SchemaNode::container("acl-sets").with_child(acl_set()),
        SchemaNode::container("interfaces").with_child(interface()),
    ])
}

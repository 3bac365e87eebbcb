//! Template command
//!
//! Usage: yangbind template <PATH>

use clap::Args;

#[derive(Debug, Args)]
pub struct TemplateArgs {
    /// Resource path, e.g. /acl/acl-sets/acl-set[name=A][type=ACL_IPV4]
    pub path: String,
}

/// Print the template on the first line, then one `key=value` per variable
pub fn execute(args: TemplateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = yangbind_core::template(&args.path);
    println!("{}", parsed.template);
    for (key, value) in &parsed.vars {
        println!("{}={}", key, value);
    }
    Ok(())
}

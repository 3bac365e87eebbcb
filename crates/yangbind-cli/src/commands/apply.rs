//! Apply command
//!
//! Usage: yangbind apply <OPCODE> <PATH> --data <FILE> [--payload <JSON>]
//!        [--payload-file <FILE>] [--config <FILE>] [--dry-run]
//!
//! The data file is loaded (a missing file is an empty tree), the request is
//! processed, and for mutating opcodes the tree is written back.

use std::path::PathBuf;

use clap::Args;
use yangbind_core::logging_facility;
use yangbind_core::Opcode;
use yangbind_engine::registry::new_tree;
use yangbind_engine::{dump_document, load_document, process, EngineConfig, Request};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// GET, CREATE, REPLACE, UPDATE or DELETE
    pub opcode: Opcode,

    /// Resource path to bind
    pub path: String,

    /// JSON data file holding the tree
    #[arg(short, long)]
    pub data: PathBuf,

    /// Inline JSON payload
    #[arg(short, long, conflicts_with = "payload_file")]
    pub payload: Option<String>,

    /// Read the payload from a file
    #[arg(long)]
    pub payload_file: Option<PathBuf>,

    /// Engine config (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Process the request but leave the data file unchanged
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute apply command
pub fn execute(args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    logging_facility::init(config.logging.profile);

    // Schema registration failure aborts before any request is read
    let mut tree = new_tree()?;
    if args.data.exists() {
        let document = std::fs::read(&args.data)?;
        if !document.iter().all(u8::is_ascii_whitespace) {
            load_document(&mut tree, &document, &config)?;
        }
    }

    let payload = match (&args.payload, &args.payload_file) {
        (Some(inline), _) => inline.clone().into_bytes(),
        (None, Some(file)) => std::fs::read(file)?,
        (None, None) => Vec::new(),
    };

    let request = Request::new(args.opcode, args.path).with_payload(payload);
    let response = process(&request, &mut tree, &config)?;

    if let Some(body) = response.body_str() {
        println!("{}", body);
    }
    if !args.opcode.is_read_only() && !args.dry_run {
        std::fs::write(&args.data, dump_document(&tree, &config)?)?;
        if args.opcode == Opcode::Delete && !response.removed {
            eprintln!("Nothing removed at {}", response.path);
        }
    }

    Ok(())
}

//! yangbind CLI
//!
//! Command-line front end for binding requests against a JSON data file

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "yangbind")]
#[command(about = "yangbind - Bind path requests against OpenConfig data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply a GET/CREATE/REPLACE/UPDATE/DELETE request to a data file
    Apply(commands::apply::ApplyArgs),
    /// Print the dispatch template and predicate variables of a path
    Template(commands::template::TemplateArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Apply(args) => commands::apply::execute(args),
        Commands::Template(args) => commands::template::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "supermd")]
#[command(author, version)]
#[command(about = "A directive compiler for SuperMD documents")]
#[command(
    long_about = "SuperMD extends CommonMark/GFM with typed rendering directives written as \
    links whose destination starts with '$', like [Title]($heading.id('title')). The supermd \
    CLI compiles .smd documents, evaluates every directive expression, validates where each \
    directive sits in the document tree, and reports diagnostics."
)]
#[command(after_help = "\
EXAMPLES:

    # Check a document for directive errors
    supermd check page.smd

    # Check from stdin
    cat page.smd | supermd check

    # Inspect the annotated AST
    supermd parse page.smd

    # Use custom config
    supermd check --config custom.toml page.smd

CONFIGURATION:

Supermd looks for configuration files in this order:
  1. Explicit --config path
  2. supermd.toml or .supermd.toml in current/parent directories
  3. ~/.config/supermd/config.toml (XDG)
  4. Built-in defaults

Example .supermd.toml:

    [extensions]
    footnotes = false
    front-matter = true")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    #[arg(help = "Path to configuration file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a SuperMD document and report directive errors
    Check {
        /// Input file (stdin if not provided)
        file: Option<PathBuf>,
    },
    /// Parse a document and display the annotated AST for debugging
    Parse {
        /// Input file (stdin if not provided)
        file: Option<PathBuf>,
    },
}

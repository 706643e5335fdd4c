//! CLI commands and argument parsing

use crate::types::Collection;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Point-of-sale data extractor CLI
#[derive(Parser, Debug)]
#[command(name = "pos-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML); credentials may come from the environment instead
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate and report the token expiry
    Check,

    /// List supported collections
    Collections,

    /// Extract a collection as JSON lines
    Extract {
        /// Collection to extract (sales, products, categories, users,
        /// payment-methods, customers, expenses)
        #[arg(long)]
        collection: Collection,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<u32>,

        /// Records per page (overrides the config file)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page_size: Option<u32>,

        /// Relationships to side-load (overrides the collection default)
        #[arg(long)]
        include: Option<String>,
    },
}

//! Command-line interface for hs-classifier.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **classify**: Classify a product description and optionally estimate duty
//! - **session**: Classify descriptions interactively, one per line
//! - **catalog**: List, show, or export entries from the catalog
//! - **serve**: Start the web interface
//!
//! ## Usage
//!
//! ```text
//! # Classify a shipment description
//! hs-classifier classify "Shipping solar panels from Vietnam to US"
//!
//! # Estimate duty on a $2,500 invoice, JSON output for scripting
//! hs-classifier classify "leather handbags" --invoice-value 2500 --format json
//!
//! # Ask a remote service first (credential from HS_CLASSIFIER_API_KEY)
//! hs-classifier classify "red wine" --remote-url https://classifier.example/api/classify --country FR
//!
//! # Interactive session
//! hs-classifier session
//!
//! # Start web UI
//! hs-classifier serve --port 8080 --open
//! ```

use clap::{Parser, Subcommand};

use crate::config::ClassifierArgs;

pub mod catalog;
pub mod classify;
pub mod report;
pub mod session;

#[derive(Parser)]
#[command(name = "hs-classifier")]
#[command(version)]
#[command(about = "Classify shipment descriptions to tariff codes and estimate duty")]
#[command(
    long_about = "hs-classifier matches a free-text shipment description against a catalog of known products.\n\nFor each description it reports:\n- The best-matching tariff classification code and its description\n- The duty rate and a duty estimate for a given invoice value\n- \"No match\" when nothing is similar enough, rather than a weak guess"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a product description
    Classify(classify::ClassifyArgs),

    /// Classify descriptions read line by line from stdin
    Session(session::SessionArgs),

    /// Inspect the product catalog
    Catalog(catalog::CatalogArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    #[command(flatten)]
    pub classifier: ClassifierArgs,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

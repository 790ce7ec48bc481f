use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::logging::LogDestination;

/// OptiBot mini: ask questions about the OptiSigns knowledge base.
///
/// Type a question and press Enter. `/quit` or end of input leaves.
#[derive(Debug, Parser)]
#[command(name = "optibot", version)]
pub struct Cli {
    /// Configuration file (RON, or JSON with a `.json` extension).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Read articles from this directory instead of the configured source.
    #[arg(long)]
    pub articles_dir: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::File, global = true)]
    pub log: LogDestination,

    /// Without a subcommand the chat session starts.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download help center articles as Markdown files for the chat to load.
    Ingest(IngestArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct IngestArgs {
    /// Directory the `.md` and `.meta.json` files are written to.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Stop after this many articles.
    #[arg(long)]
    pub max_articles: Option<usize>,

    /// Stop after this many listing pages.
    #[arg(long)]
    pub max_pages: Option<u32>,
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "funding-finder",
    version,
    about = "Find grants and funds matching a project description"
)]
pub struct Cli {
    /// Matching service base URL (overrides config and BACKEND_URL)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Configuration file to load instead of config/default + config/local
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit one project description
    Find(FindArgs),
    /// Prompt for descriptions until an empty one is entered
    Interactive,
    /// Probe the backend's /test endpoint
    Check,
}

#[derive(Args, Debug, Clone)]
pub struct FindArgs {
    /// Free-text project description
    pub description: String,

    #[arg(long, default_value = "")]
    pub sector: String,

    #[arg(long, default_value = "")]
    pub region: String,

    /// Print the raw response payload as JSON instead of the rendered view
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

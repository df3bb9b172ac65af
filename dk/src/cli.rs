//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dorkkit - search dork templates and query composer
#[derive(Parser, Debug)]
#[command(
    name = "dk",
    author,
    version,
    about = "Resolve search dork templates for a subject and compose custom dorks",
    long_about = None,
    after_help = "Logs are written to stderr. Use --log-level or RUST_LOG for more detail."
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, help = "Log level (trace, debug, info, warn, error)")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List dork categories
    Categories {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Resolve the dorks of one or more categories for a subject
    Dorks {
        /// Category ids (see `dk categories`)
        #[arg(value_name = "CATEGORY", required_unless_present = "all")]
        categories: Vec<String>,

        /// Resolve every category
        #[arg(short, long, conflicts_with = "categories")]
        all: bool,

        /// Subject substituted into the templates (website, name, company...)
        #[arg(short, long)]
        subject: Option<String>,

        /// Only show dorks whose label, description or query contains this keyword
        #[arg(short, long)]
        filter: Option<String>,

        /// Print the search URL under each dork
        #[arg(short, long)]
        urls: bool,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Compose a custom dork from operator values
    Compose {
        /// site: value
        #[arg(long)]
        site: Option<String>,

        /// inurl: value
        #[arg(long)]
        inurl: Option<String>,

        /// intext: value (quoted)
        #[arg(long)]
        intext: Option<String>,

        /// intitle: value (quoted)
        #[arg(long)]
        intitle: Option<String>,

        /// filetype: value
        #[arg(long)]
        filetype: Option<String>,

        /// Print the search URL instead of the query
        #[arg(short, long)]
        url: bool,
    },

    /// Interactive shell
    Shell {
        /// Category to select on start
        #[arg(long)]
        category: Option<String>,

        /// Subject to set on start
        #[arg(short, long)]
        subject: Option<String>,
    },
}

/// Output format for listing commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

mod options;

use crate::query::ParseOptions;
use clap::{Parser, Subcommand};
pub use options::{ColorMode, OutputFormat};
use std::path::PathBuf;

/// Parse, check and normalize search filter queries
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML file with field definitions and parser limits
    #[arg(short, long, global = true, env = "SEARCH_FILTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'F', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the output to a file as well
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Colorize text output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Maximum depth of nested groups
    #[arg(long, global = true)]
    pub max_nesting_level: Option<usize>,

    /// Maximum number of values a single field may hold
    #[arg(long, global = true)]
    pub max_values_per_field: Option<usize>,

    /// Maximum number of subgroups within one group
    #[arg(long, global = true)]
    pub max_groups_per_level: Option<usize>,
}

impl Cli {
    /// Parser limits from the configuration, overridden by command line flags
    pub fn parse_options(&self, configured: ParseOptions) -> ParseOptions {
        ParseOptions {
            max_nesting_level: self
                .max_nesting_level
                .unwrap_or(configured.max_nesting_level),
            max_values_per_field: self
                .max_values_per_field
                .unwrap_or(configured.max_values_per_field),
            max_groups_per_level: self
                .max_groups_per_level
                .unwrap_or(configured.max_groups_per_level),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse and normalize a query, print the resulting condition and messages
    Parse {
        /// The query, e.g. 'id: 1-10; status: active'
        query: String,
    },
    /// Report problems in a query; exits with status 1 when there are errors
    Check {
        query: String,
    },
    /// Print the normalized query in query syntax
    Export {
        query: String,
    },
    /// List the configured fields
    Fields,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}

//! Defines the command-line arguments for the harness binary.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{
    DEFAULT_ENDPOINT, DEFAULT_EXTENSION, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, DEFAULT_VIEWER_BASE,
};

/// How the report is written to stdout.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// One coloured line per query plus a summary.
    #[default]
    Text,
    /// The report table as JSON.
    Json,
    /// The report table as JSON with URLs wrapped as `[url Run]` link labels.
    Publish,
}

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "sparql-tester",
    version,
    about = "Runs annotated SPARQL query definitions and reports validator outcomes."
)]
pub struct TesterArgs {
    /// Directory containing the query definitions.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// SPARQL endpoint queries are sent to.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// User-Agent header identifying the client.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// File whose contents replace the built-in namespace prefix block.
    #[arg(long, value_name = "FILE")]
    pub prefix_file: Option<PathBuf>,

    /// Base address of the interactive viewer used for deep links.
    #[arg(long, default_value = DEFAULT_VIEWER_BASE)]
    pub viewer_base: String,

    /// Extension of definition files.
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Stop at the first query that cannot be run.
    #[arg(long)]
    pub fail_fast: bool,

    /// Print query text and result message for every test.
    #[arg(long)]
    pub details: bool,

    /// Answer every query with a fixed sample result instead of contacting the endpoint.
    #[arg(long)]
    pub offline: bool,

    /// List the registered validators and exit.
    #[arg(long)]
    pub list_validators: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_current_directory_and_text() {
        let args = TesterArgs::parse_from(["sparql-tester"]);
        assert_eq!(args.dir, PathBuf::from("."));
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.endpoint, DEFAULT_ENDPOINT);
        assert!(!args.fail_fast);
    }

    #[test]
    fn parses_flags() {
        let args = TesterArgs::parse_from([
            "sparql-tester",
            "maintenance",
            "--format",
            "publish",
            "--fail-fast",
            "--timeout",
            "5",
        ]);
        assert_eq!(args.dir, PathBuf::from("maintenance"));
        assert_eq!(args.format, OutputFormat::Publish);
        assert!(args.fail_fast);
        assert_eq!(args.timeout, 5);
    }
}

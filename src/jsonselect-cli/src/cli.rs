//! Command-line interface for jsel
//!
//! Argument parsing with clap, plus the [`CliConfig`] flattened view of the
//! parsed arguments that the configuration layer consumes.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// jsel - select nodes from JSON documents with CSS-like selectors
#[derive(Parser, Debug)]
#[command(name = "jsel")]
#[command(author, version, about)]
#[command(
    long_about = "jsel - select nodes from JSON documents with CSS-like selectors\n\n\
    jsel runs a JSONSelect selector against each input document and prints every\n\
    matching node in document order."
)]
#[command(after_help = "EXAMPLES:\n  \
    # Every member named \"name\"\n  \
    jsel .name people.json\n\n  \
    # Names of people older than 30, read from stdin\n  \
    cat people.json | jsel 'object:has(.age:expr(x > 30)) > .name'\n\n  \
    # Second element of every array, as raw strings\n  \
    jsel -r ':nth-child(2)' data.json\n\n  \
    # Check a selector without running it\n  \
    jsel validate '.a ~ .b'")]
#[command(propagate_version = true)]
pub struct Cli {
    /// The selector to run
    #[arg(index = 1, value_name = "SELECTOR")]
    pub selector: Option<String>,

    /// Input file(s) to read (stdin if not specified)
    #[arg(index = 2, value_name = "FILE", num_args = 0..)]
    pub input_files: Vec<PathBuf>,

    /// Print only the first match
    #[arg(long)]
    pub first: bool,

    /// Print the number of matches instead of the matches
    #[arg(long, conflicts_with_all = ["text", "ast"])]
    pub count: bool,

    /// Print the distinct textual values of the matches
    #[arg(long, conflicts_with = "ast")]
    pub text: bool,

    /// Print the parsed selector as JSON and exit
    #[arg(long)]
    pub ast: bool,

    /// Use compact output (no pretty-printing)
    #[arg(short, long)]
    pub compact_output: bool,

    /// Output raw strings, not JSON texts
    #[arg(short, long)]
    pub raw_output: bool,

    /// Number of spaces for indentation (default: 2)
    #[arg(long, value_name = "N")]
    pub indent: Option<usize>,

    /// Exit with status 1 when nothing matched
    #[arg(short = 'e', long)]
    pub exit_status: bool,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file to use
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that a selector parses, without reading any input
    #[command(after_help = "EXAMPLES:\n  \
        jsel validate '.people > object:first-child'\n  \
        jsel validate ':expr(x > 1'")]
    Validate {
        /// Selector to check
        selector: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// What the main command prints for the matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Every match as JSON
    #[default]
    Values,
    /// The number of matches
    Count,
    /// The textual summary of the matches
    Text,
    /// The parsed selector
    Ast,
}

/// CLI configuration derived from parsed arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub selector: Option<String>,
    pub input_files: Vec<PathBuf>,
    pub mode: OutputMode,

    // Output options
    pub compact_output: bool,
    pub raw_output: bool,
    pub indent: Option<usize>,
    pub first_only: bool,
    pub exit_status: bool,

    // Debug options
    pub verbose: u8,

    // Other options
    pub config_file: Option<PathBuf>,
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        let mode = if cli.ast {
            OutputMode::Ast
        } else if cli.count {
            OutputMode::Count
        } else if cli.text {
            OutputMode::Text
        } else {
            OutputMode::Values
        };

        Self {
            selector: cli.selector.clone(),
            input_files: cli.input_files.clone(),
            mode,
            compact_output: cli.compact_output,
            raw_output: cli.raw_output,
            indent: cli.indent,
            first_only: cli.first,
            exit_status: cli.exit_status,
            verbose: cli.verbose,
            config_file: cli.config.clone(),
        }
    }
}

impl CliConfig {
    /// Check if we're reading from stdin
    pub fn is_stdin(&self) -> bool {
        self.input_files.is_empty()
    }
}

/// Parse command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Parse command-line arguments from a vector (for testing)
pub fn parse_args_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

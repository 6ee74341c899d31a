use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "chronicler",
    about = "Index a folder of markdown topics by date, tag and month"
)]
pub struct Cli {
    /// Override the XDG data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the tag registry
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },
    /// Manage stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Ingest every topic and report what was indexed
    Build(BuildArgs),
    /// List topics newest first
    List(ListArgs),
    /// Show the month archive
    Months(MonthsArgs),
    /// Print one topic
    Show(ShowArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Tag subcommands --

#[derive(Debug, Subcommand)]
pub enum TagAction {
    /// Register a tag (appended after existing tags)
    Add {
        /// Tag name, matched exactly against topic headers
        name: String,
    },
    /// Unregister a tag
    Remove {
        /// Tag name
        name: String,
    },
    /// List registered tags in registry order
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

// -- Config subcommands --

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Set the default folder topics are read from
    SetRoot {
        /// Path to the topic folder
        path: PathBuf,
    },
    /// Show the stored configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Where topics are read from.
#[derive(Debug, Clone, Parser)]
pub struct SourceArgs {
    /// Topic folder (defaults to the stored content root)
    #[arg(short, long)]
    pub root: Option<PathBuf>,
}

// -- Build --

#[derive(Debug, Parser)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- List --

#[derive(Debug, Parser)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only topics carrying this tag
    #[arg(short, long, conflicts_with = "month")]
    pub tag: Option<String>,

    /// Only topics from this month (YYYY-MM)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Leave out protected topics (tag and month lists never have them)
    #[arg(long, conflicts_with_all = ["tag", "month"])]
    pub public: bool,

    /// Maximum number of topics to print
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Months --

#[derive(Debug, Parser)]
pub struct MonthsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Show --

#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Topic identifier (the URL header field)
    pub id: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "chronicler",
            &mut std::io::stdout(),
        );
    }
}

//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Turn free-form study notes into a Course/Module/Unit cheatsheet tree
#[derive(Parser, Debug)]
#[command(name = "cheatsheets")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Project directory holding a local .cheatsheets.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Override the JSON data file
    #[arg(long, global = true, env = "CHEATSHEETS_DATA_FILE", value_hint = ValueHint::FilePath)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse notes and merge them into the store
    Add {
        /// Notes file (default: stdin)
        #[arg(value_hint = ValueHint::FilePath, conflicts_with = "edit")]
        file: Option<PathBuf>,
        /// Show the parsed structure without saving
        #[arg(long)]
        dry_run: bool,
        /// Compose the notes in the configured editor
        #[arg(short, long)]
        edit: bool,
    },

    /// Print cheatsheets from the start of a course through a unit
    Collect {
        course: String,
        module: String,
        unit: String,
        /// Only the selected unit
        #[arg(short, long, conflicts_with = "formatted")]
        single: bool,
        /// Prefix each cheatsheet with a [module - unit] header
        #[arg(short, long)]
        formatted: bool,
    },

    /// List the units from the start of a course through a unit
    Units {
        course: String,
        module: String,
        unit: String,
    },

    /// Show stored courses, or the modules/units one level down
    List {
        course: Option<String>,
        module: Option<String>,
    },

    /// Merge a JSON export into the store
    Import {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Write the store as JSON (default: stdout)
    Export {
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Remove all stored courses
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the accepted input formats
    Example,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },
}

//! CLI definitions for SearchWith.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SearchWith CLI.
#[derive(Parser)]
#[command(name = "searchwith")]
#[command(about = "Context-menu \"search with\" shortcuts")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.searchwith/config.toml)
    #[arg(short, long, global = true, env = "SEARCHWITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Settings document, overriding `[storage] path`
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List the field sets
    List {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Append a search link
    Add {
        /// Menu title
        name: String,

        /// URL template; `%s` is replaced with the selection
        url: String,
    },

    /// Append a separator
    AddSeparator,

    /// Remove the entry at a position
    Remove {
        /// Zero-based position
        index: usize,
    },

    /// Move an entry to another position
    Move {
        from: usize,
        to: usize,
    },

    /// Sort the field sets alphabetically (separators first)
    Sort,

    /// Replace the field sets with the built-in defaults
    LoadDefaults,

    /// Export all settings as JSON
    Export {
        /// Output file (default: stdout)
        file: Option<PathBuf>,
    },

    /// Import field sets from an exported JSON file
    Import {
        /// Exported settings file
        file: PathBuf,
    },

    /// Validate the configuration
    Check,

    /// Build the context menu and print it
    Menu,

    /// Resolve a menu click and print the URL it opens
    Click {
        /// Menu item id (position in the menu)
        id: String,

        /// Selected text
        #[arg(long)]
        selection: Option<String>,

        /// Image or media source URL; wins over the selection
        #[arg(long)]
        src: Option<String>,
    },

    /// Handle host events, one JSON object per stdin line
    Run,
}

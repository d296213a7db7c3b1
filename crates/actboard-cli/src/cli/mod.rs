//! CLI command definitions and handlers.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;

/// Group activity boards backed by SQLite
#[derive(Parser, Debug)]
#[command(name = "actboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON on stderr (filter with $ACTBOARD_LOG)
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Database file (default: $ACTBOARD_DB or ./actboard.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Current user (default: $ACTBOARD_USER or $USER)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Current group (default: $ACTBOARD_GROUP)
    #[arg(long, global = true)]
    pub group: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the membership table in the database
    Init,

    /// Manage groups
    #[command(subcommand)]
    Group(GroupCommands),

    /// Add an activity to a group
    Post {
        /// Group name
        group: String,

        /// Activity payload
        data: String,

        /// Contributor (default: current user)
        #[arg(long)]
        added_by: Option<String>,

        /// Value column
        #[arg(long, default_value = "")]
        value: String,

        /// Free-text description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Show activities from every group the current user belongs to
    Activities,

    /// Read `user <id>` / `group <id>` lines from stdin and reprint views as they change
    Watch,
}

// ============================================================================
// Group subcommands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Create a group's activity table
    Create {
        /// Group name (ASCII letters, digits, '_')
        name: String,
    },

    /// Relate one or two users through a group
    Join {
        /// Group name
        group: String,

        /// User joining the group
        user: String,

        /// Second user of the relation (default: same as USER)
        other: Option<String>,
    },

    /// Show the current group's activity table
    Show,
}

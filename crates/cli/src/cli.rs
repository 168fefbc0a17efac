//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tubearchive_core::{RedownloadTarget, ResourceKind};

#[derive(Debug, Parser)]
#[command(name = "tubearchive")]
#[command(version)]
#[command(about = "Mirror a Tube Archivist catalog into a local SQLite cache")]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Settings file (default: ./tubearchive.toml when present)
    #[arg(long, global = true, env = "TUBEARCHIVE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cache database file, overriding `[database] path`
    #[arg(long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the Tube Archivist URL and API token
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Copy the remote catalog into the local cache
    Sync {
        #[command(subcommand)]
        target: SyncTarget,
    },
    /// Show statistics about the cached catalog
    Stats {
        #[command(subcommand)]
        view: StatsView,
    },
    /// Search the cached catalog
    Search {
        #[command(subcommand)]
        scope: SearchScope,
    },
    /// Queue cached videos for a forced redownload
    Redownload {
        /// Skip the confirmation prompt
        #[arg(short, long, global = true)]
        yes: bool,

        #[command(subcommand)]
        target: RedownloadCommand,
    },
    /// Show available commands
    Help {
        /// Command to describe
        command: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Store the URL and API token, prompting for missing values
    Set {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        token: Option<String>,
    },
    /// Show the stored configuration
    Get,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum SyncTarget {
    /// Sync all videos
    Video,
    /// Sync all playlists
    Playlist,
    /// Sync all channels
    Channel,
    /// Sync videos, playlists and channels
    All,
}

impl SyncTarget {
    /// The single kind to sync, or `None` for all of them.
    pub fn kind(self) -> Option<ResourceKind> {
        match self {
            SyncTarget::Video => Some(ResourceKind::Video),
            SyncTarget::Playlist => Some(ResourceKind::Playlist),
            SyncTarget::Channel => Some(ResourceKind::Channel),
            SyncTarget::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum StatsView {
    /// Counts for every table plus database and configuration status
    Overview,
    /// Video statistics
    Videos,
    /// Channel statistics
    Channels,
    /// Playlist statistics
    Playlists,
    /// Database file and table sizes
    Database,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SearchScope {
    /// Search video titles, descriptions and tags
    Videos {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Search channel names and descriptions
    Channels {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Search playlist names and descriptions
    Playlists {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Search everything, showing the top matches of each kind
    All {
        #[arg(required = true)]
        query: Vec<String>,
    },
}

impl SearchScope {
    /// The query words joined back into one string.
    pub fn query(&self) -> String {
        match self {
            SearchScope::Videos { query }
            | SearchScope::Channels { query }
            | SearchScope::Playlists { query }
            | SearchScope::All { query } => query.join(" "),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum RedownloadCommand {
    /// Redownload videos having a stream of this height, e.g. 360
    Resolution { height: u32 },
    /// Redownload inactive videos and videos without a media file
    Failed,
}

impl From<RedownloadCommand> for RedownloadTarget {
    fn from(command: RedownloadCommand) -> Self {
        match command {
            RedownloadCommand::Resolution { height } => RedownloadTarget::Resolution(height),
            RedownloadCommand::Failed => RedownloadTarget::Failed,
        }
    }
}

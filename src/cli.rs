use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Save, classify and share links from the command line
#[derive(Parser)]
#[command(name = "second-brain")]
#[command(
    about = "A personal bookmarking tool that auto-categorizes saved links",
    long_about = None
)]
pub struct Cli {
    /// Config file (defaults to second-brain.toml in the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Database URL, overriding config and environment
    #[arg(long, global = true, value_name = "URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a URL without saving it
    Classify {
        url: String,
    },
    /// List every known content type and category
    Types,
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Save a link
    Add {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        link: String,
        #[arg(short, long)]
        title: String,
        /// Override the detected content type
        #[arg(long = "type", value_name = "TYPE")]
        content_type: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        thumbnail: Option<String>,
    },
    /// List saved links, newest first
    List {
        #[arg(short, long)]
        user: String,
        #[arg(long = "type", value_name = "TYPE")]
        content_type: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Show one saved link
    Show {
        #[arg(short, long)]
        user: String,
        id: String,
    },
    /// Delete a saved link
    Delete {
        #[arg(short, long)]
        user: String,
        id: String,
    },
    /// Count saved links per category
    Categories {
        #[arg(short, long)]
        user: String,
    },
    /// Publish or withdraw the read-only share link
    Share {
        #[arg(short, long)]
        user: String,
        state: ShareState,
    },
    /// Print the collection behind a share hash
    Shared {
        hash: String,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Add { username: String },
    /// Look up a user by name
    Show { username: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShareState {
    On,
    Off,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_type_override() {
        let cli = Cli::try_parse_from([
            "second-brain", "add", "--user", "ada", "--link", "github.com/rust-lang/rust",
            "--title", "Rust", "--type", "article",
        ])
        .unwrap();
        match cli.command {
            Commands::Add { user, link, content_type, .. } => {
                assert_eq!(user, "ada");
                assert_eq!(link, "github.com/rust-lang/rust");
                assert_eq!(content_type.as_deref(), Some("article"));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn parses_share_state_and_global_flags() {
        let cli = Cli::try_parse_from([
            "second-brain",
            "share",
            "-u",
            "ada",
            "off",
            "--database-url",
            "sqlite::memory:",
        ])
        .unwrap();
        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
        assert!(matches!(cli.command, Commands::Share { state: ShareState::Off, .. }));
    }
}

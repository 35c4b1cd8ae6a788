mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ShareState, UserCommands};
use second_brain::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = BrainConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.database_url.clone() {
        cfg.database_url = Some(url);
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match cli.command {
        Commands::Classify { url } => {
            let normalized = normalize_url(&url);
            let result = categorize_link(&normalized);
            let embed = platform_rule(&result.domain).is_some_and(|r| r.embed_support);
            print_json(&json!({
                "input": url,
                "normalizedUrl": normalized,
                "isValid": is_valid_url(&normalized),
                "type": result.content_type,
                "category": result.category,
                "domain": result.domain,
                "embedSupport": embed,
            }))
        }
        Commands::Types => print_json(&json!({
            "types": CONTENT_TYPES,
            "categories": Category::ALL,
        })),
        Commands::User { command: UserCommands::Add { username } } => {
            let brain = SecondBrain::open(&cfg).await?;
            print_json(&brain.register_user(&username).await?)
        }
        Commands::User { command: UserCommands::Show { username } } => {
            let brain = SecondBrain::open(&cfg).await?;
            print_json(&require_user(&brain, &username).await?)
        }
        Commands::Add { user, link, title, content_type, description, thumbnail } => {
            let brain = SecondBrain::open(&cfg).await?;
            let owner = require_user(&brain, &user).await?;
            let new = NewContent { link, title, content_type, description, thumbnail };
            print_json(&brain.add_content(&owner.id, new).await?)
        }
        Commands::List { user, content_type, category, limit, offset } => {
            let brain = SecondBrain::open(&cfg).await?;
            let owner = require_user(&brain, &user).await?;
            let filter = ContentFilter { content_type, category, limit, offset };
            print_json(&brain.list_content(&owner.id, &filter).await?)
        }
        Commands::Show { user, id } => {
            let brain = SecondBrain::open(&cfg).await?;
            let owner = require_user(&brain, &user).await?;
            let record = brain
                .get_content(&owner.id, &id)
                .await?
                .ok_or_else(|| BrainError::ContentNotFound(id.clone()))?;
            print_json(&record)
        }
        Commands::Delete { user, id } => {
            let brain = SecondBrain::open(&cfg).await?;
            let owner = require_user(&brain, &user).await?;
            brain.delete_content(&owner.id, &id).await?;
            print_json(&json!({ "deleted": id }))
        }
        Commands::Categories { user } => {
            let brain = SecondBrain::open(&cfg).await?;
            let owner = require_user(&brain, &user).await?;
            print_json(&brain.category_counts(&owner.id).await?)
        }
        Commands::Share { user, state } => {
            let brain = SecondBrain::open(&cfg).await?;
            let owner = require_user(&brain, &user).await?;
            print_json(&brain.set_sharing(&owner.id, state == ShareState::On).await?)
        }
        Commands::Shared { hash } => {
            let brain = SecondBrain::open(&cfg).await?;
            let shared = brain
                .shared_brain(&hash)
                .await?
                .with_context(|| format!("invalid share link: {hash}"))?;
            print_json(&shared)
        }
    }
}

async fn require_user(brain: &SecondBrain, username: &str) -> Result<User> {
    brain
        .find_user(username)
        .await?
        .ok_or_else(|| BrainError::UserNotFound(username.to_string()).into())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

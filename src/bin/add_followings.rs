//! Seed the archive's user table from a profile's follow graph: resolve a
//! public profile URL, crawl the users it follows, and add each unseen one.

use clap::Parser;
use scarchive::{Client, Config, Database};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "add-followings",
    about = "Add the users a profile follows to the archive"
)]
struct Args {
    /// Path to the archive database
    #[arg(long, env = "SC_ARCHIVE_DB", default_value = "archive.db")]
    db: PathBuf,

    /// SoundCloud API client id
    #[arg(long, env = "SC_CLIENT_ID")]
    client_id: String,

    /// Profile URL to crawl, e.g. https://soundcloud.com/username
    profile_url: String,
}

#[tokio::main]
async fn main() -> scarchive::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Config {
        db_path: args.db.clone(),
        client_id: args.client_id,
        ..Default::default()
    };
    config.validate()?;

    let db = Database::new(&config.db_path).await?;
    let client = Client::new(&config)?;

    let seed = client.resolve_user(&args.profile_url).await?;
    tracing::info!(username = %seed.username, user_id = %seed.id, "crawling followings");

    let mut followings = client.user_followings(seed.id);
    while let Some(user) = followings.next().await {
        if db.find_user(user.id).await?.is_none() {
            db.add_user(&user).await?;
            tracing::info!(username = %user.username, user_id = %user.id, "added user");
        } else {
            tracing::debug!(username = %user.username, user_id = %user.id, "user exists");
        }
    }

    db.close().await;
    Ok(())
}

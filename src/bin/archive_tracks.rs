//! Incremental archive run: for every user already in the archive, discover
//! tracks newer than the archived frontier and download them.

use clap::Parser;
use scarchive::{Archiver, Client, Config, Database};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "archive-tracks", about = "Archive new tracks for every known user")]
struct Args {
    /// Path to the archive database
    #[arg(long, env = "SC_ARCHIVE_DB", default_value = "archive.db")]
    db: PathBuf,

    /// Base directory for downloaded track files
    #[arg(long, env = "SC_ARCHIVE_DIR", default_value = "data")]
    archive_dir: PathBuf,

    /// SoundCloud API client id
    #[arg(long, env = "SC_CLIENT_ID")]
    client_id: String,
}

#[tokio::main]
async fn main() -> scarchive::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Config {
        db_path: args.db,
        archive_dir: args.archive_dir,
        client_id: args.client_id,
        ..Default::default()
    };
    config.validate()?;

    let db = Arc::new(Database::new(&config.db_path).await?);
    let client = Arc::new(Client::new(&config)?);

    Archiver::new(db, client, Arc::new(config)).run().await
}

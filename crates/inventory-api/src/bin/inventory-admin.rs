//! Inventory administration utility
//!
//! Commands:
//! - init: Create the data directory and the default admin user
//! - migrate-passwords: Hash any plaintext passwords left in users.json
//! - hash-password: Print an argon2id hash for a password
//! - next-number: Show the inventory number the next device would get
//! - check: Load every collection and report record counts

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inventory_common::{current_year, hash_password, Category, CollectionName, Device, License, User};
use inventory_store::{Inventory, RecordStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inventory-admin")]
#[command(about = "Maintenance commands for the inventory data directory")]
struct Cli {
    /// Directory holding the collection files
    #[arg(long, env = "DATA_DIR", default_value = "./data/storage", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing collection files and the default admin user
    Init,

    /// Replace plaintext passwords with argon2id hashes
    MigratePasswords,

    /// Print an argon2id hash for a password
    HashPassword {
        password: String,
    },

    /// Show the next inventory number without reserving it
    NextNumber {
        /// Two-digit year (defaults to the current year)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=99))]
        year: Option<u8>,
    },

    /// Parse every collection and report record counts
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => init(cli.data_dir).await?,
        Commands::MigratePasswords => migrate_passwords(cli.data_dir).await?,
        Commands::HashPassword { password } => {
            println!("{}", hash_password(&password)?);
        }
        Commands::NextNumber { year } => next_number(cli.data_dir, year).await?,
        Commands::Check => check(cli.data_dir).await?,
    }

    Ok(())
}

async fn init(data_dir: PathBuf) -> Result<()> {
    let inventory = Inventory::open(&data_dir)
        .await
        .context("Failed to open data directory")?;

    if inventory.credentials.bootstrap().await? {
        println!("Created default admin user (username: admin)");
    } else {
        println!("Users already present; nothing to bootstrap");
    }
    println!("Data directory ready: {}", data_dir.display());
    Ok(())
}

async fn migrate_passwords(data_dir: PathBuf) -> Result<()> {
    let inventory = Inventory::open(&data_dir).await?;
    let migrated = inventory.credentials.migrate_plaintext().await?;
    println!("Hashed {} plaintext password(s)", migrated);
    Ok(())
}

async fn next_number(data_dir: PathBuf, year: Option<u8>) -> Result<()> {
    let inventory = Inventory::open(&data_dir).await?;
    let year = year.unwrap_or_else(current_year);
    let number = inventory.devices.peek_next_number(year).await?;
    println!("{}", number);
    Ok(())
}

async fn check(data_dir: PathBuf) -> Result<()> {
    let store = RecordStore::open(&data_dir).await?;
    let mut failures = 0;

    for collection in CollectionName::ALL {
        let result = match collection {
            CollectionName::Devices => store.load::<Device>(collection).await.map(|r| r.len()),
            CollectionName::Categories => store.load::<Category>(collection).await.map(|r| r.len()),
            CollectionName::Licenses => store.load::<License>(collection).await.map(|r| r.len()),
            CollectionName::Users => store.load::<User>(collection).await.map(|r| r.len()),
        };

        match result {
            Ok(count) => println!("{:<12} {} record(s)", collection.as_str(), count),
            Err(e) => {
                failures += 1;
                println!("{:<12} FAILED: {}", collection.as_str(), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} collection(s) failed to load", failures);
    }
    Ok(())
}

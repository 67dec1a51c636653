//! Seed the catalog with random sample books
//!
//! Usage: seed_books [--count N] [--user USERNAME:PASSWORD] [--resync]

use std::sync::Arc;

use anyhow::{bail, Context};
use sqlx::postgres::PgPoolOptions;

use biblioteca_server::{
    config::AppConfig,
    logging,
    repository::Repository,
    seed::{random_book, DEFAULT_SEED_COUNT},
    services::{
        mirror::{BookMirror, MongoMirror},
        Services,
    },
};

#[derive(Debug, Default)]
struct SeedArgs {
    count: Option<usize>,
    user: Option<(String, String)>,
    resync: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<SeedArgs> {
    let mut parsed = SeedArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--count" => {
                let value = args.next().context("--count needs a value")?;
                parsed.count = Some(value.parse().context("--count must be a number")?);
            }
            "--user" => {
                let value = args.next().context("--user needs USERNAME:PASSWORD")?;
                let (username, password) = value
                    .split_once(':')
                    .context("--user needs USERNAME:PASSWORD")?;
                parsed.user = Some((username.to_string(), password.to_string()));
            }
            "--resync" => parsed.resync = true,
            other => bail!("Unknown argument: {}", other),
        }
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = parse_args(std::env::args().skip(1))?;
    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging);

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let mirror: Arc<dyn BookMirror> = Arc::new(MongoMirror::new(config.mirror.clone()));
    let services = Services::new(Repository::new(pool), &config, mirror);

    if let Some((username, password)) = &args.user {
        let user = services.auth.create_user(username, password).await?;
        tracing::info!("Created user {} (id={})", user.username, user.id);
    }

    let mut rng = rand::thread_rng();
    let count = args.count.unwrap_or(DEFAULT_SEED_COUNT);
    for _ in 0..count {
        services.catalog.create_book(random_book(&mut rng)).await?;
    }
    tracing::info!("Successfully seeded database with {} books", count);

    if args.resync {
        let mirrored = services.catalog.resync_mirror().await?;
        tracing::info!("Mirrored {} books to the document store", mirrored);
    }

    Ok(())
}

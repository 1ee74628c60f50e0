//! Backend entry point: configuration, migrations, and server bootstrap.

use clap::Parser;
use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use grm_backend::config::AppConfig;
use grm_backend::outbound::persistence::{DbPool, PoolConfig};
use grm_backend::server;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Run pending migrations over a blocking connection before the pool starts.
fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| std::io::Error::other(format!("migration failed: {err}")))?;
    Ok(())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::parse();

    let database_url = config.database_url.clone();
    tokio::task::spawn_blocking(move || run_migrations(&database_url))
        .await
        .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))??;

    let pool_config =
        PoolConfig::new(&config.database_url).with_max_size(config.db_pool_size);
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    let (http_state, ws_state) = server::build_states(&pool, &config)
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    info!(addr = %config.bind_addr, "starting grievance portal backend");
    server::run(http_state, ws_state, &config)?.await
}

//! Application configuration parsed from flags and environment variables.

use std::net::SocketAddr;

use clap::Parser;

/// Runtime configuration for the backend process.
#[derive(Debug, Clone, Parser)]
#[command(name = "grm-backend", about = "Grievance redressal backend")]
pub struct AppConfig {
    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Socket address the HTTP server binds to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// Shared secret used to sign authentication tokens.
    #[arg(long, env = "TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: String,

    /// Authentication token lifetime in hours.
    #[arg(long, env = "TOKEN_TTL_HOURS", default_value_t = 12)]
    pub token_ttl_hours: i64,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "DB_POOL_SIZE", default_value_t = 10)]
    pub db_pool_size: u32,
}

//! Drops the wallet and bet tables together with the migration ledger.
//!
//! The schema is recreated by the next gateway start with
//! `RUN_MIGRATIONS=true`. Reads `DATABASE_URL` (or `.env`).

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use wager_gateway::config::AppConfig;

const DROP_STATEMENTS: [&str; 3] = [
    "DROP TABLE IF EXISTS bets CASCADE",
    "DROP TABLE IF EXISTS wallets CASCADE",
    "DROP TABLE IF EXISTS _sqlx_migrations",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await
        .context("connecting to postgres")?;

    for statement in DROP_STATEMENTS {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .with_context(|| format!("executing `{statement}`"))?;
        tracing::info!(statement, "done");
    }

    pool.close().await;
    tracing::info!("database reset; restart the gateway to recreate the schema");
    Ok(())
}

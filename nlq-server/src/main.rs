//! `nlq-server` binary.

use anyhow::Context;
use clap::Parser;
use nlq_guard::Registry;
use nlq_server::env::EnvCache;
use nlq_server::{Config, GeminiGenerator, Overrides, QueryService, SqliteExecutor, router, telemetry};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Answer natural-language questions about the users table with guarded SQL.
#[derive(Debug, Parser)]
#[command(name = "nlq-server", version, about)]
struct Args {
    /// TOML config file.
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Listen address, e.g. 0.0.0.0:8000.
    #[arg(long)]
    bind: Option<String>,
    /// `SQLite` database file.
    #[arg(long)]
    database: Option<PathBuf>,
    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            bind: self.bind.clone(),
            database: self.database.clone(),
            log_json: self.log_json.then_some(true),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let env = EnvCache::from_process();
    let config = Config::load(args.config.as_deref(), &env, &args.overrides())?;

    telemetry::init_tracing(config.log_json).context("failed to install tracing subscriber")?;

    let table = Registry::builtin()
        .single_table()
        .context("builtin registry must hold exactly one table")?;
    let generator = GeminiGenerator::new(config.gemini.clone(), table);
    let executor = SqliteExecutor::new(&config.database);
    let service = Arc::new(QueryService::from_config(generator, executor, &config));

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!(
        addr = %config.bind,
        database = %config.database.display(),
        model = %config.gemini.model,
        "nlq-server listening"
    );

    let server = axum::serve(listener, router(service));
    tokio::select! {
        result = server => {
            result.context("server error")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}

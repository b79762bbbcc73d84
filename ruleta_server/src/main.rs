use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ruleta_core::{derive_hash_hex, Game, MemoryLedger, SpinLedger, SqliteLedger};
use ruleta_server::{router, ServerConfig};

async fn serve<L: SpinLedger>(cfg: &ServerConfig, ledger: L) -> anyhow::Result<()> {
    // state is rebuilt from the ledger before the listener opens
    let game = Arc::new(Game::open(ledger, cfg.random_source()).await?);
    let app = router(game);

    let listener = tokio::net::TcpListener::bind(&cfg.bind).await?;
    info!("listening on {}", cfg.bind);
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cfg = ServerConfig::parse();

    if let Some(seed) = &cfg.seed {
        info!(seed_hash = %derive_hash_hex(seed.as_bytes()), "seeded draws enabled");
    }

    if cfg.ephemeral {
        info!("using in-memory ledger");
        serve(&cfg, MemoryLedger::new()).await
    } else {
        info!(url = %cfg.database_url, "opening ledger");
        let ledger = SqliteLedger::connect(&cfg.database_url).await?;
        serve(&cfg, ledger).await
    }
}

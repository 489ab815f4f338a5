use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

mod classify;
mod cli;
mod config;
mod errors;
mod generate;
mod log;
mod prompt;
mod provider;
mod refine;
mod server;
mod service;
mod session;
mod template;
mod wire;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    log::init(args.verbose);

    let mut cfg = config::Config::load(args.config.as_deref().map(Path::new))?;
    cfg.apply_env(|k| std::env::var(k).ok());
    if let Some(bind) = args.bind {
        cfg.bind = bind;
    }
    if let Some(db) = args.database {
        cfg.database = db;
    }
    cfg.save_exchanges |= args.save_exchanges;

    let providers = provider::make_providers(&cfg)?;
    if providers.is_empty() {
        warn!("no provider credentials configured; serving template components only");
    } else {
        let names: Vec<_> = providers.iter().map(|p| p.name().to_string()).collect();
        info!(providers = ?names, "remote generation enabled");
    }
    if cfg.auth.tokens.is_empty() {
        warn!("no auth tokens configured; every request will be rejected with 401");
    }

    let store = session::SqliteSessionStore::connect(&cfg.database)?;
    info!(database = %cfg.database, "session store ready");

    let state = server::AppState {
        store: Arc::new(store),
        generator: Arc::new(generate::ComponentGenerator::new(generate::RemoteGenerator::new(providers))),
        tokens: Arc::new(cfg.auth.tokens.clone()),
    };
    server::serve(&cfg.bind, state).await
}

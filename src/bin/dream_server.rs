//! dream_server — REST server for dream analysis and the journal.
//!
//! Reads config from env vars (a `.env` file is honoured):
//!   DREAM_LEXICON_DIR         — lexicon pack directory (default: built-in packs)
//!   DREAM_JOURNAL_PATH        — journal JSON file (default: dream_journal.json)
//!   DREAM_JOURNAL_MAX_ENTRIES — optional journal quota
//!   DREAM_BIND_ADDR           — listen address (default: 0.0.0.0:3000)
//!   DREAM_MIN_TEXT_CHARS      — minimum analyze text length (default: 7)
//!   ENABLE_AUTH, BASIC_AUTH_USER, BASIC_AUTH_PASS,
//!   DREAM_STAGING_HOST, DREAM_PROTECTED_PREFIX — basic-auth gate

use anyhow::Context;
use tokio::net::TcpListener;

use dream_insight::server::{build_router, AppState};
use dream_insight::{AppConfig, DreamAnalyzer, JournalStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dream_insight=debug".into()),
        )
        .init();

    let config = AppConfig::from_env();

    let store = config.load_lexicon().context("failed to load lexicon")?;
    tracing::info!("{}", store.stats());

    let journal = JournalStore::open(&config.journal_path, config.journal_max_entries)
        .context("failed to open journal")?;
    tracing::info!(
        path = %journal.path().display(),
        entries = journal.len(),
        "Journal ready"
    );

    if config.auth.enabled {
        tracing::info!(
            staging_host = %config.auth.staging_host,
            protected_prefix = %config.auth.protected_prefix,
            "Basic auth enabled"
        );
    }

    let state = AppState::new(DreamAnalyzer::new(store), journal, config.min_text_chars)
        .with_auth(config.auth.clone());
    let app = build_router(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("dream_server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

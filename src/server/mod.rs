//! HTTP service (feature `server`).
//!
//! ```text
//! GET    /health                      lexicon hash and counts
//! GET    /api/diag                    host, path and auth diagnostics
//! POST   /app/api/analyze             {text} -> Analysis
//! GET    /app/api/journal             journal entries, newest first
//! POST   /app/api/journal             {text} -> analyzed and recorded entry
//! DELETE /app/api/journal/:id
//! GET    /app/api/journal/:id/report  Markdown report
//! ```

pub mod auth;
pub mod handlers;
pub mod router;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::analysis::DreamAnalyzer;
use crate::config::AuthConfig;
use crate::journal::JournalStore;

pub use router::build_router;

/// Shared state for every route.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<DreamAnalyzer>,
    pub journal: Arc<RwLock<JournalStore>>,
    pub min_text_chars: usize,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(analyzer: DreamAnalyzer, journal: JournalStore, min_text_chars: usize) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            journal: Arc::new(RwLock::new(journal)),
            min_text_chars,
            auth: Arc::new(AuthConfig::default()),
        }
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Arc::new(auth);
        self
    }
}

//! Runtime configuration from environment variables.
//!
//! | Variable                    | Default                      |
//! |-----------------------------|------------------------------|
//! | `DREAM_LEXICON_DIR`         | built-in packs               |
//! | `DREAM_JOURNAL_PATH`        | `dream_journal.json`         |
//! | `DREAM_JOURNAL_MAX_ENTRIES` | unlimited                    |
//! | `DREAM_BIND_ADDR`           | `0.0.0.0:3000`               |
//! | `DREAM_MIN_TEXT_CHARS`      | `7`                          |
//! | `ENABLE_AUTH`               | `false`                      |
//! | `BASIC_AUTH_USER`           | empty                        |
//! | `BASIC_AUTH_PASS`           | empty                        |
//! | `DREAM_STAGING_HOST`        | `staging.dreaminsight.co.kr` |
//! | `DREAM_PROTECTED_PREFIX`    | `/app`                       |
//!
//! Binaries call `dotenvy::dotenv()` first so a `.env` file can supply these.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::LexiconError;
use crate::lexicon::{LexiconCompiler, LexiconStore};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_JOURNAL_PATH: &str = "dream_journal.json";
/// Shortest trimmed dream text the HTTP layer will analyze.
pub const DEFAULT_MIN_TEXT_CHARS: usize = 7;
pub const DEFAULT_STAGING_HOST: &str = "staging.dreaminsight.co.kr";
pub const DEFAULT_PROTECTED_PREFIX: &str = "/app";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub lexicon_dir: Option<PathBuf>,
    pub journal_path: PathBuf,
    pub journal_max_entries: Option<usize>,
    pub bind_addr: String,
    /// Minimum trimmed length accepted by the HTTP analyze endpoint
    pub min_text_chars: usize,
    pub auth: AuthConfig,
}

/// Basic-auth gate settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub enabled: bool,
    pub user: String,
    pub pass: String,
    /// Host fully protected, together with its subdomains
    pub staging_host: String,
    /// Path prefix protected on every other host
    pub protected_prefix: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            user: String::new(),
            pass: String::new(),
            staging_host: DEFAULT_STAGING_HOST.to_string(),
            protected_prefix: DEFAULT_PROTECTED_PREFIX.to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lexicon_dir: None,
            journal_path: PathBuf::from(DEFAULT_JOURNAL_PATH),
            journal_max_entries: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            lexicon_dir: get("DREAM_LEXICON_DIR").map(PathBuf::from),
            journal_path: get("DREAM_JOURNAL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.journal_path),
            journal_max_entries: get("DREAM_JOURNAL_MAX_ENTRIES").and_then(|v| v.parse().ok()),
            bind_addr: get("DREAM_BIND_ADDR").unwrap_or(defaults.bind_addr),
            min_text_chars: get("DREAM_MIN_TEXT_CHARS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_text_chars),
            auth: AuthConfig {
                enabled: get("ENABLE_AUTH").is_some_and(|v| v == "true"),
                user: lookup("BASIC_AUTH_USER").unwrap_or_default(),
                pass: lookup("BASIC_AUTH_PASS").unwrap_or_default(),
                staging_host: get("DREAM_STAGING_HOST").unwrap_or(defaults.auth.staging_host),
                protected_prefix: get("DREAM_PROTECTED_PREFIX")
                    .unwrap_or(defaults.auth.protected_prefix),
            },
        }
    }

    /// Compile the configured packs, or the built-in ones.
    pub fn load_lexicon(&self) -> Result<Arc<LexiconStore>, LexiconError> {
        let compiler = match &self.lexicon_dir {
            Some(dir) => LexiconCompiler::from_dir(dir)?,
            None => LexiconCompiler::builtin(),
        };
        Ok(Arc::new(compiler.build()?))
    }
}

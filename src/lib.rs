//! Dream Insight - rule and lexicon based dream interpretation
//!
//! Turns a free-text dream narrative into a structured [`Analysis`]: matched
//! symbols, emotion/color/action cues, derived patterns, actionable advice,
//! journaling prompts, a fixed GI score, and optionally a direct answer and
//! writing hints.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dream_insight::{DreamAnalyzer, LexiconCompiler};
//!
//! let store = LexiconCompiler::builtin().build().expect("built-in packs compile");
//! let analyzer = DreamAnalyzer::new(Arc::new(store));
//! let analysis = analyzer.analyze("높은 곳에서 떨어지고 치아가 빠지는 꿈을 꿨어요. 왜 그럴까요?");
//! assert!(analysis.answer.is_some());
//! ```
//!
//! The analysis pipeline is pure and infallible. Persistence ([`journal`]),
//! export ([`report`]) and the HTTP layer (`server`, feature-gated) are
//! collaborators built around it.

// Core error handling
pub mod error;

// Runtime configuration
pub mod config;

// Lexicon packs and the compiled store
pub mod lexicon;

// Tokenize -> match cues -> derive patterns -> compose
pub mod analysis;

// Collaborators
pub mod journal;
pub mod report;

#[cfg(feature = "server")]
pub mod server;

pub use analysis::DreamAnalyzer;
pub use config::{AppConfig, AuthConfig};
pub use dream_types::{Analysis, ColorCue, JournalEntry, SymbolEntry};
pub use error::{JournalError, LexiconError};
pub use journal::JournalStore;
pub use lexicon::{LexiconCompiler, LexiconStore, SurfaceMatcher};

//! Dream Types - Level 1 Foundation Types
//!
//! Pure data structures produced by the dream analyzer and consumed by its
//! collaborators (journal persistence, report export, HTTP layer).
//!
//! ## Critical Rules
//!
//! 1. **NO BUSINESS LOGIC** - Only data structures, constructors and accessors
//! 2. **NO WORKSPACE DEPENDENCIES** - Cannot depend on other workspace crates
//! 3. **SERIALIZABLE** - All types support serde, field names are camelCase on the wire
//! 4. **NEVER ABSENT** - Every `Analysis` field except `answer` and `hints` is always
//!    present (empty sequences / empty strings), so renderers need no null checks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// MATCHED ENTRIES
// ============================================================================

/// A symbolic motif from the lexicon (e.g. "falling", "teeth").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// Stable identifier, unique within a lexicon store
    pub id: String,
    /// Display name
    pub label: String,
    /// Thematic categories
    #[serde(default)]
    pub tags: Vec<String>,
    /// One interpretive sentence
    pub meaning: String,
    /// One actionable sentence
    pub advice: String,
}

impl SymbolEntry {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A matched color together with its cue phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCue {
    /// Color category key (e.g. "black")
    pub key: String,
    /// Descriptive cue phrase for the color
    pub cue: String,
}

// ============================================================================
// ANALYSIS
// ============================================================================

/// The structured interpretation of one dream narrative.
///
/// Created per request and owned by the caller. Identical input text against the
/// same lexicon always yields an identical `Analysis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub summary: String,
    /// Matched symbols in lexicon order, one entry per symbol id
    #[serde(default)]
    pub symbols: Vec<SymbolEntry>,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(default)]
    pub colors: Vec<ColorCue>,
    #[serde(default)]
    pub actions: Vec<String>,
    /// Composite-rule patterns (most recently fired first) followed by baseline patterns
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Deduplicated advice; the last entry is always the golden line
    #[serde(default)]
    pub advice: Vec<String>,
    #[serde(default)]
    pub journaling_prompts: Vec<String>,
    /// Fixed-formula GI score. Not derived from the analysis contents.
    #[serde(default)]
    pub score: f64,
    /// Present only when the text reads as a question
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Present only when no symbol, emotion, color or action was found; always 3 entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<String>>,
}

impl Analysis {
    /// True when no cue of any kind was matched.
    pub fn is_sparse(&self) -> bool {
        self.symbols.is_empty()
            && self.emotions.is_empty()
            && self.colors.is_empty()
            && self.actions.is_empty()
    }

    pub fn symbol_ids(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(|s| s.id.as_str())
    }

    /// The closing golden line.
    pub fn golden_line(&self) -> Option<&str> {
        self.advice.last().map(|s| s.as_str())
    }
}

// ============================================================================
// JOURNAL RECORDS
// ============================================================================

/// A persisted analysis. Ids and timestamps are assigned by the persistence
/// layer, never by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    pub text: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub analysis: Analysis,
}

impl JournalEntry {
    pub fn new(
        id: Uuid,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
        analysis: Analysis,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            created_at,
            analysis,
        }
    }
}

//! Lexicon pack types.
//!
//! Pack files are YAML documents deserialized into [`PackFile`]. The compiler
//! merges packs into the runtime types at the bottom of this module.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use dream_types::SymbolEntry;

/// Symbol identifier (e.g., "teeth", "falling")
pub type SymbolId = String;

/// Normalized surface form (NFC, lowercase)
pub type SurfaceForm = String;

// =============================================================================
// Pack File Schema
// =============================================================================

/// One lexicon pack as written on disk.
///
/// Only the first (primary) pack must carry `baseline` and `responses`.
/// Every other section is optional and additive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackFile {
    /// Pack name, used in errors and stats. Defaults to the file stem.
    #[serde(default)]
    pub pack: Option<String>,
    /// Unicode ranges of the native script, e.g. "AC00-D7A3"
    #[serde(default)]
    pub native_script: Vec<String>,
    #[serde(default)]
    pub matcher: Option<MatcherSpec>,
    #[serde(default)]
    pub symbols: Vec<SymbolEntry>,
    /// Symbol id → alternative surface forms. BTreeMap keeps merge order stable.
    #[serde(default)]
    pub aliases: BTreeMap<SymbolId, Vec<String>>,
    #[serde(default)]
    pub emotions: Vec<CueCategory>,
    #[serde(default)]
    pub colors: Vec<ColorCategory>,
    #[serde(default)]
    pub actions: Vec<CueCategory>,
    #[serde(default)]
    pub composite_rules: Vec<CompositeRule>,
    #[serde(default)]
    pub question_markers: Vec<String>,
    #[serde(default)]
    pub baseline: Option<BaselineRules>,
    #[serde(default)]
    pub responses: Option<ResponseTexts>,
}

/// Tier-3 surface matcher declared by a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatcherSpec {
    /// Word-anchored form followed by up to `max_trailing` native characters
    SuffixTolerant {
        #[serde(default = "default_max_trailing")]
        max_trailing: usize,
    },
    /// No tier-3 matching; exact token and substring only
    Exact,
}

fn default_max_trailing() -> usize {
    2
}

// =============================================================================
// Cue Categories
// =============================================================================

/// An emotion or action category: a display label plus its surface forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueCategory {
    pub label: String,
    #[serde(default)]
    pub forms: Vec<SurfaceForm>,
}

/// A color category: key, descriptive cue phrase and surface forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCategory {
    pub key: String,
    pub cue: String,
    #[serde(default)]
    pub forms: Vec<SurfaceForm>,
}

// =============================================================================
// Pattern Rules
// =============================================================================

/// Fires when every keyword group has at least one form present in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeRule {
    pub id: String,
    pub pattern: String,
    pub advice: String,
    pub groups: Vec<Vec<SurfaceForm>>,
}

/// Labels and triggers for the five baseline patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineRules {
    pub anxiety: BaselineRule,
    pub growth: BaselineRule,
    pub avoidance: BaselineRule,
    pub subconscious: BaselineRule,
    pub calm: BaselineRule,
}

/// A baseline pattern fires if any trigger matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineRule {
    pub label: String,
    /// Symbol tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Emotion labels
    #[serde(default)]
    pub emotions: Vec<String>,
    /// Action labels
    #[serde(default)]
    pub actions: Vec<String>,
    /// Color keys
    #[serde(default)]
    pub colors: Vec<String>,
}

// =============================================================================
// Response Texts
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTexts {
    #[serde(default = "default_separator")]
    pub list_separator: String,
    /// Template with `{symbols}` and `{patterns}`
    pub summary_with_symbols: String,
    /// Stands in for `{patterns}` when no pattern was derived
    pub summary_pattern_fallback: String,
    pub summary_without_symbols: String,
    pub anxiety_coping: String,
    pub task_initiation: String,
    pub golden: GoldenLines,
    pub answer: AnswerTexts,
    pub hints: Vec<String>,
    pub journaling_prompts: Vec<String>,
}

fn default_separator() -> String {
    ", ".to_string()
}

/// Closing sentences, chosen growth > anxiety > default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenLines {
    pub growth: String,
    pub anxiety: String,
    pub default: String,
}

/// Sentence templates for the direct answer to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerTexts {
    pub symbols: String,
    pub patterns: String,
    pub advice: String,
    pub fallback: String,
}

// =============================================================================
// Compiled Runtime Types
// =============================================================================

/// A symbol together with every candidate surface form (id first, then aliases).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconSymbol {
    pub entry: SymbolEntry,
    pub forms: Vec<SurfaceForm>,
}

/// Provenance of one loaded pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackInfo {
    pub name: String,
    pub symbols: usize,
    pub rules: usize,
}

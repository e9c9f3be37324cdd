//! Lexicon Store
//!
//! Vocabulary of symbols, aliases, cue categories, composite rules and
//! response texts, compiled from YAML packs into an immutable store.
//!
//! ```text
//! config/lexicon/*.yaml ──► LexiconCompiler ──► Arc<LexiconStore> ──► DreamAnalyzer
//! ```

pub mod compiler;
pub mod script;
pub mod store;
pub mod types;

pub use compiler::LexiconCompiler;
pub use script::{fold, ScriptRanges, SuffixTolerantMatcher, SurfaceMatcher};
pub use store::{LexiconStats, LexiconStore};
pub use types::{
    BaselineRule, BaselineRules, ColorCategory, CompositeRule, CueCategory, LexiconSymbol,
    MatcherSpec, PackInfo, ResponseTexts,
};

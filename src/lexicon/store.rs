//! LexiconStore - Compiled, immutable lexicon shared by every analysis.
//!
//! Built once by [`LexiconCompiler`](super::LexiconCompiler) and shared via
//! `Arc<LexiconStore>`. Nothing here mutates after construction, so the
//! store is safe for concurrent readers.

use std::collections::HashMap;
use std::sync::Arc;

use dream_types::SymbolEntry;

use super::script::{ScriptRanges, SurfaceMatcher};
use super::types::*;

/// Compiled lexicon for in-memory matching.
#[derive(Debug)]
pub struct LexiconStore {
    /// Deterministic SHA-256 of the pack inputs
    pub(crate) hash: String,
    pub(crate) packs: Vec<PackInfo>,

    // =========================================================================
    // Vocabulary (store order is output order)
    // =========================================================================
    pub(crate) symbols: Vec<LexiconSymbol>,
    /// Symbol id → position in `symbols`
    pub(crate) symbol_index: HashMap<SymbolId, usize>,
    pub(crate) emotions: Vec<CueCategory>,
    pub(crate) colors: Vec<ColorCategory>,
    pub(crate) actions: Vec<CueCategory>,

    // =========================================================================
    // Rules and texts
    // =========================================================================
    pub(crate) composite_rules: Vec<CompositeRule>,
    pub(crate) question_markers: Vec<SurfaceForm>,
    pub(crate) baseline: BaselineRules,
    pub(crate) responses: ResponseTexts,

    // =========================================================================
    // Matching
    // =========================================================================
    pub(crate) script: ScriptRanges,
    pub(crate) matchers: Vec<Arc<dyn SurfaceMatcher>>,
}

impl LexiconStore {
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn packs(&self) -> &[PackInfo] {
        &self.packs
    }

    pub fn symbols(&self) -> &[LexiconSymbol] {
        &self.symbols
    }

    pub fn symbol(&self, id: &str) -> Option<&SymbolEntry> {
        self.symbol_index.get(id).map(|&i| &self.symbols[i].entry)
    }

    /// Candidate surface forms for a symbol: the id followed by its aliases.
    pub fn forms_for(&self, id: &str) -> Option<&[SurfaceForm]> {
        self.symbol_index
            .get(id)
            .map(|&i| self.symbols[i].forms.as_slice())
    }

    pub fn emotions(&self) -> &[CueCategory] {
        &self.emotions
    }

    pub fn colors(&self) -> &[ColorCategory] {
        &self.colors
    }

    pub fn actions(&self) -> &[CueCategory] {
        &self.actions
    }

    pub fn composite_rules(&self) -> &[CompositeRule] {
        &self.composite_rules
    }

    pub fn question_markers(&self) -> &[SurfaceForm] {
        &self.question_markers
    }

    pub fn baseline(&self) -> &BaselineRules {
        &self.baseline
    }

    pub fn responses(&self) -> &ResponseTexts {
        &self.responses
    }

    pub fn script(&self) -> &ScriptRanges {
        &self.script
    }

    /// Register an additional tier-3 matcher. Only valid before the store
    /// is shared.
    pub fn with_matcher(mut self, matcher: Arc<dyn SurfaceMatcher>) -> Self {
        self.matchers.push(matcher);
        self
    }

    /// Tier-2 raw substring or any tier-3 matcher.
    ///
    /// This is the predicate used by both symbol matching and composite
    /// rule evaluation. `raw` must already be folded.
    pub fn form_in_text(&self, raw: &str, form: &str) -> bool {
        if form.is_empty() {
            return false;
        }
        raw.contains(form) || self.matchers.iter().any(|m| m.matches(raw, form))
    }

    pub fn stats(&self) -> LexiconStats {
        LexiconStats {
            hash: self.hash.clone(),
            packs: self.packs.iter().map(|p| p.name.clone()).collect(),
            symbol_count: self.symbols.len(),
            alias_count: self
                .symbols
                .iter()
                .map(|s| s.forms.len().saturating_sub(1))
                .sum(),
            emotion_count: self.emotions.len(),
            color_count: self.colors.len(),
            action_count: self.actions.len(),
            rule_count: self.composite_rules.len(),
            marker_count: self.question_markers.len(),
            matchers: self.matchers.iter().map(|m| m.name().to_string()).collect(),
        }
    }
}

/// Statistics about a compiled store.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LexiconStats {
    pub hash: String,
    pub packs: Vec<String>,
    pub symbol_count: usize,
    pub alias_count: usize,
    pub emotion_count: usize,
    pub color_count: usize,
    pub action_count: usize,
    pub rule_count: usize,
    pub marker_count: usize,
    pub matchers: Vec<String>,
}

impl std::fmt::Display for LexiconStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Lexicon Store Statistics:")?;
        writeln!(f, "  Hash: {}", self.hash)?;
        writeln!(f, "  Packs: {}", self.packs.join(", "))?;
        writeln!(f, "  Symbols: {}", self.symbol_count)?;
        writeln!(f, "  Aliases: {}", self.alias_count)?;
        writeln!(f, "  Emotions: {}", self.emotion_count)?;
        writeln!(f, "  Colors: {}", self.color_count)?;
        writeln!(f, "  Actions: {}", self.action_count)?;
        writeln!(f, "  Composite rules: {}", self.rule_count)?;
        writeln!(f, "  Question markers: {}", self.marker_count)?;
        writeln!(f, "  Surface matchers: {}", self.matchers.join(", "))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::script::SuffixTolerantMatcher;
    use crate::lexicon::LexiconCompiler;

    #[test]
    fn test_builtin_stats() {
        let store = LexiconCompiler::builtin().build().unwrap();
        let stats = store.stats();
        assert_eq!(stats.packs, vec!["ko_core", "ko_extra"]);
        assert_eq!(stats.symbol_count, store.symbols().len());
        assert!(stats.rule_count >= 8);
        assert_eq!(stats.matchers, vec!["suffix_tolerant"]);

        let rendered = stats.to_string();
        assert!(rendered.contains("Lexicon Store Statistics:"));
        assert!(rendered.contains(&stats.hash));
    }

    #[test]
    fn test_symbol_lookup() {
        let store = LexiconCompiler::builtin().build().unwrap();
        assert_eq!(store.symbol("teeth").unwrap().label, "이(치아)");
        let forms = store.forms_for("teeth").unwrap();
        assert_eq!(forms[0], "teeth");
        assert!(forms.iter().any(|f| f == "치아"));
        assert!(store.symbol("unicorn").is_none());
    }

    #[test]
    fn test_form_in_text_tiers() {
        let store = LexiconCompiler::builtin().build().unwrap();
        // Tier 2
        assert!(store.form_in_text("건물 옥상", "물"));
        // Empty forms never match
        assert!(!store.form_in_text("아무거나", ""));
        assert!(!store.form_in_text("바다", "산"));
    }

    #[test]
    fn test_with_matcher_registers_tier3() {
        let store = LexiconCompiler::builtin()
            .build()
            .unwrap()
            .with_matcher(Arc::new(SuffixTolerantMatcher::new(ScriptRanges::hangul(), 1)));
        assert_eq!(store.stats().matchers.len(), 2);
    }
}

//! Cue Matcher: symbols, emotions, colors and actions found in a text.

use std::collections::HashSet;

use dream_types::{ColorCue, SymbolEntry};

use super::tokenizer::TokenizedText;
use crate::lexicon::{CueCategory, LexiconStore};

/// Everything the cue matcher found, each list deduplicated and in store order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueMatches {
    pub symbols: Vec<SymbolEntry>,
    pub emotions: Vec<String>,
    pub colors: Vec<ColorCue>,
    pub actions: Vec<String>,
}

impl CueMatches {
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
            && self.emotions.is_empty()
            && self.colors.is_empty()
            && self.actions.is_empty()
    }

    /// Union of the tags of every matched symbol.
    pub fn tags(&self) -> HashSet<&str> {
        self.symbols
            .iter()
            .flat_map(|s| s.tags.iter().map(String::as_str))
            .collect()
    }
}

pub struct CueMatcher<'a> {
    store: &'a LexiconStore,
}

impl<'a> CueMatcher<'a> {
    pub fn new(store: &'a LexiconStore) -> Self {
        Self { store }
    }

    pub fn match_all(&self, text: &TokenizedText) -> CueMatches {
        let symbols = self
            .store
            .symbols()
            .iter()
            .filter(|s| s.forms.iter().any(|f| self.symbol_form_found(f, text)))
            .map(|s| s.entry.clone())
            .collect();

        let colors = self
            .store
            .colors()
            .iter()
            .filter(|c| c.forms.iter().any(|f| cue_form_found(f, text)))
            .map(|c| ColorCue {
                key: c.key.clone(),
                cue: c.cue.clone(),
            })
            .collect();

        CueMatches {
            symbols,
            emotions: matched_labels(self.store.emotions(), text),
            colors,
            actions: matched_labels(self.store.actions(), text),
        }
    }

    /// Exact token, raw substring, or a registered surface matcher.
    fn symbol_form_found(&self, form: &str, text: &TokenizedText) -> bool {
        text.has_token(form) || self.store.form_in_text(&text.raw, form)
    }
}

/// ASCII forms need a whole word (trailing `?`/`!` aside); native forms
/// match anywhere in the raw text so stems absorb inflection.
fn cue_form_found(form: &str, text: &TokenizedText) -> bool {
    if form.is_ascii() {
        text.has_word(form)
    } else {
        text.raw.contains(form)
    }
}

fn matched_labels(categories: &[CueCategory], text: &TokenizedText) -> Vec<String> {
    categories
        .iter()
        .filter(|c| c.forms.iter().any(|f| cue_form_found(f, text)))
        .map(|c| c.label.clone())
        .collect()
}

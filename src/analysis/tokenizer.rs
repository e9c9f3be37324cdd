//! Tokenizer: normalized raw text plus word tokens.

use crate::lexicon::{fold, ScriptRanges};

/// Both views of one input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedText {
    /// NFC + lowercase, punctuation intact. Used for substring matching.
    pub raw: String,
    /// Whitespace-split words after stripping disallowed characters.
    pub tokens: Vec<String>,
}

impl TokenizedText {
    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Token membership ignoring trailing `?`/`!`, so "scared!" counts as
    /// the word "scared".
    pub fn has_word(&self, word: &str) -> bool {
        self.tokens
            .iter()
            .any(|t| t.trim_end_matches(['?', '!']) == word)
    }
}

pub struct Tokenizer<'a> {
    script: &'a ScriptRanges,
}

impl<'a> Tokenizer<'a> {
    pub fn new(script: &'a ScriptRanges) -> Self {
        Self { script }
    }

    /// Keeps ASCII alphanumerics, native-script characters, whitespace, `?`
    /// and `!`. Everything else becomes a separator.
    pub fn tokenize(&self, text: &str) -> TokenizedText {
        let raw = fold(text);
        let cleaned: String = raw
            .chars()
            .map(|c| if self.keeps(c) { c } else { ' ' })
            .collect();
        let tokens = cleaned.split_whitespace().map(str::to_string).collect();
        TokenizedText { raw, tokens }
    }

    fn keeps(&self, c: char) -> bool {
        self.script.is_word_char(c) || c.is_whitespace() || c == '?' || c == '!'
    }
}

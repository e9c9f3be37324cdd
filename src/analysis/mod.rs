//! Dream analysis pipeline.
//!
//! ```text
//! text ─► Tokenizer ─► CueMatcher ─► PatternEngine ─► ResponseComposer ─► Analysis
//!                                                      Scorer ──────────┘
//! ```
//!
//! Every stage borrows the shared [`LexiconStore`] read-only. Analysis never
//! fails and never performs I/O.

pub mod composer;
pub mod cues;
pub mod patterns;
pub mod scorer;
pub mod tokenizer;

use std::sync::Arc;

use rayon::prelude::*;
use tracing::instrument;

use dream_types::Analysis;

use crate::lexicon::LexiconStore;
use composer::ResponseComposer;
use cues::CueMatcher;
use patterns::PatternEngine;
use scorer::{gi_score, GiInputs};
use tokenizer::Tokenizer;

pub use cues::CueMatches;
pub use patterns::{PatternKind, PatternReport};
pub use tokenizer::TokenizedText;

/// Entry point for interpreting dream narratives against one lexicon store.
#[derive(Debug, Clone)]
pub struct DreamAnalyzer {
    store: Arc<LexiconStore>,
}

impl DreamAnalyzer {
    pub fn new(store: Arc<LexiconStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<LexiconStore> {
        &self.store
    }

    /// Interpret one narrative. Identical text always yields an identical
    /// `Analysis` for the same store.
    #[instrument(level = "debug", skip_all, fields(chars = text.chars().count()))]
    pub fn analyze(&self, text: &str) -> Analysis {
        let store = self.store.as_ref();
        let tokenized = Tokenizer::new(store.script()).tokenize(text);
        let cues = CueMatcher::new(store).match_all(&tokenized);
        let report = PatternEngine::new(store).derive(&cues, &tokenized);

        let composer = ResponseComposer::new(store);
        let summary = composer.summary(&cues, &report);
        let advice = composer.advice(&cues, &report);
        let answer = composer.answer(&tokenized, &cues, &report, &advice);
        let hints = composer.hints(&cues);

        tracing::debug!(
            symbols = cues.symbols.len(),
            emotions = cues.emotions.len(),
            colors = cues.colors.len(),
            actions = cues.actions.len(),
            patterns = report.patterns.len(),
            question = answer.is_some(),
            "Dream analyzed"
        );

        Analysis {
            summary,
            symbols: cues.symbols,
            emotions: cues.emotions,
            colors: cues.colors,
            actions: cues.actions,
            patterns: report.patterns,
            advice: advice.into_list(),
            journaling_prompts: composer.journaling_prompts(),
            score: gi_score(&GiInputs::FIXED),
            answer,
            hints,
        }
    }

    /// Invalid UTF-8 sequences are replaced before analysis.
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Analysis {
        self.analyze(&String::from_utf8_lossy(bytes))
    }

    /// Analyze many texts on the rayon pool. Output order matches input order.
    #[instrument(level = "debug", skip_all, fields(count = texts.len()))]
    pub fn analyze_batch<S>(&self, texts: &[S]) -> Vec<Analysis>
    where
        S: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.analyze(text.as_ref()))
            .collect()
    }
}

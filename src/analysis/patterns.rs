//! Pattern Engine
//!
//! Patterns come from two sources:
//!
//! - **Composite rules**: keyword-group conjunctions evaluated against the raw
//!   text in table order. Firing rules are pushed onto a stack, so the most
//!   recently fired rule is listed first.
//! - **Baseline checklist**: five fixed patterns evaluated in a fixed order
//!   against symbol tags and matched cues. Baseline patterns always follow
//!   composite ones.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::cues::CueMatches;
use super::tokenizer::TokenizedText;
use crate::lexicon::{BaselineRule, BaselineRules, CompositeRule, LexiconStore};

/// The baseline checklist, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    /// Anxiety tag or anxiety emotion
    Anxiety,
    /// Growth tag or ambition action
    Growth,
    /// Avoidance tag or flight action
    Avoidance,
    /// Black color
    Subconscious,
    /// Blue color
    Calm,
}

impl PatternKind {
    pub const CHECKLIST: [PatternKind; 5] = [
        Self::Anxiety,
        Self::Growth,
        Self::Avoidance,
        Self::Subconscious,
        Self::Calm,
    ];

    pub fn rule<'a>(&self, baseline: &'a BaselineRules) -> &'a BaselineRule {
        match self {
            Self::Anxiety => &baseline.anxiety,
            Self::Growth => &baseline.growth,
            Self::Avoidance => &baseline.avoidance,
            Self::Subconscious => &baseline.subconscious,
            Self::Calm => &baseline.calm,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Anxiety => "anxiety",
            Self::Growth => "growth",
            Self::Avoidance => "avoidance",
            Self::Subconscious => "subconscious",
            Self::Calm => "calm",
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Result of pattern derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternReport {
    /// Ordered, deduplicated pattern labels
    pub patterns: Vec<String>,
    /// Composite rules that fired, in table order
    pub fired: Vec<CompositeRule>,
    /// Baseline patterns present, in checklist order
    pub baseline: Vec<PatternKind>,
}

impl PatternReport {
    pub fn has(&self, kind: PatternKind) -> bool {
        self.baseline.contains(&kind)
    }
}

/// Composite labels pop most-recent-first, then baseline labels in order.
#[derive(Debug, Default)]
struct PatternStack {
    composite: Vec<String>,
    baseline: Vec<String>,
}

impl PatternStack {
    fn push_composite(&mut self, label: &str) {
        self.composite.push(label.to_string());
    }

    fn push_baseline(&mut self, label: &str) {
        self.baseline.push(label.to_string());
    }

    fn into_ordered(self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.composite
            .into_iter()
            .rev()
            .chain(self.baseline)
            .filter(|label| seen.insert(label.clone()))
            .collect()
    }
}

pub struct PatternEngine<'a> {
    store: &'a LexiconStore,
}

impl<'a> PatternEngine<'a> {
    pub fn new(store: &'a LexiconStore) -> Self {
        Self { store }
    }

    pub fn derive(&self, cues: &CueMatches, text: &TokenizedText) -> PatternReport {
        let mut stack = PatternStack::default();
        let mut fired = Vec::new();

        for rule in self.store.composite_rules() {
            if self.rule_fires(rule, &text.raw) {
                tracing::trace!(rule = %rule.id, "Composite rule fired");
                stack.push_composite(&rule.pattern);
                fired.push(rule.clone());
            }
        }

        let tags = cues.tags();
        let mut baseline = Vec::new();
        for kind in PatternKind::CHECKLIST {
            let rule = kind.rule(self.store.baseline());
            if baseline_triggered(rule, &tags, cues) {
                stack.push_baseline(&rule.label);
                baseline.push(kind);
            }
        }

        PatternReport {
            patterns: stack.into_ordered(),
            fired,
            baseline,
        }
    }

    /// Every group must have at least one form present.
    fn rule_fires(&self, rule: &CompositeRule, raw: &str) -> bool {
        rule.groups
            .iter()
            .all(|group| group.iter().any(|form| self.store.form_in_text(raw, form)))
    }
}

fn baseline_triggered(rule: &BaselineRule, tags: &HashSet<&str>, cues: &CueMatches) -> bool {
    rule.tags.iter().any(|t| tags.contains(t.as_str()))
        || rule.emotions.iter().any(|e| cues.emotions.contains(e))
        || rule.actions.iter().any(|a| cues.actions.contains(a))
        || rule
            .colors
            .iter()
            .any(|k| cues.colors.iter().any(|c| &c.key == k))
}

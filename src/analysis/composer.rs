//! Response Composer: summary, advice, answer, hints and prompts.
//!
//! All sentences come from the primary pack's `responses` section.

use std::collections::HashSet;

use super::cues::CueMatches;
use super::patterns::{PatternKind, PatternReport};
use super::tokenizer::TokenizedText;
use crate::lexicon::LexiconStore;

/// Advice list with first-insertion deduplication.
#[derive(Debug, Default)]
struct AdviceSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl AdviceSet {
    fn push(&mut self, advice: &str) {
        if self.seen.insert(advice.to_string()) {
            self.items.push(advice.to_string());
        }
    }
}

/// Advice body plus the closing golden line, kept apart until output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advice {
    /// Deduplicated advice, never containing the golden line
    pub body: Vec<String>,
    pub golden: String,
}

impl Advice {
    /// Body followed by the golden line, exactly once and last.
    pub fn into_list(self) -> Vec<String> {
        let mut list = self.body;
        list.push(self.golden);
        list
    }
}

pub struct ResponseComposer<'a> {
    store: &'a LexiconStore,
}

impl<'a> ResponseComposer<'a> {
    pub fn new(store: &'a LexiconStore) -> Self {
        Self { store }
    }

    pub fn summary(&self, cues: &CueMatches, report: &PatternReport) -> String {
        let texts = self.store.responses();
        if cues.symbols.is_empty() {
            return texts.summary_without_symbols.clone();
        }
        let labels = self.join(cues.symbols.iter().map(|s| s.label.as_str()));
        let patterns = if report.patterns.is_empty() {
            texts.summary_pattern_fallback.clone()
        } else {
            self.join(report.patterns.iter().map(String::as_str))
        };
        texts
            .summary_with_symbols
            .replace("{symbols}", &labels)
            .replace("{patterns}", &patterns)
    }

    pub fn advice(&self, cues: &CueMatches, report: &PatternReport) -> Advice {
        let texts = self.store.responses();
        let baseline = self.store.baseline();
        let mut set = AdviceSet::default();

        for symbol in &cues.symbols {
            set.push(&symbol.advice);
        }
        for rule in &report.fired {
            set.push(&rule.advice);
        }
        if baseline
            .anxiety
            .emotions
            .iter()
            .any(|e| cues.emotions.contains(e))
        {
            set.push(&texts.anxiety_coping);
        }
        if report.has(PatternKind::Avoidance) {
            set.push(&texts.task_initiation);
        }

        let golden = if report.has(PatternKind::Growth) {
            &texts.golden.growth
        } else if report.has(PatternKind::Anxiety) {
            &texts.golden.anxiety
        } else {
            &texts.golden.default
        };

        let mut body = set.items;
        body.retain(|a| a != golden);
        Advice {
            body,
            golden: golden.clone(),
        }
    }

    /// `?` or any configured interrogative marker in the raw text.
    pub fn is_question(&self, text: &TokenizedText) -> bool {
        text.raw.contains('?')
            || self
                .store
                .question_markers()
                .iter()
                .any(|m| text.raw.contains(m.as_str()))
    }

    pub fn answer(
        &self,
        text: &TokenizedText,
        cues: &CueMatches,
        report: &PatternReport,
        advice: &Advice,
    ) -> Option<String> {
        if !self.is_question(text) {
            return None;
        }
        let templates = &self.store.responses().answer;
        let mut parts = Vec::with_capacity(3);
        if !cues.symbols.is_empty() {
            let labels = self.join(cues.symbols.iter().map(|s| s.label.as_str()));
            parts.push(templates.symbols.replace("{symbols}", &labels));
        }
        if !report.patterns.is_empty() {
            let patterns = self.join(report.patterns.iter().map(String::as_str));
            parts.push(templates.patterns.replace("{patterns}", &patterns));
        }
        match advice.body.first() {
            Some(first) => parts.push(templates.advice.replace("{advice}", first)),
            None => parts.push(templates.fallback.clone()),
        }
        Some(parts.join(" "))
    }

    pub fn hints(&self, cues: &CueMatches) -> Option<Vec<String>> {
        cues.is_empty()
            .then(|| self.store.responses().hints.clone())
    }

    pub fn journaling_prompts(&self) -> Vec<String> {
        self.store.responses().journaling_prompts.clone()
    }

    fn join<'s>(&self, items: impl Iterator<Item = &'s str>) -> String {
        items
            .collect::<Vec<_>>()
            .join(&self.store.responses().list_separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::cues::CueMatcher;
    use crate::analysis::patterns::PatternEngine;
    use crate::analysis::tokenizer::Tokenizer;
    use crate::lexicon::LexiconCompiler;

    struct Composed {
        summary: String,
        advice: Advice,
        answer: Option<String>,
        hints: Option<Vec<String>>,
    }

    fn compose(store: &LexiconStore, text: &str) -> Composed {
        let tokenized = Tokenizer::new(store.script()).tokenize(text);
        let cues = CueMatcher::new(store).match_all(&tokenized);
        let report = PatternEngine::new(store).derive(&cues, &tokenized);
        let composer = ResponseComposer::new(store);
        let advice = composer.advice(&cues, &report);
        Composed {
            summary: composer.summary(&cues, &report),
            answer: composer.answer(&tokenized, &cues, &report, &advice),
            hints: composer.hints(&cues),
            advice,
        }
    }

    #[test]
    fn test_summary_with_and_without_symbols() {
        let store = LexiconCompiler::builtin().build().unwrap();
        let c = compose(&store, "시험을 보는 꿈");
        assert_eq!(
            c.summary,
            "주요 상징 시험이(가) 포착되었습니다. 핵심 패턴을 더 파악하려면 3일 연속 기록을 권장."
        );

        let c = compose(&store, "그냥 평범한 하루");
        assert_eq!(c.summary, store.responses().summary_without_symbols);
        assert_eq!(c.hints.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_golden_line_priority() {
        let store = LexiconCompiler::builtin().build().unwrap();
        let texts = store.responses();

        // Growth wins over anxiety
        let c = compose(&store, "불안했지만 산을 오르는 꿈");
        assert_eq!(c.advice.golden, texts.golden.growth);

        let c = compose(&store, "불안한 꿈");
        assert_eq!(c.advice.golden, texts.golden.anxiety);

        let c = compose(&store, "평범한 하루");
        assert_eq!(c.advice.golden, texts.golden.default);
        assert!(c.advice.body.is_empty());
    }

    #[test]
    fn test_conditional_advice() {
        let store = LexiconCompiler::builtin().build().unwrap();
        let texts = store.responses();
        let c = compose(&store, "불안해서 달려 도망쳤다");
        assert!(c.advice.body.contains(&texts.anxiety_coping));
        assert!(c.advice.body.contains(&texts.task_initiation));
    }

    const DEDUP_PACK: &str = r#"
pack: dedup
symbols:
  - { id: mirror_twin, label: "쌍거울", meaning: m, advice: "호흡 4-7-8을 3회 반복하고, 불안 근원을 문장으로 라벨링하세요." }
  - { id: golden_echo, label: "메아리", meaning: m, advice: "꿈은 감정의 메타데이터입니다. 감정-색-행동 중 하나를 현실에서 의식적으로 전환해 보세요." }
aliases:
  mirror_twin: [쌍거울]
  golden_echo: [메아리]
"#;

    #[test]
    fn test_advice_dedup_and_golden_once() {
        let store = LexiconCompiler::builtin()
            .with_pack("dedup", DEDUP_PACK)
            .build()
            .unwrap();
        let texts = store.responses();
        let c = compose(&store, "쌍거울 앞에서 메아리를 들었고 초조했다");

        let list = c.advice.into_list();
        let coping = list.iter().filter(|a| **a == texts.anxiety_coping).count();
        assert_eq!(coping, 1);
        // Anxiety emotion picks the anxiety line; the default line from the
        // symbol advice stays in the body.
        assert_eq!(list.last().unwrap(), &texts.golden.anxiety);
        assert!(list.contains(&texts.golden.default));
    }

    #[test]
    fn test_golden_line_removed_from_body() {
        let store = LexiconCompiler::builtin()
            .with_pack("dedup", DEDUP_PACK)
            .build()
            .unwrap();
        let texts = store.responses();
        let c = compose(&store, "메아리");
        assert_eq!(c.advice.golden, texts.golden.default);
        assert!(!c.advice.body.contains(&texts.golden.default));
        let list = c.advice.into_list();
        assert_eq!(list.iter().filter(|a| **a == texts.golden.default).count(), 1);
    }

    #[test]
    fn test_answer_gating() {
        let store = LexiconCompiler::builtin().build().unwrap();
        assert!(compose(&store, "시험을 보는 꿈").answer.is_none());
        assert!(compose(&store, "시험 꿈은 왜 꾸는 걸까").answer.is_some());
        assert!(compose(&store, "what does it mean?").answer.is_some());
        assert!(compose(&store, "무슨 의미일까요？").answer.is_some());
    }

    #[test]
    fn test_answer_parts() {
        let store = LexiconCompiler::builtin().build().unwrap();
        let c = compose(&store, "시험을 보는 꿈은 무슨 의미?");
        let answer = c.answer.unwrap();
        assert!(answer.starts_with("이 꿈에서 포착된 상징은 시험입니다."));
        assert!(answer.contains(&format!("지금 해볼 수 있는 일: {}", c.advice.body[0])));

        let c = compose(&store, "?");
        assert_eq!(
            c.answer.as_deref(),
            Some(store.responses().answer.fallback.as_str())
        );
    }
}

//! Golden corpus test: replays every dream in tests/golden_corpus/ through
//! the built-in lexicon and checks symbols, patterns and the answer/hint gates.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use dream_insight::{DreamAnalyzer, LexiconCompiler};

#[derive(Debug, Deserialize)]
struct CorpusEntry {
    id: String,
    category: String,
    input: String,
    symbols: Vec<String>,
    patterns: Vec<String>,
    question: bool,
    sparse: bool,
    #[allow(dead_code)]
    notes: Option<String>,
}

fn corpus_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/golden_corpus")
}

fn load_corpus() -> Vec<CorpusEntry> {
    let path = corpus_dir().join("dreams.yaml");
    let content = std::fs::read_to_string(&path).expect("read dreams.yaml");
    serde_yaml::from_str(&content).expect("parse dreams.yaml")
}

#[test]
fn test_corpus_structure() {
    let entries = load_corpus();
    assert!(
        entries.len() >= 20,
        "corpus should have at least 20 entries, got {}",
        entries.len()
    );

    let mut ids = HashSet::new();
    for entry in &entries {
        assert!(ids.insert(entry.id.as_str()), "duplicate id {}", entry.id);
        assert!(!entry.category.is_empty(), "{} has empty category", entry.id);
        if entry.sparse {
            assert!(entry.symbols.is_empty(), "{} sparse but has symbols", entry.id);
            assert!(entry.patterns.is_empty(), "{} sparse but has patterns", entry.id);
        }
    }
}

#[test]
fn test_corpus_symbol_ids_exist() {
    let store = LexiconCompiler::builtin().build().unwrap();
    for entry in load_corpus() {
        for id in &entry.symbols {
            assert!(
                store.symbol(id).is_some(),
                "{}: unknown symbol id {}",
                entry.id,
                id
            );
        }
    }
}

#[test]
fn test_corpus_replay() {
    let analyzer = DreamAnalyzer::new(Arc::new(LexiconCompiler::builtin().build().unwrap()));
    let mut failures = Vec::new();

    for entry in load_corpus() {
        let analysis = analyzer.analyze(&entry.input);
        let symbols: Vec<String> = analysis.symbol_ids().map(str::to_string).collect();

        if symbols != entry.symbols {
            failures.push(format!(
                "{}: symbols {:?}, expected {:?}",
                entry.id, symbols, entry.symbols
            ));
        }
        if analysis.patterns != entry.patterns {
            failures.push(format!(
                "{}: patterns {:?}, expected {:?}",
                entry.id, analysis.patterns, entry.patterns
            ));
        }
        if analysis.answer.is_some() != entry.question {
            failures.push(format!("{}: question gate mismatch", entry.id));
        }
        if analysis.hints.is_some() != entry.sparse {
            failures.push(format!("{}: hint gate mismatch", entry.id));
        }
    }

    assert!(
        failures.is_empty(),
        "{} corpus mismatches:\n{}",
        failures.len(),
        failures.join("\n")
    );
}

//! LexiconCompiler - Build a lexicon store from YAML packs.
//!
//! ## Build Process
//!
//! 1. Parse each pack (built-in, directory, or in-memory source)
//! 2. Merge packs in order: the first pack is primary and supplies the
//!    baseline labels and response texts; later packs only add vocabulary
//! 3. Fold every surface form (NFC, lowercase) and validate
//! 4. Compute deterministic hash from inputs
//!
//! ## Usage
//!
//! ```rust,ignore
//! let store = LexiconCompiler::from_dir(Path::new("config/lexicon"))?.build()?;
//! println!("{}", store.stats());
//! ```

use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use super::script::{fold, ScriptRanges, SuffixTolerantMatcher, SurfaceMatcher};
use super::store::LexiconStore;
use super::types::*;
use crate::error::LexiconError;

const BUILTIN_PACKS: [(&str, &str); 2] = [
    (
        "10_ko_core",
        include_str!("../../config/lexicon/10_ko_core.yaml"),
    ),
    (
        "20_ko_extra",
        include_str!("../../config/lexicon/20_ko_extra.yaml"),
    ),
];

/// Exact number of hints and journaling prompts a primary pack must carry.
const FIXED_TRIPLE: usize = 3;

/// One pack input: a fallback name and its YAML text.
#[derive(Debug, Clone)]
struct PackSource {
    name: String,
    content: String,
}

/// Compiler for building a LexiconStore from YAML packs.
#[derive(Debug, Clone, Default)]
pub struct LexiconCompiler {
    sources: Vec<PackSource>,
}

impl LexiconCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The packs embedded in the binary.
    pub fn builtin() -> Self {
        BUILTIN_PACKS
            .iter()
            .fold(Self::new(), |c, (name, content)| c.with_pack(*name, *content))
    }

    /// Every `*.yaml` / `*.yml` file in `dir`, in file name order.
    pub fn from_dir(dir: &Path) -> Result<Self, LexiconError> {
        let io_err = |source| LexiconError::Io {
            path: dir.display().to_string(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == "yaml" || e == "yml");
            if path.is_file() && is_yaml {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(LexiconError::NoPacks(dir.display().to_string()));
        }

        let mut compiler = Self::new();
        for path in paths {
            let content = std::fs::read_to_string(&path).map_err(|source| LexiconError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("pack")
                .to_string();
            tracing::debug!(path = %path.display(), "Loaded lexicon pack file");
            compiler = compiler.with_pack(name, content);
        }
        Ok(compiler)
    }

    pub fn with_pack(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.sources.push(PackSource {
            name: name.into(),
            content: content.into(),
        });
        self
    }

    /// Parse, merge and validate every pack.
    pub fn build(&self) -> Result<LexiconStore, LexiconError> {
        let first = self
            .sources
            .first()
            .ok_or_else(|| LexiconError::NoPacks("<no sources>".to_string()))?;

        let mut parsed = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let pack: PackFile =
                serde_yaml::from_str(&source.content).map_err(|e| LexiconError::Parse {
                    pack: source.name.clone(),
                    source: e,
                })?;
            let name = pack.pack.clone().unwrap_or_else(|| source.name.clone());
            parsed.push((name, pack));
        }

        let (primary_name, primary) = &parsed[0];
        let baseline = primary
            .baseline
            .clone()
            .ok_or_else(|| LexiconError::MissingSection {
                pack: primary_name.clone(),
                section: "baseline",
            })?;
        let responses = primary
            .responses
            .clone()
            .ok_or_else(|| LexiconError::MissingSection {
                pack: primary_name.clone(),
                section: "responses",
            })?;
        validate_responses(primary_name, &responses)?;
        tracing::debug!(primary = %first.name, "Primary lexicon pack selected");

        let mut merger = PackMerger::default();
        for (name, pack) in &parsed {
            if pack.baseline.is_some() && name != primary_name {
                tracing::warn!(pack = %name, "Ignoring baseline section outside primary pack");
            }
            if pack.responses.is_some() && name != primary_name {
                tracing::warn!(pack = %name, "Ignoring responses section outside primary pack");
            }
            merger.merge(name, pack)?;
        }
        merger.resolve_aliases()?;

        let matchers = merger.build_matchers();
        let hash = self.compute_hash();

        let store = LexiconStore {
            hash,
            packs: merger.packs,
            symbol_index: merger
                .symbols
                .iter()
                .enumerate()
                .map(|(i, s)| (s.entry.id.clone(), i))
                .collect(),
            symbols: merger.symbols,
            emotions: merger.emotions,
            colors: merger.colors,
            actions: merger.actions,
            composite_rules: merger.rules,
            question_markers: merger.markers,
            baseline,
            responses,
            script: merger.script,
            matchers,
        };

        tracing::info!(
            hash = %store.hash(),
            symbols = store.symbols().len(),
            rules = store.composite_rules().len(),
            "Lexicon store compiled"
        );
        Ok(store)
    }

    /// Compute deterministic hash from the pack inputs.
    fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"dream_lexicon_v1");
        for source in &self.sources {
            hasher.update(source.name.as_bytes());
            hasher.update([0u8]);
            hasher.update(source.content.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

fn validate_responses(pack: &str, responses: &ResponseTexts) -> Result<(), LexiconError> {
    for (field, found) in [
        ("hints", responses.hints.len()),
        ("journaling_prompts", responses.journaling_prompts.len()),
    ] {
        if found != FIXED_TRIPLE {
            return Err(LexiconError::WrongCount {
                pack: pack.to_string(),
                field,
                expected: FIXED_TRIPLE,
                found,
            });
        }
    }
    Ok(())
}

// =============================================================================
// Merging
// =============================================================================

#[derive(Default)]
struct PackMerger {
    packs: Vec<PackInfo>,
    symbols: Vec<LexiconSymbol>,
    /// (pack, symbol id, folded forms) resolved once every pack is merged
    pending_aliases: Vec<(String, SymbolId, Vec<SurfaceForm>)>,
    emotions: Vec<CueCategory>,
    colors: Vec<ColorCategory>,
    actions: Vec<CueCategory>,
    rules: Vec<CompositeRule>,
    markers: Vec<SurfaceForm>,
    script: ScriptRanges,
    matcher_specs: Vec<MatcherSpec>,
}

impl PackMerger {
    fn merge(&mut self, pack: &str, file: &PackFile) -> Result<(), LexiconError> {
        for range in &file.native_script {
            let parsed =
                ScriptRanges::parse_range(range).ok_or_else(|| LexiconError::InvalidScriptRange {
                    range: range.clone(),
                    pack: pack.to_string(),
                })?;
            self.script.push(parsed);
        }

        if let Some(spec) = &file.matcher {
            if !self.matcher_specs.contains(spec) {
                self.matcher_specs.push(spec.clone());
            }
        }

        for symbol in &file.symbols {
            let id = fold(symbol.id.trim());
            if id.is_empty() {
                return Err(empty_form("symbol id", pack));
            }
            if self.symbols.iter().any(|s| s.entry.id == id) {
                return Err(LexiconError::DuplicateSymbol {
                    id,
                    pack: pack.to_string(),
                });
            }
            let mut entry = symbol.clone();
            entry.id = id.clone();
            self.symbols.push(LexiconSymbol {
                entry,
                forms: vec![id],
            });
        }

        for (id, forms) in &file.aliases {
            let context = format!("aliases of '{}'", id);
            let forms = fold_forms(forms, &context, pack)?;
            self.pending_aliases
                .push((pack.to_string(), fold(id.trim()), forms));
        }

        for cue in &file.emotions {
            merge_category(&mut self.emotions, cue, "emotion", pack)?;
        }
        for cue in &file.actions {
            merge_category(&mut self.actions, cue, "action", pack)?;
        }
        for color in &file.colors {
            let context = format!("color '{}'", color.key);
            let forms = fold_forms(&color.forms, &context, pack)?;
            match self.colors.iter_mut().find(|c| c.key == color.key) {
                Some(existing) => extend_unique(&mut existing.forms, forms),
                None => self.colors.push(ColorCategory {
                    key: color.key.clone(),
                    cue: color.cue.clone(),
                    forms,
                }),
            }
        }

        for rule in &file.composite_rules {
            if self.rules.iter().any(|r| r.id == rule.id) {
                return Err(LexiconError::DuplicateRule {
                    id: rule.id.clone(),
                    pack: pack.to_string(),
                });
            }
            if rule.groups.is_empty() || rule.groups.iter().any(|g| g.is_empty()) {
                return Err(LexiconError::EmptyGroup {
                    id: rule.id.clone(),
                    pack: pack.to_string(),
                });
            }
            let context = format!("composite rule '{}'", rule.id);
            let groups = rule
                .groups
                .iter()
                .map(|g| fold_forms(g, &context, pack))
                .collect::<Result<Vec<_>, _>>()?;
            self.rules.push(CompositeRule {
                groups,
                ..rule.clone()
            });
        }

        let markers = fold_forms(&file.question_markers, "question markers", pack)?;
        extend_unique(&mut self.markers, markers);

        self.packs.push(PackInfo {
            name: pack.to_string(),
            symbols: file.symbols.len(),
            rules: file.composite_rules.len(),
        });
        tracing::debug!(
            pack = %pack,
            symbols = file.symbols.len(),
            rules = file.composite_rules.len(),
            "Merged lexicon pack"
        );
        Ok(())
    }

    /// Attach alias forms to their symbols. Aliases may target a symbol
    /// declared in any pack.
    fn resolve_aliases(&mut self) -> Result<(), LexiconError> {
        let index: HashMap<&str, usize> = self
            .symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.entry.id.as_str(), i))
            .collect();

        let mut attach = Vec::with_capacity(self.pending_aliases.len());
        for (pack, id, forms) in &self.pending_aliases {
            let i = *index
                .get(id.as_str())
                .ok_or_else(|| LexiconError::UnknownAliasTarget {
                    id: id.clone(),
                    pack: pack.clone(),
                })?;
            attach.push((i, forms.clone()));
        }
        for (i, forms) in attach {
            extend_unique(&mut self.symbols[i].forms, forms);
        }
        self.pending_aliases.clear();
        Ok(())
    }

    fn build_matchers(&self) -> Vec<Arc<dyn SurfaceMatcher>> {
        self.matcher_specs
            .iter()
            .filter_map(|spec| match spec {
                MatcherSpec::SuffixTolerant { max_trailing } => Some(Arc::new(
                    SuffixTolerantMatcher::new(self.script.clone(), *max_trailing),
                )
                    as Arc<dyn SurfaceMatcher>),
                MatcherSpec::Exact => None,
            })
            .collect()
    }
}

fn merge_category(
    into: &mut Vec<CueCategory>,
    cue: &CueCategory,
    kind: &str,
    pack: &str,
) -> Result<(), LexiconError> {
    let context = format!("{} '{}'", kind, cue.label);
    let forms = fold_forms(&cue.forms, &context, pack)?;
    match into.iter_mut().find(|c| c.label == cue.label) {
        Some(existing) => extend_unique(&mut existing.forms, forms),
        None => into.push(CueCategory {
            label: cue.label.clone(),
            forms,
        }),
    }
    Ok(())
}

/// Fold every form; empty forms are rejected.
fn fold_forms(
    forms: &[String],
    context: &str,
    pack: &str,
) -> Result<Vec<SurfaceForm>, LexiconError> {
    forms
        .iter()
        .map(|f| {
            let folded = fold(f.trim());
            if folded.is_empty() {
                Err(empty_form(context, pack))
            } else {
                Ok(folded)
            }
        })
        .collect()
}

fn extend_unique(into: &mut Vec<SurfaceForm>, forms: Vec<SurfaceForm>) {
    let mut seen: HashSet<SurfaceForm> = into.iter().cloned().collect();
    for form in forms {
        if seen.insert(form.clone()) {
            into.push(form);
        }
    }
}

fn empty_form(context: &str, pack: &str) -> LexiconError {
    LexiconError::EmptyForm {
        context: context.to_string(),
        pack: pack.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MINIMAL_PRIMARY: &str = r#"
pack: mini
native_script: ["AC00-D7A3"]
symbols:
  - id: Sea
    label: "바다"
    tags: [감정]
    meaning: "m"
    advice: "a"
aliases:
  sea: [바다, " OCEAN "]
baseline:
  anxiety: { label: "A" }
  growth: { label: "G" }
  avoidance: { label: "V" }
  subconscious: { label: "S" }
  calm: { label: "C" }
responses:
  summary_with_symbols: "{symbols} / {patterns}"
  summary_pattern_fallback: "none"
  summary_without_symbols: "no symbols"
  anxiety_coping: "breathe"
  task_initiation: "start"
  golden: { growth: "g", anxiety: "a", default: "d" }
  answer: { symbols: "s", patterns: "p", advice: "v", fallback: "f" }
  hints: [h1, h2, h3]
  journaling_prompts: [p1, p2, p3]
"#;

    #[test]
    fn test_builtin_packs_compile() {
        let store = LexiconCompiler::builtin().build().unwrap();
        assert_eq!(store.symbols()[0].entry.id, "teeth");
        assert!(store.symbol("cockroach").is_some());
        assert!(store
            .composite_rules()
            .iter()
            .any(|r| r.id == "blackout_lost"));
        assert_eq!(store.responses().hints.len(), 3);
        assert!(store.script().contains('꿈'));
    }

    #[test]
    fn test_forms_are_folded() {
        let store = LexiconCompiler::new()
            .with_pack("mini", MINIMAL_PRIMARY)
            .build()
            .unwrap();
        let forms = store.forms_for("sea").unwrap();
        assert_eq!(forms, ["sea", "바다", "ocean"]);
        // Exact matcher is the default when none is declared
        assert!(store.stats().matchers.is_empty());
    }

    #[test]
    fn test_hash_is_deterministic() {
        let a = LexiconCompiler::builtin().build().unwrap();
        let b = LexiconCompiler::builtin().build().unwrap();
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.hash().len(), 64);

        let c = LexiconCompiler::new()
            .with_pack("mini", MINIMAL_PRIMARY)
            .build()
            .unwrap();
        assert_ne!(a.hash(), c.hash());
    }

    #[test]
    fn test_from_dir_orders_by_file_name() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("10_mini.yaml"), MINIMAL_PRIMARY).unwrap();
        std::fs::write(
            dir.path().join("20_more.yaml"),
            "symbols:\n  - {id: fog, label: \"안개\", meaning: m, advice: a}\naliases:\n  fog: [안개]\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = LexiconCompiler::from_dir(dir.path())
            .unwrap()
            .build()
            .unwrap();
        let ids: Vec<_> = store.symbols().iter().map(|s| s.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["sea", "fog"]);
        // Unnamed pack falls back to its file stem
        assert_eq!(store.packs()[1].name, "20_more");
    }

    #[test]
    fn test_empty_dir_is_error() {
        let dir = tempdir().unwrap();
        let err = LexiconCompiler::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, LexiconError::NoPacks(_)));
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let err = LexiconCompiler::new()
            .with_pack("mini", MINIMAL_PRIMARY)
            .with_pack("dup", "symbols:\n  - {id: SEA, label: x, meaning: m, advice: a}\n")
            .build()
            .unwrap_err();
        assert!(matches!(err, LexiconError::DuplicateSymbol { ref id, .. } if id == "sea"));
    }

    #[test]
    fn test_unknown_alias_target_rejected() {
        let err = LexiconCompiler::new()
            .with_pack("mini", MINIMAL_PRIMARY)
            .with_pack("bad", "aliases:\n  unicorn: [유니콘]\n")
            .build()
            .unwrap_err();
        assert!(matches!(err, LexiconError::UnknownAliasTarget { ref id, .. } if id == "unicorn"));
    }

    #[test]
    fn test_empty_forms_and_groups_rejected() {
        let err = LexiconCompiler::new()
            .with_pack("mini", MINIMAL_PRIMARY)
            .with_pack("bad", "emotions:\n  - {label: x, forms: [\"  \"]}\n")
            .build()
            .unwrap_err();
        assert!(matches!(err, LexiconError::EmptyForm { .. }));

        let err = LexiconCompiler::new()
            .with_pack("mini", MINIMAL_PRIMARY)
            .with_pack(
                "bad",
                "composite_rules:\n  - {id: r, pattern: p, advice: a, groups: [[바다], []]}\n",
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, LexiconError::EmptyGroup { .. }));
    }

    #[test]
    fn test_primary_must_carry_baseline_and_responses() {
        let err = LexiconCompiler::new()
            .with_pack("extra_only", "pack: extra_only\n")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            LexiconError::MissingSection { section: "baseline", .. }
        ));
    }

    #[test]
    fn test_hint_count_enforced() {
        let broken = MINIMAL_PRIMARY.replace("hints: [h1, h2, h3]", "hints: [h1]");
        let err = LexiconCompiler::new()
            .with_pack("mini", broken)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            LexiconError::WrongCount { field: "hints", found: 1, .. }
        ));
    }

    #[test]
    fn test_invalid_script_range_rejected() {
        let broken = MINIMAL_PRIMARY.replace("AC00-D7A3", "hangul");
        let err = LexiconCompiler::new()
            .with_pack("mini", broken)
            .build()
            .unwrap_err();
        assert!(matches!(err, LexiconError::InvalidScriptRange { .. }));
    }

    #[test]
    fn test_extension_merges_cue_forms() {
        let store = LexiconCompiler::builtin()
            .with_pack(
                "more",
                "emotions:\n  - {label: 불안, forms: [nervous, 불안]}\ncolors:\n  - {key: purple, cue: \"신비\", forms: [purple]}\n",
            )
            .build()
            .unwrap();
        let anxiety = store.emotions().iter().find(|e| e.label == "불안").unwrap();
        assert_eq!(anxiety.forms.iter().filter(|f| *f == "불안").count(), 1);
        assert!(anxiety.forms.iter().any(|f| f == "nervous"));
        assert_eq!(store.colors().last().unwrap().key, "purple");
    }
}

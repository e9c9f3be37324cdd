//! Native script handling and pluggable surface matching.
//!
//! Matching runs in three tiers: exact token, raw substring, then any
//! [`SurfaceMatcher`] registered on the store. The suffix-tolerant matcher
//! lets a native-script stem absorb a short particle or verb ending
//! ("치아" in "치아가").

use std::fmt;
use std::ops::RangeInclusive;

use unicode_normalization::UnicodeNormalization;

/// Canonical form used for both text and surface forms: NFC, then lowercase.
pub fn fold(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

// =============================================================================
// Script Ranges
// =============================================================================

/// Set of code point ranges treated as native-script word characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptRanges {
    ranges: Vec<RangeInclusive<u32>>,
}

impl ScriptRanges {
    /// Hangul syllables block.
    pub fn hangul() -> Self {
        Self {
            ranges: vec![0xAC00..=0xD7A3],
        }
    }

    /// Parse a "HEX-HEX" range spec. Returns `None` on malformed input or
    /// when the start is past the end.
    pub fn parse_range(spec: &str) -> Option<RangeInclusive<u32>> {
        let (start, end) = spec.trim().split_once('-')?;
        let start = u32::from_str_radix(start.trim(), 16).ok()?;
        let end = u32::from_str_radix(end.trim(), 16).ok()?;
        (start <= end).then_some(start..=end)
    }

    pub fn push(&mut self, range: RangeInclusive<u32>) {
        if !self.ranges.contains(&range) {
            self.ranges.push(range);
        }
    }

    pub fn contains(&self, c: char) -> bool {
        let cp = c as u32;
        self.ranges.iter().any(|r| r.contains(&cp))
    }

    /// ASCII alphanumerics and native-script characters.
    pub fn is_word_char(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || self.contains(c)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }
}

// =============================================================================
// Surface Matchers
// =============================================================================

/// Tier-3 matching strategy for a surface form against folded raw text.
pub trait SurfaceMatcher: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn matches(&self, text: &str, form: &str) -> bool;
}

/// Matches a form that starts a word and is followed by at most
/// `max_trailing` native-script characters before the word ends.
#[derive(Debug, Clone)]
pub struct SuffixTolerantMatcher {
    script: ScriptRanges,
    max_trailing: usize,
}

impl SuffixTolerantMatcher {
    pub fn new(script: ScriptRanges, max_trailing: usize) -> Self {
        Self {
            script,
            max_trailing,
        }
    }
}

impl SurfaceMatcher for SuffixTolerantMatcher {
    fn name(&self) -> &str {
        "suffix_tolerant"
    }

    fn matches(&self, text: &str, form: &str) -> bool {
        if form.is_empty() {
            return false;
        }
        text.match_indices(form).any(|(at, _)| {
            let starts_word = text[..at]
                .chars()
                .next_back()
                .map_or(true, |c| !self.script.is_word_char(c));
            if !starts_word {
                return false;
            }
            let mut trailing = 0;
            for c in text[at + form.len()..].chars() {
                if !self.script.is_word_char(c) {
                    break;
                }
                if !self.script.contains(c) {
                    return false;
                }
                trailing += 1;
                if trailing > self.max_trailing {
                    return false;
                }
            }
            true
        })
    }
}

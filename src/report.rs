//! Markdown export of a journal entry.

use std::fmt::Write;

use dream_types::JournalEntry;

/// Render a full interpretation report. Empty sections get a placeholder
/// line instead of being dropped.
pub fn to_markdown(entry: &JournalEntry) -> String {
    let a = &entry.analysis;
    let mut out = String::new();

    let symbols = bullets(a.symbols.iter().map(|s| format!("{}: {}", s.label, s.meaning)));
    let emotions = joined_or(a.emotions.iter().cloned(), "(감정 키워드 없음)");
    let colors = joined_or(
        a.colors.iter().map(|c| format!("{}({})", c.key, c.cue)),
        "(색 단서 없음)",
    );
    let actions = joined_or(a.actions.iter().cloned(), "(행동 단서 없음)");
    let patterns = bullets(a.patterns.iter().cloned());
    let advice = bullets(a.advice.iter().cloned());
    let prompts = bullets(a.journaling_prompts.iter().cloned());

    // Writing to a String cannot fail
    let _ = writeln!(out, "# DreamInsight 꿈 해석 리포트\n");
    let _ = writeln!(
        out,
        "**작성일:** {}\n",
        entry.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "## 꿈 내용\n{}\n", entry.text);
    let _ = writeln!(out, "## 요약\n{}\n", a.summary);
    let _ = writeln!(out, "## 상징 해석\n{}\n", or_placeholder(symbols, "(상징 없음)"));
    let _ = writeln!(
        out,
        "## 감정/색/행동 단서\n- 감정: {}\n- 색: {}\n- 행동: {}\n",
        emotions, colors, actions
    );
    let _ = writeln!(out, "## 패턴\n{}\n", or_placeholder(patterns, "(패턴 미도출)"));
    let _ = writeln!(out, "## 실천 조언\n{}\n", or_placeholder(advice, "(조언 없음)"));
    let _ = writeln!(
        out,
        "## 저널 프롬프트\n{}\n",
        or_placeholder(prompts, "(프롬프트 없음)")
    );
    if let Some(answer) = &a.answer {
        let _ = writeln!(out, "## 질문에 대한 답\n{}\n", answer);
    }
    if let Some(hints) = &a.hints {
        let _ = writeln!(out, "## 기록 힌트\n{}\n", bullets(hints.iter().cloned()));
    }
    let _ = write!(out, "---\nGI Score(내부): {}", a.score);
    out
}

/// `dream-report-YYYY-MM-DD.md`, dated by the entry's creation day (UTC).
pub fn file_name(entry: &JournalEntry) -> String {
    format!("dream-report-{}.md", entry.created_at.format("%Y-%m-%d"))
}

fn bullets(items: impl Iterator<Item = String>) -> String {
    items
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn joined_or(items: impl Iterator<Item = String>, placeholder: &str) -> String {
    or_placeholder(items.collect::<Vec<_>>().join(", "), placeholder)
}

fn or_placeholder(rendered: String, placeholder: &str) -> String {
    if rendered.is_empty() {
        placeholder.to_string()
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use dream_types::{Analysis, ColorCue, SymbolEntry};
    use uuid::Uuid;

    fn entry(analysis: Analysis) -> JournalEntry {
        let created_at = DateTime::<Utc>::from_timestamp_millis(1_718_000_000_000).unwrap();
        JournalEntry::new(Uuid::nil(), "검은 바다에 떨어졌다", created_at, analysis)
    }

    fn empty_analysis() -> Analysis {
        serde_json::from_value(serde_json::json!({ "summary": "요약", "score": 100.8 })).unwrap()
    }

    #[test]
    fn test_file_name_uses_creation_date() {
        assert_eq!(file_name(&entry(empty_analysis())), "dream-report-2024-06-10.md");
    }

    #[test]
    fn test_placeholders_for_empty_sections() {
        let md = to_markdown(&entry(empty_analysis()));
        assert!(md.contains("## 상징 해석\n(상징 없음)"));
        assert!(md.contains("- 감정: (감정 키워드 없음)"));
        assert!(md.contains("- 색: (색 단서 없음)"));
        assert!(md.contains("## 패턴\n(패턴 미도출)"));
        assert!(!md.contains("## 질문에 대한 답"));
        assert!(md.ends_with("GI Score(내부): 100.8"));
    }

    #[test]
    fn test_full_report_sections() {
        let mut analysis = empty_analysis();
        analysis.symbols = vec![SymbolEntry {
            id: "water".to_string(),
            label: "물/바다".to_string(),
            tags: vec![],
            meaning: "감정의 깊이".to_string(),
            advice: "a".to_string(),
        }];
        analysis.colors = vec![ColorCue {
            key: "black".to_string(),
            cue: "무의식·두려움".to_string(),
        }];
        analysis.advice = vec!["a".to_string(), "golden".to_string()];
        analysis.answer = Some("답변".to_string());

        let md = to_markdown(&entry(analysis));
        assert!(md.starts_with("# DreamInsight 꿈 해석 리포트"));
        assert!(md.contains("## 꿈 내용\n검은 바다에 떨어졌다"));
        assert!(md.contains("- 물/바다: 감정의 깊이"));
        assert!(md.contains("- 색: black(무의식·두려움)"));
        assert!(md.contains("## 실천 조언\n- a\n- golden"));
        assert!(md.contains("## 질문에 대한 답\n답변"));
    }
}

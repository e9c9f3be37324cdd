//! Dream Insight Command Line Interface
//!
//! Analyze dream narratives, keep a local journal, and inspect the lexicon.
//!
//! # Usage
//!
//! ```bash
//! # Analyze one dream
//! dream_cli analyze --text "높은 곳에서 떨어지는 꿈을 꿨어요. 왜 그럴까요?"
//! echo "치아가 빠지는 꿈" | dream_cli analyze --format json
//!
//! # Analyze one dream per line, in parallel
//! dream_cli batch --file dreams.txt --format json
//!
//! # Journal
//! dream_cli journal add --text "시험에 늦는 꿈"
//! dream_cli journal list
//! dream_cli journal export <ID> --out reports/
//!
//! # Lexicon
//! dream_cli lexicon stats
//! dream_cli --lexicon-dir config/lexicon lexicon symbols
//! ```

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use uuid::Uuid;

use dream_insight::{report, Analysis, AppConfig, DreamAnalyzer, JournalStore, LexiconStore};

#[derive(Parser)]
#[command(name = "dream_cli")]
#[command(version = "0.1.0")]
#[command(about = "Rule and lexicon based dream interpretation")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: json, text, or pretty (default)
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Lexicon pack directory (defaults to the built-in packs)
    #[arg(long, global = true, env = "DREAM_LEXICON_DIR")]
    lexicon_dir: Option<PathBuf>,

    /// Journal file
    #[arg(long, global = true, env = "DREAM_JOURNAL_PATH")]
    journal_path: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single dream narrative
    Analyze {
        /// Input file (reads stdin if neither --file nor --text is given)
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Dream text
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Analyze one dream per non-empty line
    Batch {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Manage the dream journal
    Journal {
        #[command(subcommand)]
        action: JournalAction,
    },

    /// Inspect the compiled lexicon
    Lexicon {
        #[command(subcommand)]
        action: LexiconAction,
    },
}

#[derive(Subcommand)]
enum JournalAction {
    /// Analyze and record a dream
    Add {
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        #[arg(short, long)]
        text: Option<String>,
    },
    /// List entries, newest first
    List,
    /// Delete an entry by id
    Delete { id: Uuid },
    /// Write an entry's Markdown report
    Export {
        id: Uuid,

        /// Output directory (prints to stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum LexiconAction {
    /// Show store statistics and hash
    Stats,
    /// List symbols with their surface forms
    Symbols,
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    let result = run(cli);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::from_env();
    if cli.lexicon_dir.is_some() {
        config.lexicon_dir = cli.lexicon_dir;
    }
    if let Some(path) = cli.journal_path {
        config.journal_path = path;
    }

    match cli.command {
        Commands::Analyze { file, text } => cmd_analyze(&config, file, text, cli.format),
        Commands::Batch { file } => cmd_batch(&config, file, cli.format),
        Commands::Journal { action } => cmd_journal(&config, action, cli.format),
        Commands::Lexicon { action } => cmd_lexicon(&config, action, cli.format),
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn cmd_analyze(
    config: &AppConfig,
    file: Option<PathBuf>,
    text: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let bytes = read_input(file, text)?;
    let analyzer = load_analyzer(config)?;
    let analysis = analyzer.analyze_bytes(&bytes);
    print_analysis(&analysis, format)
}

fn cmd_batch(config: &AppConfig, file: PathBuf, format: OutputFormat) -> Result<()> {
    let bytes =
        std::fs::read(&file).with_context(|| format!("Failed to read '{}'", file.display()))?;
    let content = String::from_utf8_lossy(&bytes);
    let dreams: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let analyzer = load_analyzer(config)?;
    let analyses = analyzer.analyze_batch(&dreams);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&analyses)?);
        }
        OutputFormat::Text | OutputFormat::Pretty => {
            for (i, (dream, analysis)) in dreams.iter().zip(&analyses).enumerate() {
                println!("{} {}", format!("[{}]", i + 1).cyan().bold(), dream);
                print_analysis(analysis, format)?;
                println!();
            }
            println!("{} Analyzed {} dream(s)", "OK".green(), analyses.len());
        }
    }
    Ok(())
}

fn cmd_journal(config: &AppConfig, action: JournalAction, format: OutputFormat) -> Result<()> {
    let mut journal = JournalStore::open(&config.journal_path, config.journal_max_entries)?;

    match action {
        JournalAction::Add { file, text } => {
            let text = String::from_utf8_lossy(&read_input(file, text)?).into_owned();
            let analyzer = load_analyzer(config)?;
            let analysis = analyzer.analyze(&text);
            let entry = journal.add(text, analysis)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entry)?),
                _ => {
                    println!("{} Recorded {}", "OK".green(), entry.id);
                    print_analysis(&entry.analysis, format)?;
                }
            }
        }
        JournalAction::List => match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(journal.list())?),
            _ => {
                if journal.is_empty() {
                    let note = format!("(no journal entries in {})", journal.path().display());
                    println!("{}", note.dimmed());
                }
                for entry in journal.list() {
                    println!(
                        "{}  {}  {}",
                        entry.id.to_string().yellow(),
                        entry.created_at.format("%Y-%m-%d %H:%M"),
                        preview(&entry.text, 40)
                    );
                }
            }
        },
        JournalAction::Delete { id } => {
            journal.delete(id)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::json!({ "deleted": id })),
                _ => println!("{} Deleted {}", "OK".green(), id),
            }
        }
        JournalAction::Export { id, out } => {
            let entry = journal
                .get(id)
                .with_context(|| format!("Journal entry {} not found", id))?;
            let markdown = report::to_markdown(entry);
            match out {
                Some(dir) => {
                    std::fs::create_dir_all(&dir)
                        .with_context(|| format!("Failed to create '{}'", dir.display()))?;
                    let path = dir.join(report::file_name(entry));
                    std::fs::write(&path, markdown)
                        .with_context(|| format!("Failed to write '{}'", path.display()))?;
                    println!("{} Wrote {}", "OK".green(), path.display());
                }
                None => println!("{}", markdown),
            }
        }
    }
    Ok(())
}

fn cmd_lexicon(config: &AppConfig, action: LexiconAction, format: OutputFormat) -> Result<()> {
    let store = config.load_lexicon()?;

    match action {
        LexiconAction::Stats => {
            let stats = store.stats();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                _ => print!("{}", stats),
            }
        }
        LexiconAction::Symbols => print_symbols(&store, format)?,
    }
    Ok(())
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_analysis(analysis: &Analysis, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(analysis)?),
        OutputFormat::Text => {
            println!("{}", analysis.summary);
            for advice in &analysis.advice {
                println!("- {}", advice);
            }
            if let Some(answer) = &analysis.answer {
                println!("{}", answer);
            }
        }
        OutputFormat::Pretty => {
            println!("{}", analysis.summary.bold());
            if !analysis.symbols.is_empty() {
                println!("\n{}", "Symbols".cyan().bold());
                for symbol in &analysis.symbols {
                    println!("  {} {}", symbol.label.yellow(), symbol.meaning.dimmed());
                }
            }
            let cues = [
                ("Emotions", analysis.emotions.join(", ")),
                (
                    "Colors",
                    analysis
                        .colors
                        .iter()
                        .map(|c| format!("{}({})", c.key, c.cue))
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
                ("Actions", analysis.actions.join(", ")),
            ];
            for (name, value) in cues.iter().filter(|(_, v)| !v.is_empty()) {
                println!("{}: {}", name.cyan(), value);
            }
            if !analysis.patterns.is_empty() {
                println!("\n{}", "Patterns".cyan().bold());
                for pattern in &analysis.patterns {
                    println!("  • {}", pattern);
                }
            }
            println!("\n{}", "Advice".cyan().bold());
            let last = analysis.advice.len().saturating_sub(1);
            for (i, advice) in analysis.advice.iter().enumerate() {
                if i == last {
                    println!("  ★ {}", advice.green());
                } else {
                    println!("  - {}", advice);
                }
            }
            if let Some(answer) = &analysis.answer {
                println!("\n{}\n  {}", "Answer".cyan().bold(), answer);
            }
            if let Some(hints) = &analysis.hints {
                println!("\n{}", "Hints".cyan().bold());
                for hint in hints {
                    println!("  ? {}", hint);
                }
            }
            println!("\nGI Score: {}", analysis.score);
        }
    }
    Ok(())
}

fn print_symbols(store: &LexiconStore, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let symbols: Vec<_> = store
                .symbols()
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "id": s.entry.id,
                        "label": s.entry.label,
                        "tags": s.entry.tags,
                        "forms": s.forms,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&symbols)?);
        }
        _ => {
            for s in store.symbols() {
                println!(
                    "{:<16} {:<12} {}",
                    s.entry.id.yellow(),
                    s.entry.label,
                    s.forms[1..].join(", ").dimmed()
                );
            }
        }
    }
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn load_analyzer(config: &AppConfig) -> Result<DreamAnalyzer> {
    let store: Arc<LexiconStore> = config.load_lexicon().context("Failed to load lexicon")?;
    Ok(DreamAnalyzer::new(store))
}

/// Raw input bytes. Decoding is left to the analyzer, which replaces
/// undecodable sequences instead of failing.
fn read_input(file: Option<PathBuf>, text: Option<String>) -> Result<Vec<u8>> {
    if let Some(text) = text {
        return Ok(text.into_bytes());
    }
    match file {
        Some(path) => {
            std::fs::read(&path).with_context(|| format!("Failed to read '{}'", path.display()))
        }
        None => {
            if io::stdin().is_terminal() {
                bail!("No input provided. Use --text, --file or pipe input via stdin.");
            }
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        single_line
    } else {
        let cut: String = single_line.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_input_keeps_undecodable_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dream.txt");
        let mut bytes = "고양이가 나를 쳐다봤어요 ".as_bytes().to_vec();
        bytes.extend_from_slice(&[0xc3, 0x28, 0xff]);
        std::fs::write(&path, &bytes).unwrap();

        let read = read_input(Some(path), None).unwrap();
        assert_eq!(read, bytes);

        let analyzer = load_analyzer(&AppConfig::default()).unwrap();
        let analysis = analyzer.analyze_bytes(&read);
        assert_eq!(analysis.symbols[0].id, "feline");
    }

    #[test]
    fn test_read_input_prefers_text_argument() {
        let read = read_input(None, Some("곰이 나타났어요".to_string())).unwrap();
        assert_eq!(read, "곰이 나타났어요".as_bytes());
    }

    #[test]
    fn test_preview_truncates_on_chars() {
        assert_eq!(preview("검은  바다\n꿈", 10), "검은 바다 꿈");
        assert_eq!(preview("가나다라마", 3), "가나다…");
    }
}

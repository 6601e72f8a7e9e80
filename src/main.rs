//! # chapterpack CLI
//!
//! Command-line interface for the chapterpack library.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chapterpack::cli::{Args, ChapterSpec};
use chapterpack::config::{ExportConfig, SessionConfig};
use chapterpack::export::{suggested_file_name, write_json};
use chapterpack::{ChapterpackError, Session, SourceId};

fn main() {
    // Progress and per-file problems are printed on stdout; logs are opt-in
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChapterpackError> {
    let args = <Args as ClapParser>::parse();

    println!("📦 chapterpack v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = SessionConfig::new().with_excerpt_chars(args.excerpt);
    let mut session = Session::new(config);

    // Step 1: Load every file; a bad file is reported and skipped
    for outcome in session.load_paths(&args.files) {
        match outcome.result {
            Ok(id) => {
                let file = session.registry().require(&id)?;
                println!(
                    "📂 {}: {} ({} messages)",
                    outcome.name,
                    file.channel.label(),
                    file.len()
                );
            }
            Err(e) => println!("⚠️  {}", e),
        }
    }

    if args.preview {
        print_preview(&session);
        return Ok(());
    }

    // Step 2: Replay clicks and commit chapters; a bad chapter is reported and skipped
    println!();
    for spec in &args.chapters {
        match commit_chapter(&mut session, spec) {
            Ok((label, count)) => println!("📑 Chapter: {} ({} messages)", label, count),
            Err(e) => {
                println!("⚠️  Chapter {} skipped: {}", spec, e);
                if let Ok(id) = find_source(&session, spec) {
                    session.clear_selection(&id);
                }
            }
        }
    }

    if session.chapters().is_empty() {
        return Err(ChapterpackError::invalid_argument(
            "no chapters to export (use --chapter FILE:POSITIONS)",
        ));
    }

    // Step 3: Build and write the export
    let name = args.name.unwrap_or_default();
    let report = session.export(&name);
    for skipped in &report.skipped {
        println!(
            "⚠️  Chapter {} skipped: source {} is not loaded",
            skipped.index + 1,
            skipped.source_id
        );
    }

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(suggested_file_name(&name)));
    let export_config = ExportConfig::new().with_pretty(args.pretty);
    write_json(&report.document, &output, &export_config)?;

    println!();
    println!(
        "✅ Done! {} chapters written to {}",
        report.document.entries.len(),
        output.display()
    );
    Ok(())
}

/// Replays the clicks of `spec` and commits them. Returns the chapter's
/// header and message count.
fn commit_chapter(
    session: &mut Session,
    spec: &ChapterSpec,
) -> Result<(String, usize), ChapterpackError> {
    let id = find_source(session, spec)?;
    for &position in &spec.clicks {
        session.click(&id, position)?;
    }
    let label = session.registry().require(&id)?.channel.label();
    let chapter = session.commit(&id)?;
    Ok((label, chapter.len()))
}

fn find_source(session: &Session, spec: &ChapterSpec) -> Result<SourceId, ChapterpackError> {
    let name = spec.file_name();
    session
        .registry()
        .find_by_name(&name)
        .map(|f| f.id.clone())
        .ok_or_else(|| {
            ChapterpackError::invalid_argument(format!(
                "'{}' is not loaded (pass it as an input file)",
                spec.file
            ))
        })
}

fn print_preview(session: &Session) {
    for file in session.registry().iter() {
        println!();
        println!("📖 {} ({})", file.name, file.channel.label());
        let Ok(items) = session.items(&file.id) else {
            continue;
        };
        for item in items {
            println!("  [{:>4}] {}: {}", item.position, item.author, item.excerpt);
        }
    }
}

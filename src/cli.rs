//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure
//! - [`ChapterSpec`] - one `--chapter FILE:POSITIONS` argument

use std::path::{Path, PathBuf};

use clap::Parser;

/// Pick message ranges from channel exports and bundle them into one
/// chaptered JSON document.
#[derive(Parser, Debug, Clone)]
#[command(name = "chapterpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chapterpack lore.json ooc.json --preview
    chapterpack lore.json -n session-12 -c lore.json:10,24
    chapterpack lore.json ooc.json -n night -c ooc.json:3 -c lore.json:0,7 -o night.json --pretty

Each --chapter replays its positions as clicks on FILE, in order, then
commits the selection. Clicking outside the run extends it, clicking inside
trims it to that message, clicking an end collapses it onto the other end.")]
pub struct Args {
    /// Channel export files (.json)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Name of the export document
    #[arg(short, long, required_unless_present = "preview")]
    pub name: Option<String>,

    /// Clicks to replay on FILE, then commit as a chapter (repeatable)
    #[arg(short, long = "chapter", value_name = "FILE:POSITIONS")]
    pub chapters: Vec<ChapterSpec>,

    /// Path to output file [default: <NAME>.json]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the export
    #[arg(long)]
    pub pretty: bool,

    /// Print the numbered messages of every file and exit
    #[arg(long)]
    pub preview: bool,

    /// Characters of message content shown by --preview
    #[arg(long, value_name = "N", default_value_t = 100)]
    pub excerpt: usize,
}

/// Clicks to replay on one loaded file, e.g. `lore.json:10,24`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterSpec {
    /// File as given on the command line
    pub file: String,
    /// Positions to click, in order
    pub clicks: Vec<usize>,
}

impl ChapterSpec {
    /// File name the spec refers to, matching the session's display names.
    pub fn file_name(&self) -> String {
        Path::new(&self.file)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.clone())
    }
}

impl std::fmt::Display for ChapterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let clicks: Vec<String> = self.clicks.iter().map(usize::to_string).collect();
        write!(f, "{}:{}", self.file, clicks.join(","))
    }
}

impl std::str::FromStr for ChapterSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((file, positions)) = s.rsplit_once(':') else {
            return Err(format!("Expected FILE:POSITIONS, got '{}'", s));
        };
        if file.is_empty() {
            return Err(format!("Missing file name in '{}'", s));
        }

        let clicks = positions
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.parse::<usize>()
                    .map_err(|_| format!("Invalid position '{}' in '{}'", p, s))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if clicks.is_empty() {
            return Err(format!("No positions given in '{}'", s));
        }

        Ok(Self {
            file: file.to_string(),
            clicks,
        })
    }
}

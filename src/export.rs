//! Building and writing the consolidated export document.
//!
//! # Format
//!
//! ```json
//! {
//!   "name": "session-12",
//!   "entries": [
//!     {"channel": {"id": "1", "name": "lore"}, "messages": [ ... ]},
//!     {"channel": {"id": "2", "name": "ooc"}, "messages": [ ... ]}
//!   ]
//! }
//! ```
//!
//! One entry per chapter, in chapter order. Each entry holds the full,
//! untouched message objects of the chapter, in the order they appear in
//! the source file.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::chapter::Chapter;
use crate::config::ExportConfig;
use crate::error::Result;
use crate::registry::SourceRegistry;
use crate::source::{Channel, Message, SourceFile, SourceId};

/// The exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub name: String,
    pub entries: Vec<ExportEntry>,
}

/// One chapter's worth of messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub channel: Channel,
    pub messages: Vec<Message>,
}

/// A chapter left out because its source file is no longer loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedChapter {
    /// Index of the chapter in the chapter list
    pub index: usize,
    pub source_id: SourceId,
}

/// Result of [`serialize`]: the document plus whatever had to be left out.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub document: ExportDocument,
    pub skipped: Vec<SkippedChapter>,
}

impl ExportReport {
    /// `true` when every chapter made it into the document.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Messages of `file` whose id is in `chapter`, in file order.
pub fn select_messages<'a>(file: &'a SourceFile, chapter: &Chapter) -> Vec<&'a Message> {
    let wanted: HashSet<&str> = chapter.message_ids.iter().map(String::as_str).collect();
    file.messages
        .iter()
        .filter(|m| wanted.contains(m.id().as_ref()))
        .collect()
}

/// Builds the export document for `chapters`.
///
/// Chapters whose source is missing from `registry` are skipped and listed
/// in [`ExportReport::skipped`]; the rest are still exported.
pub fn serialize(
    name: impl Into<String>,
    chapters: &[Chapter],
    registry: &SourceRegistry,
) -> ExportReport {
    let mut entries = Vec::with_capacity(chapters.len());
    let mut skipped = Vec::new();

    for (index, chapter) in chapters.iter().enumerate() {
        let Some(file) = registry.get(&chapter.source_id) else {
            warn!(chapter = index, source = %chapter.source_id, "source not loaded, chapter skipped");
            skipped.push(SkippedChapter {
                index,
                source_id: chapter.source_id.clone(),
            });
            continue;
        };

        let messages = select_messages(file, chapter).into_iter().cloned().collect();

        entries.push(ExportEntry {
            channel: file.channel.clone(),
            messages,
        });
    }

    let document = ExportDocument {
        name: name.into(),
        entries,
    };
    info!(
        name = %document.name,
        entries = document.entries.len(),
        skipped = skipped.len(),
        "export built"
    );
    ExportReport { document, skipped }
}

/// File name offered for an export called `name`.
///
/// ```
/// use chapterpack::export::suggested_file_name;
///
/// assert_eq!(suggested_file_name("session-12"), "session-12.json");
/// ```
pub fn suggested_file_name(name: &str) -> String {
    format!("{name}.json")
}

/// Converts the document to a JSON string.
pub fn to_json(document: &ExportDocument, config: &ExportConfig) -> Result<String> {
    let json = if config.pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    Ok(json)
}

/// Writes the document to `path` as JSON.
pub fn write_json(
    document: &ExportDocument,
    path: impl AsRef<Path>,
    config: &ExportConfig,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    if config.pretty {
        serde_json::to_writer_pretty(&mut writer, document)?;
    } else {
        serde_json::to_writer(&mut writer, document)?;
    }
    writer.flush()?;
    Ok(())
}

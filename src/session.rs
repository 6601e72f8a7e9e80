//! Application controller.
//!
//! [`Session`] owns the loaded files, the per-file selections and the chapter
//! list, and is the single entry point for user commands: load a file, click
//! a message, commit a selection, drop a chapter, export.
//!
//! # Example
//!
//! ```
//! use chapterpack::session::Session;
//!
//! let text = r#"{
//!   "channel": {"id": "1", "name": "general"},
//!   "messages": [
//!     {"id": "a", "author": {"name": "alice"}, "content": "one"},
//!     {"id": "b", "author": {"name": "bob"}, "content": "two"},
//!     {"id": "c", "author": {"name": "alice"}, "content": "three"}
//!   ]
//! }"#;
//!
//! let mut session = Session::default();
//! let id = session.load_str("general.json", text)?;
//!
//! session.click(&id, 1)?;
//! let summary = session.click(&id, 2)?;
//! assert_eq!(summary.message_count, 2);
//!
//! session.commit(&id)?;
//! let report = session.export("best-of");
//! assert_eq!(report.document.entries[0].messages.len(), 2);
//! # Ok::<(), chapterpack::ChapterpackError>(())
//! ```

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::chapter::{Chapter, ChapterList};
use crate::config::SessionConfig;
use crate::error::{ChapterpackError, Result};
use crate::export::{self, ExportReport, select_messages};
use crate::registry::{SourceRegistry, parse_export};
use crate::selection::{SelectionEngine, SelectionSummary};
use crate::source::{Message, SourceFile, SourceId};

/// One renderable message row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageItem {
    pub source_id: SourceId,
    pub position: usize,
    pub message_id: String,
    pub selected: bool,
    /// Nickname or account name
    pub author: String,
    /// Content cut to [`SessionConfig::excerpt_chars`]
    pub excerpt: String,
}

/// Selection panel contents: totals plus one card per source with a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionPreview {
    pub summary: SelectionSummary,
    pub cards: Vec<SelectionCard>,
}

/// Preview of the pending selection in one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCard {
    pub source_id: SourceId,
    /// `"<category> / #<channel>"`
    pub header: String,
    /// Excerpts of the first selected messages
    pub lines: Vec<String>,
    /// Selected messages not listed in `lines`
    pub more: usize,
}

impl SelectionCard {
    /// The trailing `"... and N more"` line, if any.
    pub fn more_label(&self) -> Option<String> {
        (self.more > 0).then(|| format!("... and {} more", self.more))
    }
}

/// A committed chapter resolved against its loaded source.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterView<'a> {
    /// Position in the chapter list
    pub index: usize,
    /// `"<category> / #<channel>"`
    pub header: String,
    /// Chapter messages, in file order
    pub messages: Vec<&'a Message>,
}

/// Outcome of loading one path in a batch.
#[derive(Debug)]
pub struct LoadOutcome {
    /// Display name (file name) of the path
    pub name: String,
    pub result: Result<SourceId>,
}

/// Loaded files, selections and chapters of one working session.
#[derive(Debug, Default)]
pub struct Session {
    config: SessionConfig,
    registry: SourceRegistry,
    selection: SelectionEngine,
    chapters: ChapterList,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn chapters(&self) -> &[Chapter] {
        self.chapters.list()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Parses and registers an export under the display name `name`.
    ///
    /// A second file with the same name is rejected and the loaded one kept.
    pub fn load_str(&mut self, name: &str, text: &str) -> Result<SourceId> {
        if self.registry.find_by_name(name).is_some() {
            return Err(ChapterpackError::duplicate_name(name));
        }
        let (channel, messages) = parse_export(name, text)?;
        let count = messages.len();
        let id = self.registry.register(name, channel, messages);
        info!(file = name, source = %id, messages = count, "file loaded");
        Ok(id)
    }

    /// Reads and registers the export at `path`, named after its file name.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<SourceId> {
        let path = path.as_ref();
        let name = display_name(path);

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if self.config.json_only && !is_json {
            return Err(ChapterpackError::UnsupportedFile { name });
        }
        if self.registry.find_by_name(&name).is_some() {
            return Err(ChapterpackError::duplicate_name(name));
        }

        let text = fs::read_to_string(path)?;
        self.load_str(&name, &text)
    }

    /// Loads every path, one outcome per path. A failing file does not stop
    /// the others.
    pub fn load_paths<P: AsRef<Path>>(
        &mut self,
        paths: impl IntoIterator<Item = P>,
    ) -> Vec<LoadOutcome> {
        paths
            .into_iter()
            .map(|path| {
                let path = path.as_ref();
                let result = self.load_path(path);
                if let Err(e) = &result {
                    warn!(path = %path.display(), error = %e, "file not loaded");
                }
                LoadOutcome {
                    name: display_name(path),
                    result,
                }
            })
            .collect()
    }

    /// Drops a file and its pending selection. Chapters that reference it
    /// are kept and skipped on export.
    pub fn remove_source(&mut self, source_id: &SourceId) -> Option<SourceFile> {
        self.selection.clear(source_id);
        self.registry.remove(source_id)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Clicks the message at `position` of a source and returns the updated
    /// totals across all sources.
    pub fn click(&mut self, source_id: &SourceId, position: usize) -> Result<SelectionSummary> {
        let file = self.registry.require(source_id)?;
        if position >= file.len() {
            return Err(ChapterpackError::PositionOutOfRange {
                position,
                len: file.len(),
            });
        }
        self.selection.click(source_id, position)?;
        Ok(self.selection.summary())
    }

    pub fn selected(&self, source_id: &SourceId) -> Vec<usize> {
        self.selection.selected(source_id)
    }

    /// Drops the pending selection of a source. Returns `false` if there was none.
    pub fn clear_selection(&mut self, source_id: &SourceId) -> bool {
        self.selection.clear(source_id)
    }

    pub fn summary(&self) -> SelectionSummary {
        self.selection.summary()
    }

    /// Message rows of a source, with their selection flags.
    pub fn items(&self, source_id: &SourceId) -> Result<Vec<MessageItem>> {
        let file = self.registry.require(source_id)?;
        Ok(file
            .messages
            .iter()
            .enumerate()
            .map(|(position, message)| MessageItem {
                source_id: source_id.clone(),
                position,
                message_id: message.id().into_owned(),
                selected: self.selection.is_selected(source_id, position),
                author: message.display_author().to_string(),
                excerpt: message.excerpt(self.config.excerpt_chars),
            })
            .collect())
    }

    /// Cards for every loaded source with a pending selection, in load order.
    pub fn selection_preview(&self) -> SelectionPreview {
        let cards = self
            .registry
            .iter()
            .filter_map(|file| {
                let positions = self.selection.selected(&file.id);
                if positions.is_empty() {
                    return None;
                }
                let lines = positions
                    .iter()
                    .take(self.config.card_lines)
                    .filter_map(|&p| file.messages.get(p))
                    .map(|m| m.excerpt(self.config.excerpt_chars))
                    .collect();
                Some(SelectionCard {
                    source_id: file.id.clone(),
                    header: file.channel.label(),
                    lines,
                    more: positions.len().saturating_sub(self.config.card_lines),
                })
            })
            .collect();

        SelectionPreview {
            summary: self.selection.summary(),
            cards,
        }
    }

    // =========================================================================
    // Chapters & export
    // =========================================================================

    /// Commits the pending selection of a source as a new chapter.
    pub fn commit(&mut self, source_id: &SourceId) -> Result<&Chapter> {
        self.chapters
            .commit(&mut self.selection, &self.registry, source_id)
    }

    pub fn remove_chapter(&mut self, index: usize) -> Result<Chapter> {
        self.chapters.remove(index)
    }

    /// The chapter at `index` with its header and messages.
    ///
    /// Fails with [`ChapterpackError::MissingSource`] once its file has been
    /// removed.
    pub fn chapter_view(&self, index: usize) -> Result<ChapterView<'_>> {
        let chapters = self.chapters.list();
        let chapter = chapters
            .get(index)
            .ok_or(ChapterpackError::ChapterOutOfRange {
                index,
                len: chapters.len(),
            })?;
        let file = self.registry.require(&chapter.source_id)?;
        Ok(ChapterView {
            index,
            header: file.channel.label(),
            messages: select_messages(file, chapter),
        })
    }

    /// Views of every chapter whose source is still loaded, in chapter order.
    pub fn chapter_views(&self) -> Vec<ChapterView<'_>> {
        (0..self.chapters.len())
            .filter_map(|index| self.chapter_view(index).ok())
            .collect()
    }

    /// Builds the export document from the current chapters.
    pub fn export(&self, name: &str) -> ExportReport {
        export::serialize(name, self.chapters.list(), &self.registry)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

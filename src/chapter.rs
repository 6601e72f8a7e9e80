//! Committed selections, in export order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChapterpackError, Result};
use crate::registry::SourceRegistry;
use crate::selection::SelectionEngine;
use crate::source::SourceId;

/// A committed run of messages from one source file.
///
/// `message_ids` are in position order at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub source_id: SourceId,
    pub message_ids: Vec<String>,
}

impl Chapter {
    pub fn len(&self) -> usize {
        self.message_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.message_ids.is_empty()
    }
}

/// Ordered list of chapters. Append order is export order.
#[derive(Debug, Default)]
pub struct ChapterList {
    chapters: Vec<Chapter>,
}

impl ChapterList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns the current selection of `source_id` into a new chapter and
    /// clears that selection.
    ///
    /// Nothing changes when the selection is empty or the source is unknown.
    pub fn commit(
        &mut self,
        selection: &mut SelectionEngine,
        registry: &SourceRegistry,
        source_id: &SourceId,
    ) -> Result<&Chapter> {
        let positions = selection.selected(source_id);
        if positions.is_empty() {
            return Err(ChapterpackError::EmptySelection {
                source_id: source_id.clone(),
            });
        }
        let file = registry.require(source_id)?;

        let message_ids = positions
            .iter()
            .map(|&p| {
                file.messages
                    .get(p)
                    .map(|m| m.id().into_owned())
                    .ok_or(ChapterpackError::PositionOutOfRange {
                        position: p,
                        len: file.len(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        selection.clear(source_id);
        debug!(source = %source_id, messages = message_ids.len(), "chapter committed");

        self.chapters.push(Chapter {
            source_id: source_id.clone(),
            message_ids,
        });
        Ok(&self.chapters[self.chapters.len() - 1])
    }

    /// Removes the chapter at `index`; later chapters shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<Chapter> {
        if index >= self.chapters.len() {
            return Err(ChapterpackError::ChapterOutOfRange {
                index,
                len: self.chapters.len(),
            });
        }
        Ok(self.chapters.remove(index))
    }

    pub fn list(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Channel, Message};

    fn registry_with(n: usize) -> (SourceRegistry, SourceId) {
        let mut registry = SourceRegistry::new();
        let messages = (0..n)
            .map(|i| Message::new(format!("m{i}"), "alice", format!("message {i}")))
            .collect();
        let id = registry.register("general.json", Channel::new("1", "general"), messages);
        (registry, id)
    }

    #[test]
    fn test_commit_maps_positions_to_ids() {
        let (registry, id) = registry_with(6);
        let mut selection = SelectionEngine::new();
        let mut chapters = ChapterList::new();

        selection.click(&id, 4).unwrap();
        selection.click(&id, 2).unwrap();

        let chapter = chapters.commit(&mut selection, &registry, &id).unwrap();
        assert_eq!(chapter.message_ids, ["m2", "m3", "m4"]);
        assert!(selection.selected(&id).is_empty());
        assert_eq!(chapters.len(), 1);
    }

    #[test]
    fn test_commit_empty_selection_fails() {
        let (registry, id) = registry_with(3);
        let mut selection = SelectionEngine::new();
        let mut chapters = ChapterList::new();

        let err = chapters.commit(&mut selection, &registry, &id).unwrap_err();
        assert!(err.is_empty_selection());
        assert!(chapters.is_empty());
    }

    #[test]
    fn test_commit_unknown_source_keeps_selection() {
        let registry = SourceRegistry::new();
        let id = SourceId::from("ghost");
        let mut selection = SelectionEngine::new();
        let mut chapters = ChapterList::new();
        selection.click(&id, 0).unwrap();

        let err = chapters.commit(&mut selection, &registry, &id).unwrap_err();
        assert!(err.is_missing_source());
        assert_eq!(selection.selected(&id), vec![0]);
    }

    #[test]
    fn test_commit_position_past_end_keeps_selection() {
        let (registry, id) = registry_with(2);
        let mut selection = SelectionEngine::new();
        let mut chapters = ChapterList::new();
        selection.click(&id, 5).unwrap();

        let err = chapters.commit(&mut selection, &registry, &id).unwrap_err();
        assert!(matches!(err, ChapterpackError::PositionOutOfRange { position: 5, len: 2 }));
        assert_eq!(selection.selected(&id), vec![5]);
    }

    #[test]
    fn test_remove_shifts_later_chapters() {
        let (registry, id) = registry_with(10);
        let mut selection = SelectionEngine::new();
        let mut chapters = ChapterList::new();
        for p in [0, 3, 6] {
            selection.click(&id, p).unwrap();
            chapters.commit(&mut selection, &registry, &id).unwrap();
        }

        let removed = chapters.remove(1).unwrap();
        assert_eq!(removed.message_ids, ["m3"]);
        assert_eq!(chapters.list()[1].message_ids, ["m6"]);
        assert_eq!(chapters.len(), 2);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut chapters = ChapterList::new();
        let err = chapters.remove(0).unwrap_err();
        assert!(matches!(err, ChapterpackError::ChapterOutOfRange { index: 0, len: 0 }));
    }
}

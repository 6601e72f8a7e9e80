//! Single-run range selection over the messages of each source file.
//!
//! Every source keeps at most one contiguous run of selected positions.
//! A click on position `p` moves the run as follows (`[s, e]` is the
//! current run):
//!
//! | state                    | click            | new run       |
//! |--------------------------|------------------|---------------|
//! | empty                    | `p`              | `[p, p]`      |
//! | `[s, s]`                 | `s`              | empty         |
//! | `[s, e]`, `s < e`        | `s`              | `[e, e]`      |
//! | `[s, e]`, `s < e`        | `e`              | `[s, s]`      |
//! | `[s, e]`                 | `s < p < e`      | `[s, p]`      |
//! | `[s, e]`                 | `p < s`          | `[p, e]`      |
//! | `[s, e]`                 | `p > e`          | `[s, p]`      |
//!
//! Anything else means the set is not a single run; the click is rejected
//! with [`ChapterpackError::InvariantViolation`] and the selection is left
//! as it was.
//!
//! # Example
//!
//! ```
//! use chapterpack::selection::SelectionEngine;
//! use chapterpack::source::SourceId;
//!
//! let mut engine = SelectionEngine::new();
//! let id = SourceId::from("general");
//!
//! engine.click(&id, 2)?;
//! assert_eq!(engine.click(&id, 5)?, Some(2..=5));
//! assert_eq!(engine.click(&id, 3)?, Some(2..=3));
//! assert_eq!(engine.click(&id, 2)?, Some(3..=3));
//! assert_eq!(engine.click(&id, 3)?, None);
//! # Ok::<(), chapterpack::ChapterpackError>(())
//! ```

use std::collections::{BTreeSet, HashMap};
use std::ops::RangeInclusive;

use tracing::debug;

use crate::error::{ChapterpackError, Result};
use crate::source::SourceId;

/// Aggregate counts over every source with a non-empty selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionSummary {
    /// Selected messages across all sources
    pub message_count: usize,
    /// Sources with at least one selected message
    pub source_count: usize,
}

impl SelectionSummary {
    pub fn is_empty(&self) -> bool {
        self.message_count == 0
    }
}

impl std::fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Selected {} messages in {} channels",
            self.message_count, self.source_count
        )
    }
}

/// Per-source selected positions.
#[derive(Debug, Default)]
pub struct SelectionEngine {
    selections: HashMap<SourceId, BTreeSet<usize>>,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one click and returns the resulting run, `None` when the
    /// click cleared the selection.
    pub fn click(
        &mut self,
        source_id: &SourceId,
        position: usize,
    ) -> Result<Option<RangeInclusive<usize>>> {
        let selected = self.selections.entry(source_id.clone()).or_default();
        let is_selected = selected.contains(&position);

        let (Some(&start), Some(&end)) = (selected.first(), selected.last()) else {
            selected.insert(position);
            debug!(source = %source_id, position, "selection started");
            return Ok(Some(position..=position));
        };
        debug!(source = %source_id, position, start, end, is_selected, "selection click");

        if is_selected {
            if start == end {
                self.selections.remove(source_id);
                return Ok(None);
            }
            if position == start {
                selected.retain(|p| !(start..end).contains(p));
            } else if position == end {
                selected.retain(|p| !(start + 1..=end).contains(p));
            } else if start < position && position < end {
                selected.retain(|&p| p <= position);
            } else {
                return Err(ChapterpackError::invariant(
                    source_id,
                    position,
                    "selected position lies outside the run",
                ));
            }
        } else if start < position && position < end {
            return Err(ChapterpackError::invariant(
                source_id,
                position,
                "unselected position inside the run",
            ));
        } else if position < start {
            selected.extend(position..start);
        } else {
            selected.extend(end + 1..=position);
        }

        Ok(run_of(selected))
    }

    /// Selected positions of a source, ascending.
    pub fn selected(&self, source_id: &SourceId) -> Vec<usize> {
        self.selections
            .get(source_id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Current run of a source, if anything is selected.
    pub fn run(&self, source_id: &SourceId) -> Option<RangeInclusive<usize>> {
        self.selections.get(source_id).and_then(run_of)
    }

    pub fn is_selected(&self, source_id: &SourceId, position: usize) -> bool {
        self.selections
            .get(source_id)
            .is_some_and(|s| s.contains(&position))
    }

    /// Drops the selection of a source. Returns whether anything was selected.
    pub fn clear(&mut self, source_id: &SourceId) -> bool {
        self.selections
            .remove(source_id)
            .is_some_and(|s| !s.is_empty())
    }

    pub fn summary(&self) -> SelectionSummary {
        self.selections
            .values()
            .filter(|s| !s.is_empty())
            .fold(SelectionSummary::default(), |acc, s| SelectionSummary {
                message_count: acc.message_count + s.len(),
                source_count: acc.source_count + 1,
            })
    }
}

fn run_of(selected: &BTreeSet<usize>) -> Option<RangeInclusive<usize>> {
    Some(*selected.first()?..=*selected.last()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> SourceId {
        SourceId::from("src")
    }

    /// Engine with the run `[start, end]` selected on `id()`.
    fn with_run(start: usize, end: usize) -> SelectionEngine {
        let mut engine = SelectionEngine::new();
        engine.click(&id(), start).unwrap();
        if end != start {
            engine.click(&id(), end).unwrap();
        }
        assert_eq!(engine.run(&id()), Some(start..=end));
        engine
    }

    #[test]
    fn test_first_click_selects_single() {
        let mut engine = SelectionEngine::new();
        assert_eq!(engine.click(&id(), 4).unwrap(), Some(4..=4));
        assert_eq!(engine.selected(&id()), vec![4]);
    }

    #[test]
    fn test_click_single_twice_clears() {
        let mut engine = SelectionEngine::new();
        engine.click(&id(), 4).unwrap();
        assert_eq!(engine.click(&id(), 4).unwrap(), None);
        assert!(engine.selected(&id()).is_empty());
        assert!(engine.summary().is_empty());
    }

    #[test]
    fn test_click_start_collapses_to_end() {
        let mut engine = with_run(2, 5);
        assert_eq!(engine.click(&id(), 2).unwrap(), Some(5..=5));
        assert_eq!(engine.selected(&id()), vec![5]);
    }

    #[test]
    fn test_click_end_collapses_to_start() {
        let mut engine = with_run(2, 5);
        assert_eq!(engine.click(&id(), 5).unwrap(), Some(2..=2));
        assert_eq!(engine.selected(&id()), vec![2]);
    }

    #[test]
    fn test_click_interior_trims_end() {
        let mut engine = with_run(2, 5);
        assert_eq!(engine.click(&id(), 3).unwrap(), Some(2..=3));
        assert_eq!(engine.selected(&id()), vec![2, 3]);
    }

    #[test]
    fn test_click_below_extends_down() {
        let mut engine = with_run(2, 5);
        assert_eq!(engine.click(&id(), 0).unwrap(), Some(0..=5));
        assert_eq!(engine.selected(&id()), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_click_above_extends_up() {
        let mut engine = with_run(2, 5);
        assert_eq!(engine.click(&id(), 7).unwrap(), Some(2..=7));
        assert_eq!(engine.summary().message_count, 6);
    }

    #[test]
    fn test_first_then_earlier_click() {
        let mut engine = SelectionEngine::new();
        engine.click(&id(), 6).unwrap();
        assert_eq!(engine.click(&id(), 1).unwrap(), Some(1..=6));
    }

    #[test]
    fn test_two_item_run_endpoints() {
        let mut engine = with_run(3, 4);
        assert_eq!(engine.click(&id(), 3).unwrap(), Some(4..=4));
        let mut engine = with_run(3, 4);
        assert_eq!(engine.click(&id(), 4).unwrap(), Some(3..=3));
    }

    #[test]
    fn test_sources_are_independent() {
        let mut engine = SelectionEngine::new();
        let other = SourceId::from("other");
        engine.click(&id(), 0).unwrap();
        engine.click(&id(), 2).unwrap();
        engine.click(&other, 9).unwrap();

        assert_eq!(engine.run(&id()), Some(0..=2));
        assert_eq!(engine.run(&other), Some(9..=9));
        assert_eq!(
            engine.summary(),
            SelectionSummary {
                message_count: 4,
                source_count: 2,
            }
        );
        assert_eq!(engine.summary().to_string(), "Selected 4 messages in 2 channels");
    }

    #[test]
    fn test_broken_run_is_rejected_unchanged() {
        let mut engine = SelectionEngine::new();
        engine
            .selections
            .insert(id(), BTreeSet::from([1, 2, 6, 7]));

        let err = engine.click(&id(), 4).unwrap_err();
        assert!(err.is_invariant_violation());
        assert_eq!(engine.selected(&id()), vec![1, 2, 6, 7]);
    }

    #[test]
    fn test_clear() {
        let mut engine = with_run(1, 3);
        assert!(engine.clear(&id()));
        assert!(!engine.clear(&id()));
        assert!(!engine.is_selected(&id(), 2));
        assert_eq!(engine.summary(), SelectionSummary::default());
    }

    #[test]
    fn test_is_selected() {
        let engine = with_run(1, 3);
        assert!(engine.is_selected(&id(), 1));
        assert!(engine.is_selected(&id(), 3));
        assert!(!engine.is_selected(&id(), 4));
        assert!(!engine.is_selected(&SourceId::from("nope"), 1));
    }
}

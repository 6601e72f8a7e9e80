//! Unified error types for chapterpack.
//!
//! Every fallible operation in the library returns [`ChapterpackError`]. Callers
//! branch on the variant (or the `is_*` helpers) to decide whether to skip an
//! item or stop.
//!
//! # Error Handling Philosophy
//!
//! - **Per-item errors** (one bad file, one orphaned chapter) are reported and
//!   skipped, never aborting a batch
//! - **Contract errors** ([`ChapterpackError::InvariantViolation`]) mean the caller
//!   clicked a position that contradicts the single-run selection; state is left
//!   untouched
//! - **Developers** get source error chains for debugging

use std::io;

use thiserror::Error;

use crate::source::SourceId;

/// A specialized [`Result`] type for chapterpack operations.
///
/// # Example
///
/// ```rust
/// use chapterpack::error::Result;
///
/// fn my_function() -> Result<usize> {
///     Ok(0)
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChapterpackError>;

/// The error type for all chapterpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChapterpackError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - An input file doesn't exist or can't be read
    /// - The export can't be written
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error while writing an export.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A channel export could not be loaded.
    ///
    /// Scope is a single file; other files keep loading.
    #[error("Failed to load '{name}': {source}")]
    Load {
        /// Display name of the file
        name: String,
        /// What was wrong with it
        #[source]
        source: LoadErrorKind,
    },

    /// The file is not a `.json` export.
    #[error("Skipped '{name}': not a .json file")]
    UnsupportedFile {
        /// Display name of the file
        name: String,
    },

    /// A file with the same display name is already loaded.
    #[error("A file named '{name}' is already loaded")]
    DuplicateName {
        /// The conflicting display name
        name: String,
    },

    /// A click contradicts the single contiguous run kept per source.
    ///
    /// This is a caller contract failure. The selection is left unchanged.
    #[error("Selection invariant violated in source {source_id} at position {position}: {reason}")]
    InvariantViolation {
        /// Source the click was aimed at
        source_id: SourceId,
        /// Clicked position
        position: usize,
        /// Which impossible state was observed
        reason: &'static str,
    },

    /// The source id is not (or no longer) registered.
    #[error("Unknown source {source_id}")]
    MissingSource {
        /// The dangling id
        source_id: SourceId,
    },

    /// Commit attempted with nothing selected.
    #[error("Nothing selected in source {source_id}")]
    EmptySelection {
        /// Source the commit was aimed at
        source_id: SourceId,
    },

    /// Clicked position is past the end of the file.
    #[error("Position {position} is out of range (file has {len} messages)")]
    PositionOutOfRange {
        /// Clicked position
        position: usize,
        /// Number of messages in the file
        len: usize,
    },

    /// Chapter index is past the end of the chapter list.
    #[error("Chapter {index} does not exist ({len} chapters)")]
    ChapterOutOfRange {
        /// Requested index
        index: usize,
        /// Number of chapters
        len: usize,
    },

    /// Malformed user input (command-line arguments and the like).
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of what's wrong
        message: String,
    },
}

/// Kinds of load errors.
#[derive(Debug, Error)]
pub enum LoadErrorKind {
    /// The content is not valid JSON, or a field has the wrong type
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Valid JSON, but not a channel export
    #[error("{0}")]
    Shape(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChapterpackError {
    /// Creates a load error from a JSON failure.
    pub fn load_json(name: impl Into<String>, source: serde_json::Error) -> Self {
        ChapterpackError::Load {
            name: name.into(),
            source: LoadErrorKind::Json(source),
        }
    }

    /// Creates a load error for a document that isn't shaped like an export.
    pub fn load_shape(name: impl Into<String>, message: impl Into<String>) -> Self {
        ChapterpackError::Load {
            name: name.into(),
            source: LoadErrorKind::Shape(message.into()),
        }
    }

    /// Creates a duplicate name error.
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        ChapterpackError::DuplicateName { name: name.into() }
    }

    /// Creates an invariant violation error.
    pub fn invariant(source_id: &SourceId, position: usize, reason: &'static str) -> Self {
        ChapterpackError::InvariantViolation {
            source_id: source_id.clone(),
            position,
            reason,
        }
    }

    /// Creates a missing source error.
    pub fn missing_source(source_id: &SourceId) -> Self {
        ChapterpackError::MissingSource {
            source_id: source_id.clone(),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ChapterpackError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChapterpackError::Io(_))
    }

    /// Returns `true` if this is a load error.
    pub fn is_load(&self) -> bool {
        matches!(self, ChapterpackError::Load { .. })
    }

    /// Returns `true` if this is a duplicate name error.
    pub fn is_duplicate_name(&self) -> bool {
        matches!(self, ChapterpackError::DuplicateName { .. })
    }

    /// Returns `true` if this is an invariant violation.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, ChapterpackError::InvariantViolation { .. })
    }

    /// Returns `true` if this is a missing source error.
    pub fn is_missing_source(&self) -> bool {
        matches!(self, ChapterpackError::MissingSource { .. })
    }

    /// Returns `true` if this is an empty selection error.
    pub fn is_empty_selection(&self) -> bool {
        matches!(self, ChapterpackError::EmptySelection { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

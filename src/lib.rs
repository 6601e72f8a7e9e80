//! # Chapterpack
//!
//! Pick message ranges out of channel exports (DiscordChatExporter JSON) and
//! bundle them into one chaptered JSON document.
//!
//! ## Overview
//!
//! 1. Load one or more channel exports into a [`Session`]
//! 2. Click messages to grow, trim or collapse a single run per file
//! 3. Commit each run as a [`Chapter`]
//! 4. Export all chapters as one [`ExportDocument`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chapterpack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut session = Session::default();
//!     let lore = session.load_path("lore.json")?;
//!
//!     // Select messages 10..=24 and keep them as a chapter
//!     session.click(&lore, 10)?;
//!     session.click(&lore, 24)?;
//!     session.commit(&lore)?;
//!
//!     let report = session.export("session-12");
//!     write_json(&report.document, "session-12.json", &ExportConfig::new())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`session`]: [`Session`], the controller that owns everything below
//! - [`source`]: [`SourceFile`], [`Channel`], [`Message`], [`SourceId`]
//! - [`registry`]: [`SourceRegistry`] and [`parse_export`](registry::parse_export)
//! - [`selection`]: [`SelectionEngine`], the single-run click state machine
//! - [`chapter`]: [`Chapter`], [`ChapterList`]
//! - [`export`]: [`ExportDocument`], [`serialize`](export::serialize), JSON writers
//! - [`config`]: [`SessionConfig`](config::SessionConfig), [`ExportConfig`](config::ExportConfig)
//! - [`error`]: [`ChapterpackError`], [`Result`]
//! - `cli`: command-line arguments (feature `cli`)

pub mod chapter;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod registry;
pub mod selection;
pub mod session;
pub mod source;

// Re-export the main types at the crate root for convenience
pub use chapter::{Chapter, ChapterList};
pub use error::{ChapterpackError, Result};
pub use export::{ExportDocument, ExportEntry, ExportReport};
pub use registry::SourceRegistry;
pub use selection::{SelectionEngine, SelectionSummary};
pub use session::Session;
pub use source::{Channel, Message, SourceFile, SourceId};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chapterpack::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chapter::Chapter;
    pub use crate::config::{ExportConfig, SessionConfig};
    pub use crate::error::{ChapterpackError, Result};
    pub use crate::export::{
        ExportDocument, ExportReport, serialize, suggested_file_name, to_json, write_json,
    };
    pub use crate::selection::SelectionSummary;
    pub use crate::session::{ChapterView, MessageItem, Session};
    pub use crate::source::{Channel, Message, SourceId};
}

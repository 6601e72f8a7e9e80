//! Configuration types for sessions and exports.
//!
//! Plain structs with builder methods, usable without the CLI.
//!
//! # Example
//!
//! ```rust
//! use chapterpack::config::{ExportConfig, SessionConfig};
//!
//! let session = SessionConfig::new().with_excerpt_chars(60);
//! let export = ExportConfig::new().with_pretty(true);
//!
//! assert_eq!(session.excerpt_chars, 60);
//! assert!(export.pretty);
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Only accept files with a `.json` extension (default: true)
    pub json_only: bool,

    /// Maximum characters of message content shown in previews (default: 100)
    pub excerpt_chars: usize,

    /// Messages listed per selection preview card before "... and N more" (default: 3)
    pub card_lines: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            json_only: true,
            excerpt_chars: 100,
            card_lines: 3,
        }
    }
}

impl SessionConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether non-`.json` files are rejected.
    #[must_use]
    pub fn with_json_only(mut self, enabled: bool) -> Self {
        self.json_only = enabled;
        self
    }

    /// Sets the excerpt length for previews.
    #[must_use]
    pub fn with_excerpt_chars(mut self, chars: usize) -> Self {
        self.excerpt_chars = chars;
        self
    }

    /// Sets how many messages a preview card lists.
    #[must_use]
    pub fn with_card_lines(mut self, lines: usize) -> Self {
        self.card_lines = lines;
        self
    }
}

/// Configuration for writing an [`ExportDocument`](crate::export::ExportDocument).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Indent the output JSON (default: false, single line)
    pub pretty: bool,
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

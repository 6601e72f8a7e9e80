//! Channel export data model.
//!
//! A loaded export is a [`SourceFile`]: a [`Channel`] descriptor plus the
//! ordered list of [`Message`]s, identified by a registry-assigned [`SourceId`].
//!
//! Channels and messages keep the JSON object they were read from, exactly as
//! written (including `null`s and fields this crate never looks at), and are
//! written back unchanged on export. The fields the tool needs are read
//! through accessors, which fall back to an empty value when a field is
//! missing or has an unexpected type.
//!
//! # Example
//!
//! ```
//! use chapterpack::source::Message;
//!
//! let json = r##"{"id": "1", "author": {"name": "alice", "color": null}, "content": "hi", "timestamp": "2024-01-01T00:00:00Z"}"##;
//! let msg: Message = serde_json::from_str(json)?;
//!
//! assert_eq!(msg.display_author(), "alice");
//! assert!(msg.get("timestamp").is_some());
//! assert_eq!(serde_json::to_string(&msg)?.contains(r#""color":null"#), true);
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Registry-assigned identifier of a loaded file.
///
/// Distinct from the channel's own id: two loaded files may describe the
/// same channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    /// Draws a fresh random identifier (128 bits, lowercase hex).
    pub fn random() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// String value of `key`, `None` when missing, `null` or not a string.
fn str_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

/// Identifier-like value of `key`: strings as-is, numbers in decimal,
/// anything else empty.
fn key_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Cow<'a, str> {
    match fields.get(key) {
        Some(Value::String(s)) => Cow::Borrowed(s),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        _ => Cow::Borrowed(""),
    }
}

/// Channel descriptor of an export (`id`, `name`, `category`, `categoryId`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel {
    fields: Map<String, Value>,
}

impl Channel {
    /// Creates a channel with only an id and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("id".into(), Value::String(id.into()));
        fields.insert("name".into(), Value::String(name.into()));
        Self { fields }
    }

    /// Builder-style method to set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.fields
            .insert("category".into(), Value::String(category.into()));
        self
    }

    /// Platform channel id.
    pub fn id(&self) -> Cow<'_, str> {
        key_field(&self.fields, "id")
    }

    /// Channel name, without the leading `#`.
    pub fn name(&self) -> &str {
        str_field(&self.fields, "name").unwrap_or_default()
    }

    pub fn category(&self) -> Option<&str> {
        str_field(&self.fields, "category")
    }

    pub fn category_id(&self) -> Option<Cow<'_, str>> {
        self.fields
            .contains_key("categoryId")
            .then(|| key_field(&self.fields, "categoryId"))
            .filter(|id| !id.is_empty())
    }

    /// Raw value of any field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Header shown on previews, e.g. `"Text Channels / #general"`.
    ///
    /// ```
    /// use chapterpack::source::Channel;
    ///
    /// assert_eq!(Channel::new("1", "general").label(), "Uncategorized / #general");
    /// ```
    pub fn label(&self) -> String {
        format!(
            "{} / #{}",
            self.category().unwrap_or("Uncategorized"),
            self.name()
        )
    }
}

/// A single exported message.
///
/// Its position (index in [`SourceFile::messages`]) drives selection;
/// its [`id`](Message::id) is used to rebuild subsets on export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message {
    fields: Map<String, Value>,
}

impl Message {
    /// Creates a message with the given id, author name and content.
    ///
    /// ```
    /// use chapterpack::source::Message;
    ///
    /// let msg = Message::new("42", "alice", "Hello!");
    /// assert_eq!(msg.id(), "42");
    /// assert_eq!(msg.display_author(), "alice");
    /// ```
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let mut author_fields = Map::new();
        author_fields.insert("name".into(), Value::String(author.into()));

        let mut fields = Map::new();
        fields.insert("id".into(), Value::String(id.into()));
        fields.insert("author".into(), Value::Object(author_fields));
        fields.insert("content".into(), Value::String(content.into()));
        Self { fields }
    }

    /// Message id as text. Numeric ids are rendered in decimal; a missing id
    /// is empty.
    pub fn id(&self) -> Cow<'_, str> {
        key_field(&self.fields, "id")
    }

    pub fn content(&self) -> &str {
        str_field(&self.fields, "content").unwrap_or_default()
    }

    fn author_field(&self, key: &str) -> Option<&str> {
        self.fields
            .get("author")
            .and_then(Value::as_object)
            .and_then(|author| str_field(author, key))
    }

    /// Account name of the author.
    pub fn author_name(&self) -> &str {
        self.author_field("name").unwrap_or_default()
    }

    /// Server nickname of the author, if set.
    pub fn nickname(&self) -> Option<&str> {
        self.author_field("nickname")
    }

    /// Role color of the author, e.g. `"#E67E22"`.
    pub fn color(&self) -> Option<&str> {
        self.author_field("color")
    }

    /// Nickname if present, account name otherwise.
    pub fn display_author(&self) -> &str {
        self.nickname().unwrap_or_else(|| self.author_name())
    }

    /// Raw value of any field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Content cut to at most `max_chars` characters, with `"..."` appended
    /// when something was cut.
    ///
    /// ```
    /// use chapterpack::source::Message;
    ///
    /// let msg = Message::new("1", "bob", "abcdef");
    /// assert_eq!(msg.excerpt(3), "abc...");
    /// assert_eq!(msg.excerpt(6), "abcdef");
    /// ```
    pub fn excerpt(&self, max_chars: usize) -> String {
        let content = self.content();
        match content.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &content[..cut]),
            None => content.to_string(),
        }
    }
}

/// A loaded channel export. Never mutated after registration.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub id: SourceId,
    /// Display name, usually the file name
    pub name: String,
    pub channel: Channel,
    pub messages: Vec<Message>,
}

impl SourceFile {
    /// Number of messages in the file.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_random_is_hex() {
        let id = SourceId::random();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, SourceId::random());
    }

    #[test]
    fn test_channel_roundtrip_is_verbatim() {
        let json = r#"{"id":"10","name":"general","category":null,"categoryId":"9","type":"GuildTextChat","topic":null}"#;
        let channel: Channel = serde_json::from_str(json).unwrap();
        assert_eq!(channel.category(), None);
        assert_eq!(channel.category_id().as_deref(), Some("9"));

        let out = serde_json::to_value(&channel).unwrap();
        let expected: Value = serde_json::from_str(json).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_channel_label() {
        let channel = Channel::new("1", "lore").with_category("Campaign");
        assert_eq!(channel.label(), "Campaign / #lore");

        let channel: Channel = serde_json::from_str(r#"{"id":"1","name":"ooc","category":null}"#).unwrap();
        assert_eq!(channel.label(), "Uncategorized / #ooc");
    }

    #[test]
    fn test_message_null_author_fields_survive() {
        let json = r#"{"id":"1","author":{"name":"bob","nickname":null,"color":null},"content":"yo"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert!(msg.color().is_none());
        assert_eq!(msg.display_author(), "bob");

        let out = serde_json::to_value(&msg).unwrap();
        assert!(out["author"]["color"].is_null());
        assert!(out["author"].as_object().unwrap().contains_key("nickname"));
    }

    #[test]
    fn test_display_author_prefers_nickname() {
        let json = r##"{"id":"1","author":{"name":"bob","nickname":"Bobby","color":"#123456"},"content":""}"##;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.display_author(), "Bobby");
        assert_eq!(msg.color(), Some("#123456"));
    }

    #[test]
    fn test_loose_message_shapes() {
        let msg: Message = serde_json::from_str(r#"{"id": 1234, "content": "no author"}"#).unwrap();
        assert_eq!(msg.id(), "1234");
        assert_eq!(msg.display_author(), "");
        assert_eq!(serde_json::to_value(&msg).unwrap()["id"], 1234);

        let msg: Message = serde_json::from_str(r#"{"author": "system"}"#).unwrap();
        assert_eq!(msg.id(), "");
        assert_eq!(msg.content(), "");
        assert_eq!(msg.author_name(), "");
    }

    #[test]
    fn test_excerpt_counts_chars_not_bytes() {
        let msg = Message::new("1", "ivan", "привет мир");
        assert_eq!(msg.excerpt(6), "привет...");
        assert_eq!(msg.excerpt(100), "привет мир");
        assert_eq!(msg.excerpt(0), "...");
    }
}

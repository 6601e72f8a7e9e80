//! Storage for loaded channel exports.
//!
//! [`SourceRegistry`] keeps every [`SourceFile`] in load order and hands out
//! a fresh [`SourceId`] per registration. Selections and chapters refer to
//! files only through that id.

use serde_json::Value;

use crate::error::{ChapterpackError, Result};
use crate::source::{Channel, Message, SourceFile, SourceId};

/// Parses the text of a channel export into its channel and messages.
///
/// Fails when the text isn't JSON, when `channel` is absent, or when
/// `messages` is missing or not an array. `name` is only used for error
/// messages.
///
/// # Example
///
/// ```
/// use chapterpack::registry::parse_export;
///
/// let text = r#"{"channel": {"id": "1", "name": "general"}, "messages": []}"#;
/// let (channel, messages) = parse_export("general.json", text)?;
/// assert_eq!(channel.name(), "general");
/// assert!(messages.is_empty());
///
/// assert!(parse_export("bad.json", r#"{"channel": {"id": "1", "name": "x"}}"#).is_err());
/// # Ok::<(), chapterpack::ChapterpackError>(())
/// ```
pub fn parse_export(name: &str, text: &str) -> Result<(Channel, Vec<Message>)> {
    let mut root: Value =
        serde_json::from_str(text).map_err(|e| ChapterpackError::load_json(name, e))?;

    let Some(object) = root.as_object_mut() else {
        return Err(ChapterpackError::load_shape(
            name,
            "expected a JSON object at the top level",
        ));
    };

    let channel = match object.remove("channel") {
        Some(Value::Null) | None => {
            return Err(ChapterpackError::load_shape(name, "missing \"channel\""));
        }
        Some(value) => value,
    };
    let messages = match object.remove("messages") {
        Some(value @ Value::Array(_)) => value,
        Some(_) => {
            return Err(ChapterpackError::load_shape(
                name,
                "\"messages\" is not an array",
            ));
        }
        None => {
            return Err(ChapterpackError::load_shape(
                name,
                "missing \"messages\" array",
            ));
        }
    };

    let channel: Channel =
        serde_json::from_value(channel).map_err(|e| ChapterpackError::load_json(name, e))?;
    let messages: Vec<Message> =
        serde_json::from_value(messages).map_err(|e| ChapterpackError::load_json(name, e))?;

    Ok((channel, messages))
}

/// Loaded files, in load order.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    files: Vec<SourceFile>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a file and returns its freshly generated id.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        channel: Channel,
        messages: Vec<Message>,
    ) -> SourceId {
        let id = self.fresh_id();
        self.files.push(SourceFile {
            id: id.clone(),
            name: name.into(),
            channel,
            messages,
        });
        id
    }

    fn fresh_id(&self) -> SourceId {
        loop {
            let id = SourceId::random();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    pub fn get(&self, id: &SourceId) -> Option<&SourceFile> {
        self.files.iter().find(|f| &f.id == id)
    }

    /// Like [`get`](Self::get), but a missing id is an error.
    pub fn require(&self, id: &SourceId) -> Result<&SourceFile> {
        self.get(id)
            .ok_or_else(|| ChapterpackError::missing_source(id))
    }

    /// Looks a file up by its display name.
    pub fn find_by_name(&self, name: &str) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Removes a file. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &SourceId) -> Option<SourceFile> {
        let index = self.files.iter().position(|f| &f.id == id)?;
        Some(self.files.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

use serde::Serialize;
use std::fmt;

/// Severity of a normalization message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic produced while normalizing a condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
    /// Field the message refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Position of the group within its parent (root is 0)
    pub group_index: usize,
    pub nesting_level: usize,
}

impl Message {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.text)
    }
}

/// Ordered collection of messages for one parse + normalize run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageBag {
    messages: Vec<Message>,
}

impl MessageBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Record an info message for the root group; the returned message can
    /// be scoped further by the caller
    pub fn info(&mut self, text: impl Into<String>) -> &mut Message {
        self.record(Severity::Info, text.into())
    }

    pub fn error(&mut self, text: impl Into<String>) -> &mut Message {
        self.record(Severity::Error, text.into())
    }

    fn record(&mut self, severity: Severity, text: String) -> &mut Message {
        let idx = self.messages.len();
        self.messages.push(Message {
            severity,
            text,
            field: None,
            group_index: 0,
            nesting_level: 0,
        });
        &mut self.messages[idx]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True when at least one error-severity message was recorded
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(Message::is_error)
    }

    pub fn errors(&self) -> Vec<&Message> {
        self.messages.iter().filter(|m| m.is_error()).collect()
    }

    pub fn infos(&self) -> Vec<&Message> {
        self.messages.iter().filter(|m| !m.is_error()).collect()
    }

    pub fn for_field(&self, field: &str) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| m.field.as_deref() == Some(field))
            .collect()
    }

    /// Message texts in emission order, handy for assertions and plain output
    pub fn texts(&self) -> Vec<&str> {
        self.messages.iter().map(|m| m.text.as_str()).collect()
    }

    pub fn extend(&mut self, other: MessageBag) {
        self.messages.extend(other.messages);
    }
}

impl<'a> IntoIterator for &'a MessageBag {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record rendered by every view.
//! - Provide create-time validation through `NoteDraft`.
//!
//! # Invariants
//! - `value` is trimmed and non-empty for every note created by this crate.
//! - `value` is unique within one store; uniqueness is checked on insert only.
//! - Local notes use their own `value` as identity (`NoteId::Local`).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of a note.
///
/// Remote notes carry the server-assigned number; local notes are keyed by
/// their title text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteId {
    Remote(u64),
    Local(String),
}

impl NoteId {
    /// Parses user input: all-digit strings become remote ids.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<u64>() {
            Ok(number) => Self::Remote(number),
            Err(_) => Self::Local(trimmed.to_string()),
        }
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(number) => write!(f, "{number}"),
            Self::Local(title) => write!(f, "{title}"),
        }
    }
}

/// Note priority. Serialized as its integer wire value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Rendering order: most urgent first.
    pub const DESCENDING: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_u8(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = NoteValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Medium),
            2 => Ok(Self::High),
            other => Err(NoteValidationError::InvalidPriority(other)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        value.as_u8()
    }
}

/// Validation errors raised before a note reaches any backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Text is empty after trimming.
    EmptyText,
    /// Priority outside `0..=2`.
    InvalidPriority(u8),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "note text cannot be empty"),
            Self::InvalidPriority(value) => {
                write!(f, "priority must be 0, 1 or 2, got {value}")
            }
        }
    }
}

impl Error for NoteValidationError {}

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Trimmed user text; the uniqueness key.
    pub value: String,
    /// Optional body for title + text entries. Local store only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Completion flag.
    #[serde(default)]
    pub checked: bool,
}

impl Note {
    /// Flips the completion flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.checked = !self.checked;
        self.checked
    }
}

/// Validated input for note creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    value: String,
    priority: Priority,
    details: Option<String>,
}

impl NoteDraft {
    /// Trims `text` and rejects it when nothing is left.
    pub fn new(text: &str, priority: Priority) -> Result<Self, NoteValidationError> {
        let value = text.trim();
        if value.is_empty() {
            return Err(NoteValidationError::EmptyText);
        }
        Ok(Self {
            value: value.to_string(),
            priority,
            details: None,
        })
    }

    /// Attaches body text; blank bodies are dropped.
    pub fn with_details(mut self, details: &str) -> Self {
        let trimmed = details.trim();
        self.details = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

/// Returns whether `value` is not yet used by any note in `notes`.
pub fn is_unique_value(notes: &[Note], value: &str) -> bool {
    !notes.iter().any(|note| note.value == value)
}

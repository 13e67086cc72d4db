//! Wire types for the remote to-do service.

use crate::model::note::{Note, NoteId, Priority};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    pub value: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateNoteBody<'a> {
    pub value: &'a str,
    pub priority: Priority,
}

/// Note as returned by `GET /todo` and `POST /todo`.
///
/// Extra server fields (owner, timestamps) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteNote {
    #[serde(rename = "_id")]
    pub id: u64,
    pub value: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub checked: bool,
}

impl From<RemoteNote> for Note {
    fn from(value: RemoteNote) -> Self {
        Self {
            id: NoteId::Remote(value.id),
            value: value.value,
            details: None,
            priority: value.priority,
            checked: value.checked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CreateNoteBody, RemoteNote};
    use crate::model::note::{Note, NoteId, Priority};
    use serde_json::json;

    #[test]
    fn remote_note_ignores_unknown_fields() {
        let payload = json!({
            "_id": 17,
            "value": "Buy milk",
            "priority": 2,
            "checked": true,
            "userId": 3,
            "createdAt": "2021-01-01T00:00:00Z"
        });
        let note: Note = serde_json::from_value::<RemoteNote>(payload).unwrap().into();
        assert_eq!(note.id, NoteId::Remote(17));
        assert_eq!(note.priority, Priority::High);
        assert!(note.checked);
    }

    #[test]
    fn create_body_sends_integer_priority() {
        let body = CreateNoteBody {
            value: "x",
            priority: Priority::Medium,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"value": "x", "priority": 1})
        );
    }
}

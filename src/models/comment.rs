use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::timestamp;
use crate::services::pseudonym::PseudonymGenerator;

/// Wire form of a comment as the backend returns it — no pseudonym; that is
/// attached client-side per fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRecord {
    pub id: i64,
    pub text: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    pub situation_id: i64,
}

/// A comment decorated for display. Comments do not nest.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub situation_id: i64,
    /// Ephemeral display pseudonym; regenerated on every fetch.
    pub code: String,
}

impl Comment {
    pub fn decorated(record: CommentRecord, pseudonyms: &PseudonymGenerator) -> Comment {
        Comment {
            id: record.id,
            text: record.text,
            created_at: record.created_at,
            situation_id: record.situation_id,
            code: pseudonyms.random(),
        }
    }
}

/// Body of a new comment, validated before it leaves the client. The 500
/// character cap mirrors the backend's column width.
#[derive(Debug, Clone, Validate)]
pub struct NewComment {
    #[validate(length(min = 1, max = 500))]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn record_decodes_backend_shape() {
        let record: CommentRecord = serde_json::from_value(serde_json::json!({
            "id": 9,
            "text": "hang in there",
            "created_at": "2024-06-01T08:30:00",
            "situation_id": 3
        }))
        .unwrap();
        assert_eq!(record.id, 9);
        assert_eq!(record.situation_id, 3);
    }

    #[test]
    fn new_comment_rejects_empty_and_oversize_text() {
        assert!(NewComment { text: String::new() }.validate().is_err());
        assert!(
            NewComment {
                text: "x".repeat(501)
            }
            .validate()
            .is_err()
        );
        assert!(
            NewComment {
                text: "fine".to_string()
            }
            .validate()
            .is_ok()
        );
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::timestamp;
use crate::models::{Comment, CommentRecord, ImageAttachment, VoteTally};
use crate::services::pseudonym::PseudonymGenerator;

/// Wire form of a situation as the backend returns it. Freshly created rows
/// come back without votes, comments, or replies; those default to empty and
/// the display layer treats the result as zero-initialized.
#[derive(Debug, Clone, Deserialize)]
pub struct SituationRecord {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reply_to: Option<i64>,
    #[serde(default)]
    pub votes: VoteTally,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
    #[serde(default)]
    pub replies: Vec<SituationRecord>,
}

/// A situation decorated for display: the wire record plus an ephemeral
/// pseudonym. Identity is per-view — the same post shows a different code on
/// every fetch.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Parent post id; `None` means top-level.
    pub reply_to: Option<i64>,
    pub code: String,
    pub votes: VoteTally,
    /// Newest first.
    pub comments: Vec<Comment>,
    /// In backend-returned order (chronological ascending).
    pub replies: Vec<Post>,
}

impl Post {
    /// Attaches fresh pseudonyms to a fetched record and everything nested
    /// under it. Purely a display artifact, never sent back to the backend.
    pub fn decorated(record: SituationRecord, pseudonyms: &PseudonymGenerator) -> Post {
        let SituationRecord {
            id,
            text,
            image_path,
            created_at,
            reply_to,
            votes,
            comments,
            replies,
        } = record;

        Post {
            id,
            text,
            image_path,
            created_at,
            reply_to,
            code: pseudonyms.random(),
            votes,
            comments: comments
                .into_iter()
                .map(|comment| Comment::decorated(comment, pseudonyms))
                .collect(),
            replies: replies
                .into_iter()
                .map(|reply| Post::decorated(reply, pseudonyms))
                .collect(),
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.reply_to.is_none()
    }
}

/// Body of a new situation, validated before it leaves the client.
#[derive(Debug, Clone, Validate)]
pub struct NewPost {
    #[validate(length(min = 1, max = 500))]
    pub text: String,
    pub image: Option<ImageAttachment>,
    pub reply_to: Option<i64>,
}

/// Feed ordering policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    Newest,
    TopCooked,
    TopGmi,
    Trending,
}

impl FromStr for SortMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" | "new" => Ok(SortMode::Newest),
            "topCooked" | "top-cooked" => Ok(SortMode::TopCooked),
            "topGMI" | "top-gmi" => Ok(SortMode::TopGmi),
            "trending" => Ok(SortMode::Trending),
            _ => Err(format!("Unknown sort mode: {}", s)),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortMode::Newest => "newest",
            SortMode::TopCooked => "topCooked",
            SortMode::TopGmi => "topGMI",
            SortMode::Trending => "trending",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_decodes_nested_list_shape() {
        let record: SituationRecord = serde_json::from_value(serde_json::json!({
            "id": 1,
            "text": "am i cooked",
            "image_path": null,
            "created_at": "2024-06-01T08:30:00",
            "votes": {"cooked": 2, "going_to_make_it": 5},
            "comments": [
                {"id": 7, "text": "yes", "created_at": "2024-06-01T09:00:00", "situation_id": 1}
            ],
            "replies": [
                {
                    "id": 2,
                    "text": "same here",
                    "image_path": null,
                    "created_at": "2024-06-01T10:00:00",
                    "votes": {"cooked": 0, "going_to_make_it": 1},
                    "comments": [],
                    "replies": []
                }
            ]
        }))
        .unwrap();

        assert_eq!(record.votes.going_to_make_it, 5);
        assert_eq!(record.comments.len(), 1);
        assert_eq!(record.replies.len(), 1);
        assert!(record.reply_to.is_none());
    }

    #[test]
    fn record_defaults_missing_collections_to_zero() {
        // The create-post echo carries none of the nested collections.
        let record: SituationRecord = serde_json::from_value(serde_json::json!({
            "id": 1,
            "text": "test",
            "image_path": null,
            "created_at": "2024-06-01T08:30:00",
            "reply_to": null
        }))
        .unwrap();

        assert_eq!(record.votes, VoteTally::default());
        assert!(record.comments.is_empty());
        assert!(record.replies.is_empty());
    }

    #[test]
    fn decorated_assigns_codes_all_the_way_down() {
        let record: SituationRecord = serde_json::from_value(serde_json::json!({
            "id": 1,
            "text": "root",
            "created_at": "2024-06-01T08:30:00",
            "comments": [
                {"id": 5, "text": "c", "created_at": "2024-06-01T09:00:00", "situation_id": 1}
            ],
            "replies": [
                {"id": 2, "text": "reply", "created_at": "2024-06-01T10:00:00"}
            ]
        }))
        .unwrap();

        let post = Post::decorated(record, &PseudonymGenerator::default());
        assert!(!post.code.is_empty());
        assert!(!post.comments[0].code.is_empty());
        assert!(!post.replies[0].code.is_empty());
    }

    #[test]
    fn sort_mode_parses_cli_and_source_spellings() {
        assert_eq!("newest".parse::<SortMode>().unwrap(), SortMode::Newest);
        assert_eq!("topCooked".parse::<SortMode>().unwrap(), SortMode::TopCooked);
        assert_eq!("top-gmi".parse::<SortMode>().unwrap(), SortMode::TopGmi);
        assert_eq!("trending".parse::<SortMode>().unwrap(), SortMode::Trending);
        assert!("hot".parse::<SortMode>().is_err());
    }
}

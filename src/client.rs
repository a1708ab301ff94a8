use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::{AppError, Result},
    models::{
        Comment, CommentRecord, NewComment, NewPost, Post, SituationRecord, VoteAxis, VoteRequest,
        VoteTally,
    },
    services::pseudonym::PseudonymGenerator,
};

/// Async client for the situations backend.
///
/// Read operations decorate everything they return with fresh ephemeral
/// pseudonyms — a per-fetch display artifact, never sent back. Vote
/// operations return raw tallies; a tally has no pseudonym concept. The
/// client never owns authoritative state: whatever the backend answers
/// replaces what was cached before.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    max_image_bytes: usize,
    pseudonyms: PseudonymGenerator,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            max_image_bytes: config.max_image_bytes,
            pseudonyms: PseudonymGenerator::default(),
        })
    }

    /// `GET /situations` — top-level posts with votes, comments, and one
    /// level of embedded replies, each decorated with a fresh pseudonym.
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let records: Vec<SituationRecord> = self.get_json("/situations", "list situations").await?;
        Ok(records
            .into_iter()
            .map(|record| Post::decorated(record, &self.pseudonyms))
            .collect())
    }

    /// `POST /situations` — multipart with exactly the fields the backend
    /// needs: `text`, optional `image`, optional `reply_to`. The echoed
    /// record carries no nested collections; decoration zero-initializes
    /// them and attaches a pseudonym.
    pub async fn create_post(&self, new_post: NewPost) -> Result<Post> {
        new_post.validate()?;

        let mut form = reqwest::multipart::Form::new().text("text", new_post.text);
        if let Some(image) = new_post.image {
            image.ensure_supported(self.max_image_bytes)?;
            let content_type = image.content_type();
            let part = reqwest::multipart::Part::bytes(image.bytes)
                .file_name(image.filename)
                .mime_str(&content_type)?;
            form = form.part("image", part);
        }
        if let Some(reply_to) = new_post.reply_to {
            form = form.text("reply_to", reply_to.to_string());
        }

        let response = self
            .http
            .post(format!("{}/situations", self.base_url))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let record: SituationRecord = serde_json::from_str(&body).map_err(|source| {
            AppError::Decode {
                endpoint: "create situation",
                source,
            }
        })?;
        Ok(Post::decorated(record, &self.pseudonyms))
    }

    /// `POST /vote` — a non-success status is a hard, distinct failure so
    /// callers can tell a rejected vote apart from a network problem. On
    /// success the returned tally is the new truth; no local arithmetic.
    pub async fn vote(&self, post_id: i64, axis: VoteAxis) -> Result<VoteTally> {
        let response = self
            .http
            .post(format!("{}/vote", self.base_url))
            .json(&VoteRequest {
                post_id,
                vote_type: axis,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(post_id, %axis, %status, "vote rejected");
            return Err(AppError::VoteRejected(status));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| AppError::Decode {
            endpoint: "vote",
            source,
        })
    }

    /// `GET /vote/{post_id}` — raw tally, undecorated.
    pub async fn fetch_votes(&self, post_id: i64) -> Result<VoteTally> {
        self.get_json(&format!("/vote/{}", post_id), "fetch votes")
            .await
    }

    /// `POST /comments` — the echoed comment gets a pseudonym; callers
    /// prepend it so comment lists stay newest-first.
    pub async fn add_comment(&self, post_id: i64, new_comment: NewComment) -> Result<Comment> {
        new_comment.validate()?;

        let response = self
            .http
            .post(format!("{}/comments", self.base_url))
            .json(&json!({
                "situation_id": post_id,
                "text": new_comment.text,
            }))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let record: CommentRecord = serde_json::from_str(&body).map_err(|source| {
            AppError::Decode {
                endpoint: "add comment",
                source,
            }
        })?;
        Ok(Comment::decorated(record, &self.pseudonyms))
    }

    /// `GET /comments/{post_id}` — newest first, as the backend orders them,
    /// each decorated.
    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let records: Vec<CommentRecord> = self
            .get_json(&format!("/comments/{}", post_id), "list comments")
            .await?;
        Ok(records
            .into_iter()
            .map(|record| Comment::decorated(record, &self.pseudonyms))
            .collect())
    }

    /// Where the backend serves an uploaded image. The reference is opaque;
    /// the client only substitutes it into the URL template.
    pub fn image_url(&self, image_path: &str) -> String {
        format!("{}/uploads/{}", self.base_url, image_path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, endpoint: &'static str) -> Result<T> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| AppError::Decode { endpoint, source })
    }
}

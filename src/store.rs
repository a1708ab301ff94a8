use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    error::{AppError, Result},
    models::{Comment, NewComment, NewPost, Post, SortMode, VoteAxis, VoteTally},
    services::{
        feed,
        pseudonym::{PseudonymGenerator, WordLists},
        thread::{MAX_REPLY_DEPTH, ThreadTree},
    },
};

/// Fully local, in-memory board: the offline mode of the app. State lives
/// for the session and is gone on drop; ids are monotonically increasing and
/// never reused. Unlike [`crate::ApiClient`], this store owns the
/// authoritative tallies, so it is the one place vote arithmetic happens.
pub struct LocalBoard {
    /// Newest first.
    posts: Vec<Post>,
    next_post_id: i64,
    next_comment_id: i64,
    pseudonyms: PseudonymGenerator,
}

impl Default for LocalBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalBoard {
    pub fn new() -> Self {
        Self {
            posts: Vec::new(),
            next_post_id: 1,
            next_comment_id: 1,
            pseudonyms: PseudonymGenerator::new(WordLists::compact()),
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, id: i64) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Creates a post (or a reply, when `reply_to` is set), assigning it a
    /// fresh pseudonym. Replies past the depth cap are rejected outright at
    /// submission, not clamped.
    pub fn create_post(&mut self, new_post: NewPost) -> Result<Post> {
        new_post.validate()?;

        if let Some(parent_id) = new_post.reply_to {
            let parent_depth = self
                .depth_of(parent_id)
                .ok_or_else(|| AppError::NotFound(format!("post {}", parent_id)))?;
            if parent_depth >= MAX_REPLY_DEPTH {
                return Err(AppError::BadRequest(
                    "Reply depth limit reached".to_string(),
                ));
            }
        }

        let post = Post {
            id: self.next_post_id,
            text: new_post.text,
            image_path: new_post.image.map(|image| image.filename),
            created_at: Utc::now(),
            reply_to: new_post.reply_to,
            code: self.pseudonyms.random(),
            votes: VoteTally::default(),
            comments: Vec::new(),
            replies: Vec::new(),
        };
        self.next_post_id += 1;
        self.posts.insert(0, post.clone());
        Ok(post)
    }

    /// Applies one vote and returns the updated tally.
    pub fn vote(&mut self, post_id: i64, axis: VoteAxis) -> Result<VoteTally> {
        let post = self
            .posts
            .iter_mut()
            .find(|post| post.id == post_id)
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
        post.votes = post.votes.apply(axis);
        Ok(post.votes)
    }

    pub fn votes(&self, post_id: i64) -> Result<VoteTally> {
        self.get(post_id)
            .map(|post| post.votes)
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))
    }

    /// Prepends a comment, keeping comment lists newest-first.
    pub fn add_comment(&mut self, post_id: i64, new_comment: NewComment) -> Result<Comment> {
        new_comment.validate()?;

        let code = self.pseudonyms.random();
        let comment_id = self.next_comment_id;
        let post = self
            .posts
            .iter_mut()
            .find(|post| post.id == post_id)
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

        let comment = Comment {
            id: comment_id,
            text: new_comment.text,
            created_at: Utc::now(),
            situation_id: post_id,
            code,
        };
        self.next_comment_id += 1;
        post.comments.insert(0, comment.clone());
        Ok(comment)
    }

    /// The top-level feed, ordered. Replies never show up here.
    pub fn feed(&self, mode: SortMode, now: DateTime<Utc>) -> Vec<Post> {
        let top_level: Vec<Post> = self
            .posts
            .iter()
            .filter(|post| post.is_top_level())
            .cloned()
            .collect();
        feed::sort_posts(&top_level, mode, now)
    }

    /// Reply threading over everything on the board.
    pub fn thread(&self) -> ThreadTree<'_> {
        ThreadTree::build(&self.posts)
    }

    fn depth_of(&self, id: i64) -> Option<usize> {
        let mut depth = 0;
        let mut current = self.get(id)?;
        while let Some(parent_id) = current.reply_to {
            match self.get(parent_id) {
                Some(parent) => {
                    depth += 1;
                    current = parent;
                }
                None => break,
            }
            // The store never creates cycles; this bounds the walk anyway.
            if depth > MAX_REPLY_DEPTH {
                break;
            }
        }
        Some(depth)
    }
}

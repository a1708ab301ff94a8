use chrono::{DateTime, Utc};

use crate::models::{Post, SortMode};

/// Trending decays vote weight per 24-hour window of age.
pub const TRENDING_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// Orders a feed without touching the input. The underlying sort is stable,
/// so posts that compare equal keep their original relative order, and
/// callers can re-sort on every render without drift.
///
/// `now` is captured once per call so a trending sort stays well-defined
/// even while the clock moves.
pub fn sort_posts(posts: &[Post], mode: SortMode, now: DateTime<Utc>) -> Vec<Post> {
    let mut sorted: Vec<Post> = posts.to_vec();
    match mode {
        SortMode::Newest => sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::TopCooked => sorted.sort_by(|a, b| b.votes.cooked.cmp(&a.votes.cooked)),
        SortMode::TopGmi => {
            sorted.sort_by(|a, b| b.votes.going_to_make_it.cmp(&a.votes.going_to_make_it))
        }
        SortMode::Trending => {
            let now_ms = now.timestamp_millis();
            sorted.sort_by(|a, b| trending_score(b, now_ms).total_cmp(&trending_score(a, now_ms)));
        }
    }
    sorted
}

/// `total_votes / (age_in_windows + 1)`. The +1 keeps a zero-age post finite
/// and caps the boost it can get.
pub fn trending_score(post: &Post, now_ms: i64) -> f64 {
    let age = (now_ms - post.created_at.timestamp_millis()) as f64 / TRENDING_WINDOW_MS as f64;
    let votes = post.votes.total() as f64;
    votes / (age + 1.0)
}

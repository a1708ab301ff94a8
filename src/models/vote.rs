use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two axes a situation can be voted along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteAxis {
    Cooked,
    GoingToMakeIt,
}

impl VoteAxis {
    /// Wire name, as the backend stores it.
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteAxis::Cooked => "cooked",
            VoteAxis::GoingToMakeIt => "going_to_make_it",
        }
    }
}

impl fmt::Display for VoteAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteAxis {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cooked" => Ok(VoteAxis::Cooked),
            "gmi" | "wagmi" | "going_to_make_it" => Ok(VoteAxis::GoingToMakeIt),
            _ => Err(format!("Unknown vote axis: {}", s)),
        }
    }
}

/// Per-post vote counters. Counters only ever grow, one unit at a time, and
/// never move between axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub cooked: u32,
    pub going_to_make_it: u32,
}

impl VoteTally {
    /// Returns a new tally with the selected counter incremented by one. The
    /// receiver is left untouched; only the offline store applies this —
    /// against the live backend the server's returned tally replaces the
    /// cached one wholesale.
    pub fn apply(&self, axis: VoteAxis) -> VoteTally {
        match axis {
            VoteAxis::Cooked => VoteTally {
                cooked: self.cooked + 1,
                ..*self
            },
            VoteAxis::GoingToMakeIt => VoteTally {
                going_to_make_it: self.going_to_make_it + 1,
                ..*self
            },
        }
    }

    pub fn total(&self) -> u32 {
        self.cooked + self.going_to_make_it
    }
}

/// Body of `POST /vote`.
#[derive(Debug, Serialize)]
pub struct VoteRequest {
    pub post_id: i64,
    pub vote_type: VoteAxis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_increments_only_the_selected_axis() {
        let tally = VoteTally {
            cooked: 3,
            going_to_make_it: 7,
        };

        let cooked = tally.apply(VoteAxis::Cooked);
        assert_eq!(cooked.cooked, 4);
        assert_eq!(cooked.going_to_make_it, 7);

        let gmi = tally.apply(VoteAxis::GoingToMakeIt);
        assert_eq!(gmi.cooked, 3);
        assert_eq!(gmi.going_to_make_it, 8);

        // Original tally is unmodified.
        assert_eq!(tally.cooked, 3);
        assert_eq!(tally.going_to_make_it, 7);
    }

    #[test]
    fn axis_serializes_to_wire_names() {
        assert_eq!(
            serde_json::to_string(&VoteAxis::Cooked).unwrap(),
            "\"cooked\""
        );
        assert_eq!(
            serde_json::to_string(&VoteAxis::GoingToMakeIt).unwrap(),
            "\"going_to_make_it\""
        );
    }

    #[test]
    fn vote_request_matches_backend_contract() {
        let body = serde_json::to_value(VoteRequest {
            post_id: 1,
            vote_type: VoteAxis::Cooked,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"post_id": 1, "vote_type": "cooked"})
        );
    }
}

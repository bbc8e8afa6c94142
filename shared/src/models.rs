use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::vote_logic::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubjectKind {
    Startup,
    ForumPost,
    ForumReply,
}

impl SubjectKind {
    pub const ALL: [SubjectKind; 3] = [SubjectKind::Startup, SubjectKind::ForumPost, SubjectKind::ForumReply];

    pub const fn as_str(self) -> &'static str {
        match self {
            SubjectKind::Startup => "startup",
            SubjectKind::ForumPost => "forum-post",
            SubjectKind::ForumReply => "forum-reply",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown subject kind: {0}")]
pub struct UnknownSubjectKind(pub String);

impl FromStr for SubjectKind {
    type Err = UnknownSubjectKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubjectKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownSubjectKind(s.to_string()))
    }
}

/// A votable entity: a startup, a forum post or a forum reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRef {
    pub kind: SubjectKind,
    pub id: Uuid,
}

impl SubjectRef {
    pub const fn new(kind: SubjectKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub voter_id: Uuid,
    pub direction: Direction,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVoteRecord {
    pub subject_id: Uuid,
    pub voter_id: Uuid,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVoteRequest {
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustCountRequest {
    pub kind: SubjectKind,
    pub subject_id: Uuid,
    pub delta: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SubjectCount {
    pub id: Uuid,
    pub aggregate_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub id: Uuid,
    pub title: String,
    pub aggregate_count: i64,
    pub parent_id: Option<Uuid>,
}

/// Last-known vote state of one subject as seen by the current viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerVoteState {
    pub direction: Option<Direction>,
    pub aggregate_count: i64,
}

impl ViewerVoteState {
    pub const fn new(direction: Option<Direction>, aggregate_count: i64) -> Self {
        Self { direction, aggregate_count }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    pub success: bool,
    pub message: String,
    pub new_direction: Option<Direction>,
    pub new_count: i64,
}

impl VoteOutcome {
    pub fn state(&self) -> ViewerVoteState {
        ViewerVoteState::new(self.new_direction, self.new_count)
    }
}

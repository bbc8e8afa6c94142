use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::models::VoteRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(sqlx::Type))]
#[cfg_attr(feature = "backend", sqlx(type_name = "vote_direction", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Direction { Up, Down }

impl Direction {
    /// Contribution of a single vote in this direction to the aggregate.
    pub const fn weight(self) -> i64 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// Result of applying a click to the viewer's prior vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: Option<Direction>,
    pub delta: i64,
}

impl Transition {
    pub fn compute(prior: Option<Direction>, requested: Direction) -> Self {
        let next = if prior == Some(requested) { None } else { Some(requested) };
        let delta = next.map_or(0, Direction::weight) - prior.map_or(0, Direction::weight);
        Self { next, delta }
    }

    pub const fn apply(self, count: i64) -> i64 {
        count + self.delta
    }
}

/// The single record write that realises a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteWrite {
    Insert(Direction),
    Update { record_id: Uuid, direction: Direction },
    Delete { record_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotePlan {
    pub write: VoteWrite,
    pub transition: Transition,
}

impl VotePlan {
    pub fn new(existing: Option<&VoteRecord>, requested: Direction) -> Self {
        let transition = Transition::compute(existing.map(|r| r.direction), requested);
        let write = match (existing, transition.next) {
            (None, _) => VoteWrite::Insert(requested),
            (Some(record), Some(direction)) => VoteWrite::Update { record_id: record.id, direction },
            (Some(record), None) => VoteWrite::Delete { record_id: record.id },
        };
        Self { write, transition }
    }
}

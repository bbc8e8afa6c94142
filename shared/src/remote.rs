use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::identity::Identity;
use crate::models::{NewVoteRecord, SubjectRef, VoteRecord};
use crate::vote_logic::Direction;

/// The data backend that owns vote records and aggregate counts.
///
/// Futures are not `Send`: implementations run on the browser's
/// single-threaded executor.
#[async_trait(?Send)]
pub trait RemoteVoteService {
    async fn current_identity(&self) -> Result<Option<Identity>>;

    async fn fetch_vote(&self, subject: SubjectRef, voter_id: Uuid) -> Result<Option<VoteRecord>>;

    async fn insert_vote(&self, subject: SubjectRef, record: &NewVoteRecord) -> Result<VoteRecord>;

    async fn update_vote(&self, subject: SubjectRef, record_id: Uuid, direction: Direction) -> Result<()>;

    async fn delete_vote(&self, subject: SubjectRef, record_id: Uuid) -> Result<()>;

    /// Atomically adds `delta` to the subject's aggregate.
    async fn adjust_count(&self, subject: SubjectRef, delta: i64) -> Result<()>;

    async fn fetch_count(&self, subject: SubjectRef) -> Result<i64>;
}

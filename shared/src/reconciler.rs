use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::error::{Result, VoteError};
use crate::identity::{require_identity, Identity};
use crate::models::{NewVoteRecord, SubjectRef, VoteOutcome, VoteRecord, ViewerVoteState};
use crate::remote::RemoteVoteService;
use crate::vote_logic::{Direction, VotePlan, VoteWrite};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSource {
    /// Re-read from the remote after the write.
    Authoritative,
    /// Computed locally because the re-read failed.
    Estimated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    pub direction: Option<Direction>,
    pub count: i64,
    pub source: CountSource,
}

/// Applies vote clicks against a remote service.
///
/// Every click reads the viewer's current record, performs one record write,
/// moves the aggregate through the remote's atomic adjustment and finally
/// re-reads the aggregate. Nothing here is transactional: the re-read may
/// already include other voters' changes.
pub struct VoteReconciler<R> {
    remote: R,
}

impl<R: RemoteVoteService> VoteReconciler<R> {
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Loads the viewer's state for a subject. Anonymous viewers get no direction.
    pub async fn load_state(&self, identity: Option<&Identity>, subject: SubjectRef) -> Result<ViewerVoteState> {
        let aggregate_count = self.remote.fetch_count(subject).await?;
        let direction = match identity {
            Some(identity) => self.remote
                .fetch_vote(subject, identity.user_id)
                .await?
                .map(|record| record.direction),
            None => None,
        };
        Ok(ViewerVoteState { direction, aggregate_count })
    }

    /// `cached` is the viewer's state before the click; it only serves as the
    /// basis of the fallback count when the final re-read fails.
    pub async fn reconcile(
        &self,
        identity: Option<&Identity>,
        subject: SubjectRef,
        requested: Direction,
        cached: ViewerVoteState,
    ) -> std::result::Result<Reconciled, VoteError> {
        let voter_id = require_identity(identity)?.user_id;

        let existing = self.remote
            .fetch_vote(subject, voter_id)
            .await
            .map_err(VoteError::RemoteReadFailed)?;

        let plan = VotePlan::new(existing.as_ref(), requested);
        debug!(%subject, ?plan, "applying vote");

        let inserted = self.apply_write(subject, voter_id, plan.write)
            .await
            .map_err(VoteError::RemoteWriteFailed)?;

        if let Err(e) = self.remote.adjust_count(subject, plan.transition.delta).await {
            self.compensate(subject, voter_id, plan.write, existing.as_ref(), inserted).await;
            return Err(VoteError::RemoteWriteFailed(e));
        }

        match self.remote.fetch_count(subject).await {
            Ok(count) => Ok(Reconciled {
                direction: plan.transition.next,
                count,
                source: CountSource::Authoritative,
            }),
            Err(e) => {
                warn!(%subject, "count refresh failed, using local value: {}", e);
                Ok(Reconciled {
                    direction: plan.transition.next,
                    count: plan.transition.apply(cached.aggregate_count),
                    source: CountSource::Estimated,
                })
            }
        }
    }

    /// Same as [`reconcile`](Self::reconcile), with every failure folded into
    /// a displayable outcome that restores `cached`.
    pub async fn vote(
        &self,
        identity: Option<&Identity>,
        subject: SubjectRef,
        requested: Direction,
        cached: ViewerVoteState,
    ) -> VoteOutcome {
        match self.reconcile(identity, subject, requested, cached).await {
            Ok(reconciled) => {
                let message = match (reconciled.direction, reconciled.source) {
                    (_, CountSource::Estimated) => "Vote saved. The count will refresh shortly.",
                    (None, CountSource::Authoritative) => "Vote removed.",
                    (Some(_), CountSource::Authoritative) => "Vote saved.",
                };
                VoteOutcome {
                    success: true,
                    message: message.into(),
                    new_direction: reconciled.direction,
                    new_count: reconciled.count,
                }
            }
            Err(e) => {
                match &e {
                    VoteError::NotAuthenticated => debug!(%subject, "vote attempted without identity"),
                    VoteError::RemoteWriteFailed(source) | VoteError::RemoteReadFailed(source) => {
                        warn!(%subject, "vote failed: {}", source)
                    }
                }
                VoteOutcome {
                    success: false,
                    message: e.to_string(),
                    new_direction: cached.direction,
                    new_count: cached.aggregate_count,
                }
            }
        }
    }

    async fn apply_write(&self, subject: SubjectRef, voter_id: Uuid, write: VoteWrite) -> Result<Option<Uuid>> {
        match write {
            VoteWrite::Insert(direction) => {
                let record = NewVoteRecord { subject_id: subject.id, voter_id, direction };
                self.remote.insert_vote(subject, &record).await.map(|r| Some(r.id))
            }
            VoteWrite::Update { record_id, direction } => {
                self.remote.update_vote(subject, record_id, direction).await.map(|_| None)
            }
            VoteWrite::Delete { record_id } => {
                self.remote.delete_vote(subject, record_id).await.map(|_| None)
            }
        }
    }

    /// Best-effort undo of a record write whose count adjustment failed.
    async fn compensate(
        &self,
        subject: SubjectRef,
        voter_id: Uuid,
        write: VoteWrite,
        previous: Option<&VoteRecord>,
        inserted: Option<Uuid>,
    ) {
        let result = match (write, previous, inserted) {
            (VoteWrite::Insert(_), _, Some(record_id)) => self.remote.delete_vote(subject, record_id).await,
            (VoteWrite::Update { record_id, .. }, Some(prev), _) => {
                self.remote.update_vote(subject, record_id, prev.direction).await
            }
            (VoteWrite::Delete { .. }, Some(prev), _) => {
                let record = NewVoteRecord { subject_id: subject.id, voter_id, direction: prev.direction };
                self.remote.insert_vote(subject, &record).await.map(|_| ())
            }
            _ => Ok(()),
        };

        if let Err(e) = result {
            error!(%subject, %voter_id, "failed to undo vote write after count failure: {}", e);
        }
    }
}

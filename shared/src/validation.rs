use crate::identity::Identity;
use crate::models::{AdjustCountRequest, NewVoteRecord};

/// Largest change one reconciled click can make to an aggregate.
pub const MAX_VOTE_DELTA: i64 = 2;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Delta must be non-zero")]
    ZeroDelta,
    #[error("Delta {0} exceeds maximum of {MAX_VOTE_DELTA}")]
    DeltaTooLarge(i64),
    #[error("Voters may only cast their own votes")]
    VoterMismatch,
}

pub fn validate_adjustment(request: &AdjustCountRequest) -> Result<(), ValidationError> {
    match request.delta {
        0 => Err(ValidationError::ZeroDelta),
        d if !(-MAX_VOTE_DELTA..=MAX_VOTE_DELTA).contains(&d) => Err(ValidationError::DeltaTooLarge(d)),
        _ => Ok(()),
    }
}

pub fn validate_new_vote(record: &NewVoteRecord, identity: &Identity) -> Result<(), ValidationError> {
    if record.voter_id != identity.user_id {
        return Err(ValidationError::VoterMismatch);
    }
    Ok(())
}

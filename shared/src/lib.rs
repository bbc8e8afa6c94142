pub mod error;
pub mod models;
pub mod validation;
pub mod identity;
pub mod vote_logic;
pub mod remote;
pub mod reconciler;
pub mod adapters;
pub mod sync;
pub mod memory;
#[cfg(feature = "backend")]
mod backend_impl;

pub use error::{Error, ErrorCode, Result, ErrorResponse, VoteError};
pub use models::*;
pub use validation::*;
pub use identity::*;
pub use vote_logic::{Direction, Transition, VotePlan, VoteWrite};
pub use remote::RemoteVoteService;
pub use reconciler::{CountSource, Reconciled, VoteReconciler};
pub use adapters::{PostVotes, ReplyVotes, StartupVoteView, StartupVotes, VoteAdapter, VoteTable};
pub use sync::{Begin, PendingVote, VoteControl, ViewScope};

#[cfg(test)]
mod tests;

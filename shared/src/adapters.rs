//! Storage locations and UI shapes of the three votable entities.

use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::identity::Identity;
use crate::models::{SubjectKind, SubjectRef, ViewerVoteState, VoteOutcome};
use crate::reconciler::VoteReconciler;
use crate::remote::RemoteVoteService;
use crate::vote_logic::Direction;

/// Where a subject's aggregate and its vote records are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTable {
    pub subject_table: &'static str,
    pub title_column: &'static str,
    pub count_column: &'static str,
    pub parent_column: Option<&'static str>,
    pub record_table: &'static str,
    pub subject_column: &'static str,
}

const STARTUP_TABLE: VoteTable = VoteTable {
    subject_table: "startups",
    title_column: "name",
    count_column: "upvote_count",
    parent_column: None,
    record_table: "startup_votes",
    subject_column: "startup_id",
};

const POST_TABLE: VoteTable = VoteTable {
    subject_table: "forum_posts",
    title_column: "title",
    count_column: "upvotes_count",
    parent_column: None,
    record_table: "forum_post_votes",
    subject_column: "post_id",
};

const REPLY_TABLE: VoteTable = VoteTable {
    subject_table: "forum_replies",
    title_column: "content",
    count_column: "upvotes_count",
    parent_column: Some("post_id"),
    record_table: "forum_reply_votes",
    subject_column: "reply_id",
};

impl SubjectKind {
    pub const fn table(self) -> &'static VoteTable {
        match self {
            SubjectKind::Startup => &STARTUP_TABLE,
            SubjectKind::ForumPost => &POST_TABLE,
            SubjectKind::ForumReply => &REPLY_TABLE,
        }
    }
}

pub trait VoteAdapter {
    const KIND: SubjectKind;
    type View;

    fn subject(id: Uuid) -> SubjectRef {
        SubjectRef::new(Self::KIND, id)
    }

    fn view(id: Uuid, state: ViewerVoteState) -> Self::View;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupVoteView {
    pub startup_id: Uuid,
    pub upvotes: i64,
    pub user_vote: Option<Direction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostVoteView {
    pub post_id: Uuid,
    pub score: i64,
    pub user_vote: Option<Direction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyVoteView {
    pub reply_id: Uuid,
    pub score: i64,
    pub user_vote: Option<Direction>,
}

pub struct StartupVotes;
pub struct PostVotes;
pub struct ReplyVotes;

impl VoteAdapter for StartupVotes {
    const KIND: SubjectKind = SubjectKind::Startup;
    type View = StartupVoteView;

    fn view(id: Uuid, state: ViewerVoteState) -> StartupVoteView {
        StartupVoteView { startup_id: id, upvotes: state.aggregate_count, user_vote: state.direction }
    }
}

impl VoteAdapter for PostVotes {
    const KIND: SubjectKind = SubjectKind::ForumPost;
    type View = PostVoteView;

    fn view(id: Uuid, state: ViewerVoteState) -> PostVoteView {
        PostVoteView { post_id: id, score: state.aggregate_count, user_vote: state.direction }
    }
}

impl VoteAdapter for ReplyVotes {
    const KIND: SubjectKind = SubjectKind::ForumReply;
    type View = ReplyVoteView;

    fn view(id: Uuid, state: ViewerVoteState) -> ReplyVoteView {
        ReplyVoteView { reply_id: id, score: state.aggregate_count, user_vote: state.direction }
    }
}

impl<R: RemoteVoteService> VoteReconciler<R> {
    pub async fn vote_as<A: VoteAdapter>(
        &self,
        identity: Option<&Identity>,
        id: Uuid,
        requested: Direction,
        cached: ViewerVoteState,
    ) -> (VoteOutcome, A::View) {
        let outcome = self.vote(identity, A::subject(id), requested, cached).await;
        let view = A::view(id, outcome.state());
        (outcome, view)
    }
}

//! In-process vote service with per-operation failure injection.

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{Error, ErrorCode, Result};
use crate::identity::Identity;
use crate::models::{NewVoteRecord, SubjectRef, VoteRecord};
use crate::remote::RemoteVoteService;
use crate::vote_logic::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    FetchVote,
    InsertVote,
    UpdateVote,
    DeleteVote,
    AdjustCount,
    FetchCount,
}

#[derive(Debug, Default)]
struct Inner {
    identity: Option<Identity>,
    counts: HashMap<SubjectRef, i64>,
    records: Vec<(SubjectRef, VoteRecord)>,
    failing: HashSet<Op>,
}

#[derive(Debug, Default)]
pub struct MemoryVoteService {
    inner: RefCell<Inner>,
}

impl MemoryVoteService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(self, subject: SubjectRef, count: i64) -> Self {
        self.inner.borrow_mut().counts.insert(subject, count);
        self
    }

    pub fn sign_in(&self, identity: Identity) {
        self.inner.borrow_mut().identity = Some(identity);
    }

    pub fn fail(&self, op: Op) {
        self.inner.borrow_mut().failing.insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.inner.borrow_mut().failing.remove(&op);
    }

    pub fn count_of(&self, subject: SubjectRef) -> Option<i64> {
        self.inner.borrow().counts.get(&subject).copied()
    }

    pub fn records_for(&self, subject: SubjectRef, voter_id: Uuid) -> Vec<VoteRecord> {
        self.inner.borrow().records.iter()
            .filter(|(s, r)| *s == subject && r.voter_id == voter_id)
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn record_count(&self) -> usize {
        self.inner.borrow().records.len()
    }

    fn check(&self, op: Op) -> Result<()> {
        if self.inner.borrow().failing.contains(&op) {
            return Err(Error::with_details(ErrorCode::Transport, "request failed", format!("{op:?}")));
        }
        Ok(())
    }
}

fn record_not_found(record_id: Uuid) -> Error {
    Error::with_details(ErrorCode::NotFound, "vote not found", record_id.to_string())
}

fn subject_not_found(subject: SubjectRef) -> Error {
    Error::with_details(ErrorCode::NotFound, "subject not found", subject.to_string())
}

#[async_trait(?Send)]
impl RemoteVoteService for MemoryVoteService {
    async fn current_identity(&self) -> Result<Option<Identity>> {
        Ok(self.inner.borrow().identity.clone())
    }

    async fn fetch_vote(&self, subject: SubjectRef, voter_id: Uuid) -> Result<Option<VoteRecord>> {
        self.check(Op::FetchVote)?;
        Ok(self.records_for(subject, voter_id).into_iter().next())
    }

    async fn insert_vote(&self, subject: SubjectRef, record: &NewVoteRecord) -> Result<VoteRecord> {
        self.check(Op::InsertVote)?;
        let mut inner = self.inner.borrow_mut();
        if !inner.counts.contains_key(&subject) {
            return Err(subject_not_found(subject));
        }
        if inner.records.iter().any(|(s, r)| *s == subject && r.voter_id == record.voter_id) {
            return Err(Error::new(ErrorCode::Conflict, "voter already has a vote on this subject"));
        }
        let created = VoteRecord {
            id: Uuid::new_v4(),
            subject_id: subject.id,
            voter_id: record.voter_id,
            direction: record.direction,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.records.push((subject, created.clone()));
        Ok(created)
    }

    async fn update_vote(&self, subject: SubjectRef, record_id: Uuid, direction: Direction) -> Result<()> {
        self.check(Op::UpdateVote)?;
        let mut inner = self.inner.borrow_mut();
        let (_, record) = inner.records.iter_mut()
            .find(|(s, r)| *s == subject && r.id == record_id)
            .ok_or_else(|| record_not_found(record_id))?;
        record.direction = direction;
        Ok(())
    }

    async fn delete_vote(&self, subject: SubjectRef, record_id: Uuid) -> Result<()> {
        self.check(Op::DeleteVote)?;
        let mut inner = self.inner.borrow_mut();
        let before = inner.records.len();
        inner.records.retain(|(s, r)| !(*s == subject && r.id == record_id));
        if inner.records.len() == before {
            return Err(record_not_found(record_id));
        }
        Ok(())
    }

    async fn adjust_count(&self, subject: SubjectRef, delta: i64) -> Result<()> {
        self.check(Op::AdjustCount)?;
        let mut inner = self.inner.borrow_mut();
        let count = inner.counts.get_mut(&subject).ok_or_else(|| subject_not_found(subject))?;
        *count += delta;
        Ok(())
    }

    async fn fetch_count(&self, subject: SubjectRef) -> Result<i64> {
        self.check(Op::FetchCount)?;
        self.count_of(subject).ok_or_else(|| subject_not_found(subject))
    }
}

use std::cell::Cell;
use std::rc::Rc;

use crate::identity::{require_identity, Identity};
use crate::models::{SubjectRef, ViewerVoteState, VoteOutcome};
use crate::vote_logic::{Direction, Transition};

/// Lifetime token of the view that owns a control.
#[derive(Debug, Clone)]
pub struct ViewScope {
    open: Rc<Cell<bool>>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self { open: Rc::new(Cell::new(true)) }
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn close(&self) {
        self.open.set(false);
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

/// An in-flight click, carrying what is needed to roll it back.
#[derive(Debug, Clone)]
pub struct PendingVote {
    pub subject: SubjectRef,
    pub requested: Direction,
    pub previous: ViewerVoteState,
    scope: ViewScope,
}

impl PendingVote {
    pub fn is_live(&self) -> bool {
        self.scope.is_open()
    }
}

#[derive(Debug)]
pub enum Begin {
    Started(PendingVote),
    /// A request from this control is still running.
    Ignored,
    SignInRequired,
}

/// Client-side state of one vote control: the cached viewer state, the
/// busy flag and the scope of the owning view.
#[derive(Debug)]
pub struct VoteControl {
    subject: SubjectRef,
    state: ViewerVoteState,
    voting: bool,
    message: Option<String>,
    scope: ViewScope,
}

impl VoteControl {
    pub fn new(subject: SubjectRef, state: ViewerVoteState) -> Self {
        Self {
            subject,
            state,
            voting: false,
            message: None,
            scope: ViewScope::new(),
        }
    }

    pub fn subject(&self) -> SubjectRef { self.subject }
    pub fn state(&self) -> ViewerVoteState { self.state }
    pub fn is_voting(&self) -> bool { self.voting }
    pub fn message(&self) -> Option<&str> { self.message.as_deref() }

    /// Replaces the cache with state freshly loaded for `subject`. Ignored while
    /// a vote is in flight or when the load was for another subject.
    pub fn seed(&mut self, subject: SubjectRef, state: ViewerVoteState) -> bool {
        if subject != self.subject || self.voting || !self.scope.is_open() {
            return false;
        }
        self.state = state;
        true
    }

    pub fn begin(&mut self, identity: Option<&Identity>, requested: Direction) -> Begin {
        if self.voting {
            return Begin::Ignored;
        }
        if let Err(e) = require_identity(identity) {
            self.message = Some(e.to_string());
            return Begin::SignInRequired;
        }

        let previous = self.state;
        let transition = Transition::compute(previous.direction, requested);
        self.state = ViewerVoteState::new(transition.next, transition.apply(previous.aggregate_count));
        self.voting = true;
        self.message = None;

        Begin::Started(PendingVote {
            subject: self.subject,
            requested,
            previous,
            scope: self.scope.clone(),
        })
    }

    /// Settles a pending vote. Returns `false` when the owning view is gone
    /// and the outcome was discarded.
    pub fn finish(&mut self, pending: PendingVote, outcome: &VoteOutcome) -> bool {
        if !pending.is_live() {
            return false;
        }
        self.voting = false;
        self.state = if outcome.success { outcome.state() } else { pending.previous };
        self.message = Some(outcome.message.clone());
        true
    }

    pub fn clear_message(&mut self) -> bool {
        self.message.take().is_some()
    }

    pub fn close(&mut self) {
        self.scope.close();
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;
    use crate::adapters::{PostVotes, ReplyVotes, StartupVotes, VoteAdapter};
    use crate::memory::{MemoryVoteService, Op};
    use crate::sync::{Begin, VoteControl};
    use crate::*;

    fn voter() -> Identity {
        Identity { user_id: Uuid::new_v4(), display_name: Some("Camille".into()) }
    }

    fn subject(kind: SubjectKind) -> SubjectRef {
        SubjectRef::new(kind, Uuid::new_v4())
    }

    fn setup(count: i64) -> (VoteReconciler<MemoryVoteService>, SubjectRef, Identity) {
        let s = subject(SubjectKind::Startup);
        let reconciler = VoteReconciler::new(MemoryVoteService::new().with_subject(s, count));
        (reconciler, s, voter())
    }

    #[test]
    fn test_transition_table() {
        use Direction::{Down, Up};
        let cases = [
            (None, Up, Some(Up), 1),
            (None, Down, Some(Down), -1),
            (Some(Up), Up, None, -1),
            (Some(Down), Down, None, 1),
            (Some(Up), Down, Some(Down), -2),
            (Some(Down), Up, Some(Up), 2),
        ];
        for (prior, requested, next, delta) in cases {
            let t = Transition::compute(prior, requested);
            assert_eq!(t.next, next, "{prior:?} -> {requested:?}");
            assert_eq!(t.delta, delta, "{prior:?} -> {requested:?}");
        }
    }

    #[test]
    fn test_plan_picks_single_write() {
        let record = VoteRecord {
            id: Uuid::new_v4(),
            subject_id: Uuid::new_v4(),
            voter_id: Uuid::new_v4(),
            direction: Direction::Up,
            created_at: time::OffsetDateTime::now_utc(),
        };
        assert_eq!(VotePlan::new(None, Direction::Down).write, VoteWrite::Insert(Direction::Down));
        assert_eq!(
            VotePlan::new(Some(&record), Direction::Up).write,
            VoteWrite::Delete { record_id: record.id }
        );
        assert_eq!(
            VotePlan::new(Some(&record), Direction::Down).write,
            VoteWrite::Update { record_id: record.id, direction: Direction::Down }
        );
    }

    #[tokio::test]
    async fn test_click_sequence_scenario() {
        let (reconciler, s, me) = setup(10);
        let mut state = ViewerVoteState::new(None, 10);

        let steps = [
            (Direction::Up, Some(Direction::Up), 11),
            (Direction::Up, None, 10),
            (Direction::Down, Some(Direction::Down), 9),
            (Direction::Up, Some(Direction::Up), 10),
        ];
        for (click, direction, count) in steps {
            let outcome = reconciler.vote(Some(&me), s, click, state).await;
            assert!(outcome.success, "{}", outcome.message);
            assert_eq!(outcome.new_direction, direction);
            assert_eq!(outcome.new_count, count);
            state = outcome.state();
        }
        assert_eq!(reconciler.remote().count_of(s), Some(10));
    }

    #[tokio::test]
    async fn test_double_toggle_is_idempotent() {
        for click in [Direction::Up, Direction::Down] {
            let (reconciler, s, me) = setup(3);
            let first = reconciler.vote(Some(&me), s, click, ViewerVoteState::new(None, 3)).await;
            let second = reconciler.vote(Some(&me), s, click, first.state()).await;
            assert_eq!(second.new_direction, None);
            assert_eq!(second.new_count, 3);
            assert!(reconciler.remote().records_for(s, me.user_id).is_empty());
        }
    }

    #[tokio::test]
    async fn test_switching_moves_by_two() {
        let (reconciler, s, me) = setup(0);
        let up = reconciler.vote(Some(&me), s, Direction::Up, ViewerVoteState::default()).await;
        let down = reconciler.vote(Some(&me), s, Direction::Down, up.state()).await;
        assert_eq!(up.new_count - down.new_count, 2);
        let up_again = reconciler.vote(Some(&me), s, Direction::Up, down.state()).await;
        assert_eq!(up_again.new_count - down.new_count, 2);
    }

    #[tokio::test]
    async fn test_at_most_one_record_per_voter() {
        let (reconciler, s, me) = setup(0);
        let other = voter();
        let mut mine = ViewerVoteState::default();
        for click in [Direction::Up, Direction::Down, Direction::Down, Direction::Up, Direction::Down] {
            mine = reconciler.vote(Some(&me), s, click, mine).await.state();
            assert!(reconciler.remote().records_for(s, me.user_id).len() <= 1);
        }
        reconciler.vote(Some(&other), s, Direction::Up, mine).await;
        assert_eq!(reconciler.remote().records_for(s, me.user_id).len(), 1);
        assert_eq!(reconciler.remote().records_for(s, other.user_id).len(), 1);
        assert_eq!(reconciler.remote().count_of(s), Some(0));
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let (reconciler, s, me) = setup(0);
        let record = NewVoteRecord { subject_id: s.id, voter_id: me.user_id, direction: Direction::Up };
        reconciler.remote().insert_vote(s, &record).await.unwrap();
        let err = reconciler.remote().insert_vote(s, &record).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_unauthenticated_vote_writes_nothing() {
        let (reconciler, s, _) = setup(10);
        let cached = ViewerVoteState::new(None, 10);

        let err = reconciler.reconcile(None, s, Direction::Up, cached).await.unwrap_err();
        assert_eq!(err, VoteError::NotAuthenticated);

        let outcome = reconciler.vote(None, s, Direction::Down, cached).await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Please sign in to vote.");
        assert_eq!(reconciler.remote().record_count(), 0);
        assert_eq!(reconciler.remote().count_of(s), Some(10));
    }

    #[tokio::test]
    async fn test_failed_record_write_keeps_prior_state() {
        let (reconciler, s, me) = setup(10);
        reconciler.remote().fail(Op::InsertVote);
        let cached = ViewerVoteState::new(None, 10);

        let outcome = reconciler.vote(Some(&me), s, Direction::Up, cached).await;
        assert!(!outcome.success);
        assert_eq!(outcome.state(), cached);
        assert_eq!(reconciler.remote().count_of(s), Some(10));
        assert!(matches!(
            reconciler.reconcile(Some(&me), s, Direction::Up, cached).await,
            Err(VoteError::RemoteWriteFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_prior_read_aborts_before_writing() {
        let (reconciler, s, me) = setup(4);
        reconciler.remote().fail(Op::FetchVote);
        let result = reconciler.reconcile(Some(&me), s, Direction::Up, ViewerVoteState::new(None, 4)).await;
        assert!(matches!(result, Err(VoteError::RemoteReadFailed(_))));
        assert_eq!(reconciler.remote().record_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_count_adjustment_undoes_record_write() {
        let (reconciler, s, me) = setup(5);
        reconciler.remote().fail(Op::AdjustCount);
        let outcome = reconciler.vote(Some(&me), s, Direction::Up, ViewerVoteState::new(None, 5)).await;
        assert!(!outcome.success);
        assert!(reconciler.remote().records_for(s, me.user_id).is_empty());

        reconciler.remote().recover(Op::AdjustCount);
        let up = reconciler.vote(Some(&me), s, Direction::Up, ViewerVoteState::new(None, 5)).await;
        reconciler.remote().fail(Op::AdjustCount);
        reconciler.vote(Some(&me), s, Direction::Down, up.state()).await;
        let records = reconciler.remote().records_for(s, me.user_id);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].direction, Direction::Up);

        reconciler.vote(Some(&me), s, Direction::Up, up.state()).await;
        let records = reconciler.remote().records_for(s, me.user_id);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].direction, Direction::Up);
        assert_eq!(reconciler.remote().count_of(s), Some(6));
    }

    #[tokio::test]
    async fn test_failed_refresh_falls_back_to_local_count() {
        let (reconciler, s, me) = setup(10);
        reconciler.remote().fail(Op::FetchCount);
        let cached = ViewerVoteState::new(None, 10);

        let reconciled = reconciler.reconcile(Some(&me), s, Direction::Down, cached).await.unwrap();
        assert_eq!(reconciled.source, CountSource::Estimated);
        assert_eq!(reconciled.count, 9);

        let outcome = reconciler.vote(Some(&me), s, Direction::Down, reconciled_state(reconciled)).await;
        assert!(outcome.success);
        assert_eq!(outcome.new_direction, None);
        assert_eq!(outcome.new_count, 10);
    }

    fn reconciled_state(r: Reconciled) -> ViewerVoteState {
        ViewerVoteState::new(r.direction, r.count)
    }

    #[tokio::test]
    async fn test_refresh_reflects_other_voters() {
        let (reconciler, s, me) = setup(10);
        reconciler.remote().adjust_count(s, 3).await.unwrap();
        let outcome = reconciler.vote(Some(&me), s, Direction::Up, ViewerVoteState::new(None, 10)).await;
        assert_eq!(outcome.new_count, 14);
    }

    #[tokio::test]
    async fn test_load_state_seeds_direction() {
        let (reconciler, s, me) = setup(2);
        assert_eq!(reconciler.load_state(Some(&me), s).await.unwrap(), ViewerVoteState::new(None, 2));
        reconciler.vote(Some(&me), s, Direction::Down, ViewerVoteState::new(None, 2)).await;
        assert_eq!(
            reconciler.load_state(Some(&me), s).await.unwrap(),
            ViewerVoteState::new(Some(Direction::Down), 1)
        );
        assert_eq!(reconciler.load_state(None, s).await.unwrap(), ViewerVoteState::new(None, 1));
    }

    #[tokio::test]
    async fn test_adapters_map_outcomes() {
        let post = subject(SubjectKind::ForumPost);
        let reply = subject(SubjectKind::ForumReply);
        let startup = subject(SubjectKind::Startup);
        let reconciler = VoteReconciler::new(
            MemoryVoteService::new()
                .with_subject(post, 1)
                .with_subject(reply, 0)
                .with_subject(startup, 42),
        );
        let me = voter();

        let (_, view) = reconciler.vote_as::<StartupVotes>(Some(&me), startup.id, Direction::Up, ViewerVoteState::new(None, 42)).await;
        assert_eq!(view.startup_id, startup.id);
        assert_eq!(view.upvotes, 43);
        assert_eq!(view.user_vote, Some(Direction::Up));

        let (_, view) = reconciler.vote_as::<PostVotes>(Some(&me), post.id, Direction::Down, ViewerVoteState::new(None, 1)).await;
        assert_eq!((view.post_id, view.score, view.user_vote), (post.id, 0, Some(Direction::Down)));

        let (outcome, view) = reconciler.vote_as::<ReplyVotes>(None, reply.id, Direction::Up, ViewerVoteState::new(None, 0)).await;
        assert!(!outcome.success);
        assert_eq!((view.reply_id, view.score, view.user_vote), (reply.id, 0, None));

        assert_eq!(StartupVotes::subject(startup.id), startup);
        assert_eq!(ReplyVotes::KIND.table().parent_column, Some("post_id"));
    }

    #[test]
    fn test_subject_kind_names() {
        for kind in SubjectKind::ALL {
            assert_eq!(kind.as_str().parse::<SubjectKind>().unwrap(), kind);
        }
        assert!("blog-post".parse::<SubjectKind>().is_err());
        assert_eq!(SubjectKind::Startup.table().record_table, "startup_votes");
        assert_eq!(SubjectKind::ForumPost.table().subject_column, "post_id");
    }

    #[test]
    fn test_control_optimistic_update_and_busy_flag() {
        let s = subject(SubjectKind::ForumPost);
        let me = voter();
        let mut control = VoteControl::new(s, ViewerVoteState::new(None, 10));

        let Begin::Started(pending) = control.begin(Some(&me), Direction::Up) else {
            panic!("first click should start a vote");
        };
        assert!(control.is_voting());
        assert_eq!(control.state(), ViewerVoteState::new(Some(Direction::Up), 11));

        assert!(matches!(control.begin(Some(&me), Direction::Down), Begin::Ignored));
        assert_eq!(control.state(), ViewerVoteState::new(Some(Direction::Up), 11));

        let outcome = VoteOutcome {
            success: true,
            message: "Vote saved.".into(),
            new_direction: Some(Direction::Up),
            new_count: 12,
        };
        assert!(control.finish(pending, &outcome));
        assert!(!control.is_voting());
        assert_eq!(control.state(), ViewerVoteState::new(Some(Direction::Up), 12));
    }

    #[test]
    fn test_control_requires_identity() {
        let mut control = VoteControl::new(subject(SubjectKind::Startup), ViewerVoteState::new(None, 7));
        assert!(matches!(control.begin(None, Direction::Up), Begin::SignInRequired));
        assert!(!control.is_voting());
        assert_eq!(control.state(), ViewerVoteState::new(None, 7));
        assert_eq!(control.message(), Some("Please sign in to vote."));
    }

    #[tokio::test]
    async fn test_control_rolls_back_failed_write() {
        let (reconciler, s, me) = setup(10);
        reconciler.remote().fail(Op::InsertVote);
        let mut control = VoteControl::new(s, ViewerVoteState::new(None, 10));

        let Begin::Started(pending) = control.begin(Some(&me), Direction::Up) else {
            panic!("vote should start");
        };
        assert_eq!(control.state().aggregate_count, 11);

        let outcome = reconciler.vote(Some(&me), pending.subject, pending.requested, pending.previous).await;
        assert!(control.finish(pending, &outcome));
        assert_eq!(control.state(), ViewerVoteState::new(None, 10));
        assert!(!control.is_voting());
    }

    #[test]
    fn test_control_discards_results_after_teardown() {
        let me = voter();
        let mut control = VoteControl::new(subject(SubjectKind::ForumReply), ViewerVoteState::new(None, 0));
        let Begin::Started(pending) = control.begin(Some(&me), Direction::Down) else {
            panic!("vote should start");
        };
        control.close();
        assert!(!pending.is_live());

        let outcome = VoteOutcome {
            success: true,
            message: "Vote saved.".into(),
            new_direction: Some(Direction::Down),
            new_count: -1,
        };
        assert!(!control.finish(pending, &outcome));
        assert!(!control.seed(control.subject(), ViewerVoteState::new(None, 5)));
    }

    #[test]
    fn test_seed_ignored_while_voting() {
        let me = voter();
        let s = subject(SubjectKind::Startup);
        let mut control = VoteControl::new(s, ViewerVoteState::default());
        assert!(control.seed(s, ViewerVoteState::new(Some(Direction::Up), 3)));
        let _pending = control.begin(Some(&me), Direction::Up);
        assert!(!control.seed(s, ViewerVoteState::new(None, 100)));
        assert_eq!(control.state(), ViewerVoteState::new(None, 2));
    }

    #[test]
    fn test_seed_for_previous_subject_is_dropped() {
        let old = subject(SubjectKind::ForumPost);
        let current = subject(SubjectKind::ForumPost);
        let mut control = VoteControl::new(current, ViewerVoteState::new(None, 4));

        assert!(!control.seed(old, ViewerVoteState::new(Some(Direction::Down), 90)));
        assert_eq!(control.state(), ViewerVoteState::new(None, 4));
        assert!(control.seed(current, ViewerVoteState::new(Some(Direction::Up), 5)));
        assert_eq!(control.state(), ViewerVoteState::new(Some(Direction::Up), 5));
    }

    #[test]
    fn test_validation() {
        let me = voter();
        let adjust = |delta| AdjustCountRequest { kind: SubjectKind::Startup, subject_id: Uuid::new_v4(), delta };
        assert!(validate_adjustment(&adjust(1)).is_ok());
        assert!(validate_adjustment(&adjust(-2)).is_ok());
        assert_eq!(validate_adjustment(&adjust(0)), Err(ValidationError::ZeroDelta));
        assert_eq!(validate_adjustment(&adjust(3)), Err(ValidationError::DeltaTooLarge(3)));
        assert_eq!(validate_adjustment(&adjust(i64::MIN)), Err(ValidationError::DeltaTooLarge(i64::MIN)));
        assert_eq!(validate_adjustment(&adjust(i64::MAX)), Err(ValidationError::DeltaTooLarge(i64::MAX)));

        let mine = NewVoteRecord { subject_id: Uuid::new_v4(), voter_id: me.user_id, direction: Direction::Up };
        assert!(validate_new_vote(&mine, &me).is_ok());
        let theirs = NewVoteRecord { voter_id: Uuid::new_v4(), ..mine };
        assert_eq!(validate_new_vote(&theirs, &me), Err(ValidationError::VoterMismatch));
    }

    #[test]
    fn test_bearer_parsing() {
        assert_eq!(parse_bearer("Bearer abc123"), Some("abc123"));
        assert_eq!(parse_bearer("bearer  abc123 "), Some("abc123"));
        assert_eq!(parse_bearer("Basic abc123"), None);
        assert_eq!(parse_bearer("Bearer "), None);
        assert!(require_identity(None).is_err());
    }

    #[test]
    fn test_wire_format() {
        let outcome = VoteOutcome {
            success: true,
            message: "Vote saved.".into(),
            new_direction: Some(Direction::Down),
            new_count: -3,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["newDirection"], "down");
        assert_eq!(json["newCount"], -3);
        assert_eq!(serde_json::to_value(SubjectKind::ForumReply).unwrap(), "forum-reply");
    }
}

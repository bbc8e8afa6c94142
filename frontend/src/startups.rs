use yew::prelude::*;
use std::rc::Rc;
use shared::{StartupVoteView, StartupVotes, SubjectKind, SubjectSummary, VoteAdapter, VoteOutcome};
use uuid::Uuid;
use crate::session::use_session;
use crate::styles::*;
use crate::vote_buttons::VoteButtons;

#[derive(Clone, Default, PartialEq)]
pub struct RankingState {
    startups: Vec<SubjectSummary>,
    error: Option<String>,
    loaded: bool,
}

pub enum RankingAction {
    Loaded(Vec<SubjectSummary>),
    Failed(String),
    Voted(StartupVoteView),
}

impl Reducible for RankingState {
    type Action = RankingAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            RankingAction::Loaded(startups) => {
                next.startups = startups;
                next.error = None;
                next.loaded = true;
            }
            RankingAction::Failed(error) => {
                next.error = Some(error);
                next.loaded = true;
            }
            RankingAction::Voted(view) => {
                if let Some(startup) = next.startups.iter_mut().find(|s| s.id == view.startup_id) {
                    startup.aggregate_count = view.upvotes;
                }
                next.startups.sort_by(|a, b| b.aggregate_count.cmp(&a.aggregate_count));
            }
        }
        Rc::new(next)
    }
}

fn on_startup_voted(ranking: &UseReducerHandle<RankingState>, id: Uuid) -> Callback<VoteOutcome> {
    let ranking = ranking.clone();
    Callback::from(move |outcome: VoteOutcome| {
        if outcome.success {
            ranking.dispatch(RankingAction::Voted(StartupVotes::view(id, outcome.state())));
        }
    })
}

#[function_component]
pub fn Startups() -> Html {
    let session = use_session();
    let ranking = use_reducer(RankingState::default);

    use_effect_with_deps({
        let ranking = ranking.clone();
        let service = session.service();
        move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match service.fetch_subjects(SubjectKind::Startup, None).await {
                    Ok(startups) => ranking.dispatch(RankingAction::Loaded(startups)),
                    Err(e) => ranking.dispatch(RankingAction::Failed(e.message)),
                }
            });
            || ()
        }
    }, ());

    html! {
        <div class={CONTAINER}>
            <h1 class={combine_classes(HEADING_LG, "text-white")}>{"Startup Ranking"}</h1>

            {if let Some(error) = &ranking.error {
                html! { <div class={alert_style("error")}>{error}</div> }
            } else { html! {} }}

            {if ranking.loaded && ranking.startups.is_empty() && ranking.error.is_none() {
                html! { <p class={combine_classes(TEXT_MUTED, "text-center")}>{"No startups listed yet."}</p> }
            } else { html! {} }}

            <ol class={SPACE_Y_BASE}>
                {for ranking.startups.iter().enumerate().map(|(rank, startup)| html! {
                    <li key={startup.id.to_string()} class={combine_classes(CARD_SECTION, "flex items-center gap-4")}>
                        <span class="text-2xl font-bold text-gray-500 w-8 text-right">{rank + 1}</span>
                        <VoteButtons
                            subject={StartupVotes::subject(startup.id)}
                            initial_count={startup.aggregate_count}
                            session={session.clone()}
                            on_settled={on_startup_voted(&ranking, startup.id)}
                        />
                        <span class="text-lg text-gray-100">{&startup.title}</span>
                    </li>
                })}
            </ol>
        </div>
    }
}

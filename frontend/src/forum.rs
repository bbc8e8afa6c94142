use yew::prelude::*;
use yew_router::prelude::*;
use shared::{ErrorCode, PostVotes, ReplyVotes, SubjectKind, SubjectSummary, VoteAdapter};
use uuid::Uuid;
use crate::session::use_session;
use crate::styles::*;
use crate::vote_buttons::VoteButtons;
use crate::Route;

#[function_component]
pub fn Forum() -> Html {
    let session = use_session();
    let posts = use_state(Vec::<SubjectSummary>::new);
    let error = use_state(|| None::<String>);

    use_effect_with_deps({
        let posts = posts.clone();
        let error = error.clone();
        let service = session.service();
        move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match service.fetch_subjects(SubjectKind::ForumPost, None).await {
                    Ok(list) => posts.set(list),
                    Err(e) => error.set(Some(e.message)),
                }
            });
            || ()
        }
    }, ());

    html! {
        <div class={CONTAINER}>
            <h1 class={combine_classes(HEADING_LG, "text-white")}>{"Forum"}</h1>
            {if let Some(error) = &*error {
                html! { <div class={alert_style("error")}>{error}</div> }
            } else { html! {} }}
            <div class={SPACE_Y_BASE}>
                {for posts.iter().map(|post| html! {
                    <div key={post.id.to_string()} class={combine_classes(CARD_SECTION, "flex items-center gap-4")}>
                        <VoteButtons
                            subject={PostVotes::subject(post.id)}
                            initial_count={post.aggregate_count}
                            session={session.clone()}
                        />
                        <Link<Route> to={Route::Thread { id: post.id.to_string() }}
                            classes="text-lg text-blue-400 hover:underline">
                            {&post.title}
                        </Link<Route>>
                    </div>
                })}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ThreadProps {
    pub id: String,
}

#[derive(Clone, PartialEq)]
enum ThreadState {
    Loading,
    Loaded { post: SubjectSummary, replies: Vec<SubjectSummary> },
    Error(String),
}

#[function_component]
pub fn Thread(props: &ThreadProps) -> Html {
    let session = use_session();
    let state = use_state(|| ThreadState::Loading);

    use_effect_with_deps({
        let state = state.clone();
        let service = session.service();
        move |id: &String| {
            let id = Uuid::parse_str(id);
            wasm_bindgen_futures::spawn_local(async move {
                let Ok(id) = id else {
                    state.set(ThreadState::Error("Invalid thread link".into()));
                    return;
                };
                let loaded = futures::try_join!(
                    service.fetch_subject(PostVotes::subject(id)),
                    service.fetch_subjects(SubjectKind::ForumReply, Some(id)),
                );
                state.set(match loaded {
                    Ok((post, replies)) => ThreadState::Loaded { post, replies },
                    Err(e) if e.code == ErrorCode::NotFound => ThreadState::Error("This thread does not exist.".into()),
                    Err(e) => ThreadState::Error(e.message),
                });
            });
            || ()
        }
    }, props.id.clone());

    let body = match &*state {
        ThreadState::Loading => html! { <p class={TEXT_MUTED}>{"Loading..."}</p> },
        ThreadState::Error(error) => html! { <div class={alert_style("error")}>{error}</div> },
        ThreadState::Loaded { post, replies } => html! {
            <>
                <div class={combine_classes(CARD_SECTION, "flex items-start gap-4 mb-6")}>
                    <VoteButtons
                        subject={PostVotes::subject(post.id)}
                        initial_count={post.aggregate_count}
                        session={session.clone()}
                    />
                    <h2 class={HEADING_MD}>{&post.title}</h2>
                </div>
                <h3 class={HEADING_SM}>{format!("{} replies", replies.len())}</h3>
                <div class={SPACE_Y_BASE}>
                    {for replies.iter().map(|reply| html! {
                        <div key={reply.id.to_string()} class={combine_classes(CARD_SECTION, "flex items-start gap-4")}>
                            <VoteButtons
                                subject={ReplyVotes::subject(reply.id)}
                                initial_count={reply.aggregate_count}
                                session={session.clone()}
                            />
                            <p class="text-gray-200 whitespace-pre-wrap">{&reply.title}</p>
                        </div>
                    })}
                </div>
            </>
        },
    };

    html! {
        <div class={CONTAINER}>
            {body}
        </div>
    }
}

use yew::prelude::*;
use gloo_timers::callback::Timeout;
use shared::{Begin, Direction, Error, PendingVote, SubjectRef, ViewerVoteState, VoteControl, VoteOutcome, VoteReconciler};
use crate::config::CONFIG;
use crate::session::Session;
use crate::styles::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub subject: SubjectRef,
    pub initial_count: i64,
    pub session: Session,
    #[prop_or_default]
    pub on_settled: Option<Callback<VoteOutcome>>,
}

pub enum Msg {
    Seeded(SubjectRef, ViewerVoteState),
    LoadFailed(SubjectRef, Error),
    Click(Direction),
    Settled(PendingVote, VoteOutcome),
    ClearMessage,
}

/// Up/down arrows with a live count for one subject.
pub struct VoteButtons {
    control: VoteControl,
    message_timeout: Option<Timeout>,
}

impl VoteButtons {
    fn load(ctx: &Context<Self>) {
        let session = ctx.props().session.clone();
        let subject = ctx.props().subject;
        ctx.link().send_future(async move {
            let reconciler = VoteReconciler::new(session.service());
            match reconciler.load_state(session.identity.as_ref(), subject).await {
                Ok(state) => Msg::Seeded(subject, state),
                Err(e) => Msg::LoadFailed(subject, e),
            }
        });
    }

    fn schedule_clear(&mut self, ctx: &Context<Self>) {
        let link = ctx.link().clone();
        self.message_timeout = Some(Timeout::new(CONFIG.message_timeout_ms, move || {
            link.send_message(Msg::ClearMessage);
        }));
    }

    fn render_arrow(&self, ctx: &Context<Self>, direction: Direction) -> Html {
        let active = self.control.state().direction == Some(direction);
        let (label, title, tint) = match direction {
            Direction::Up => ("▲", "Upvote", "text-green-400"),
            Direction::Down => ("▼", "Downvote", "text-red-400"),
        };
        let onclick = ctx.link().callback(move |_| Msg::Click(direction));

        html! {
            <button
                {onclick}
                {title}
                disabled={self.control.is_voting()}
                class={classes!(
                    "text-xl", "px-2", "transition-colors", "disabled:opacity-50",
                    if active { tint } else { "text-gray-400 hover:text-gray-200" }
                )}
            >
                {label}
            </button>
        }
    }
}

impl Component for VoteButtons {
    type Message = Msg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        Self::load(ctx);
        Self {
            control: VoteControl::new(props.subject, ViewerVoteState::new(None, props.initial_count)),
            message_timeout: None,
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let props = ctx.props();
        if props.subject != old_props.subject {
            self.control.close();
            self.control = VoteControl::new(props.subject, ViewerVoteState::new(None, props.initial_count));
            Self::load(ctx);
        } else if props.session != old_props.session {
            Self::load(ctx);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Seeded(subject, state) => self.control.seed(subject, state),
            Msg::LoadFailed(subject, e) => {
                let warning = format!("Could not load vote state for {}: {}", subject, e);
                web_sys::console::warn_1(&warning.as_str().into());
                false
            }
            Msg::Click(direction) => {
                let session = ctx.props().session.clone();
                match self.control.begin(session.identity.as_ref(), direction) {
                    Begin::Started(pending) => {
                        self.message_timeout = None;
                        ctx.link().send_future(async move {
                            let reconciler = VoteReconciler::new(session.service());
                            let outcome = reconciler
                                .vote(session.identity.as_ref(), pending.subject, pending.requested, pending.previous)
                                .await;
                            Msg::Settled(pending, outcome)
                        });
                        true
                    }
                    Begin::Ignored => false,
                    Begin::SignInRequired => {
                        self.schedule_clear(ctx);
                        true
                    }
                }
            }
            Msg::Settled(pending, outcome) => {
                if !self.control.finish(pending, &outcome) {
                    return false;
                }
                self.schedule_clear(ctx);
                if let Some(on_settled) = &ctx.props().on_settled {
                    on_settled.emit(outcome);
                }
                true
            }
            Msg::ClearMessage => {
                self.message_timeout = None;
                self.control.clear_message()
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="flex flex-col items-center min-w-[3rem]">
                {self.render_arrow(ctx, Direction::Up)}
                <span class="text-lg font-bold text-gray-100">{self.control.state().aggregate_count}</span>
                {self.render_arrow(ctx, Direction::Down)}
                {if let Some(message) = self.control.message() {
                    html! { <p class={combine_classes(TEXT_MUTED, "mt-1 text-center")}>{message}</p> }
                } else { html! {} }}
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.control.close();
    }
}

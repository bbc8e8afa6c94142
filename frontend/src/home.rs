use yew::prelude::*;
use yew_router::prelude::*;
use crate::{Route, styles::*, session::use_session};

#[function_component]
pub fn Home() -> Html {
    let session = use_session();
    let greeting = match session.identity.as_ref().and_then(|i| i.display_name.as_deref()) {
        Some(name) => format!("Welcome back, {}.", name),
        None if session.identity.is_some() => "Welcome back.".to_string(),
        None => "Sign in on startupia.fr to vote.".to_string(),
    };

    html! {
        <div class={CONTAINER}>
            <h1 class={combine_classes(HEADING_LG, "text-white")}>{"Startupia"}</h1>
            <div class="text-center mb-6">
                <p class="text-gray-300 mb-4">{greeting}</p>
            </div>

            <div class="space-y-8 max-w-3xl mx-auto">
                <div class="bg-gray-800 p-6 rounded-lg shadow-lg">
                    <h2 class="text-xl font-semibold mb-4 text-white">{"How Voting Works"}</h2>
                    <ul class="list-disc pl-6 space-y-3 text-gray-300">
                        <li>{"Upvote or downvote any startup, forum post or reply"}</li>
                        <li>{"Clicking the same arrow again removes your vote"}</li>
                        <li>{"Clicking the other arrow switches your vote"}</li>
                        <li>{"You hold at most one vote on each item"}</li>
                    </ul>
                </div>

                <div class="bg-gray-800 p-6 rounded-lg shadow-lg">
                    <div class="flex flex-col sm:flex-row gap-4 justify-center">
                        <Link<Route> to={Route::Startups}
                            classes="bg-blue-600 hover:bg-blue-700 text-white px-8 py-3 rounded-lg text-lg font-semibold text-center transition-colors">
                            {"Startup Ranking"}
                        </Link<Route>>
                        <Link<Route> to={Route::Forum}
                            classes="bg-green-600 hover:bg-green-700 text-white px-8 py-3 rounded-lg text-lg font-semibold text-center transition-colors">
                            {"Forum"}
                        </Link<Route>>
                    </div>
                </div>
            </div>
        </div>
    }
}

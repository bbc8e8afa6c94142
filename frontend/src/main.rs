use yew::prelude::*;
use yew_router::prelude::*;

mod api;
mod config;
mod forum;
mod home;
mod session;
mod startups;
mod styles;
mod vote_buttons;

use crate::{
    forum::{Forum, Thread},
    home::Home,
    session::SessionProvider,
    startups::Startups,
    styles::{combine_classes, NAV_LINK, NAV_LINK_ACTIVE},
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")] Home,
    #[at("/startups")] Startups,
    #[at("/forum")] Forum,
    #[at("/forum/:id")] Thread { id: String },
}

#[function_component(Navigation)]
fn navigation() -> Html {
    let current_route = use_route::<Route>();
    let link = |route: Route, label: &'static str| {
        let active = match (&current_route, &route) {
            (Some(Route::Thread { .. }), Route::Forum) => true,
            (current, route) => current.as_ref() == Some(route),
        };
        let classes = if active { combine_classes(NAV_LINK, NAV_LINK_ACTIVE) } else { NAV_LINK.to_string() };
        html! {
            <Link<Route> to={route} classes={classes!(classes)}>{label}</Link<Route>>
        }
    };

    html! {
        <nav class="bg-gray-900 shadow-lg fixed top-0 w-full z-50">
            <div class="container mx-auto px-6 py-4 flex justify-center space-x-8">
                {link(Route::Home, "Home")}
                {link(Route::Startups, "Startups")}
                {link(Route::Forum, "Forum")}
            </div>
        </nav>
    }
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <BrowserRouter>
            <SessionProvider>
                <div class="min-h-screen bg-gray-900">
                    <Navigation />
                    <div class="pt-16">
                        <Switch<Route> render={switch} />
                    </div>
                </div>
            </SessionProvider>
        </BrowserRouter>
    }
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <Home /> },
        Route::Startups => html! { <Startups /> },
        Route::Forum => html! { <Forum /> },
        Route::Thread { id } => html! { <Thread {id} /> },
    }
}

fn main() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}

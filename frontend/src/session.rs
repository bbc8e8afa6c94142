use yew::prelude::*;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use shared::{Identity, RemoteVoteService};
use crate::api::HttpVoteService;
use crate::config::CONFIG;

/// Who is looking at the page, shared with every vote control through context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub identity: Option<Identity>,
    pub token: Option<Rc<str>>,
}

impl Session {
    pub fn service(&self) -> HttpVoteService {
        HttpVoteService::new(self.token.clone())
    }
}

fn stored_token() -> Option<Rc<str>> {
    let storage = web_sys::window()?.local_storage().ok()??;
    let token = storage.get_item(CONFIG.token_storage_key).ok()??;
    let token = token.trim();
    (!token.is_empty()).then(|| Rc::from(token))
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub children: Children,
}

#[function_component]
pub fn SessionProvider(props: &SessionProviderProps) -> Html {
    let session = use_state(|| Session { identity: None, token: stored_token() });

    use_effect_with_deps({
        let session = session.clone();
        move |_| {
            let token = session.token.clone();
            if token.is_some() {
                wasm_bindgen_futures::spawn_local(async move {
                    match HttpVoteService::new(token.clone()).current_identity().await {
                        Ok(identity) => session.set(Session { identity, token }),
                        Err(e) => log_warning(&format!("Could not resolve session: {}", e)),
                    }
                });
            }
            || ()
        }
    }, ());

    html! {
        <ContextProvider<Session> context={(*session).clone()}>
            {props.children.clone()}
        </ContextProvider<Session>>
    }
}

fn log_warning(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

/// The current session, or an anonymous one outside a provider.
#[hook]
pub fn use_session() -> Session {
    use_context::<Session>().unwrap_or_default()
}

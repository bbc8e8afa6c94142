use std::{fmt::Display, str::FromStr};

use shuttle_runtime::SecretStore;
use tracing::{info, warn};

const DEFAULT_VOTE_RATE_LIMIT: u32 = 30;
const DEFAULT_VOTE_RATE_WINDOW_SECONDS: i64 = 60;
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost";
const DEFAULT_SESSION_SWEEP_SECONDS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub vote_rate_limit: u32,
    pub vote_rate_window_seconds: i64,
    pub allowed_origin: String,
    pub session_sweep_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vote_rate_limit: DEFAULT_VOTE_RATE_LIMIT,
            vote_rate_window_seconds: DEFAULT_VOTE_RATE_WINDOW_SECONDS,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            session_sweep_seconds: DEFAULT_SESSION_SWEEP_SECONDS,
        }
    }
}

impl Settings {
    pub fn from_secrets(secrets: &SecretStore) -> Self {
        Self::from_lookup(|key| secrets.get(key))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            vote_rate_limit: try_load(&lookup, "VOTE_RATE_LIMIT", defaults.vote_rate_limit),
            vote_rate_window_seconds: try_load(&lookup, "VOTE_RATE_WINDOW_SECONDS", defaults.vote_rate_window_seconds),
            allowed_origin: try_load(&lookup, "CORS_ALLOWED_ORIGIN", defaults.allowed_origin),
            session_sweep_seconds: try_load(&lookup, "SESSION_SWEEP_SECONDS", defaults.session_sweep_seconds),
        }
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

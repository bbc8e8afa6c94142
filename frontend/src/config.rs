pub struct Config {
    pub api_base_url: &'static str,
    pub token_storage_key: &'static str,
    pub message_timeout_ms: u32,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            api_base_url: "/api",
            token_storage_key: "startupia.access_token",
            message_timeout_ms: 4_000,
        }
    }
}

pub const CONFIG: Config = Config::new();

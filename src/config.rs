use std::env;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

pub const DEFAULT_GREETING: &str = "Hi! I'm your appointment booking assistant. \
Please tell me your name, email, service, and preferred date.";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub backend_url: String,
    pub greeting: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            backend_url: env::var("CHAT_BACKEND_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            greeting: env::var("CHAT_GREETING")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GREETING.to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

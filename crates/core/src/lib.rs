pub mod controller;
pub mod domain;
pub mod export;
pub mod llm;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
    pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
    pub const DEFAULT_PORT: u16 = 3000;

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub gemini_api_key: Option<String>,
        pub gemini_base_url: Option<String>,
        pub gemini_model: Option<String>,
        pub gemini_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
        pub port: Option<u16>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                gemini_api_key: non_empty_var("GEMINI_API_KEY"),
                gemini_base_url: non_empty_var("GEMINI_BASE_URL"),
                gemini_model: non_empty_var("GEMINI_MODEL"),
                gemini_timeout_secs: non_empty_var("GEMINI_TIMEOUT_SECS")
                    .and_then(|s| s.parse::<u64>().ok()),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                port: non_empty_var("PORT").and_then(|s| s.parse::<u16>().ok()),
            })
        }

        pub fn require_gemini_api_key(&self) -> anyhow::Result<&str> {
            self.gemini_api_key
                .as_deref()
                .context("GEMINI_API_KEY is required")
        }

        pub fn gemini_base_url(&self) -> &str {
            self.gemini_base_url
                .as_deref()
                .unwrap_or(DEFAULT_GEMINI_BASE_URL)
        }

        pub fn gemini_model(&self) -> &str {
            self.gemini_model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
        }

        pub fn port(&self) -> u16 {
            self.port.unwrap_or(DEFAULT_PORT)
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

}

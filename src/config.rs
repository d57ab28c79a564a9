//! Runtime configuration from the environment

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_UI_PORT: u16 = 8501;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the legal question-answering API
    pub api_url: String,
    /// Per-request timeout for backend calls
    pub api_timeout: Duration,
    /// Port the chat page is served on
    pub ui_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("LEGAL_API_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = lookup("LEGAL_API_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        let ui_port = lookup("LEGAL_UI_PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_UI_PORT);

        Self {
            api_url,
            api_timeout: Duration::from_secs(timeout_secs),
            ui_port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_timeout, Duration::from_secs(60));
        assert_eq!(config.ui_port, 8501);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("LEGAL_API_URL", "https://legal.example.tn/api/"),
            ("LEGAL_API_TIMEOUT_SECS", "15"),
            ("LEGAL_UI_PORT", "9000"),
        ]);
        assert_eq!(config.api_url, "https://legal.example.tn/api/");
        assert_eq!(config.api_timeout, Duration::from_secs(15));
        assert_eq!(config.ui_port, 9000);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config(&[
            ("LEGAL_API_URL", "   "),
            ("LEGAL_API_TIMEOUT_SECS", "0"),
            ("LEGAL_UI_PORT", "eighty"),
        ]);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_timeout, Duration::from_secs(60));
        assert_eq!(config.ui_port, 8501);
    }
}

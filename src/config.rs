//! Build-time application configuration.
//!
//! Values default to what the dashboard expects when served behind the
//! API proxy; each can be overridden at compile time through an
//! environment variable read with `option_env!`.

use tracing::warn;

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// Largest page the feedback listing will request.
const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Prefix for every REST path, without trailing slash.
    pub api_base: String,
    /// Records requested per feedback page.
    pub page_size: usize,
    /// localStorage key holding the bearer token.
    pub token_key: String,
    /// `tracing` filter directive.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Configuration baked in at build time.
    pub fn from_build_env() -> Self {
        Self::from_overrides(
            option_env!("CALLQA_API_BASE"),
            option_env!("CALLQA_PAGE_SIZE"),
            option_env!("CALLQA_LOG"),
        )
    }

    /// Apply raw overrides on top of the defaults. Invalid values are
    /// ignored with a warning.
    pub fn from_overrides(
        api_base: Option<&str>,
        page_size: Option<&str>,
        log_level: Option<&str>,
    ) -> Self {
        let mut config = Self::default();

        if let Some(base) = api_base.map(str::trim).filter(|b| !b.is_empty()) {
            config.api_base = base.trim_end_matches('/').to_string();
        }

        if let Some(raw) = page_size {
            match raw.trim().parse::<usize>() {
                Ok(n) if (1..=MAX_PAGE_SIZE).contains(&n) => config.page_size = n,
                _ => warn!(
                    "Ignoring page size override {:?}, using {}",
                    raw, config.page_size
                ),
            }
        }

        if let Some(level) = log_level.map(str::trim).filter(|l| !l.is_empty()) {
            config.log_level = level.to_string();
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base, "/api");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.token_key, "token");
    }

    #[test]
    fn test_overrides_applied() {
        let config = AppConfig::from_overrides(
            Some("https://qa.example.com/api/"),
            Some("50"),
            Some("debug"),
        );
        assert_eq!(config.api_base, "https://qa.example.com/api");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_page_size_falls_back() {
        assert_eq!(AppConfig::from_overrides(None, Some("0"), None).page_size, 20);
        assert_eq!(AppConfig::from_overrides(None, Some("lots"), None).page_size, 20);
        assert_eq!(AppConfig::from_overrides(None, Some("5000"), None).page_size, 20);
    }

    #[test]
    fn test_blank_overrides_ignored() {
        let config = AppConfig::from_overrides(Some("  "), None, Some(""));
        assert_eq!(config, AppConfig::default());
    }
}

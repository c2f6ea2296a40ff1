//! # Configuration Management
//!
//! Settings are loaded once at startup and never change afterwards. Sources, from
//! lowest to highest priority:
//! 1. Default values (see [`AppConfig::defaults`])
//! 2. Configuration file (`config.toml`, optional)
//! 3. Environment variables with the `APP__` prefix (`APP__SERVER__PORT=9000`)
//! 4. Well-known deployment variables: `HOST`, `PORT`, `OPENAI_API_KEY`, `OPENAI_BASE_URL`
//!
//! `.env.local` and `.env` are read into the process environment by `main` before
//! loading, so they feed step 3 and 4 without overriding real environment variables.
//!
//! Keys that no struct field matches are ignored.

use anyhow::Result;
use config::{builder::DefaultState, ConfigBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::env;

/// Model requested from the provider unless overridden.
pub const DEFAULT_MODEL: &str = "whisper-1";

/// OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Top-level application configuration.
///
/// Shared read-only behind an `Arc` once loaded; there is no reload path.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub openai: OpenAiConfig,
}

/// Address the HTTP server binds to.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Settings for the external transcription provider.
///
/// `api_key` is wrapped in [`SecretString`] so `{:?}` prints it redacted.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            openai: OpenAiConfig {
                api_key: None,
                base_url: DEFAULT_BASE_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from every source in priority order.
    ///
    /// ## Environment Variable Examples:
    /// - `APP__SERVER__HOST=0.0.0.0`
    /// - `APP__OPENAI__MODEL=whisper-1`
    /// - `OPENAI_API_KEY=sk-...`
    /// - `PORT=3000`
    pub fn load() -> Result<Self> {
        let mut settings = Self::defaults()?
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            );

        if let Ok(host) = env::var("HOST") {
            settings = settings.set_override("server.host", host)?;
        }

        if let Ok(port) = env::var("PORT") {
            settings = settings.set_override("server.port", port)?;
        }

        if let Ok(api_key) = env::var("OPENAI_API_KEY") {
            settings = settings.set_override("openai.api_key", api_key)?;
        }

        if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
            settings = settings.set_override("openai.base_url", base_url)?;
        }

        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Builder seeded with the built-in defaults.
    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let defaults = AppConfig::default();

        let builder = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("openai.base_url", defaults.openai.base_url)?
            .set_default("openai.model", defaults.openai.model)?;

        Ok(builder)
    }

    /// Reject values the server cannot start with.
    ///
    /// The API key is not checked here; `/api/transcribe` reports it per request.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if self.openai.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("OpenAI base URL cannot be empty"));
        }

        if self.openai.model.trim().is_empty() {
            return Err(anyhow::anyhow!("Transcription model cannot be empty"));
        }

        Ok(())
    }

    /// Whether a non-blank provider credential is configured.
    pub fn has_api_key(&self) -> bool {
        self.openai
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn from_toml(toml: &str) -> AppConfig {
        AppConfig::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.openai.model, "whisper-1");
        assert!(config.validate().is_ok());
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.openai.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = from_toml(
            r#"
            [server]
            port = 9090

            [openai]
            api_key = "sk-test"
            "#,
        );

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.openai.base_url, DEFAULT_BASE_URL);
        assert!(config.has_api_key());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = from_toml(
            r#"
            database_url = "postgres://localhost"

            [openai]
            organization = "org-123"
            "#,
        );

        assert_eq!(config.openai.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = from_toml(
            r#"
            [openai]
            api_key = "   "
            "#,
        );

        assert!(!config.has_api_key());
    }

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let config = from_toml(
            r#"
            [openai]
            api_key = "sk-very-secret"
            "#,
        );

        assert!(!format!("{config:?}").contains("sk-very-secret"));
    }
}

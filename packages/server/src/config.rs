use anyhow::{Context, Result};
use dotenvy::dotenv;
use openai_client::{DEFAULT_CHAT_MODEL, DEFAULT_TTS_MODEL, DEFAULT_TTS_VOICE};
use std::env;

/// Notification dispatcher configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub fcm_project_id: Option<String>,
    pub google_application_credentials: Option<String>,
    /// Pre-minted OAuth token, used instead of the service account when set
    pub fcm_access_token: Option<String>,
    pub fcm_channel_id: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_from: String,
    pub scheduler_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let config = Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            fcm_project_id: env::var("FCM_PROJECT_ID").ok(),
            google_application_credentials: env::var("GOOGLE_APPLICATION_CREDENTIALS").ok(),
            fcm_access_token: env::var("FCM_ACCESS_TOKEN").ok(),
            fcm_channel_id: env::var("FCM_CHANNEL_ID")
                .unwrap_or_else(|_| "spark_channel".to_string()),
            smtp_host: env::var("SMTP_HOST").context("SMTP_HOST must be set")?,
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("SMTP_PORT must be a valid number")?,
            smtp_username: env::var("SMTP_USERNAME").context("SMTP_USERNAME must be set")?,
            smtp_password: env::var("SMTP_PASSWORD").context("SMTP_PASSWORD must be set")?,
            smtp_from: env::var("SMTP_FROM").context("SMTP_FROM must be set")?,
            scheduler_enabled: env::var("SCHEDULER_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        };

        if config.fcm_access_token.is_none() && config.google_application_credentials.is_none() {
            anyhow::bail!("Either FCM_ACCESS_TOKEN or GOOGLE_APPLICATION_CREDENTIALS must be set");
        }

        Ok(config)
    }
}

/// Chat relay configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ChatRelayConfig {
    pub port: u16,
    pub openai_api_key: String,
    pub chat_model: String,
    pub tts_model: String,
    pub tts_voice: String,
    /// Optional override for the bundled persona template
    pub prompt_path: Option<String>,
}

impl ChatRelayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            port: var("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            chat_model: var("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            tts_model: var("TTS_MODEL").unwrap_or_else(|| DEFAULT_TTS_MODEL.to_string()),
            tts_voice: var("TTS_VOICE").unwrap_or_else(|| DEFAULT_TTS_VOICE.to_string()),
            prompt_path: var("CHAT_PROMPT_PATH"),
        })
    }
}

//! Voice assistant webhook configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// Upstream webhook receiving voice notes. Voice input is disabled when unset.
    pub webhook_url: Option<String>,

    /// Upstream timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl VoiceConfig {
    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidVoiceTimeout);
        }
        let Some(url) = &self.webhook_url else {
            return Ok(());
        };
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ValidationError::InvalidWebhookUrl);
        }
        if *environment == Environment::Production && !url.starts_with("https://") {
            return Err(ValidationError::WebhookMustBeHttps);
        }
        Ok(())
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

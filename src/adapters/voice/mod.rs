//! Voice assistant adapters.

mod webhook;

pub use webhook::{WebhookConfig, WebhookVoiceAssistant};

//! Voice assistant port.
//!
//! An opaque HTTP channel: a note goes in, text or an error body comes out.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::voice::{render_error_body, VoiceNote};

/// Successful assistant response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceReply {
    pub status: u16,
    /// Plain text or markdown.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    #[error("Webhook error: {status}")]
    Rejected { status: u16, body: String },

    #[error("Webhook unreachable: {0}")]
    Transport(String),
}

impl VoiceError {
    /// Markdown shown to the user.
    pub fn display_message(&self) -> String {
        match self {
            VoiceError::Rejected { status, body } => render_error_body(*status, body),
            VoiceError::Transport(message) => {
                format!("Impossible de contacter le serveur : {}", message)
            }
        }
    }
}

#[async_trait]
pub trait VoiceAssistant: Send + Sync {
    async fn submit(&self, note: &VoiceNote) -> Result<VoiceReply, VoiceError>;
}

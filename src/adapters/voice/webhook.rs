//! Webhook voice assistant.
//!
//! Posts each note as a multipart form to a workflow-automation webhook.
//!
//! # Form fields
//!
//! | Field            | Content                                   |
//! |------------------|-------------------------------------------|
//! | `file`           | audio, `recording.webm`, `audio/webm`     |
//! | `timestamp`      | send time, `2024-01-15T10:30:00.000Z`     |
//! | `sessionId`      | conversation id                           |
//! | `messageCount`   | sequence number within the conversation   |
//! | `chantiers`      | JSON `[{id, nom}]` of job-sites           |
//! | `collaborateurs` | JSON `[{id, nom}]` of workers             |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::domain::voice::VoiceNote;
use crate::ports::{VoiceAssistant, VoiceError, VoiceReply};

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout: Duration,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct WebhookVoiceAssistant {
    config: WebhookConfig,
    client: Client,
}

impl WebhookVoiceAssistant {
    pub fn new(config: WebhookConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn form(note: &VoiceNote) -> Result<Form, VoiceError> {
        let audio = Part::bytes(note.audio.clone())
            .file_name(note.file_name.clone())
            .mime_str(&note.mime_type)
            .map_err(|e| VoiceError::Transport(format!("invalid audio mime type: {}", e)))?;

        Ok(Form::new()
            .part("file", audio)
            .text("timestamp", note.sent_at.to_iso_string())
            .text("sessionId", note.session_id.clone())
            .text("messageCount", note.message_count.to_string())
            .text("chantiers", note.job_sites_json())
            .text("collaborateurs", note.workers_json()))
    }
}

#[async_trait]
impl VoiceAssistant for WebhookVoiceAssistant {
    async fn submit(&self, note: &VoiceNote) -> Result<VoiceReply, VoiceError> {
        let form = Self::form(note)?;

        tracing::info!(
            session_id = %note.session_id,
            message_count = note.message_count,
            audio_bytes = note.audio.len(),
            "submitting voice note"
        );

        let response = self
            .client
            .post(&self.config.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VoiceError::Transport(format!(
                        "timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else {
                    VoiceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| VoiceError::Transport(format!("failed to read reply: {}", e)))?;
            Ok(VoiceReply {
                status: status.as_u16(),
                body,
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "voice webhook rejected note");
            Err(VoiceError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::VoiceSession;
    use axum::extract::Multipart;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/hook", addr)
    }

    fn note() -> VoiceNote {
        let mut session = VoiceSession::resume("session-1700000000000-abc1234", 2);
        VoiceNote::new(vec![0x1a, 0x45, 0xdf, 0xa3], &mut session, &[], &[])
    }

    #[tokio::test]
    async fn sends_every_form_field() {
        async fn echo_fields(mut multipart: Multipart) -> String {
            let mut lines = Vec::new();
            while let Some(field) = multipart.next_field().await.unwrap() {
                let name = field.name().unwrap_or_default().to_string();
                let file_name = field.file_name().map(str::to_string);
                let value = field.text().await.unwrap_or_default();
                match file_name {
                    Some(file_name) => lines.push(format!("{}={}", name, file_name)),
                    None => lines.push(format!("{}={}", name, value)),
                }
            }
            lines.join("\n")
        }

        let url = spawn(Router::new().route("/hook", post(echo_fields))).await;
        let assistant = WebhookVoiceAssistant::new(WebhookConfig::new(url)).unwrap();

        let reply = assistant.submit(&note()).await.unwrap();

        assert_eq!(reply.status, 200);
        assert!(reply.body.contains("file=recording.webm"));
        assert!(reply.body.contains("sessionId=session-1700000000000-abc1234"));
        assert!(reply.body.contains("messageCount=3"));
        assert!(reply.body.contains("chantiers=[]"));
        assert!(reply.body.contains("collaborateurs=[]"));
        assert!(reply.body.contains("timestamp="));
    }

    #[tokio::test]
    async fn non_success_status_is_rejected_with_body() {
        async fn fail() -> (StatusCode, &'static str) {
            (StatusCode::BAD_GATEWAY, r#"{"message":"workflow crashed"}"#)
        }

        let url = spawn(Router::new().route("/hook", post(fail))).await;
        let assistant = WebhookVoiceAssistant::new(WebhookConfig::new(url)).unwrap();

        let err = assistant.submit(&note()).await.unwrap_err();
        assert_eq!(
            err,
            VoiceError::Rejected {
                status: 502,
                body: r#"{"message":"workflow crashed"}"#.to_string(),
            }
        );
        assert!(err.display_message().contains("workflow crashed"));
    }

    #[tokio::test]
    async fn unreachable_webhook_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = WebhookConfig::new(format!("http://{}/hook", addr))
            .with_timeout(Duration::from_secs(2));
        let assistant = WebhookVoiceAssistant::new(config).unwrap();

        let err = assistant.submit(&note()).await.unwrap_err();
        assert!(matches!(err, VoiceError::Transport(_)));
    }

    #[tokio::test]
    async fn truncated_success_reply_is_a_transport_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request.ends_with(b"--\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 64\r\n\r\nC'est not")
                .await
                .unwrap();
        });

        let config = WebhookConfig::new(format!("http://{}/hook", addr))
            .with_timeout(Duration::from_secs(5));
        let assistant = WebhookVoiceAssistant::new(config).unwrap();

        let err = assistant.submit(&note()).await.unwrap_err();
        match err {
            VoiceError::Transport(message) => {
                assert!(message.starts_with("failed to read reply"), "{}", message)
            }
            other => panic!("expected Transport, got {:?}", other),
        }
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::Timestamp;
use crate::domain::planning::{JobSite, Worker};

pub const VOICE_FILE_NAME: &str = "recording.webm";
pub const VOICE_MIME_TYPE: &str = "audio/webm";

const UNNAMED_JOB_SITE: &str = "Sans nom";
const UNKNOWN_WORKER: &str = "Inconnu";

/// Lightweight `{id, nom}` summary sent alongside the audio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceContextEntry {
    pub id: String,
    pub nom: String,
}

impl VoiceContextEntry {
    pub fn for_job_site(job_site: &JobSite) -> Self {
        let description = job_site.description.trim();
        Self {
            id: job_site.id.to_string(),
            nom: if description.is_empty() {
                UNNAMED_JOB_SITE.to_string()
            } else {
                job_site.description.clone()
            },
        }
    }

    pub fn for_worker(worker: &Worker) -> Self {
        let name = worker.display_name();
        Self {
            id: worker.id.to_string(),
            nom: if name.is_empty() {
                UNKNOWN_WORKER.to_string()
            } else {
                name
            },
        }
    }
}

/// Conversation with the assistant: a stable id plus a message counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceSession {
    id: String,
    message_count: u32,
}

impl VoiceSession {
    /// Starts a session with an id of the form `session-<millis>-<7 chars>`.
    pub fn start() -> Self {
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(7).collect();
        Self {
            id: format!("session-{}-{}", Timestamp::now().as_unix_millis(), suffix),
            message_count: 0,
        }
    }

    /// Resumes a session whose id and count were kept elsewhere.
    pub fn resume(id: impl Into<String>, message_count: u32) -> Self {
        Self {
            id: id.into(),
            message_count,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn message_count(&self) -> u32 {
        self.message_count
    }

    /// Increments the counter and returns the sequence number of the new message.
    pub fn next_message(&mut self) -> u32 {
        self.message_count = self.message_count.saturating_add(1);
        self.message_count
    }
}

/// A recorded voice note ready to be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceNote {
    pub audio: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
    pub sent_at: Timestamp,
    pub session_id: String,
    pub message_count: u32,
    pub job_sites: Vec<VoiceContextEntry>,
    pub workers: Vec<VoiceContextEntry>,
}

impl VoiceNote {
    /// Builds the next note of `session`, advancing its counter.
    pub fn new(
        audio: Vec<u8>,
        session: &mut VoiceSession,
        job_sites: &[JobSite],
        workers: &[Worker],
    ) -> Self {
        let message_count = session.next_message();
        Self {
            audio,
            file_name: VOICE_FILE_NAME.to_string(),
            mime_type: VOICE_MIME_TYPE.to_string(),
            sent_at: Timestamp::now(),
            session_id: session.id().to_string(),
            message_count,
            job_sites: job_sites.iter().map(VoiceContextEntry::for_job_site).collect(),
            workers: workers.iter().map(VoiceContextEntry::for_worker).collect(),
        }
    }

    /// JSON array for the `chantiers` form field.
    pub fn job_sites_json(&self) -> String {
        serde_json::to_string(&self.job_sites).unwrap_or_else(|_| "[]".to_string())
    }

    /// JSON array for the `collaborateurs` form field.
    pub fn workers_json(&self) -> String {
        serde_json::to_string(&self.workers).unwrap_or_else(|_| "[]".to_string())
    }
}

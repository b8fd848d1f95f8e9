//! SubmitVoiceNoteHandler - Sends a recorded note to the voice assistant.

use std::sync::Arc;

use crate::domain::foundation::CommandMetadata;
use crate::domain::planning::PlanningError;
use crate::domain::voice::VoiceNote;
use crate::ports::VoiceAssistant;

use super::{PlanningContext, RefreshScheduleCommand, RefreshScheduleHandler};

#[derive(Debug, Clone)]
pub struct SubmitVoiceNoteCommand {
    pub audio: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitVoiceNoteResult {
    /// Assistant reply, plain text or markdown.
    pub reply: String,
    pub message_count: u32,
    pub refreshed: bool,
}

/// Handler for voice notes.
///
/// The assistant may have changed the schedule on its side, so a successful
/// reply is followed by a full refresh.
pub struct SubmitVoiceNoteHandler {
    assistant: Arc<dyn VoiceAssistant>,
    refresh: Arc<RefreshScheduleHandler>,
    context: Arc<PlanningContext>,
}

impl SubmitVoiceNoteHandler {
    pub fn new(
        assistant: Arc<dyn VoiceAssistant>,
        refresh: Arc<RefreshScheduleHandler>,
        context: Arc<PlanningContext>,
    ) -> Self {
        Self {
            assistant,
            refresh,
            context,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitVoiceNoteCommand,
        metadata: CommandMetadata,
    ) -> Result<SubmitVoiceNoteResult, PlanningError> {
        self.context.ensure_open()?;

        let note = {
            let state = self.context.state().await;
            let mut session = self.context.voice_session().await;
            VoiceNote::new(cmd.audio, &mut session, state.job_sites(), state.workers())
        };

        let reply = self.assistant.submit(&note).await.map_err(|err| {
            tracing::warn!(
                correlation_id = %metadata.correlation_id(),
                session_id = %note.session_id,
                error = %err,
                "voice note rejected"
            );
            PlanningError::VoiceFailed(err.display_message())
        })?;

        let refreshed = self
            .refresh
            .handle(RefreshScheduleCommand, metadata.clone())
            .await
            .is_ok();

        tracing::info!(
            correlation_id = %metadata.correlation_id(),
            session_id = %note.session_id,
            message_count = note.message_count,
            refreshed,
            "voice note processed"
        );

        Ok(SubmitVoiceNoteResult {
            reply: reply.body,
            message_count: note.message_count,
            refreshed,
        })
    }
}

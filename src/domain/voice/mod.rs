//! Voice assistant domain.
//!
//! Voice notes are sent to an external workflow that may create or move
//! interventions on its own. The planning side only builds the payload,
//! renders failures for display, and refreshes after a success.

mod note;
mod report;

pub use note::{VoiceContextEntry, VoiceNote, VoiceSession, VOICE_FILE_NAME, VOICE_MIME_TYPE};
pub use report::render_error_body;

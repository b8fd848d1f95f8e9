//! Drop payloads.

use serde::{Deserialize, Serialize};

use super::records::{Intervention, Worker};
use super::slot::Slot;

/// What was dragged onto the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum DragPayload {
    /// A worker from the sidebar, creating a new intervention.
    NewAssignment(Worker),
    /// An existing intervention being rescheduled.
    RescheduleAssignment(Intervention),
}

/// Where it was dropped. `None` when released outside any slot.
pub type DropTarget = Option<Slot>;

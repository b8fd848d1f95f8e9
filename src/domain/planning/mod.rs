//! Planning module - the scheduling core.
//!
//! - `slot` - Half-day slots and the wall-clock timestamp convention
//! - `records` - Clients, job-sites, workers and interventions
//! - `state` - Authoritative in-memory schedule with reversible local changes
//! - `filter` - Focus, worker visibility and calendar navigation
//! - `month_grid` / `agenda` - Read-side projections
//! - `hours` - Planned vs sold hours per job-site
//! - `drag` - Drop payloads feeding the assignment handlers

mod agenda;
mod drag;
mod errors;
mod filter;
mod hours;
mod month_grid;
mod records;
mod slot;
mod state;

pub use agenda::{build_day_agenda, AgendaEntry, DayAgenda};
pub use drag::{DragPayload, DropTarget};
pub use errors::{DeleteOutcome, EntityKind, PlanningError};
pub use filter::PlanningFilter;
pub use hours::{focused_hours, hours_for, HoursSummary};
pub use month_grid::{
    build_month_grid, month_grid_days, GridDay, MonthGrid, MonthMembership, SlotEntry,
    PALETTE_SIZE,
};
pub use records::{
    Client, Intervention, InterventionPatch, JobSite, JobSitePatch, Worker, WorkerPatch,
};
pub use slot::{
    parse_slot_timestamp, period_of, serialize_slot_timestamp, slot_window, Period, Slot,
    WallClock,
};
pub use state::{
    AppliedChange, DoubleBooking, LocalChange, ScheduleSnapshot, SchedulingState,
};

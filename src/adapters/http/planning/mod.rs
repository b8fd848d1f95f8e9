//! HTTP adapter for planning endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    DeleteResponse, DropRequest, DropResponse, ErrorResponse, MonthQuery, RefreshResponse,
    VoiceNoteResponse,
};
pub use handlers::PlanningHandlers;
pub use routes::planning_routes;

pub(crate) use handlers::status_for;

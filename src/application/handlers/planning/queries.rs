//! Read-side queries over the planning context.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::JobSiteId;
use crate::domain::planning::{
    build_day_agenda, build_month_grid, focused_hours, hours_for, DayAgenda, DoubleBooking,
    HoursSummary, MonthGrid, PlanningError, PlanningFilter, ScheduleSnapshot,
};

use super::PlanningContext;

/// Projections computed from the current state and filter.
///
/// Each call takes its own read guard; nothing here mutates the context.
pub struct PlanningQueries {
    context: Arc<PlanningContext>,
}

impl PlanningQueries {
    pub fn new(context: Arc<PlanningContext>) -> Self {
        Self { context }
    }

    pub async fn month_grid(&self, today: NaiveDate) -> MonthGrid {
        let filter = self.context.filter().await;
        let state = self.context.state().await;
        build_month_grid(&state, &filter, today)
    }

    pub async fn day_agenda(&self) -> DayAgenda {
        let filter = self.context.filter().await;
        let state = self.context.state().await;
        build_day_agenda(&state, &filter)
    }

    pub async fn focused_hours(&self) -> Option<HoursSummary> {
        let filter = self.context.filter().await;
        let state = self.context.state().await;
        focused_hours(&state, &filter)
    }

    pub async fn hours_for(&self, job_site_id: JobSiteId) -> Result<HoursSummary, PlanningError> {
        let state = self.context.state().await;
        let job_site = state
            .find_job_site(job_site_id)
            .ok_or(PlanningError::UnknownJobSite(job_site_id))?;
        Ok(hours_for(&state, job_site))
    }

    pub async fn double_bookings(&self) -> Vec<DoubleBooking> {
        self.context.state().await.find_double_bookings()
    }

    pub async fn filter(&self) -> PlanningFilter {
        self.context.filter().await
    }

    pub async fn snapshot(&self) -> ScheduleSnapshot {
        self.context.snapshot().await
    }
}

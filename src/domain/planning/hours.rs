//! Planned vs sold hours per job-site.
//!
//! Display only; exceeding the budget never blocks scheduling.

use serde::Serialize;

use super::filter::PlanningFilter;
use super::records::JobSite;
use super::state::SchedulingState;
use crate::domain::foundation::JobSiteId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoursSummary {
    pub job_site_id: JobSiteId,
    pub planned_hours: f64,
    pub sold_hours: f64,
    pub remaining_hours: f64,
}

impl HoursSummary {
    pub fn is_over_budget(&self) -> bool {
        self.planned_hours > self.sold_hours
    }
}

/// Sums every intervention of the job-site, ignoring visibility filters.
pub fn hours_for(state: &SchedulingState, job_site: &JobSite) -> HoursSummary {
    let planned_hours: f64 = state
        .interventions_for_job_site(job_site.id)
        .map(|i| i.duration_hours())
        .sum();
    let sold_hours = job_site.sold_hours.unwrap_or(0.0);
    HoursSummary {
        job_site_id: job_site.id,
        planned_hours,
        sold_hours,
        remaining_hours: sold_hours - planned_hours,
    }
}

/// Summary for the focused job-site, if one is focused and loaded.
pub fn focused_hours(state: &SchedulingState, filter: &PlanningFilter) -> Option<HoursSummary> {
    let focused = filter.focused_job_site()?;
    state.find_job_site(focused).map(|site| hours_for(state, site))
}

//! Day agenda projection (compact view).

use chrono::NaiveDate;
use serde::Serialize;

use super::filter::PlanningFilter;
use super::month_grid::stale_worker;
use super::records::{JobSite, Worker};
use super::slot::{Period, WallClock};
use super::state::SchedulingState;
use crate::domain::foundation::InterventionId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaEntry {
    pub intervention_id: InterventionId,
    pub start: WallClock,
    pub end: WallClock,
    pub period: Period,
    pub period_label: &'static str,
    pub time_range_label: &'static str,
    pub worker: Worker,
    pub job_site: Option<JobSite>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAgenda {
    pub date: NaiveDate,
    pub entries: Vec<AgendaEntry>,
}

impl DayAgenda {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Visible interventions on the filter's anchor date, earliest first.
///
/// Entries whose worker is not loaded are skipped. A missing job-site falls
/// back to the join carried by the intervention, if any.
pub fn build_day_agenda(state: &SchedulingState, filter: &PlanningFilter) -> DayAgenda {
    let date = filter.anchor();
    let mut visible: Vec<_> = state
        .interventions()
        .iter()
        .filter(|i| i.date() == date && filter.is_visible(i))
        .collect();
    visible.sort_by_key(|i| i.start);

    let entries = visible
        .into_iter()
        .filter_map(|intervention| {
            let Some(worker) = state.find_worker(intervention.worker_id).cloned() else {
                tracing::debug!(
                    error = %stale_worker(intervention),
                    "dropping agenda entry"
                );
                return None;
            };
            let job_site = state
                .find_job_site(intervention.job_site_id)
                .or(intervention.job_site.as_ref())
                .cloned();
            let period = intervention.period();
            Some(AgendaEntry {
                intervention_id: intervention.id,
                start: intervention.start,
                end: intervention.end,
                period,
                period_label: period.label(),
                time_range_label: period.time_range_label(),
                worker,
                job_site,
                comment: intervention.comment.clone(),
            })
        })
        .collect();

    DayAgenda { date, entries }
}

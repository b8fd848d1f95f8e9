//! Focus, worker visibility and calendar navigation.
//!
//! Session-local state, never persisted. The job-site focus and the worker
//! filter are independent axes: changing one never resets the other.

use chrono::{Days, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::records::Intervention;
use crate::domain::foundation::{InterventionId, JobSiteId, WorkerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningFilter {
    focused_job_site: Option<JobSiteId>,
    anchor: NaiveDate,
    show_all: bool,
    visible_workers: Vec<WorkerId>,
    open_detail: Option<InterventionId>,
}

impl PlanningFilter {
    pub fn new(anchor: NaiveDate) -> Self {
        Self {
            focused_job_site: None,
            anchor,
            show_all: false,
            visible_workers: Vec::new(),
            open_detail: None,
        }
    }

    /// Filter anchored on the local current date.
    pub fn starting_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    // ── focus ─────────────────────────────────────────────────────

    pub fn focused_job_site(&self) -> Option<JobSiteId> {
        self.focused_job_site
    }

    pub fn focus(&mut self, job_site_id: JobSiteId) {
        self.focused_job_site = Some(job_site_id);
    }

    pub fn clear_focus(&mut self) {
        self.focused_job_site = None;
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn set_show_all(&mut self, show_all: bool) {
        self.show_all = show_all;
    }

    // ── workers ───────────────────────────────────────────────────

    /// Visible worker ids in the order they were selected.
    pub fn visible_workers(&self) -> &[WorkerId] {
        &self.visible_workers
    }

    /// Adds or removes a worker from the filter. Returns whether it is now selected.
    pub fn toggle_worker(&mut self, worker_id: WorkerId) -> bool {
        if let Some(pos) = self.visible_workers.iter().position(|w| *w == worker_id) {
            self.visible_workers.remove(pos);
            false
        } else {
            self.visible_workers.push(worker_id);
            true
        }
    }

    /// Shows every worker again.
    pub fn clear_worker_filter(&mut self) {
        self.visible_workers.clear();
    }

    pub fn is_worker_selected(&self, worker_id: WorkerId) -> bool {
        self.visible_workers.contains(&worker_id)
    }

    /// Visibility predicate shared by the grid and the agenda.
    pub fn is_visible(&self, intervention: &Intervention) -> bool {
        let site_ok = match self.focused_job_site {
            Some(focused) if !self.show_all => intervention.job_site_id == focused,
            _ => true,
        };
        let worker_ok =
            self.visible_workers.is_empty() || self.is_worker_selected(intervention.worker_id);
        site_ok && worker_ok
    }

    // ── detail view ───────────────────────────────────────────────

    pub fn open_detail(&mut self, id: InterventionId) {
        self.open_detail = Some(id);
    }

    pub fn opened_detail(&self) -> Option<InterventionId> {
        self.open_detail
    }

    /// Closes the detail view if it shows `id`.
    pub fn close_detail(&mut self, id: InterventionId) {
        if self.open_detail == Some(id) {
            self.open_detail = None;
        }
    }

    // ── navigation ────────────────────────────────────────────────

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.anchor = date;
    }

    pub fn today(&mut self) {
        self.anchor = Local::now().date_naive();
    }

    /// Same day next month, clamped to the month's last day.
    pub fn next_month(&mut self) {
        if let Some(date) = self.anchor.checked_add_months(Months::new(1)) {
            self.anchor = date;
        }
    }

    pub fn previous_month(&mut self) {
        if let Some(date) = self.anchor.checked_sub_months(Months::new(1)) {
            self.anchor = date;
        }
    }

    pub fn next_day(&mut self) {
        if let Some(date) = self.anchor.checked_add_days(Days::new(1)) {
            self.anchor = date;
        }
    }

    pub fn previous_day(&mut self) {
        if let Some(date) = self.anchor.checked_sub_days(Days::new(1)) {
            self.anchor = date;
        }
    }
}

impl Default for PlanningFilter {
    fn default() -> Self {
        Self::starting_today()
    }
}

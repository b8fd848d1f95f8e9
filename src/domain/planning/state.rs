//! Authoritative in-memory schedule for one tenant.
//!
//! Collections keep store order. Indices are derived on each read rather than
//! maintained incrementally; a tenant's live data is small.
//!
//! Optimistic updates go through [`SchedulingState::apply_local`], which
//! returns an [`AppliedChange`] carrying everything needed to undo it with
//! [`SchedulingState::revert_local`].

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::errors::PlanningError;
use super::records::{Intervention, InterventionPatch, JobSite, Worker};
use super::slot::WallClock;
use crate::domain::foundation::{InterventionId, JobSiteId, WorkerId};

/// Result of one coordinated fetch of the three collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub job_sites: Vec<JobSite>,
    pub workers: Vec<Worker>,
    pub interventions: Vec<Intervention>,
}

/// A local mutation requested by the assignment engine.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalChange {
    Insert(Intervention),
    Update {
        id: InterventionId,
        patch: InterventionPatch,
    },
    Remove(InterventionId),
}

/// Undo record for an applied [`LocalChange`].
#[derive(Debug, Clone, PartialEq)]
pub enum AppliedChange {
    Inserted { id: InterventionId },
    Updated { previous: Intervention },
    Removed { index: usize, previous: Intervention },
}

impl AppliedChange {
    pub fn intervention_id(&self) -> InterventionId {
        match self {
            AppliedChange::Inserted { id } => *id,
            AppliedChange::Updated { previous } => previous.id,
            AppliedChange::Removed { previous, .. } => previous.id,
        }
    }
}

/// Interventions sharing a worker and a start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoubleBooking {
    pub worker_id: WorkerId,
    pub start: WallClock,
    pub intervention_ids: Vec<InterventionId>,
}

#[derive(Debug, Clone, Default)]
pub struct SchedulingState {
    job_sites: Vec<JobSite>,
    workers: Vec<Worker>,
    interventions: Vec<Intervention>,
}

impl SchedulingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: ScheduleSnapshot) -> Self {
        let mut state = Self::new();
        state.replace_all(snapshot);
        state
    }

    /// Replaces all three collections with a freshly fetched snapshot.
    pub fn replace_all(&mut self, snapshot: ScheduleSnapshot) {
        self.job_sites = snapshot.job_sites;
        self.workers = snapshot.workers;
        self.interventions = snapshot.interventions;
    }

    pub fn snapshot(&self) -> ScheduleSnapshot {
        ScheduleSnapshot {
            job_sites: self.job_sites.clone(),
            workers: self.workers.clone(),
            interventions: self.interventions.clone(),
        }
    }

    pub fn job_sites(&self) -> &[JobSite] {
        &self.job_sites
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn interventions(&self) -> &[Intervention] {
        &self.interventions
    }

    pub fn find_job_site(&self, id: JobSiteId) -> Option<&JobSite> {
        self.job_sites.iter().find(|s| s.id == id)
    }

    pub fn find_worker(&self, id: WorkerId) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    /// Position of a worker in store order, used for palette assignment.
    pub fn worker_index(&self, id: WorkerId) -> Option<usize> {
        self.workers.iter().position(|w| w.id == id)
    }

    pub fn find_intervention(&self, id: InterventionId) -> Option<&Intervention> {
        self.interventions.iter().find(|i| i.id == id)
    }

    pub fn intervention_ids(&self) -> HashSet<InterventionId> {
        self.interventions.iter().map(|i| i.id).collect()
    }

    /// Applies a local change and returns its undo record.
    ///
    /// Fails without touching state when the change cannot apply: inserting
    /// an id already present, or updating/removing one that is absent.
    pub fn apply_local(&mut self, change: LocalChange) -> Result<AppliedChange, PlanningError> {
        match change {
            LocalChange::Insert(intervention) => {
                if self.find_intervention(intervention.id).is_some() {
                    return Err(PlanningError::Duplicate(intervention.id));
                }
                let id = intervention.id;
                self.interventions.push(intervention);
                Ok(AppliedChange::Inserted { id })
            }
            LocalChange::Update { id, patch } => {
                let current = self
                    .interventions
                    .iter_mut()
                    .find(|i| i.id == id)
                    .ok_or(PlanningError::NotFound(id))?;
                let previous = current.clone();
                patch.apply_to(current)?;
                Ok(AppliedChange::Updated { previous })
            }
            LocalChange::Remove(id) => {
                let index = self
                    .interventions
                    .iter()
                    .position(|i| i.id == id)
                    .ok_or(PlanningError::NotFound(id))?;
                let previous = self.interventions.remove(index);
                Ok(AppliedChange::Removed { index, previous })
            }
        }
    }

    /// Undoes a change previously returned by [`apply_local`](Self::apply_local).
    ///
    /// Tolerates a state that was refreshed in between: reverting an insert
    /// that is gone or restoring a record that is back is a no-op.
    pub fn revert_local(&mut self, applied: AppliedChange) {
        match applied {
            AppliedChange::Inserted { id } => {
                self.interventions.retain(|i| i.id != id);
            }
            AppliedChange::Updated { previous } => {
                if let Some(current) = self.interventions.iter_mut().find(|i| i.id == previous.id)
                {
                    *current = previous;
                }
            }
            AppliedChange::Removed { index, previous } => {
                if self.find_intervention(previous.id).is_none() {
                    let index = index.min(self.interventions.len());
                    self.interventions.insert(index, previous);
                }
            }
        }
    }

    /// Interventions grouped by local calendar date, each day in store order.
    pub fn interventions_by_day(&self) -> BTreeMap<NaiveDate, Vec<&Intervention>> {
        let mut by_day: BTreeMap<NaiveDate, Vec<&Intervention>> = BTreeMap::new();
        for intervention in &self.interventions {
            by_day.entry(intervention.date()).or_default().push(intervention);
        }
        by_day
    }

    pub fn interventions_by_job_site(&self) -> HashMap<JobSiteId, Vec<&Intervention>> {
        let mut by_site: HashMap<JobSiteId, Vec<&Intervention>> = HashMap::new();
        for intervention in &self.interventions {
            by_site
                .entry(intervention.job_site_id)
                .or_default()
                .push(intervention);
        }
        by_site
    }

    pub fn interventions_for_job_site(
        &self,
        job_site_id: JobSiteId,
    ) -> impl Iterator<Item = &Intervention> {
        self.interventions
            .iter()
            .filter(move |i| i.job_site_id == job_site_id)
    }

    /// Workers booked more than once at the same start time.
    ///
    /// Double-booking is allowed; this only reports it.
    pub fn find_double_bookings(&self) -> Vec<DoubleBooking> {
        let mut groups: BTreeMap<(WallClock, WorkerId), Vec<InterventionId>> = BTreeMap::new();
        for intervention in &self.interventions {
            groups
                .entry((intervention.start, intervention.worker_id))
                .or_default()
                .push(intervention.id);
        }
        groups
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|((start, worker_id), intervention_ids)| DoubleBooking {
                worker_id,
                start,
                intervention_ids,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::TenantId;
    use crate::domain::planning::slot::{slot_window, Period};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn intervention(day: NaiveDate, period: Period, worker_id: WorkerId) -> Intervention {
        let (start, end) = slot_window(day, period);
        Intervention::new(
            InterventionId::new(),
            TenantId::new(),
            JobSiteId::new(),
            worker_id,
            start,
            end,
        )
        .unwrap()
    }

    fn state_with(interventions: Vec<Intervention>) -> SchedulingState {
        SchedulingState::from_snapshot(ScheduleSnapshot {
            interventions,
            ..ScheduleSnapshot::default()
        })
    }

    fn ids(state: &SchedulingState) -> Vec<InterventionId> {
        state.interventions().iter().map(|i| i.id).collect()
    }

    // ───────────────────────────────────────────────────────────────
    // apply / revert
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn insert_then_revert_restores_ids() {
        let existing = intervention(date(2024, 3, 4), Period::Am, WorkerId::new());
        let mut state = state_with(vec![existing]);
        let before = ids(&state);

        let applied = state
            .apply_local(LocalChange::Insert(intervention(
                date(2024, 3, 5),
                Period::Pm,
                WorkerId::new(),
            )))
            .unwrap();
        assert_eq!(state.interventions().len(), 2);

        state.revert_local(applied);
        assert_eq!(ids(&state), before);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let existing = intervention(date(2024, 3, 4), Period::Am, WorkerId::new());
        let mut state = state_with(vec![existing.clone()]);

        let result = state.apply_local(LocalChange::Insert(existing.clone()));
        assert_eq!(result, Err(PlanningError::Duplicate(existing.id)));
        assert_eq!(state.interventions().len(), 1);
    }

    #[test]
    fn update_then_revert_restores_timestamps() {
        let existing = intervention(date(2024, 3, 4), Period::Am, WorkerId::new());
        let id = existing.id;
        let mut state = state_with(vec![existing.clone()]);

        let (start, end) = slot_window(date(2024, 3, 6), Period::Pm);
        let applied = state
            .apply_local(LocalChange::Update {
                id,
                patch: InterventionPatch::reschedule(start, end),
            })
            .unwrap();
        assert_eq!(state.find_intervention(id).unwrap().start, start);

        state.revert_local(applied);
        assert_eq!(state.find_intervention(id), Some(&existing));
    }

    #[test]
    fn update_of_missing_record_is_not_found() {
        let mut state = SchedulingState::new();
        let id = InterventionId::new();
        let result = state.apply_local(LocalChange::Update {
            id,
            patch: InterventionPatch::default(),
        });
        assert_eq!(result, Err(PlanningError::NotFound(id)));
    }

    #[test]
    fn remove_then_revert_restores_position() {
        let day = date(2024, 3, 4);
        let a = intervention(day, Period::Am, WorkerId::new());
        let b = intervention(day, Period::Pm, WorkerId::new());
        let c = intervention(day, Period::Am, WorkerId::new());
        let mut state = state_with(vec![a, b.clone(), c]);
        let before = ids(&state);

        let applied = state.apply_local(LocalChange::Remove(b.id)).unwrap();
        assert!(state.find_intervention(b.id).is_none());

        state.revert_local(applied);
        assert_eq!(ids(&state), before);
    }

    #[test]
    fn reverting_insert_after_refresh_is_harmless() {
        let mut state = SchedulingState::new();
        let applied = state
            .apply_local(LocalChange::Insert(intervention(
                date(2024, 3, 4),
                Period::Am,
                WorkerId::new(),
            )))
            .unwrap();
        state.replace_all(ScheduleSnapshot::default());

        state.revert_local(applied);
        assert!(state.interventions().is_empty());
    }

    // ───────────────────────────────────────────────────────────────
    // Derived indices
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn by_day_groups_and_orders_dates() {
        let worker = WorkerId::new();
        let state = state_with(vec![
            intervention(date(2024, 3, 5), Period::Am, worker),
            intervention(date(2024, 3, 4), Period::Pm, worker),
            intervention(date(2024, 3, 4), Period::Am, worker),
        ]);

        let by_day = state.interventions_by_day();
        let days: Vec<_> = by_day.keys().copied().collect();
        assert_eq!(days, vec![date(2024, 3, 4), date(2024, 3, 5)]);
        assert_eq!(by_day[&date(2024, 3, 4)].len(), 2);
    }

    #[test]
    fn by_job_site_reflects_current_state() {
        let mut state = SchedulingState::new();
        let item = intervention(date(2024, 3, 4), Period::Am, WorkerId::new());
        let site = item.job_site_id;
        state.apply_local(LocalChange::Insert(item)).unwrap();

        assert_eq!(state.interventions_by_job_site()[&site].len(), 1);
        assert_eq!(state.interventions_for_job_site(site).count(), 1);
    }

    #[test]
    fn double_bookings_are_reported_not_prevented() {
        let worker = WorkerId::new();
        let day = date(2024, 3, 4);
        let mut state = SchedulingState::new();
        state
            .apply_local(LocalChange::Insert(intervention(day, Period::Am, worker)))
            .unwrap();
        state
            .apply_local(LocalChange::Insert(intervention(day, Period::Am, worker)))
            .unwrap();
        state
            .apply_local(LocalChange::Insert(intervention(day, Period::Pm, worker)))
            .unwrap();

        let bookings = state.find_double_bookings();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].worker_id, worker);
        assert_eq!(bookings[0].intervention_ids.len(), 2);
    }
}

//! Month grid projection.
//!
//! Weeks start on Monday. The grid runs from the Monday on or before the 1st
//! through the first week that contains the month's last day, so a month
//! spans 4 to 6 rows depending on alignment.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::Serialize;

use super::errors::{EntityKind, PlanningError};
use super::filter::PlanningFilter;
use super::records::Intervention;
use super::slot::Period;
use super::state::SchedulingState;
use crate::domain::foundation::{InterventionId, JobSiteId, WorkerId};

/// Number of distinct worker colours in the calendar palette.
pub const PALETTE_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthMembership {
    InCurrentMonth,
    OutsideMonth,
}

/// One intervention as rendered inside a half-day bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotEntry {
    pub intervention_id: InterventionId,
    pub job_site_id: JobSiteId,
    pub worker_id: WorkerId,
    pub worker_name: String,
    pub worker_initials: String,
    pub photo_url: Option<String>,
    pub job_site_description: Option<String>,
    pub palette_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridDay {
    pub date: NaiveDate,
    pub membership: MonthMembership,
    pub is_today: bool,
    pub is_weekend: bool,
    pub am: Vec<SlotEntry>,
    pub pm: Vec<SlotEntry>,
}

impl GridDay {
    pub fn in_current_month(&self) -> bool {
        self.membership == MonthMembership::InCurrentMonth
    }

    pub fn bucket(&self, period: Period) -> &[SlotEntry] {
        match period {
            Period::Am => &self.am,
            Period::Pm => &self.pm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub days: Vec<GridDay>,
}

impl MonthGrid {
    pub fn weeks(&self) -> impl Iterator<Item = &[GridDay]> {
        self.days.chunks(7)
    }

    pub fn week_count(&self) -> usize {
        self.days.len() / 7
    }

    pub fn day(&self, date: NaiveDate) -> Option<&GridDay> {
        self.days.iter().find(|d| d.date == date)
    }
}

fn first_of_month(anchor: NaiveDate) -> NaiveDate {
    anchor.with_day(1).unwrap_or(anchor)
}

fn last_of_month(first: NaiveDate) -> NaiveDate {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}

fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Calendar dates covering the anchor's month in whole Monday-start weeks.
pub fn month_grid_days(anchor: NaiveDate) -> Vec<NaiveDate> {
    let first = first_of_month(anchor);
    let last = last_of_month(first);

    let mut days = Vec::with_capacity(42);
    let mut week_start = monday_on_or_before(first);
    loop {
        days.extend(week_start.iter_days().take(7));
        let Some(week_end) = week_start.checked_add_days(Days::new(6)) else {
            break;
        };
        if week_end >= last {
            break;
        }
        match week_start.checked_add_days(Days::new(7)) {
            Some(next) => week_start = next,
            None => break,
        }
    }
    days
}

pub(crate) fn stale_worker(intervention: &Intervention) -> PlanningError {
    PlanningError::StaleJoinReference {
        intervention_id: intervention.id,
        entity: EntityKind::Worker,
        reference: intervention.worker_id.to_string(),
    }
}

fn slot_entry(state: &SchedulingState, intervention: &Intervention) -> Option<SlotEntry> {
    let Some(worker) = state.find_worker(intervention.worker_id) else {
        tracing::debug!(
            error = %stale_worker(intervention),
            "dropping grid entry"
        );
        return None;
    };
    let palette_index = state
        .worker_index(worker.id)
        .map(|index| index % PALETTE_SIZE)
        .unwrap_or(0);
    let job_site_description = state
        .find_job_site(intervention.job_site_id)
        .or(intervention.job_site.as_ref())
        .map(|site| site.description.clone());

    Some(SlotEntry {
        intervention_id: intervention.id,
        job_site_id: intervention.job_site_id,
        worker_id: worker.id,
        worker_name: worker.display_name(),
        worker_initials: worker.initials(),
        photo_url: worker.photo_url.clone(),
        job_site_description,
        palette_index,
    })
}

/// Builds the month grid around the filter's anchor.
pub fn build_month_grid(
    state: &SchedulingState,
    filter: &PlanningFilter,
    today: NaiveDate,
) -> MonthGrid {
    let anchor = filter.anchor();
    let by_day = state.interventions_by_day();

    let days = month_grid_days(anchor)
        .into_iter()
        .map(|date| {
            let mut am = Vec::new();
            let mut pm = Vec::new();
            let visible = by_day
                .get(&date)
                .into_iter()
                .flatten()
                .filter(|i| filter.is_visible(i));
            for intervention in visible {
                let Some(entry) = slot_entry(state, intervention) else {
                    continue;
                };
                match intervention.period() {
                    Period::Am => am.push(entry),
                    Period::Pm => pm.push(entry),
                }
            }

            let membership = if date.month() == anchor.month() && date.year() == anchor.year() {
                MonthMembership::InCurrentMonth
            } else {
                MonthMembership::OutsideMonth
            };

            GridDay {
                date,
                membership,
                is_today: date == today,
                is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
                am,
                pm,
            }
        })
        .collect();

    MonthGrid {
        year: anchor.year(),
        month: anchor.month(),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::TenantId;
    use crate::domain::planning::records::Worker;
    use crate::domain::planning::slot::slot_window;
    use crate::domain::planning::state::ScheduleSnapshot;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn worker(tenant: TenantId, first: &str) -> Worker {
        Worker {
            id: WorkerId::new(),
            tenant_id: tenant,
            last_name: "DURAND".to_string(),
            first_name: first.to_string(),
            job_title: "Électricien".to_string(),
            photo_url: None,
            created_at: None,
        }
    }

    fn intervention(worker_id: WorkerId, day: NaiveDate, period: Period) -> Intervention {
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

    // ───────────────────────────────────────────────────────────────
    // Date range
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn february_2024_spans_leap_day() {
        let days = month_grid_days(date(2024, 2, 1));
        assert_eq!(days.first(), Some(&date(2024, 1, 29)));
        assert_eq!(days.last(), Some(&date(2024, 3, 3)));
        assert!(days.contains(&date(2024, 2, 29)));
        assert_eq!(days.len(), 35);
    }

    #[test]
    fn february_starting_monday_fits_four_weeks() {
        let days = month_grid_days(date(2021, 2, 14));
        assert_eq!(days.len(), 28);
        assert_eq!(days.first(), Some(&date(2021, 2, 1)));
    }

    #[test]
    fn long_month_starting_sunday_needs_six_weeks() {
        let days = month_grid_days(date(2023, 10, 20));
        assert_eq!(days.first(), Some(&date(2023, 9, 25)));
        assert_eq!(days.len(), 42);
    }

    proptest! {
        #[test]
        fn grid_covers_month_in_whole_weeks(y in 1990i32..2100, m in 1u32..=12, d in 1u32..=28) {
            let anchor = date(y, m, d);
            let days = month_grid_days(anchor);

            prop_assert_eq!(days.len() % 7, 0);
            prop_assert!((28..=42).contains(&days.len()));
            prop_assert_eq!(days[0].weekday(), Weekday::Mon);
            prop_assert_eq!(days[days.len() - 1].weekday(), Weekday::Sun);

            let in_month: Vec<_> = days
                .iter()
                .filter(|day| day.month() == m && day.year() == y)
                .collect();
            let first = date(y, m, 1);
            let expected = first.iter_days().take_while(|day| day.month() == m).count();
            prop_assert_eq!(in_month.len(), expected);
            for pair in days.windows(2) {
                prop_assert_eq!(pair[0].succ_opt(), Some(pair[1]));
            }
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Buckets
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn entries_land_in_matching_bucket() {
        let tenant = TenantId::new();
        let w = worker(tenant, "Paul");
        let morning = intervention(w.id, date(2024, 2, 12), Period::Am);
        let afternoon = intervention(w.id, date(2024, 2, 12), Period::Pm);
        let state = SchedulingState::from_snapshot(ScheduleSnapshot {
            workers: vec![w],
            interventions: vec![morning.clone(), afternoon.clone()],
            ..ScheduleSnapshot::default()
        });
        let filter = PlanningFilter::new(date(2024, 2, 1));

        let grid = build_month_grid(&state, &filter, date(2024, 2, 12));
        let day = grid.day(date(2024, 2, 12)).unwrap();

        assert!(day.is_today);
        assert!(day.in_current_month());
        assert_eq!(day.am.len(), 1);
        assert_eq!(day.am[0].intervention_id, morning.id);
        assert_eq!(day.bucket(Period::Pm)[0].intervention_id, afternoon.id);
        assert_eq!(grid.week_count(), 5);
    }

    #[test]
    fn unknown_worker_is_dropped() {
        let orphan = intervention(WorkerId::new(), date(2024, 2, 12), Period::Am);
        let state = SchedulingState::from_snapshot(ScheduleSnapshot {
            interventions: vec![orphan],
            ..ScheduleSnapshot::default()
        });
        let grid = build_month_grid(&state, &PlanningFilter::new(date(2024, 2, 1)), date(2024, 1, 1));
        assert!(grid.days.iter().all(|d| d.am.is_empty() && d.pm.is_empty()));
    }

    #[test]
    fn palette_wraps_after_six_workers() {
        let tenant = TenantId::new();
        let workers: Vec<Worker> = (0..7).map(|n| worker(tenant, &format!("W{}", n))).collect();
        let seventh = intervention(workers[6].id, date(2024, 2, 5), Period::Pm);
        let state = SchedulingState::from_snapshot(ScheduleSnapshot {
            workers,
            interventions: vec![seventh],
            ..ScheduleSnapshot::default()
        });

        let grid = build_month_grid(&state, &PlanningFilter::new(date(2024, 2, 1)), date(2024, 1, 1));
        assert_eq!(grid.day(date(2024, 2, 5)).unwrap().pm[0].palette_index, 0);
    }

    #[test]
    fn outside_days_and_weekends_are_flagged() {
        let state = SchedulingState::new();
        let grid = build_month_grid(&state, &PlanningFilter::new(date(2024, 2, 1)), date(2024, 1, 1));

        let first = &grid.days[0];
        assert_eq!(first.membership, MonthMembership::OutsideMonth);
        assert!(!first.is_weekend);
        assert!(grid.day(date(2024, 2, 3)).unwrap().is_weekend);
    }

    #[test]
    fn filtered_out_interventions_are_hidden() {
        let tenant = TenantId::new();
        let w = worker(tenant, "Inès");
        let hidden = intervention(w.id, date(2024, 2, 12), Period::Am);
        let state = SchedulingState::from_snapshot(ScheduleSnapshot {
            workers: vec![w],
            interventions: vec![hidden],
            ..ScheduleSnapshot::default()
        });
        let mut filter = PlanningFilter::new(date(2024, 2, 1));
        filter.focus(JobSiteId::new());

        let grid = build_month_grid(&state, &filter, date(2024, 1, 1));
        assert!(grid.day(date(2024, 2, 12)).unwrap().am.is_empty());
    }
}

//! Records shared with the hosted store.
//!
//! Field names follow the store's columns through serde renames so that rows
//! deserialize without an intermediate DTO.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::errors::PlanningError;
use super::slot::{period_of, Period, Slot, WallClock};
use crate::domain::foundation::{ClientId, InterventionId, JobSiteId, TenantId, Timestamp, WorkerId};

/// Customer owning one or more job-sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    #[serde(rename = "entreprise_id")]
    pub tenant_id: TenantId,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    #[serde(rename = "adresse")]
    pub address: String,
    #[serde(rename = "codePostal")]
    pub postal_code: String,
    #[serde(rename = "ville")]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Client {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A schedulable staff member ("collaborateur").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    #[serde(rename = "entreprise_id")]
    pub tenant_id: TenantId,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    #[serde(rename = "poste")]
    pub job_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Worker {
    /// "First Last", trimmed. Empty when both parts are blank.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Up to two uppercase initials, used when there is no photo.
    pub fn initials(&self) -> String {
        [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// A unit of work at a location ("chantier").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSite {
    pub id: JobSiteId,
    #[serde(rename = "entreprise_id")]
    pub tenant_id: TenantId,
    pub client_id: ClientId,
    pub description: String,
    #[serde(rename = "adresse")]
    pub address: String,
    #[serde(rename = "codePostal")]
    pub postal_code: String,
    #[serde(rename = "ville")]
    pub city: String,
    #[serde(rename = "date_debut")]
    pub start_date: NaiveDate,
    /// Quoted time budget in hours.
    #[serde(default, rename = "temps_vendu", skip_serializing_if = "Option::is_none")]
    pub sold_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
}

impl JobSite {
    pub fn full_address(&self) -> String {
        format!("{}, {} {}", self.address, self.postal_code, self.city)
    }
}

/// Assignment of one worker to one job-site over a time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    pub id: InterventionId,
    #[serde(rename = "entreprise_id")]
    pub tenant_id: TenantId,
    #[serde(rename = "chantier_id")]
    pub job_site_id: JobSiteId,
    #[serde(rename = "collaborateur_id")]
    pub worker_id: WorkerId,
    #[serde(rename = "date_debut")]
    pub start: WallClock,
    #[serde(rename = "date_fin")]
    pub end: WallClock,
    #[serde(default, rename = "commentaire", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, rename = "chantier", skip_serializing_if = "Option::is_none")]
    pub job_site: Option<JobSite>,
    #[serde(default, rename = "collaborateur", skip_serializing_if = "Option::is_none")]
    pub worker: Option<Worker>,
}

impl Intervention {
    /// Builds an intervention, rejecting ranges where `end <= start`.
    pub fn new(
        id: InterventionId,
        tenant_id: TenantId,
        job_site_id: JobSiteId,
        worker_id: WorkerId,
        start: WallClock,
        end: WallClock,
    ) -> Result<Self, PlanningError> {
        if end <= start {
            return Err(PlanningError::InvalidTimeRange { start, end });
        }
        Ok(Self {
            id,
            tenant_id,
            job_site_id,
            worker_id,
            start,
            end,
            comment: None,
            created_at: None,
            job_site: None,
            worker: None,
        })
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Attaches display joins. Joins are never sent back to the store.
    pub fn with_joins(mut self, job_site: Option<JobSite>, worker: Option<Worker>) -> Self {
        self.job_site = job_site;
        self.worker = worker;
        self
    }

    /// Copy without joined records, as written to the store.
    pub fn without_joins(&self) -> Self {
        Self {
            job_site: None,
            worker: None,
            ..self.clone()
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn period(&self) -> Period {
        period_of(&self.start)
    }

    pub fn slot(&self) -> Slot {
        Slot::of(&self.start)
    }

    /// Length in fractional hours.
    pub fn duration_hours(&self) -> f64 {
        self.end.hours_since(&self.start)
    }
}

/// Partial update of an intervention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterventionPatch {
    #[serde(default, rename = "date_debut", skip_serializing_if = "Option::is_none")]
    pub start: Option<WallClock>,
    #[serde(default, rename = "date_fin", skip_serializing_if = "Option::is_none")]
    pub end: Option<WallClock>,
    #[serde(default, rename = "chantier_id", skip_serializing_if = "Option::is_none")]
    pub job_site_id: Option<JobSiteId>,
    #[serde(default, rename = "collaborateur_id", skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<WorkerId>,
    #[serde(default, rename = "commentaire", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl InterventionPatch {
    /// Patch moving an intervention to a new time range.
    pub fn reschedule(start: WallClock, end: WallClock) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none()
            && self.end.is_none()
            && self.job_site_id.is_none()
            && self.worker_id.is_none()
            && self.comment.is_none()
    }

    /// Applies the patch in place.
    ///
    /// The intervention is left untouched when the resulting range would be
    /// empty or inverted. Changing a reference drops the matching join.
    pub fn apply_to(&self, intervention: &mut Intervention) -> Result<(), PlanningError> {
        let start = self.start.unwrap_or(intervention.start);
        let end = self.end.unwrap_or(intervention.end);
        if end <= start {
            return Err(PlanningError::InvalidTimeRange { start, end });
        }
        intervention.start = start;
        intervention.end = end;
        if let Some(job_site_id) = self.job_site_id {
            if job_site_id != intervention.job_site_id {
                intervention.job_site = None;
            }
            intervention.job_site_id = job_site_id;
        }
        if let Some(worker_id) = self.worker_id {
            if worker_id != intervention.worker_id {
                intervention.worker = None;
            }
            intervention.worker_id = worker_id;
        }
        if let Some(comment) = &self.comment {
            intervention.comment = Some(comment.clone());
        }
        Ok(())
    }
}

/// Partial update of a job-site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSitePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "adresse", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, rename = "codePostal", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, rename = "ville", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, rename = "date_debut", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, rename = "temps_vendu", skip_serializing_if = "Option::is_none")]
    pub sold_hours: Option<f64>,
}

impl JobSitePatch {
    pub fn apply_to(&self, job_site: &mut JobSite) {
        if let Some(description) = &self.description {
            job_site.description = description.clone();
        }
        if let Some(address) = &self.address {
            job_site.address = address.clone();
        }
        if let Some(postal_code) = &self.postal_code {
            job_site.postal_code = postal_code.clone();
        }
        if let Some(city) = &self.city {
            job_site.city = city.clone();
        }
        if let Some(start_date) = self.start_date {
            job_site.start_date = start_date;
        }
        if let Some(sold_hours) = self.sold_hours {
            job_site.sold_hours = Some(sold_hours);
        }
    }
}

/// Partial update of a worker's display fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerPatch {
    #[serde(default, rename = "nom", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, rename = "prenom", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, rename = "poste", skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl WorkerPatch {
    pub fn apply_to(&self, worker: &mut Worker) {
        if let Some(last_name) = &self.last_name {
            worker.last_name = last_name.clone();
        }
        if let Some(first_name) = &self.first_name {
            worker.first_name = first_name.clone();
        }
        if let Some(job_title) = &self.job_title {
            worker.job_title = job_title.clone();
        }
        if let Some(photo_url) = &self.photo_url {
            worker.photo_url = Some(photo_url.clone());
        }
    }
}

//! Deterministic demo data for the in-memory store.
//!
//! Same tenant and week always yield the same ids and content, so a demo
//! instance can be restarted without breaking bookmarked ids.

use chrono::{Datelike, Days, NaiveDate};
use uuid::Uuid;

use super::InMemoryRecordStore;
use crate::domain::foundation::{ClientId, InterventionId, JobSiteId, TenantId, WorkerId};
use crate::domain::planning::{
    slot_window, Client, Intervention, JobSite, Period, ScheduleSnapshot, Worker,
};

const ADDRESSES: [(&str, &str, &str); 5] = [
    ("10 Rue de la Paix", "75002", "Paris"),
    ("25 Cours Mirabeau", "13100", "Aix-en-Provence"),
    ("1 Place du Capitole", "31000", "Toulouse"),
    ("30 Rue Sainte-Catherine", "33000", "Bordeaux"),
    ("15 Rue de la République", "69002", "Lyon"),
];

const CLIENTS: [(&str, &str); 3] = [("Camille", "ROUSSEAU"), ("Julien", "FAURE"), ("Sarah", "GIRARD")];

const JOB_SITES: [(&str, f64); 3] = [
    ("Rénovation salle de bain", 24.0),
    ("Isolation combles", 16.0),
    ("Extension véranda", 40.0),
];

const WORKERS: [(&str, &str, &str); 4] = [
    ("Thomas", "LAMBERT", "Chef de chantier"),
    ("Nadia", "BONNET", "Électricien"),
    ("Karim", "MERCIER", "Plombier"),
    ("Élodie", "FONTAINE", "Peintre"),
];

/// (day offset from Monday, period, job-site index, worker index)
const BOOKINGS: [(u64, Period, usize, usize); 8] = [
    (0, Period::Am, 0, 0),
    (0, Period::Pm, 0, 0),
    (0, Period::Am, 1, 1),
    (1, Period::Am, 0, 2),
    (1, Period::Pm, 2, 3),
    (2, Period::Am, 2, 0),
    (2, Period::Pm, 1, 1),
    (3, Period::Am, 2, 3),
];

/// Clients plus a schedule snapshot.
#[derive(Debug, Clone)]
pub struct DemoData {
    pub clients: Vec<Client>,
    pub snapshot: ScheduleSnapshot,
}

fn derived_uuid(tenant: TenantId, kind: u8, index: usize) -> Uuid {
    let base = tenant.as_uuid().as_u128();
    let salt = ((kind as u128) << 64) | index as u128;
    Uuid::from_u128(base ^ salt.rotate_left(17))
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Builds the demo set for `tenant`, with bookings in the week of `week_of`.
pub fn demo_data(tenant: TenantId, week_of: NaiveDate) -> DemoData {
    let monday = monday_of(week_of);

    let clients: Vec<Client> = CLIENTS
        .iter()
        .enumerate()
        .map(|(n, (first, last))| {
            let (address, postal_code, city) = ADDRESSES[n % ADDRESSES.len()];
            Client {
                id: ClientId::from_uuid(derived_uuid(tenant, 1, n)),
                tenant_id: tenant,
                last_name: last.to_string(),
                first_name: first.to_string(),
                address: address.to_string(),
                postal_code: postal_code.to_string(),
                city: city.to_string(),
                created_at: None,
            }
        })
        .collect();

    let job_sites: Vec<JobSite> = JOB_SITES
        .iter()
        .enumerate()
        .map(|(n, (description, sold_hours))| {
            let client = &clients[n % clients.len()];
            let (address, postal_code, city) = ADDRESSES[(n + 2) % ADDRESSES.len()];
            JobSite {
                id: JobSiteId::from_uuid(derived_uuid(tenant, 2, n)),
                tenant_id: tenant,
                client_id: client.id,
                description: description.to_string(),
                address: address.to_string(),
                postal_code: postal_code.to_string(),
                city: city.to_string(),
                start_date: monday,
                sold_hours: Some(*sold_hours),
                created_at: None,
                client: Some(client.clone()),
            }
        })
        .collect();

    let workers: Vec<Worker> = WORKERS
        .iter()
        .enumerate()
        .map(|(n, (first, last, title))| Worker {
            id: WorkerId::from_uuid(derived_uuid(tenant, 3, n)),
            tenant_id: tenant,
            last_name: last.to_string(),
            first_name: first.to_string(),
            job_title: title.to_string(),
            photo_url: None,
            created_at: None,
        })
        .collect();

    let interventions: Vec<Intervention> = BOOKINGS
        .iter()
        .enumerate()
        .filter_map(|(n, (offset, period, site, worker))| {
            let day = monday.checked_add_days(Days::new(*offset))?;
            let (start, end) = slot_window(day, *period);
            Intervention::new(
                InterventionId::from_uuid(derived_uuid(tenant, 4, n)),
                tenant,
                job_sites[*site].id,
                workers[*worker].id,
                start,
                end,
            )
            .ok()
        })
        .collect();

    DemoData {
        clients,
        snapshot: ScheduleSnapshot {
            job_sites,
            workers,
            interventions,
        },
    }
}

/// In-memory store pre-filled with [`demo_data`].
pub fn demo_store(tenant: TenantId, week_of: NaiveDate) -> InMemoryRecordStore {
    let data = demo_data(tenant, week_of);
    tracing::info!(
        tenant_id = %tenant,
        job_sites = data.snapshot.job_sites.len(),
        workers = data.snapshot.workers.len(),
        interventions = data.snapshot.interventions.len(),
        "seeding demo data"
    );
    InMemoryRecordStore::seeded(data.clients, data.snapshot)
}

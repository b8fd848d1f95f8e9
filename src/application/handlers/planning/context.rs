//! Shared planning session state.
//!
//! One `PlanningContext` exists per planning session. Handlers read and
//! mutate it through short-lived guards; no guard is held across a store or
//! webhook call.
//!
//! Two resource rules live here:
//!
//! - **In-flight locks**: at most one operation per intervention at a time.
//!   [`PlanningContext::lock_intervention`] returns an RAII guard released on
//!   drop, including when the handler's future is dropped mid-call.
//! - **Teardown**: once [`PlanningContext::close`] is called, results of calls
//!   still in flight are no longer written to state.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{RwLock, RwLockReadGuard};

use crate::domain::foundation::{InterventionId, TenantScope};
use crate::domain::planning::{
    AppliedChange, LocalChange, PlanningError, PlanningFilter, ScheduleSnapshot, SchedulingState,
};
use crate::domain::voice::VoiceSession;

/// Ids of interventions with an operation in progress.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    locked: Arc<Mutex<HashSet<InterventionId>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks `id`, or returns `None` if it is already locked.
    pub fn try_lock(&self, id: InterventionId) -> Option<InFlightGuard> {
        let mut locked = self.locked.lock().unwrap_or_else(PoisonError::into_inner);
        if !locked.insert(id) {
            return None;
        }
        Some(InFlightGuard {
            id,
            locked: Arc::clone(&self.locked),
        })
    }

    pub fn is_locked(&self, id: InterventionId) -> bool {
        self.locked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }
}

/// Releases its intervention lock when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    id: InterventionId,
    locked: Arc<Mutex<HashSet<InterventionId>>>,
}

impl InFlightGuard {
    pub fn id(&self) -> InterventionId {
        self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.locked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

pub struct PlanningContext {
    scope: TenantScope,
    state: RwLock<SchedulingState>,
    filter: RwLock<PlanningFilter>,
    voice_session: tokio::sync::Mutex<VoiceSession>,
    in_flight: InFlightRegistry,
    closed: AtomicBool,
}

impl PlanningContext {
    pub fn new(scope: TenantScope, filter: PlanningFilter) -> Self {
        Self {
            scope,
            state: RwLock::new(SchedulingState::new()),
            filter: RwLock::new(filter),
            voice_session: tokio::sync::Mutex::new(VoiceSession::start()),
            in_flight: InFlightRegistry::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Context with preloaded state, mostly for tests.
    pub fn with_snapshot(scope: TenantScope, filter: PlanningFilter, snapshot: ScheduleSnapshot) -> Self {
        Self {
            state: RwLock::new(SchedulingState::from_snapshot(snapshot)),
            ..Self::new(scope, filter)
        }
    }

    pub fn scope(&self) -> &TenantScope {
        &self.scope
    }

    // === Lifecycle ===

    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!(tenant_id = %self.scope.tenant_id(), "planning context closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn ensure_open(&self) -> Result<(), PlanningError> {
        if self.is_closed() {
            Err(PlanningError::ContextClosed)
        } else {
            Ok(())
        }
    }

    // === In-flight locks ===

    pub fn lock_intervention(&self, id: InterventionId) -> Result<InFlightGuard, PlanningError> {
        self.in_flight
            .try_lock(id)
            .ok_or(PlanningError::RecordBusy(id))
    }

    pub fn is_locked(&self, id: InterventionId) -> bool {
        self.in_flight.is_locked(id)
    }

    // === State ===

    pub async fn state(&self) -> RwLockReadGuard<'_, SchedulingState> {
        self.state.read().await
    }

    pub async fn snapshot(&self) -> ScheduleSnapshot {
        self.state.read().await.snapshot()
    }

    pub async fn apply_local(&self, change: LocalChange) -> Result<AppliedChange, PlanningError> {
        self.ensure_open()?;
        self.state.write().await.apply_local(change)
    }

    /// Undoes a local change. Skipped once the context is closed.
    pub async fn revert_local(&self, applied: AppliedChange) {
        if self.is_closed() {
            return;
        }
        self.state.write().await.revert_local(applied);
    }

    /// Removes an intervention if present. Returns whether it was.
    pub async fn remove_local(&self, id: InterventionId) -> bool {
        if self.is_closed() {
            return false;
        }
        self.state
            .write()
            .await
            .apply_local(LocalChange::Remove(id))
            .is_ok()
    }

    pub async fn replace_state(&self, snapshot: ScheduleSnapshot) -> Result<(), PlanningError> {
        self.ensure_open()?;
        self.state.write().await.replace_all(snapshot);
        Ok(())
    }

    // === Filter ===

    pub async fn filter(&self) -> PlanningFilter {
        self.filter.read().await.clone()
    }

    /// Mutates the filter and returns the updated copy.
    pub async fn update_filter<F>(&self, update: F) -> PlanningFilter
    where
        F: FnOnce(&mut PlanningFilter),
    {
        let mut filter = self.filter.write().await;
        update(&mut filter);
        filter.clone()
    }

    // === Voice ===

    pub(crate) async fn voice_session(&self) -> tokio::sync::MutexGuard<'_, VoiceSession> {
        self.voice_session.lock().await
    }
}

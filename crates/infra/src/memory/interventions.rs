use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use fieldops_core::{AggregateRoot, InterventionId, WorkerId};
use fieldops_events::SyncEventDispatcher;
use fieldops_interventions::{
    Intervention, InterventionError, InterventionEvent, InterventionRepository,
    InterventionStatus,
};

/// HashMap-backed intervention store.
///
/// `save` applies an optimistic version check (stale writes are rejected with
/// `Conflict`), persists, then drains the aggregate's events into the
/// dispatcher in recording order. A failing handler therefore surfaces out of
/// `save` after the write has already happened; that ordering is deliberate
/// and matches the persist-then-dispatch protocol.
pub struct InMemoryInterventionRepository {
    storage: RwLock<HashMap<InterventionId, Intervention>>,
    dispatcher: Arc<SyncEventDispatcher<InterventionEvent>>,
}

impl InMemoryInterventionRepository {
    pub fn new(dispatcher: Arc<SyncEventDispatcher<InterventionEvent>>) -> Self {
        Self {
            storage: RwLock::new(HashMap::new()),
            dispatcher,
        }
    }

    pub fn len(&self) -> usize {
        self.storage.read().expect("repository lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InterventionRepository for InMemoryInterventionRepository {
    fn find_by_id(&self, id: InterventionId) -> Result<Option<Intervention>, InterventionError> {
        let storage = self.storage.read().expect("repository lock poisoned");
        Ok(storage.get(&id).cloned())
    }

    fn save(&self, intervention: &mut Intervention) -> Result<(), InterventionError> {
        let id = *intervention.id();
        let events = {
            let mut storage = self.storage.write().expect("repository lock poisoned");
            if let Some(existing) = storage.get(&id) {
                if existing.version() >= intervention.version() {
                    return Err(InterventionError::Conflict {
                        id,
                        stored: existing.version(),
                        incoming: intervention.version(),
                    });
                }
            }
            // Drain before storing so the persisted copy carries no pending events.
            let events = intervention.release_events();
            storage.insert(id, intervention.clone());
            events
        };

        // Dispatch outside the lock; handlers may read the repository.
        for event in &events {
            if let Err(e) = self.dispatcher.dispatch(event) {
                tracing::warn!(
                    intervention_id = %id,
                    event_type = %e.event_type,
                    error = %e.message,
                    "event handler failed after persist"
                );
                return Err(e.into());
            }
        }
        Ok(())
    }

    fn remove(&self, id: InterventionId) -> Result<(), InterventionError> {
        let mut storage = self.storage.write().expect("repository lock poisoned");
        storage.remove(&id);
        Ok(())
    }

    fn find_ongoing_by_team_members(
        &self,
        member_ids: &[WorkerId],
    ) -> Result<Vec<Intervention>, InterventionError> {
        if member_ids.is_empty() {
            return Ok(Vec::new());
        }
        let storage = self.storage.read().expect("repository lock poisoned");
        Ok(storage
            .values()
            .filter(|i| i.status() == InterventionStatus::Ongoing)
            .filter(|i| i.team().intersects(member_ids))
            .cloned()
            .collect())
    }
}

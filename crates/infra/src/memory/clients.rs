use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use fieldops_clients::{Client, ClientError, ClientEvent, ClientRepository};
use fieldops_core::{AggregateRoot, ClientId};
use fieldops_events::SyncEventDispatcher;

/// HashMap-backed client store; same save protocol as the intervention
/// repository (version check, persist, drain into the dispatcher).
pub struct InMemoryClientRepository {
    storage: RwLock<HashMap<ClientId, Client>>,
    dispatcher: Arc<SyncEventDispatcher<ClientEvent>>,
}

impl InMemoryClientRepository {
    pub fn new(dispatcher: Arc<SyncEventDispatcher<ClientEvent>>) -> Self {
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

impl ClientRepository for InMemoryClientRepository {
    fn find_by_id(&self, id: ClientId) -> Result<Option<Client>, ClientError> {
        let storage = self.storage.read().expect("repository lock poisoned");
        Ok(storage.get(&id).cloned())
    }

    fn save(&self, client: &mut Client) -> Result<(), ClientError> {
        let id = *client.id();
        let events = {
            let mut storage = self.storage.write().expect("repository lock poisoned");
            if let Some(existing) = storage.get(&id) {
                if existing.version() >= client.version() {
                    return Err(ClientError::Conflict {
                        id,
                        stored: existing.version(),
                        incoming: client.version(),
                    });
                }
            }
            let events = client.release_events();
            storage.insert(id, client.clone());
            events
        };

        for event in &events {
            if let Err(e) = self.dispatcher.dispatch(event) {
                tracing::warn!(
                    client_id = %id,
                    event_type = %e.event_type,
                    error = %e.message,
                    "event handler failed after persist"
                );
                return Err(e.into());
            }
        }
        Ok(())
    }

    fn remove(&self, id: ClientId) -> Result<(), ClientError> {
        let mut storage = self.storage.write().expect("repository lock poisoned");
        storage.remove(&id);
        Ok(())
    }
}

//! Synchronous event dispatch (registry keyed by event kind).
//!
//! The dispatcher is a process-wide pub/sub registry wired once at startup and
//! passed by `Arc` to the persistence adapters; it is never accessed as ambient
//! global state. Handlers for a kind run sequentially, in registration order,
//! and each completes before the next starts.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use crate::event::DomainEvent;

/// Error surfaced when a registered handler fails.
///
/// Dispatch stops at the first failing handler; the failure propagates out of
/// the persistence call that triggered it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("handler for '{event_type}' failed: {message}")]
pub struct DispatchError {
    pub event_type: String,
    pub message: String,
}

type Handler<E> = Box<dyn Fn(&E) -> anyhow::Result<()> + Send + Sync>;

/// In-process dispatcher mapping an event kind to an ordered handler list.
///
/// - No IO / no async
/// - Dispatching a kind with no registered handler is a silent no-op
/// - Handler failures are not caught here; they propagate to the caller
pub struct SyncEventDispatcher<E> {
    handlers: RwLock<HashMap<&'static str, Vec<Handler<E>>>>,
}

impl<E: DomainEvent> SyncEventDispatcher<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to the list for `event_type`.
    ///
    /// Multiple handlers per kind are allowed and invoked in registration order.
    pub fn register<F>(&self, event_type: &'static str, handler: F)
    where
        F: Fn(&E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write().expect("dispatcher lock poisoned");
        handlers.entry(event_type).or_default().push(Box::new(handler));
    }

    /// Invoke every handler registered for the event's kind, sequentially.
    ///
    /// Returns at the first handler failure, leaving later handlers uninvoked.
    pub fn dispatch(&self, event: &E) -> Result<(), DispatchError> {
        let handlers = self.handlers.read().expect("dispatcher lock poisoned");
        let Some(list) = handlers.get(event.event_type()) else {
            return Ok(());
        };
        for handler in list {
            handler(event).map_err(|e| DispatchError {
                event_type: event.event_type().to_string(),
                message: format!("{e:#}"),
            })?;
        }
        Ok(())
    }

    /// Number of handlers registered for `event_type`.
    pub fn handler_count(&self, event_type: &str) -> usize {
        let handlers = self.handlers.read().expect("dispatcher lock poisoned");
        handlers.get(event_type).map_or(0, Vec::len)
    }
}

impl<E> Default for SyncEventDispatcher<E> {
    fn default() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }
}

impl<E> core::fmt::Debug for SyncEventDispatcher<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let handlers = self.handlers.read().expect("dispatcher lock poisoned");
        let mut kinds: Vec<_> = handlers.keys().collect();
        kinds.sort();
        f.debug_struct("SyncEventDispatcher")
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::sync::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum PingEvent {
        Ping { occurred_at: DateTime<Utc> },
        Pong { occurred_at: DateTime<Utc> },
    }

    impl DomainEvent for PingEvent {
        fn event_type(&self) -> &'static str {
            match self {
                PingEvent::Ping { .. } => "test.ping",
                PingEvent::Pong { .. } => "test.pong",
            }
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            match self {
                PingEvent::Ping { occurred_at } | PingEvent::Pong { occurred_at } => *occurred_at,
            }
        }
    }

    fn ping() -> PingEvent {
        PingEvent::Ping {
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn dispatch_without_handlers_is_a_silent_no_op() {
        let dispatcher: SyncEventDispatcher<PingEvent> = SyncEventDispatcher::new();
        assert_eq!(dispatcher.dispatch(&ping()), Ok(()));
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let dispatcher: SyncEventDispatcher<PingEvent> = SyncEventDispatcher::new();
        let seen: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let seen = seen.clone();
            dispatcher.register("test.ping", move |_| {
                seen.lock().unwrap().push(label);
                Ok(())
            });
        }

        assert_eq!(dispatcher.handler_count("test.ping"), 3);
        dispatcher.dispatch(&ping()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn handlers_only_fire_for_their_registered_kind() {
        let dispatcher: SyncEventDispatcher<PingEvent> = SyncEventDispatcher::new();
        let hits = Arc::new(Mutex::new(0u32));
        let counter = hits.clone();
        dispatcher.register("test.pong", move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });

        dispatcher.dispatch(&ping()).unwrap();
        assert_eq!(*hits.lock().unwrap(), 0);

        dispatcher
            .dispatch(&PingEvent::Pong {
                occurred_at: Utc::now(),
            })
            .unwrap();
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn failing_handler_stops_dispatch_and_propagates() {
        let dispatcher: SyncEventDispatcher<PingEvent> = SyncEventDispatcher::new();
        let later_ran = Arc::new(Mutex::new(false));

        dispatcher.register("test.ping", |_| Err(anyhow::anyhow!("boom")));
        let flag = later_ran.clone();
        dispatcher.register("test.ping", move |_| {
            *flag.lock().unwrap() = true;
            Ok(())
        });

        let err = dispatcher.dispatch(&ping()).unwrap_err();
        assert_eq!(err.event_type, "test.ping");
        assert!(err.message.contains("boom"));
        assert!(!*later_ran.lock().unwrap());
    }
}

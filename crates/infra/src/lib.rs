//! Infrastructure layer: in-memory persistence and event-handler wiring.
//!
//! The repositories here persist aggregates in process-local maps and, on
//! every `save`, drain the aggregate's recorded events into the synchronous
//! dispatcher. That drain-inside-save protocol is what couples state changes
//! to side effects; services upstream never see events.

pub mod handlers;
pub mod memory;


pub use memory::{InMemoryClientRepository, InMemoryInterventionRepository};

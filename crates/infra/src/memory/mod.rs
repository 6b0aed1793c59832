//! In-memory repositories (tests/dev; not optimized for performance).

mod clients;
mod interventions;

pub use clients::InMemoryClientRepository;
pub use interventions::InMemoryInterventionRepository;

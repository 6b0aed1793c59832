//! `fieldops-interventions` — the intervention aggregate and its use cases.
//!
//! This crate owns the lifecycle state machine (PLANNED → ONGOING →
//! COMPLETED / CANCELLED), the team-composition invariants, the
//! cross-aggregate availability check and the services orchestrating each
//! use case. Persistence and event delivery are behind the
//! [`InterventionRepository`] trait.

pub mod availability;
pub mod intervention;
pub mod repository;
pub mod services;
pub mod team;

pub use availability::TeamAvailability;
pub use intervention::{
    Intervention, InterventionCancelled, InterventionCompleted, InterventionError,
    InterventionEvent, InterventionPlanned, InterventionStarted, InterventionStatus,
    InterventionType, TeamMemberAdded,
};
pub use repository::InterventionRepository;
pub use services::{
    AddTeamMember, AddTeamMemberCommand, CancelIntervention, CompleteIntervention,
    GetInterventionById, PlanIntervention, PlanInterventionCommand, StartIntervention,
};
pub use team::Team;

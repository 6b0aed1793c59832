//! Intervention aggregate: lifecycle state machine + team invariants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fieldops_core::{Address, AggregateRoot, ClientId, InterventionId, QuotationId, WorkerId};
use fieldops_events::{DispatchError, DomainEvent};

use crate::team::Team;

/// Lifecycle status.
///
/// `Completed` and `Cancelled` are terminal and not reachable from one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InterventionStatus {
    Planned,
    Ongoing,
    Completed,
    Cancelled,
}

impl core::fmt::Display for InterventionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            InterventionStatus::Planned => "PLANNED",
            InterventionStatus::Ongoing => "ONGOING",
            InterventionStatus::Completed => "COMPLETED",
            InterventionStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// Categorical tag, opaque to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InterventionType {
    Maintenance,
    Installation,
    Emergency,
}

/// Event: an intervention was planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionPlanned {
    pub intervention_id: InterventionId,
    pub client_id: ClientId,
    pub billable_client_id: ClientId,
    pub kind: InterventionType,
    pub occurred_at: DateTime<Utc>,
}

/// Event: work on an intervention began.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionStarted {
    pub intervention_id: InterventionId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: an intervention finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionCompleted {
    pub intervention_id: InterventionId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: an intervention was called off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionCancelled {
    pub intervention_id: InterventionId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a worker was added to the team.
///
/// Recorded once per request, whether or not the member set actually grew:
/// the event denotes the request, not a content delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberAdded {
    pub intervention_id: InterventionId,
    pub member_id: WorkerId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterventionEvent {
    Planned(InterventionPlanned),
    Started(InterventionStarted),
    Completed(InterventionCompleted),
    Cancelled(InterventionCancelled),
    TeamMemberAdded(TeamMemberAdded),
}

impl DomainEvent for InterventionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InterventionEvent::Planned(_) => "intervention.planned",
            InterventionEvent::Started(_) => "intervention.started",
            InterventionEvent::Completed(_) => "intervention.completed",
            InterventionEvent::Cancelled(_) => "intervention.cancelled",
            InterventionEvent::TeamMemberAdded(_) => "intervention.team_member_added",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InterventionEvent::Planned(e) => e.occurred_at,
            InterventionEvent::Started(e) => e.occurred_at,
            InterventionEvent::Completed(e) => e.occurred_at,
            InterventionEvent::Cancelled(e) => e.occurred_at,
            InterventionEvent::TeamMemberAdded(e) => e.occurred_at,
        }
    }
}

/// Intervention sub-domain error.
///
/// One distinct transition variant per operation; services propagate these
/// unchanged to the boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterventionError {
    #[error("intervention {0} not found")]
    NotFound(InterventionId),

    #[error("intervention {id} cannot be started from status {status}; allowed from: PLANNED")]
    CannotStart {
        id: InterventionId,
        status: InterventionStatus,
    },

    #[error("intervention {id} cannot be completed from status {status}; allowed from: ONGOING")]
    CannotComplete {
        id: InterventionId,
        status: InterventionStatus,
    },

    #[error(
        "intervention {id} cannot be cancelled from status {status}; allowed from: PLANNED, ONGOING"
    )]
    CannotCancel {
        id: InterventionId,
        status: InterventionStatus,
    },

    #[error(
        "cannot add team member to intervention {id}: invalid status {status}; allowed: PLANNED, ONGOING"
    )]
    CannotAddTeamMember {
        id: InterventionId,
        status: InterventionStatus,
    },

    #[error("team {member_ids:?} is not available: {ongoing} ongoing intervention(s)")]
    TeamUnavailable {
        member_ids: Vec<WorkerId>,
        ongoing: usize,
    },

    #[error("stale write for intervention {id}: stored version {stored}, incoming {incoming}")]
    Conflict {
        id: InterventionId,
        stored: u64,
        incoming: u64,
    },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Aggregate root: a field-service job performed by a team for a client.
///
/// All status transitions and team mutations go through the methods below;
/// each successful one records exactly one [`InterventionEvent`] in the
/// pending list, delivered by the persistence boundary via
/// [`release_events`](Intervention::release_events).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intervention {
    id: InterventionId,
    status: InterventionStatus,
    kind: InterventionType,
    address: Address,
    client_id: ClientId,
    billable_client_id: ClientId,
    quotation_id: Option<QuotationId>,
    team: Team,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    version: u64,
    pending_events: Vec<InterventionEvent>,
}

impl Intervention {
    /// Factory: a freshly planned intervention.
    ///
    /// Status is `Planned`, `created_at == updated_at`, and the `Planned`
    /// event is already recorded.
    pub fn plan(
        kind: InterventionType,
        address: Address,
        client_id: ClientId,
        billable_client_id: ClientId,
        team: Team,
    ) -> Self {
        let now = Utc::now();
        let id = InterventionId::new();
        let mut intervention = Self {
            id,
            status: InterventionStatus::Planned,
            kind,
            address,
            client_id,
            billable_client_id,
            quotation_id: None,
            team,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            version: 1,
            pending_events: Vec::new(),
        };
        intervention.record(InterventionEvent::Planned(InterventionPlanned {
            intervention_id: id,
            client_id,
            billable_client_id,
            kind,
            occurred_at: now,
        }));
        intervention
    }

    /// Loader path: reconstruct a persisted aggregate.
    ///
    /// Records no events. Loaders must come through here rather than poking
    /// fields, so every invariant-preserving type (status enum, validated
    /// address, deduplicated team) is honored on the way in.
    #[allow(clippy::too_many_arguments)]
    pub fn rehydrate(
        id: InterventionId,
        status: InterventionStatus,
        kind: InterventionType,
        address: Address,
        client_id: ClientId,
        billable_client_id: ClientId,
        quotation_id: Option<QuotationId>,
        team: Team,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
        version: u64,
    ) -> Self {
        Self {
            id,
            status,
            kind,
            address,
            client_id,
            billable_client_id,
            quotation_id,
            team,
            created_at,
            updated_at,
            deleted_at,
            version,
            pending_events: Vec::new(),
        }
    }

    /// PLANNED → ONGOING.
    pub fn start(&mut self) -> Result<(), InterventionError> {
        if self.status != InterventionStatus::Planned {
            return Err(InterventionError::CannotStart {
                id: self.id,
                status: self.status,
            });
        }
        self.status = InterventionStatus::Ongoing;
        let at = self.touch();
        self.record(InterventionEvent::Started(InterventionStarted {
            intervention_id: self.id,
            occurred_at: at,
        }));
        Ok(())
    }

    /// ONGOING → COMPLETED.
    pub fn complete(&mut self) -> Result<(), InterventionError> {
        if self.status != InterventionStatus::Ongoing {
            return Err(InterventionError::CannotComplete {
                id: self.id,
                status: self.status,
            });
        }
        self.status = InterventionStatus::Completed;
        let at = self.touch();
        self.record(InterventionEvent::Completed(InterventionCompleted {
            intervention_id: self.id,
            occurred_at: at,
        }));
        Ok(())
    }

    /// PLANNED | ONGOING → CANCELLED.
    pub fn cancel(&mut self) -> Result<(), InterventionError> {
        if !self.is_open() {
            return Err(InterventionError::CannotCancel {
                id: self.id,
                status: self.status,
            });
        }
        self.status = InterventionStatus::Cancelled;
        let at = self.touch();
        self.record(InterventionEvent::Cancelled(InterventionCancelled {
            intervention_id: self.id,
            occurred_at: at,
        }));
        Ok(())
    }

    /// Add a worker while the intervention is still open (PLANNED or ONGOING).
    ///
    /// Idempotent with respect to team contents, but the `TeamMemberAdded`
    /// event is recorded once per call either way (recorded reference
    /// behavior; the event denotes the request).
    pub fn add_team_member(&mut self, member_id: WorkerId) -> Result<(), InterventionError> {
        if !self.is_open() {
            return Err(InterventionError::CannotAddTeamMember {
                id: self.id,
                status: self.status,
            });
        }
        self.team = self.team.add_member(member_id);
        let at = self.touch();
        self.record(InterventionEvent::TeamMemberAdded(TeamMemberAdded {
            intervention_id: self.id,
            member_id,
            occurred_at: at,
        }));
        Ok(())
    }

    /// Atomically return and clear the pending event list.
    ///
    /// This is the only way events leave the aggregate; a repeat call before
    /// new mutations returns an empty list.
    pub fn release_events(&mut self) -> Vec<InterventionEvent> {
        core::mem::take(&mut self.pending_events)
    }

    /// Whether further transitions/team mutations are permitted.
    pub fn is_open(&self) -> bool {
        matches!(
            self.status,
            InterventionStatus::Planned | InterventionStatus::Ongoing
        )
    }

    pub fn status(&self) -> InterventionStatus {
        self.status
    }

    pub fn kind(&self) -> InterventionType {
        self.kind
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn billable_client_id(&self) -> ClientId {
        self.billable_client_id
    }

    pub fn quotation_id(&self) -> Option<QuotationId> {
        self.quotation_id
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn record(&mut self, event: InterventionEvent) {
        self.pending_events.push(event);
    }

    /// Bump `updated_at` (kept monotone even against clock regressions) and
    /// the optimistic-concurrency version. Returns the new timestamp.
    fn touch(&mut self) -> DateTime<Utc> {
        let now = Utc::now().max(self.updated_at);
        self.updated_at = now;
        self.version += 1;
        now
    }
}

impl AggregateRoot for Intervention {
    type Id = InterventionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_address() -> Address {
        Address::new("123 Main St", "Paris", "75001", "France", None).unwrap()
    }

    fn planned() -> Intervention {
        Intervention::plan(
            InterventionType::Maintenance,
            test_address(),
            ClientId::new(),
            ClientId::new(),
            Team::empty(),
        )
    }

    fn ongoing() -> Intervention {
        let mut intervention = planned();
        intervention.start().unwrap();
        intervention
    }

    #[test]
    fn plan_initializes_a_planned_intervention() {
        let client_id = ClientId::new();
        let billable_client_id = ClientId::new();
        let intervention = Intervention::plan(
            InterventionType::Maintenance,
            test_address(),
            client_id,
            billable_client_id,
            Team::empty(),
        );

        assert_eq!(intervention.status(), InterventionStatus::Planned);
        assert_eq!(intervention.kind(), InterventionType::Maintenance);
        assert_eq!(intervention.client_id(), client_id);
        assert_eq!(intervention.billable_client_id(), billable_client_id);
        assert_eq!(intervention.quotation_id(), None);
        assert_eq!(intervention.deleted_at(), None);
        assert!(intervention.team().is_empty());
        assert_eq!(intervention.created_at(), intervention.updated_at());
    }

    #[test]
    fn plan_records_the_planned_event() {
        let mut intervention = planned();
        let events = intervention.release_events();

        assert_eq!(events.len(), 1);
        match &events[0] {
            InterventionEvent::Planned(e) => {
                assert_eq!(&e.intervention_id, intervention.id());
                assert_eq!(e.client_id, intervention.client_id());
                assert_eq!(e.billable_client_id, intervention.billable_client_id());
                assert_eq!(e.kind, InterventionType::Maintenance);
            }
            other => panic!("expected Planned event, got {other:?}"),
        }
    }

    #[test]
    fn plan_keeps_a_supplied_team() {
        let a = WorkerId::new();
        let b = WorkerId::new();
        let intervention = Intervention::plan(
            InterventionType::Installation,
            test_address(),
            ClientId::new(),
            ClientId::new(),
            Team::new([a, b]),
        );

        assert_eq!(intervention.team().members(), &[a, b]);
    }

    #[test]
    fn start_moves_planned_to_ongoing() {
        let mut intervention = planned();
        intervention.start().unwrap();
        assert_eq!(intervention.status(), InterventionStatus::Ongoing);
    }

    #[test]
    fn start_is_rejected_from_every_other_status() {
        for make in [ongoing, completed, cancelled] {
            let mut intervention = make();
            let before = intervention.clone();
            let status = intervention.status();

            let err = intervention.start().unwrap_err();
            assert_eq!(
                err,
                InterventionError::CannotStart {
                    id: *intervention.id(),
                    status,
                }
            );
            // Failed transitions leave the aggregate untouched, events included.
            assert_eq!(intervention, before);
        }
    }

    fn completed() -> Intervention {
        let mut intervention = ongoing();
        intervention.complete().unwrap();
        intervention
    }

    fn cancelled() -> Intervention {
        let mut intervention = planned();
        intervention.cancel().unwrap();
        intervention
    }

    #[test]
    fn complete_succeeds_only_from_ongoing() {
        let mut intervention = ongoing();
        intervention.complete().unwrap();
        assert_eq!(intervention.status(), InterventionStatus::Completed);

        for make in [planned, completed, cancelled] {
            let mut intervention = make();
            let before = intervention.clone();
            let status = intervention.status();

            let err = intervention.complete().unwrap_err();
            assert_eq!(
                err,
                InterventionError::CannotComplete {
                    id: *intervention.id(),
                    status,
                }
            );
            assert_eq!(intervention, before);
        }
    }

    #[test]
    fn cancel_succeeds_from_planned_and_ongoing() {
        for make in [planned, ongoing] {
            let mut intervention = make();
            intervention.cancel().unwrap();
            assert_eq!(intervention.status(), InterventionStatus::Cancelled);
        }
    }

    #[test]
    fn cancel_is_rejected_from_terminal_statuses() {
        for make in [completed, cancelled] {
            let mut intervention = make();
            let before = intervention.clone();
            let status = intervention.status();

            let err = intervention.cancel().unwrap_err();
            assert_eq!(
                err,
                InterventionError::CannotCancel {
                    id: *intervention.id(),
                    status,
                }
            );
            assert_eq!(intervention, before);
        }
    }

    #[test]
    fn each_transition_records_exactly_one_event() {
        let mut intervention = planned();
        intervention.release_events();

        intervention.start().unwrap();
        let events = intervention.release_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], InterventionEvent::Started(_)));

        intervention.complete().unwrap();
        let events = intervention.release_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], InterventionEvent::Completed(_)));
    }

    #[test]
    fn cancel_records_the_cancelled_event() {
        let mut intervention = ongoing();
        intervention.release_events();

        intervention.cancel().unwrap();
        let events = intervention.release_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], InterventionEvent::Cancelled(_)));
    }

    #[test]
    fn release_events_drains_once() {
        let mut intervention = planned();
        assert_eq!(intervention.release_events().len(), 1);
        assert!(intervention.release_events().is_empty());
        assert!(intervention.release_events().is_empty());
    }

    #[test]
    fn add_team_member_grows_the_team_while_open() {
        let member = WorkerId::new();

        for make in [planned, ongoing] {
            let mut intervention = make();
            intervention.release_events();

            intervention.add_team_member(member).unwrap();
            assert!(intervention.team().contains(member));

            let events = intervention.release_events();
            assert_eq!(events.len(), 1);
            match &events[0] {
                InterventionEvent::TeamMemberAdded(e) => {
                    assert_eq!(&e.intervention_id, intervention.id());
                    assert_eq!(e.member_id, member);
                }
                other => panic!("expected TeamMemberAdded event, got {other:?}"),
            }
        }
    }

    #[test]
    fn add_team_member_records_an_event_even_when_already_present() {
        let member = WorkerId::new();
        let mut intervention = planned();
        intervention.add_team_member(member).unwrap();
        intervention.release_events();

        intervention.add_team_member(member).unwrap();

        assert_eq!(intervention.team().len(), 1);
        assert_eq!(intervention.release_events().len(), 1);
    }

    #[test]
    fn add_team_member_is_rejected_on_closed_interventions() {
        for make in [completed, cancelled] {
            let mut intervention = make();
            intervention.release_events();
            let before = intervention.clone();
            let status = intervention.status();

            let err = intervention.add_team_member(WorkerId::new()).unwrap_err();
            assert_eq!(
                err,
                InterventionError::CannotAddTeamMember {
                    id: *intervention.id(),
                    status,
                }
            );
            assert_eq!(intervention, before);
        }
    }

    #[test]
    fn updated_at_never_decreases_and_created_at_is_fixed() {
        let mut intervention = planned();
        let created_at = intervention.created_at();
        let mut last = intervention.updated_at();

        intervention.start().unwrap();
        assert!(intervention.updated_at() >= last);
        last = intervention.updated_at();

        intervention.add_team_member(WorkerId::new()).unwrap();
        assert!(intervention.updated_at() >= last);
        assert_eq!(intervention.created_at(), created_at);
    }

    #[test]
    fn version_bumps_once_per_successful_mutation() {
        let mut intervention = planned();
        assert_eq!(intervention.version(), 1);

        intervention.start().unwrap();
        assert_eq!(intervention.version(), 2);

        let _ = intervention.start();
        assert_eq!(intervention.version(), 2);

        intervention.complete().unwrap();
        assert_eq!(intervention.version(), 3);
    }

    #[test]
    fn rehydrate_restores_state_without_recording_events() {
        let mut original = planned();
        original.start().unwrap();
        original.release_events();

        let mut loaded = Intervention::rehydrate(
            *original.id(),
            original.status(),
            original.kind(),
            original.address().clone(),
            original.client_id(),
            original.billable_client_id(),
            original.quotation_id(),
            original.team().clone(),
            original.created_at(),
            original.updated_at(),
            original.deleted_at(),
            original.version(),
        );

        assert_eq!(loaded, original);
        assert!(loaded.release_events().is_empty());
    }
}

//! Use-case services: one per operation.
//!
//! Each service follows the same shape: load (or construct), invoke the
//! aggregate, save, return. Errors from the aggregate or the availability
//! check propagate unchanged; persistence drains and dispatches events.

use std::sync::Arc;

use fieldops_core::{Address, ClientId, InterventionId, WorkerId};

use crate::availability::TeamAvailability;
use crate::intervention::{Intervention, InterventionError, InterventionType};
use crate::repository::InterventionRepository;
use crate::team::Team;

/// Input for [`PlanIntervention`].
#[derive(Debug, Clone)]
pub struct PlanInterventionCommand {
    pub kind: InterventionType,
    pub address: Address,
    pub client_id: ClientId,
    pub billable_client_id: ClientId,
    pub team_member_ids: Vec<WorkerId>,
}

/// Plan a new intervention.
pub struct PlanIntervention<R> {
    repository: Arc<R>,
    availability: TeamAvailability<R>,
}

impl<R: InterventionRepository> PlanIntervention<R> {
    pub fn new(repository: Arc<R>) -> Self {
        let availability = TeamAvailability::new(repository.clone());
        Self {
            repository,
            availability,
        }
    }

    pub fn execute(
        &self,
        command: PlanInterventionCommand,
    ) -> Result<Intervention, InterventionError> {
        // Availability must be asserted before the aggregate exists: once
        // constructed, the Planned event is already recorded.
        self.availability
            .assert_team_available(&command.team_member_ids)?;

        let team = Team::new(command.team_member_ids);
        let mut intervention = Intervention::plan(
            command.kind,
            command.address,
            command.client_id,
            command.billable_client_id,
            team,
        );
        self.repository.save(&mut intervention)?;
        Ok(intervention)
    }
}

/// Start a planned intervention.
pub struct StartIntervention<R> {
    repository: Arc<R>,
}

impl<R: InterventionRepository> StartIntervention<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn execute(&self, id: InterventionId) -> Result<Intervention, InterventionError> {
        let mut intervention = self
            .repository
            .find_by_id(id)?
            .ok_or(InterventionError::NotFound(id))?;
        intervention.start()?;
        self.repository.save(&mut intervention)?;
        Ok(intervention)
    }
}

/// Complete an ongoing intervention.
pub struct CompleteIntervention<R> {
    repository: Arc<R>,
}

impl<R: InterventionRepository> CompleteIntervention<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn execute(&self, id: InterventionId) -> Result<Intervention, InterventionError> {
        let mut intervention = self
            .repository
            .find_by_id(id)?
            .ok_or(InterventionError::NotFound(id))?;
        intervention.complete()?;
        self.repository.save(&mut intervention)?;
        Ok(intervention)
    }
}

/// Cancel an open intervention.
pub struct CancelIntervention<R> {
    repository: Arc<R>,
}

impl<R: InterventionRepository> CancelIntervention<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn execute(&self, id: InterventionId) -> Result<Intervention, InterventionError> {
        let mut intervention = self
            .repository
            .find_by_id(id)?
            .ok_or(InterventionError::NotFound(id))?;
        intervention.cancel()?;
        self.repository.save(&mut intervention)?;
        Ok(intervention)
    }
}

/// Input for [`AddTeamMember`].
#[derive(Debug, Clone, Copy)]
pub struct AddTeamMemberCommand {
    pub intervention_id: InterventionId,
    pub member_id: WorkerId,
}

/// Add a worker to an open intervention's team.
pub struct AddTeamMember<R> {
    repository: Arc<R>,
}

impl<R: InterventionRepository> AddTeamMember<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn execute(
        &self,
        command: AddTeamMemberCommand,
    ) -> Result<Intervention, InterventionError> {
        let mut intervention = self
            .repository
            .find_by_id(command.intervention_id)?
            .ok_or(InterventionError::NotFound(command.intervention_id))?;
        intervention.add_team_member(command.member_id)?;
        self.repository.save(&mut intervention)?;
        Ok(intervention)
    }
}

/// Load an intervention by id.
pub struct GetInterventionById<R> {
    repository: Arc<R>,
}

impl<R: InterventionRepository> GetInterventionById<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn execute(&self, id: InterventionId) -> Result<Intervention, InterventionError> {
        self.repository
            .find_by_id(id)?
            .ok_or(InterventionError::NotFound(id))
    }
}

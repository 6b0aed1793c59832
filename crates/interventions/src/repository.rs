//! Persistence boundary for the intervention aggregate.

use fieldops_core::{InterventionId, WorkerId};

use crate::intervention::{Intervention, InterventionError};

/// Load/store contract consumed by the use-case services.
///
/// `save` owns event delivery: after persisting, it must drain
/// [`Intervention::release_events`] and forward each event to the dispatcher,
/// in order, within the same logical unit of work as the write. Services never
/// touch the pending list themselves.
pub trait InterventionRepository {
    fn find_by_id(&self, id: InterventionId) -> Result<Option<Intervention>, InterventionError>;

    /// Persist the aggregate, then drain and dispatch its recorded events.
    ///
    /// Takes `&mut` because draining clears the pending list.
    fn save(&self, intervention: &mut Intervention) -> Result<(), InterventionError>;

    fn remove(&self, id: InterventionId) -> Result<(), InterventionError>;

    /// Every ONGOING intervention whose team shares at least one member with
    /// `member_ids`. Empty input yields an empty result.
    fn find_ongoing_by_team_members(
        &self,
        member_ids: &[WorkerId],
    ) -> Result<Vec<Intervention>, InterventionError>;
}

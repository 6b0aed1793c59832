//! Cross-aggregate team-availability check.

use std::sync::Arc;

use fieldops_core::WorkerId;

use crate::intervention::InterventionError;
use crate::repository::InterventionRepository;

/// Read-only query service: is any candidate member already committed to an
/// ONGOING intervention elsewhere?
///
/// This checks, it does not reserve. The check-then-act window between an
/// availability assertion and the subsequent save is closed only by the
/// storage adapter (see the repository docs).
pub struct TeamAvailability<R> {
    repository: Arc<R>,
}

impl<R: InterventionRepository> TeamAvailability<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Vacuously true for an empty member list; otherwise true iff no ONGOING
    /// intervention shares a member with `member_ids`.
    pub fn is_team_available(&self, member_ids: &[WorkerId]) -> Result<bool, InterventionError> {
        if member_ids.is_empty() {
            return Ok(true);
        }
        let ongoing = self.repository.find_ongoing_by_team_members(member_ids)?;
        Ok(ongoing.is_empty())
    }

    /// Same query; a non-empty intersection fails with
    /// [`InterventionError::TeamUnavailable`] carrying the requested member
    /// list and the conflict count. An empty member list never fails.
    pub fn assert_team_available(&self, member_ids: &[WorkerId]) -> Result<(), InterventionError> {
        if member_ids.is_empty() {
            return Ok(());
        }
        let ongoing = self.repository.find_ongoing_by_team_members(member_ids)?;
        if !ongoing.is_empty() {
            return Err(InterventionError::TeamUnavailable {
                member_ids: member_ids.to_vec(),
                ongoing: ongoing.len(),
            });
        }
        Ok(())
    }
}

//! Team value object: the set of workers assigned to an intervention.

use serde::{Deserialize, Serialize};

use fieldops_core::{ValueObject, WorkerId};

/// Ordered collection of unique worker identifiers.
///
/// Duplicates are absorbed silently at every entry point (first occurrence
/// wins); this is a deliberate idempotence guarantee, not a failure mode.
/// All methods return new `Team` values; the aggregate swaps its reference
/// atomically.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Team {
    members: Vec<WorkerId>,
}

impl Team {
    /// Build a team retaining each distinct id in order of first appearance.
    pub fn new(member_ids: impl IntoIterator<Item = WorkerId>) -> Self {
        let mut members = Vec::new();
        for id in member_ids {
            if !members.contains(&id) {
                members.push(id);
            }
        }
        Self { members }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// New team with `member_id` appended, unless already present.
    pub fn add_member(&self, member_id: WorkerId) -> Self {
        if self.contains(member_id) {
            return self.clone();
        }
        let mut members = self.members.clone();
        members.push(member_id);
        Self { members }
    }

    /// New team excluding `member_id`.
    pub fn remove_member(&self, member_id: WorkerId) -> Self {
        let members = self
            .members
            .iter()
            .copied()
            .filter(|id| *id != member_id)
            .collect();
        Self { members }
    }

    pub fn contains(&self, member_id: WorkerId) -> bool {
        self.members.contains(&member_id)
    }

    /// Set-intersection test: true iff any of `member_ids` is on this team.
    pub fn intersects(&self, member_ids: &[WorkerId]) -> bool {
        self.members.iter().any(|id| member_ids.contains(id))
    }

    pub fn members(&self) -> &[WorkerId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl ValueObject for Team {}

impl<'a> IntoIterator for &'a Team {
    type Item = &'a WorkerId;
    type IntoIter = core::slice::Iter<'a, WorkerId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

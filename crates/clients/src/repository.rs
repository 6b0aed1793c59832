//! Persistence boundary for the client aggregate.

use fieldops_core::ClientId;

use crate::client::{Client, ClientError};

/// Load/store contract; `save` drains the aggregate's recorded events into
/// the dispatcher after persisting, same protocol as interventions.
pub trait ClientRepository {
    fn find_by_id(&self, id: ClientId) -> Result<Option<Client>, ClientError>;

    fn save(&self, client: &mut Client) -> Result<(), ClientError>;

    fn remove(&self, id: ClientId) -> Result<(), ClientError>;
}

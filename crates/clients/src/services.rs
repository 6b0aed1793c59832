//! Client use-case services.

use std::sync::Arc;

use fieldops_core::{Address, ClientId};

use crate::client::{Client, ClientError};
use crate::repository::ClientRepository;

/// Input for [`CreateClient`]. The billing address arrives as raw parts; the
/// service builds the value object, so address validation errors surface here.
#[derive(Debug, Clone)]
pub struct CreateClientCommand {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
    pub additional_information: Option<String>,
}

pub struct CreateClient<R> {
    repository: Arc<R>,
}

impl<R: ClientRepository> CreateClient<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn execute(&self, command: CreateClientCommand) -> Result<Client, ClientError> {
        let billing_address = Address::new(
            command.street,
            command.city,
            command.zip_code,
            command.country,
            command.additional_information,
        )?;
        let mut client = Client::create(command.name, command.email, command.phone, billing_address)?;
        self.repository.save(&mut client)?;
        Ok(client)
    }
}

pub struct GetClientById<R> {
    repository: Arc<R>,
}

impl<R: ClientRepository> GetClientById<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn execute(&self, id: ClientId) -> Result<Client, ClientError> {
        self.repository
            .find_by_id(id)?
            .ok_or(ClientError::NotFound(id))
    }
}

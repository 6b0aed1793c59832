//! Client aggregate: billing party referenced by interventions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fieldops_core::{Address, AggregateRoot, ClientId, DomainError};
use fieldops_events::{DispatchError, DomainEvent};

/// Event: a client was registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCreated {
    pub client_id: ClientId,
    pub name: String,
    pub email: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientEvent {
    Created(ClientCreated),
}

impl DomainEvent for ClientEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ClientEvent::Created(_) => "client.created",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ClientEvent::Created(e) => e.occurred_at,
        }
    }
}

/// Client sub-domain error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("client {0} not found")]
    NotFound(ClientId),

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("stale write for client {id}: stored version {stored}, incoming {incoming}")]
    Conflict {
        id: ClientId,
        stored: u64,
        incoming: u64,
    },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Aggregate root: Client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    id: ClientId,
    name: String,
    email: String,
    phone: Option<String>,
    billing_address: Address,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
    pending_events: Vec<ClientEvent>,
}

impl Client {
    /// Factory: register a client.
    ///
    /// Name and email are trimmed; email is normalized to lower-case and must
    /// look like `local@domain.tld`.
    pub fn create(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
        billing_address: Address,
    ) -> Result<Self, ClientError> {
        let name = validate_name(name.into())?;
        let email = validate_email(email.into())?;
        let phone = phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());

        let now = Utc::now();
        let id = ClientId::new();
        let mut client = Self {
            id,
            name: name.clone(),
            email: email.clone(),
            phone,
            billing_address,
            created_at: now,
            updated_at: now,
            version: 1,
            pending_events: Vec::new(),
        };
        client.record(ClientEvent::Created(ClientCreated {
            client_id: id,
            name,
            email,
            occurred_at: now,
        }));
        Ok(client)
    }

    /// Loader path: reconstruct a persisted client, recording no events.
    #[allow(clippy::too_many_arguments)]
    pub fn rehydrate(
        id: ClientId,
        name: String,
        email: String,
        phone: Option<String>,
        billing_address: Address,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        version: u64,
    ) -> Self {
        Self {
            id,
            name,
            email,
            phone,
            billing_address,
            created_at,
            updated_at,
            version,
            pending_events: Vec::new(),
        }
    }

    /// Update name/email/phone. `None` leaves a field untouched;
    /// `Some(None)` for phone clears it.
    pub fn update_contact(
        &mut self,
        name: Option<String>,
        email: Option<String>,
        phone: Option<Option<String>>,
    ) -> Result<(), ClientError> {
        if let Some(name) = name {
            self.name = validate_name(name)?;
        }
        if let Some(email) = email {
            self.email = validate_email(email)?;
        }
        if let Some(phone) = phone {
            self.phone = phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
        }
        self.touch();
        Ok(())
    }

    pub fn update_billing_address(&mut self, address: Address) {
        self.billing_address = address;
        self.touch();
    }

    /// Atomically return and clear the pending event list.
    pub fn release_events(&mut self) -> Vec<ClientEvent> {
        core::mem::take(&mut self.pending_events)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn billing_address(&self) -> &Address {
        &self.billing_address
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn record(&mut self, event: ClientEvent) {
        self.pending_events.push(event);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
        self.version += 1;
    }
}

impl AggregateRoot for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

fn validate_name(name: String) -> Result<String, ClientError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("client name is required").into());
    }
    Ok(trimmed.to_string())
}

fn validate_email(email: String) -> Result<String, ClientError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("client email is required").into());
    }
    // local@domain.tld shape, nothing fancier.
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(DomainError::validation("invalid email format").into());
    };
    let valid = !local.is_empty()
        && !local.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains(char::is_whitespace)
        && !domain.contains('@');
    if !valid {
        return Err(DomainError::validation("invalid email format").into());
    }
    Ok(trimmed.to_lowercase())
}

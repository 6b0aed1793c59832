//! `fieldops-clients` — client registry sub-domain.
//!
//! Minimal billing-party registry referenced by interventions. Creation is
//! field validation plus a `ClientCreated` event; no lifecycle state machine.

pub mod client;
pub mod repository;
pub mod services;

pub use client::{Client, ClientCreated, ClientError, ClientEvent};
pub use repository::ClientRepository;
pub use services::{CreateClient, CreateClientCommand, GetClientById};

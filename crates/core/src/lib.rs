//! `fieldops-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod address;
pub mod aggregate;
pub mod error;
pub mod id;
pub mod value_object;

pub use address::Address;
pub use aggregate::AggregateRoot;
pub use error::{DomainError, DomainResult};
pub use id::{ClientId, InterventionId, QuotationId, WorkerId};
pub use value_object::ValueObject;

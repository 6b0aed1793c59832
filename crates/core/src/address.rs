//! Postal address value object.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Validated postal address.
///
/// All required parts are trimmed and must be non-empty. Aggregates treat this
/// as opaque and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    street: String,
    city: String,
    zip_code: String,
    country: String,
    additional_information: Option<String>,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        zip_code: impl Into<String>,
        country: impl Into<String>,
        additional_information: Option<String>,
    ) -> DomainResult<Self> {
        let street = required(street.into(), "street")?;
        let city = required(city.into(), "city")?;
        let zip_code = required(zip_code.into(), "zip code")?;
        let country = required(country.into(), "country")?;
        let additional_information = additional_information
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            street,
            city,
            zip_code,
            country,
            additional_information,
        })
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn additional_information(&self) -> Option<&str> {
        self.additional_information.as_deref()
    }
}

impl ValueObject for Address {}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.street)?;
        if let Some(extra) = &self.additional_information {
            write!(f, ", {extra}")?;
        }
        write!(f, ", {} {}, {}", self.zip_code, self.city, self.country)
    }
}

fn required(value: String, field: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

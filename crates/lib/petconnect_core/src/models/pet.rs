//! Pet listings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ValidationError, optional, required};

/// A pet listed by a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub birth_date: NaiveDate,
    pub owner_id: Uuid,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable pet fields, as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub breed: String,
    pub birth_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Validated, trimmed pet fields ready for a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetFields {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub birth_date: NaiveDate,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
}

impl PetInput {
    /// Check required fields; `birth_date` must lie strictly before `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<PetFields, ValidationError> {
        let name = required(&self.name, "Pet name is required")?;
        let species = required(&self.species, "Species is required")?;
        let breed = required(&self.breed, "Breed is required")?;
        let birth_date = self
            .birth_date
            .ok_or_else(|| ValidationError::new("Birth date is required"))?;
        if birth_date >= today {
            return Err(ValidationError::new("Birth date must be in the past"));
        }
        Ok(PetFields {
            name,
            species,
            breed,
            birth_date,
            description: optional(self.description.as_deref()),
            image_url: optional(self.image_url.as_deref()),
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

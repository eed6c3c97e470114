//! Contact form submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ValidationError, optional, required};

/// A stored contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Raw contact form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Validated contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

impl ContactInput {
    pub fn validate(&self) -> Result<NewContactMessage, ValidationError> {
        Ok(NewContactMessage {
            name: required(&self.name, "Name is required")?,
            email: required(&self.email, "Email is required")?,
            phone: optional(self.phone.as_deref()),
            subject: optional(self.subject.as_deref()),
            message: required(&self.message, "Message is required")?,
        })
    }
}

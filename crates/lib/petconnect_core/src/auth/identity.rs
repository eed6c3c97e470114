//! Identity key profiles.
//!
//! A deployment keys principals either on username or on email. The key is
//! used for credential lookup at login and is what the token subject carries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::auth::Principal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityKey {
    #[default]
    Username,
    Email,
}

impl IdentityKey {
    /// The value of this key on `principal`.
    pub fn of<'a>(&self, principal: &'a Principal) -> &'a str {
        match self {
            IdentityKey::Username => &principal.username,
            IdentityKey::Email => &principal.email,
        }
    }

    /// Human label used in credential error messages.
    pub fn label(&self) -> &'static str {
        match self {
            IdentityKey::Username => "username",
            IdentityKey::Email => "email",
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown identity key '{0}' (expected 'username' or 'email')")]
pub struct UnknownIdentityKey(pub String);

impl FromStr for IdentityKey {
    type Err = UnknownIdentityKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "username" => Ok(IdentityKey::Username),
            "email" => Ok(IdentityKey::Email),
            _ => Err(UnknownIdentityKey(s.to_string())),
        }
    }
}

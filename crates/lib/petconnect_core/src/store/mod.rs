//! Persistence seams.
//!
//! Handlers and the authenticator talk to these traits only. `PgStore` backs
//! them with Postgres; `MemoryStore` keeps everything in-process for tests and
//! database-less development runs.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::IdentityKey;
use crate::models::auth::{NewPrincipal, Principal};
use crate::models::contact::{ContactMessage, NewContactMessage};
use crate::models::pet::{Pet, PetFields};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness rule was violated; the message is user-facing.
    #[error("{0}")]
    Conflict(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Registered principals.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    async fn find_principal_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Principal>, StoreError>;

    async fn find_principal_by_email(&self, email: &str) -> Result<Option<Principal>, StoreError>;

    async fn find_principal_by_id(&self, id: Uuid) -> Result<Option<Principal>, StoreError>;

    /// Insert a principal. Duplicate usernames or emails are `Conflict`.
    async fn create_principal(&self, new: NewPrincipal) -> Result<Principal, StoreError>;

    async fn principal_count(&self) -> Result<i64, StoreError>;

    /// Look a principal up under the given identity profile.
    async fn find_principal(
        &self,
        key: IdentityKey,
        value: &str,
    ) -> Result<Option<Principal>, StoreError> {
        match key {
            IdentityKey::Username => self.find_principal_by_username(value).await,
            IdentityKey::Email => self.find_principal_by_email(value).await,
        }
    }
}

/// Pet listings. Lists are newest first.
#[async_trait]
pub trait PetStore: Send + Sync {
    async fn create_pet(&self, owner_id: Uuid, fields: PetFields) -> Result<Pet, StoreError>;

    async fn get_pet(&self, id: Uuid) -> Result<Option<Pet>, StoreError>;

    async fn list_pets(&self) -> Result<Vec<Pet>, StoreError>;

    async fn list_pets_by_owner(
        &self,
        owner_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Pet>, StoreError>;

    /// Case-insensitive species match.
    async fn list_pets_by_species(&self, species: &str) -> Result<Vec<Pet>, StoreError>;

    /// Replace the editable fields. `None` when the pet does not exist.
    async fn update_pet(&self, id: Uuid, fields: PetFields) -> Result<Option<Pet>, StoreError>;

    /// `false` when the pet did not exist.
    async fn delete_pet(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Contact form submissions. Lists are newest first.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn create_contact_message(
        &self,
        message: NewContactMessage,
    ) -> Result<ContactMessage, StoreError>;

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, StoreError>;
}

/// Everything the API needs from persistence.
#[async_trait]
pub trait Store: PrincipalStore + PetStore + ContactStore {
    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}

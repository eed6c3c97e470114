//! In-process store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContactStore, PetStore, PrincipalStore, Store, StoreError};
use crate::ids::{random_id, sortable_id};
use crate::models::auth::{NewPrincipal, Principal};
use crate::models::contact::{ContactMessage, NewContactMessage};
use crate::models::pet::{Pet, PetFields};

#[derive(Debug, Default)]
struct Tables {
    principals: HashMap<Uuid, Principal>,
    pets: HashMap<Uuid, Pet>,
    contacts: Vec<ContactMessage>,
}

/// Store backed by process memory. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut pets: Vec<Pet>) -> Vec<Pet> {
    pets.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
    pets
}

#[async_trait]
impl PrincipalStore for MemoryStore {
    async fn find_principal_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Principal>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .principals
            .values()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn find_principal_by_email(&self, email: &str) -> Result<Option<Principal>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .principals
            .values()
            .find(|p| p.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_principal_by_id(&self, id: Uuid) -> Result<Option<Principal>, StoreError> {
        Ok(self.tables.read().await.principals.get(&id).cloned())
    }

    async fn create_principal(&self, new: NewPrincipal) -> Result<Principal, StoreError> {
        // Uniqueness checks and the insert share one write lock.
        let mut tables = self.tables.write().await;
        if tables.principals.values().any(|p| p.username == new.username) {
            return Err(StoreError::Conflict("Username already exists".into()));
        }
        if tables
            .principals
            .values()
            .any(|p| p.email.eq_ignore_ascii_case(&new.email))
        {
            return Err(StoreError::Conflict("Email already exists".into()));
        }
        let principal = Principal {
            id: random_id(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            created_at: Utc::now(),
        };
        tables.principals.insert(principal.id, principal.clone());
        Ok(principal)
    }

    async fn principal_count(&self) -> Result<i64, StoreError> {
        Ok(self.tables.read().await.principals.len() as i64)
    }
}

#[async_trait]
impl PetStore for MemoryStore {
    async fn create_pet(&self, owner_id: Uuid, fields: PetFields) -> Result<Pet, StoreError> {
        let now = Utc::now();
        let pet = Pet {
            id: sortable_id(),
            name: fields.name,
            species: fields.species,
            breed: fields.breed,
            birth_date: fields.birth_date,
            owner_id,
            description: fields.description,
            image_url: fields.image_url,
            is_active: fields.is_active,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.pets.insert(pet.id, pet.clone());
        Ok(pet)
    }

    async fn get_pet(&self, id: Uuid) -> Result<Option<Pet>, StoreError> {
        Ok(self.tables.read().await.pets.get(&id).cloned())
    }

    async fn list_pets(&self) -> Result<Vec<Pet>, StoreError> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.pets.values().cloned().collect()))
    }

    async fn list_pets_by_owner(
        &self,
        owner_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Pet>, StoreError> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .pets
                .values()
                .filter(|p| p.owner_id == owner_id && (!active_only || p.is_active))
                .cloned()
                .collect(),
        ))
    }

    async fn list_pets_by_species(&self, species: &str) -> Result<Vec<Pet>, StoreError> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .pets
                .values()
                .filter(|p| p.species.eq_ignore_ascii_case(species))
                .cloned()
                .collect(),
        ))
    }

    async fn update_pet(&self, id: Uuid, fields: PetFields) -> Result<Option<Pet>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(pet) = tables.pets.get_mut(&id) else {
            return Ok(None);
        };
        pet.name = fields.name;
        pet.species = fields.species;
        pet.breed = fields.breed;
        pet.birth_date = fields.birth_date;
        pet.description = fields.description;
        pet.image_url = fields.image_url;
        pet.is_active = fields.is_active;
        pet.updated_at = Utc::now();
        Ok(Some(pet.clone()))
    }

    async fn delete_pet(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.pets.remove(&id).is_some())
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn create_contact_message(
        &self,
        message: NewContactMessage,
    ) -> Result<ContactMessage, StoreError> {
        let stored = ContactMessage {
            id: sortable_id(),
            name: message.name,
            email: message.email,
            phone: message.phone,
            subject: message.subject,
            message: message.message,
            read: false,
            created_at: Utc::now(),
        };
        self.tables.write().await.contacts.push(stored.clone());
        Ok(stored)
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.contacts.iter().rev().cloned().collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

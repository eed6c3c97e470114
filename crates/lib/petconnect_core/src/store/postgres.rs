//! Postgres-backed store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ContactStore, PetStore, PrincipalStore, Store, StoreError};
use crate::ids::{random_id, sortable_id};
use crate::models::auth::{NewPrincipal, Principal, Role};
use crate::models::contact::{ContactMessage, NewContactMessage};
use crate::models::pet::{Pet, PetFields};

const PRINCIPAL_COLUMNS: &str = "id, username, email, password_hash, role, created_at";

const PET_COLUMNS: &str = "id, name, species, breed, birth_date, owner_id, description, \
     image_url, is_active, created_at, updated_at";

const CONTACT_COLUMNS: &str = "id, name, email, phone, subject, message, read, created_at";

type PrincipalRow = (Uuid, String, String, String, String, DateTime<Utc>);

fn principal_from_row(row: PrincipalRow) -> Result<Principal, StoreError> {
    let (id, username, email, password_hash, role, created_at) = row;
    let role = role
        .parse::<Role>()
        .map_err(|e| StoreError::Corrupt(format!("principal {id}: {e}")))?;
    Ok(Principal {
        id,
        username,
        email,
        password_hash,
        role,
        created_at,
    })
}

/// Map unique-constraint violations on `principals` to user-facing conflicts.
fn principal_conflict(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e
        && db.is_unique_violation()
    {
        return match db.constraint() {
            Some(c) if c.contains("email") => StoreError::Conflict("Email already exists".into()),
            _ => StoreError::Conflict("Username already exists".into()),
        };
    }
    StoreError::Db(e)
}

/// Store over a Postgres connection pool. Run `crate::migrate::migrate` first.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_principal(
        &self,
        filter: &str,
        value: &str,
    ) -> Result<Option<Principal>, StoreError> {
        let sql = format!("SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE {filter}");
        let row = sqlx::query_as::<_, PrincipalRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.map(principal_from_row).transpose()
    }

    async fn fetch_pets(&self, filter: &str, bind: Option<&str>) -> Result<Vec<Pet>, StoreError> {
        let sql = format!(
            "SELECT {PET_COLUMNS} FROM pets {filter} ORDER BY created_at DESC, id DESC"
        );
        let query = sqlx::query_as::<_, Pet>(&sql);
        let query = match bind {
            Some(value) => query.bind(value),
            None => query,
        };
        Ok(query.fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl PrincipalStore for PgStore {
    async fn find_principal_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Principal>, StoreError> {
        self.fetch_principal("username = $1", username).await
    }

    async fn find_principal_by_email(&self, email: &str) -> Result<Option<Principal>, StoreError> {
        self.fetch_principal("lower(email) = lower($1)", email).await
    }

    async fn find_principal_by_id(&self, id: Uuid) -> Result<Option<Principal>, StoreError> {
        let sql = format!("SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE id = $1");
        let row = sqlx::query_as::<_, PrincipalRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(principal_from_row).transpose()
    }

    async fn create_principal(&self, new: NewPrincipal) -> Result<Principal, StoreError> {
        let sql = format!(
            "INSERT INTO principals (id, username, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {PRINCIPAL_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PrincipalRow>(&sql)
            .bind(random_id())
            .bind(&new.username)
            .bind(&new.email)
            .bind(&new.password_hash)
            .bind(new.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(principal_conflict)?;
        principal_from_row(row)
    }

    async fn principal_count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM principals")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl PetStore for PgStore {
    async fn create_pet(&self, owner_id: Uuid, fields: PetFields) -> Result<Pet, StoreError> {
        let sql = format!(
            "INSERT INTO pets (id, name, species, breed, birth_date, owner_id, description, \
             image_url, is_active) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {PET_COLUMNS}"
        );
        let pet = sqlx::query_as::<_, Pet>(&sql)
            .bind(sortable_id())
            .bind(&fields.name)
            .bind(&fields.species)
            .bind(&fields.breed)
            .bind(fields.birth_date)
            .bind(owner_id)
            .bind(&fields.description)
            .bind(&fields.image_url)
            .bind(fields.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(pet)
    }

    async fn get_pet(&self, id: Uuid) -> Result<Option<Pet>, StoreError> {
        let sql = format!("SELECT {PET_COLUMNS} FROM pets WHERE id = $1");
        let pet = sqlx::query_as::<_, Pet>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pet)
    }

    async fn list_pets(&self) -> Result<Vec<Pet>, StoreError> {
        self.fetch_pets("", None).await
    }

    async fn list_pets_by_owner(
        &self,
        owner_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Pet>, StoreError> {
        let sql = format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE owner_id = $1 AND (NOT $2 OR is_active) \
             ORDER BY created_at DESC, id DESC"
        );
        let pets = sqlx::query_as::<_, Pet>(&sql)
            .bind(owner_id)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;
        Ok(pets)
    }

    async fn list_pets_by_species(&self, species: &str) -> Result<Vec<Pet>, StoreError> {
        self.fetch_pets("WHERE lower(species) = lower($1)", Some(species))
            .await
    }

    async fn update_pet(&self, id: Uuid, fields: PetFields) -> Result<Option<Pet>, StoreError> {
        let sql = format!(
            "UPDATE pets SET name = $2, species = $3, breed = $4, birth_date = $5, \
             description = $6, image_url = $7, is_active = $8, updated_at = now() \
             WHERE id = $1 RETURNING {PET_COLUMNS}"
        );
        let pet = sqlx::query_as::<_, Pet>(&sql)
            .bind(id)
            .bind(&fields.name)
            .bind(&fields.species)
            .bind(&fields.breed)
            .bind(fields.birth_date)
            .bind(&fields.description)
            .bind(&fields.image_url)
            .bind(fields.is_active)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pet)
    }

    async fn delete_pet(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM pets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ContactStore for PgStore {
    async fn create_contact_message(
        &self,
        message: NewContactMessage,
    ) -> Result<ContactMessage, StoreError> {
        let sql = format!(
            "INSERT INTO contact_messages (id, name, email, phone, subject, message) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {CONTACT_COLUMNS}"
        );
        let stored = sqlx::query_as::<_, ContactMessage>(&sql)
            .bind(sortable_id())
            .bind(&message.name)
            .bind(&message.email)
            .bind(&message.phone)
            .bind(&message.subject)
            .bind(&message.message)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, StoreError> {
        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_messages ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ContactMessage>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

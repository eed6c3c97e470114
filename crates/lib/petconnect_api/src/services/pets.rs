//! Pet listing service. Reads are public; writes are owner-or-admin.

use chrono::Utc;
use petconnect_core::models::auth::{PublicPrincipal, Role};
use petconnect_core::models::pet::{Pet, PetInput};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};

/// Owners may change their own listings; admins may change any.
pub fn ensure_can_modify(caller: &PublicPrincipal, pet: &Pet) -> AppResult<()> {
    if pet.owner_id == caller.id || caller.role.has_privilege(Role::Admin) {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "Only the owner or an admin may modify this pet".into(),
    ))
}

pub async fn get(state: &AppState, id: Uuid) -> AppResult<Pet> {
    state
        .store
        .get_pet(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pet {id}")))
}

/// List a pet owned by `caller`. Any owner id in the body is ignored.
pub async fn create(state: &AppState, caller: &PublicPrincipal, input: &PetInput) -> AppResult<Pet> {
    let fields = input.validate(Utc::now().date_naive())?;
    let pet = state.store.create_pet(caller.id, fields).await?;
    info!(pet_id = %pet.id, owner_id = %caller.id, "pet listed");
    Ok(pet)
}

pub async fn update(
    state: &AppState,
    caller: &PublicPrincipal,
    id: Uuid,
    input: &PetInput,
) -> AppResult<Pet> {
    let existing = get(state, id).await?;
    ensure_can_modify(caller, &existing)?;
    let fields = input.validate(Utc::now().date_naive())?;
    let pet = state
        .store
        .update_pet(id, fields)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pet {id}")))?;
    info!(pet_id = %pet.id, by = %caller.id, "pet updated");
    Ok(pet)
}

pub async fn delete(state: &AppState, caller: &PublicPrincipal, id: Uuid) -> AppResult<()> {
    let existing = get(state, id).await?;
    ensure_can_modify(caller, &existing)?;
    if !state.store.delete_pet(id).await? {
        return Err(AppError::NotFound(format!("Pet {id}")));
    }
    info!(pet_id = %id, by = %caller.id, "pet removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn principal(role: Role) -> PublicPrincipal {
        PublicPrincipal {
            id: Uuid::new_v4(),
            username: "p".into(),
            email: "p@example.com".into(),
            role,
            created_at: Utc::now(),
        }
    }

    fn pet_owned_by(owner_id: Uuid) -> Pet {
        Pet {
            id: Uuid::new_v4(),
            name: "Rex".into(),
            species: "Dog".into(),
            breed: "Collie".into(),
            birth_date: NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
            owner_id,
            description: None,
            image_url: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_and_admin_may_modify() {
        let owner = principal(Role::User);
        let pet = pet_owned_by(owner.id);
        assert!(ensure_can_modify(&owner, &pet).is_ok());
        assert!(ensure_can_modify(&principal(Role::Admin), &pet).is_ok());
    }

    #[test]
    fn other_users_are_forbidden() {
        let pet = pet_owned_by(Uuid::new_v4());
        assert!(matches!(
            ensure_can_modify(&principal(Role::User), &pet),
            Err(AppError::Forbidden(_))
        ));
    }
}

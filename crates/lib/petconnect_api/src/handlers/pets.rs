//! Pet listing handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use petconnect_core::models::pet::{Pet, PetInput};
use uuid::Uuid;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::MessageResponse;
use crate::services::pets;

/// `GET /api/pets`
pub async fn list_pets_handler(State(state): State<AppState>) -> AppResult<Json<Vec<Pet>>> {
    Ok(Json(state.store.list_pets().await?))
}

/// `GET /api/pets/{id}`
pub async fn get_pet_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Pet>> {
    Ok(Json(pets::get(&state, id).await?))
}

/// `GET /api/pets/owner/{owner_id}`
pub async fn list_owner_pets_handler(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
) -> AppResult<Json<Vec<Pet>>> {
    Ok(Json(state.store.list_pets_by_owner(owner_id, false).await?))
}

/// `GET /api/pets/owner/{owner_id}/active`
pub async fn list_active_owner_pets_handler(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
) -> AppResult<Json<Vec<Pet>>> {
    Ok(Json(state.store.list_pets_by_owner(owner_id, true).await?))
}

/// `GET /api/pets/species/{species}`
pub async fn list_species_pets_handler(
    State(state): State<AppState>,
    Path(species): Path<String>,
) -> AppResult<Json<Vec<Pet>>> {
    Ok(Json(state.store.list_pets_by_species(species.trim()).await?))
}

/// `POST /api/pets`: list a pet owned by the caller.
pub async fn create_pet_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(caller)): Extension<AuthenticatedUser>,
    Json(body): Json<PetInput>,
) -> AppResult<(StatusCode, Json<Pet>)> {
    let pet = pets::create(&state, &caller, &body).await?;
    Ok((StatusCode::CREATED, Json(pet)))
}

/// `PUT /api/pets/{id}`: owner or admin.
pub async fn update_pet_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(caller)): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<PetInput>,
) -> AppResult<Json<Pet>> {
    Ok(Json(pets::update(&state, &caller, id, &body).await?))
}

/// `DELETE /api/pets/{id}`: owner or admin.
pub async fn delete_pet_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(caller)): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    pets::delete(&state, &caller, id).await?;
    Ok(Json(MessageResponse {
        message: "Pet deleted".to_string(),
    }))
}

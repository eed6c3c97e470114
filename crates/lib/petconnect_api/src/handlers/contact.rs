//! Contact form handlers.

use axum::Json;
use axum::extract::State;
use petconnect_core::models::contact::{ContactInput, ContactMessage};
use tracing::info;

use crate::AppState;
use crate::error::AppResult;
use crate::models::ContactResponse;

/// `POST /api/contact`: store a contact form submission.
pub async fn submit_contact_handler(
    State(state): State<AppState>,
    Json(body): Json<ContactInput>,
) -> AppResult<Json<ContactResponse>> {
    let message = body.validate()?;
    let stored = state.store.create_contact_message(message).await?;
    info!(message_id = %stored.id, "contact message received");
    Ok(Json(ContactResponse {
        status: "success".to_string(),
        message: "Thank you for your message. We will get back to you soon.".to_string(),
        message_id: stored.id,
    }))
}

/// `GET /api/contact/messages`: every submission, newest first. Admin only.
pub async fn list_contact_messages_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ContactMessage>>> {
    Ok(Json(state.store.list_contact_messages().await?))
}

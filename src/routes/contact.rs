/**
 * Contact Routes
 * Contact form submission and operator-facing message listing
 */
use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;

use crate::db::models::ContactMessage;
use crate::error::ApiError;
use crate::routes::auth::require_admin;
use crate::services::contact::{self, ContactForm};
use crate::state::AppState;

/// Response for POST /api/contact
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub id: i32,
}

/// POST /api/contact - Submit the contact form
pub async fn submit_message(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let message = contact::submit(&state, form).await?;

    Ok(Json(SubmitResponse {
        success: true,
        message: "Thank you for your message! I'll get back to you soon!".to_string(),
        id: message.id,
    }))
}

/// GET /api/contact - List every stored message (auth required)
pub async fn list_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ContactMessage>>, ApiError> {
    require_admin(&headers)?;

    let messages = contact::list(&state).await?;
    Ok(Json(messages))
}

//! Message Service - contact form submission and operator listing.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::db::models::{ContactMessage, NewContactMessage};
use crate::error::{ApiError, FieldError};
use crate::state::AppState;
use crate::store::MessageStore as _;

lazy_static! {
    /// Rough email shape check: something@something.tld, no whitespace.
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Incoming contact form. All fields optional so that missing ones surface
/// as per-field validation errors instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub project_type: Option<String>,
    pub message: Option<String>,
}

fn validate(form: &ContactForm) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if form.name.as_deref().map_or(0, |s| s.trim().chars().count()) < 2 {
        errors.push(FieldError::new(
            "name",
            "Name must be at least 2 characters",
        ));
    }
    if !form
        .email
        .as_deref()
        .is_some_and(|s| EMAIL_REGEX.is_match(s.trim()))
    {
        errors.push(FieldError::new(
            "email",
            "A valid email address is required",
        ));
    }
    if form
        .project_type
        .as_deref()
        .map_or(true, |s| s.trim().is_empty())
    {
        errors.push(FieldError::new(
            "projectType",
            "Please select a project type",
        ));
    }
    if form
        .message
        .as_deref()
        .map_or(0, |s| s.trim().chars().count())
        < 10
    {
        errors.push(FieldError::new(
            "message",
            "Message must be at least 10 characters",
        ));
    }

    errors
}

/// Validates and persists a contact submission.
pub async fn submit(state: &AppState, form: ContactForm) -> Result<ContactMessage, ApiError> {
    let errors = validate(&form);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let new = NewContactMessage {
        name: form.name.unwrap_or_default().trim().to_string(),
        email: form.email.unwrap_or_default().trim().to_string(),
        project_type: form.project_type.unwrap_or_default().trim().to_string(),
        message: form.message.unwrap_or_default().trim().to_string(),
    };

    let message = state.messages.insert(new).await?;
    tracing::info!(id = message.id, "contact message received");
    Ok(message)
}

/// Every stored message, for operator review.
pub async fn list(state: &AppState) -> Result<Vec<ContactMessage>, ApiError> {
    Ok(state.messages.list().await?)
}

/**
 * Routes Module
 * API route handlers
 */

pub mod auth;
pub mod contact;
pub mod health;
pub mod projects;

use serde::Serialize;

/// Success response (for delete and similar record-less operations)
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

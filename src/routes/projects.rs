/**
 * Project Routes
 * CRUD API endpoints for portfolio projects, with multipart media upload
 * on create and update
 */
use axum::{
    extract::{Multipart, Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::models::Project;
use crate::error::ApiError;
use crate::routes::auth::require_admin;
use crate::routes::SuccessResponse;
use crate::services::{projects, upload};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for GET /api/projects
#[derive(Debug, Deserialize)]
pub struct ProjectsQuery {
    pub category: Option<String>,
}

/// Response for create/update
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub success: bool,
    pub message: String,
    pub project: Project,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/projects?category= - List projects, optionally by category
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectsQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = projects::list(&state, query.category).await?;
    Ok(Json(projects))
}

/// GET /api/projects/{id} - Get a single project
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Project>, ApiError> {
    let project = projects::get(&state, id).await?;
    Ok(Json(project))
}

/// POST /api/projects - Create a project from multipart fields + media files
/// (auth required)
pub async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<ProjectResponse>, ApiError> {
    require_admin(&headers)?;

    let (form, uploaded) =
        upload::read_project_request(&mut multipart, state.media.as_ref()).await?;
    let project = projects::create(&state, form, uploaded).await?;

    tracing::info!(id = project.id, title = %project.title, "project created");

    Ok(Json(ProjectResponse {
        success: true,
        message: "Project created successfully!".to_string(),
        project,
    }))
}

/// PUT /api/projects/{id} - Update a project; new media replaces or extends
/// the existing set depending on keepExistingMedia (auth required)
pub async fn update_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<ProjectResponse>, ApiError> {
    require_admin(&headers)?;

    let (form, uploaded) =
        upload::read_project_request(&mut multipart, state.media.as_ref()).await?;
    let project = projects::update(&state, id, form, uploaded).await?;

    tracing::info!(id = project.id, "project updated");

    Ok(Json(ProjectResponse {
        success: true,
        message: "Project updated successfully!".to_string(),
        project,
    }))
}

/// DELETE /api/projects/{id} - Delete a project and its media files
/// (auth required)
pub async fn delete_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse>, ApiError> {
    require_admin(&headers)?;

    projects::delete(&state, id).await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: "Project deleted successfully!".to_string(),
    }))
}
